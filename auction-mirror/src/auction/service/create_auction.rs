use {
    super::Service,
    crate::{
        error::EngineError,
        kernel::{
            contracts::WriteRequest,
            units::to_base_units,
        },
    },
    ethers::types::H256,
};

#[derive(Debug, Clone)]
pub struct CreateAuctionInput {
    pub title:           String,
    /// Decimal ether.
    pub start_amount:    String,
    pub duration_blocks: String,
}

impl Service {
    #[tracing::instrument(skip_all, fields(title = %input.title))]
    pub async fn create_auction(&self, input: CreateAuctionInput) -> Result<H256, EngineError> {
        let account = self.connected_account()?;
        let snapshot = self.repo.get_snapshot();
        if snapshot.top.is_admin(Some(account)) {
            return Err(EngineError::AdminCannotCreateAuction);
        }
        if snapshot.top.destroyed {
            return Err(EngineError::ContractDestroyed);
        }
        if Self::read_or_default(self.contract.is_banned_seller(account).await, false) {
            return Err(EngineError::SellerBanned(account));
        }

        let title = input.title.trim();
        if title.is_empty() {
            return Err(EngineError::EmptyTitle);
        }
        let start_amount = to_base_units(&input.start_amount).map_err(EngineError::InvalidAmount)?;
        let duration_blocks = match input.duration_blocks.trim().parse::<u64>() {
            Ok(duration) if duration >= 1 => duration,
            _ => return Err(EngineError::InvalidDuration(input.duration_blocks.clone())),
        };
        let fee = Self::read_or_default(
            self.contract.auction_fee().await,
            self.config.default_auction_fee,
        );

        self.submit(
            account,
            WriteRequest::CreateAuction {
                title: title.to_string(),
                start_amount,
                duration_blocks,
                fee,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            auction::entities::{
                SessionState,
                TopState,
            },
            kernel::{
                contracts::MockAuctionHouse,
                wallet::MockWallet,
            },
        },
        ethers::types::{
            Address,
            U256,
        },
    };

    const ADMIN: Address = Address::repeat_byte(0xad);
    const SELLER: Address = Address::repeat_byte(0x51);

    fn input(title: &str, start_amount: &str, duration_blocks: &str) -> CreateAuctionInput {
        CreateAuctionInput {
            title:           title.to_string(),
            start_amount:    start_amount.to_string(),
            duration_blocks: duration_blocks.to_string(),
        }
    }

    fn service_for(contract: MockAuctionHouse, account: Address, destroyed: bool) -> Service {
        let service = Service::new_with_mocks(contract, MockWallet::new());
        service.repo.replace_top(TopState {
            owner: ADMIN,
            destroyed,
            ..Default::default()
        });
        service
            .repo
            .replace_session(SessionState::connected(Some(account)));
        service
    }

    #[tokio::test]
    async fn test_admin_cannot_create_auction() {
        let mut contract = MockAuctionHouse::new();
        contract.expect_send().never();
        contract.expect_is_banned_seller().never();
        let service = service_for(contract, ADMIN, false);

        let result = service.create_auction(input("Lamp", "1", "100")).await;
        assert_eq!(result, Err(EngineError::AdminCannotCreateAuction));
        assert!(result
            .unwrap_err()
            .to_message()
            .contains("admin account is not allowed"));
    }

    #[tokio::test]
    async fn test_rejects_invalid_fields_before_submission() {
        let mut contract = MockAuctionHouse::new();
        contract.expect_send().never();
        contract
            .expect_is_banned_seller()
            .returning(|_| Ok(false));
        let service = service_for(contract, SELLER, false);

        assert_eq!(
            service.create_auction(input("  ", "1", "100")).await,
            Err(EngineError::EmptyTitle)
        );
        assert!(matches!(
            service.create_auction(input("Lamp", "-1", "100")).await,
            Err(EngineError::InvalidAmount(_))
        ));
        assert_eq!(
            service.create_auction(input("Lamp", "1", "0")).await,
            Err(EngineError::InvalidDuration("0".to_string()))
        );
        assert_eq!(
            service.create_auction(input("Lamp", "1", "ten")).await,
            Err(EngineError::InvalidDuration("ten".to_string()))
        );
    }

    #[tokio::test]
    async fn test_destroyed_and_banned() {
        let mut contract = MockAuctionHouse::new();
        contract.expect_send().never();
        contract
            .expect_is_banned_seller()
            .times(1)
            .returning(|_| Ok(true));
        let service = service_for(contract, SELLER, false);
        assert_eq!(
            service.create_auction(input("Lamp", "1", "100")).await,
            Err(EngineError::SellerBanned(SELLER))
        );

        let mut contract = MockAuctionHouse::new();
        contract.expect_send().never();
        let service = service_for(contract, SELLER, true);
        assert_eq!(
            service.create_auction(input("Lamp", "1", "100")).await,
            Err(EngineError::ContractDestroyed)
        );
    }

    #[tokio::test]
    async fn test_fee_falls_back_to_default() {
        let mut contract = MockAuctionHouse::new();
        contract
            .expect_is_banned_seller()
            .returning(|_| Err(EngineError::ReadUnsupported("banned sellers")));
        contract
            .expect_auction_fee()
            .returning(|| Err(EngineError::ReadUnsupported("auction fee")));
        contract
            .expect_send()
            .withf(|from, request| {
                *from == SELLER
                    && *request
                        == WriteRequest::CreateAuction {
                            title:           "Lamp".to_string(),
                            start_amount:    U256::exp10(18),
                            duration_blocks: 100,
                            fee:             U256::exp10(16) * 2,
                        }
            })
            .times(1)
            .returning(|_, _| Ok(H256::repeat_byte(1)));
        let service = service_for(contract, SELLER, false);
        // Keeps the post-submission refresh coalesced.
        let _in_flight = service.refresh_lock.lock().await;
        assert_eq!(
            service.create_auction(input(" Lamp ", "1", "100")).await,
            Ok(H256::repeat_byte(1))
        );
    }

    #[tokio::test]
    async fn test_requires_connected_account() {
        let mut contract = MockAuctionHouse::new();
        contract.expect_send().never();
        let service = Service::new_with_mocks(contract, MockWallet::new());
        assert_eq!(
            service.create_auction(input("Lamp", "1", "100")).await,
            Err(EngineError::NotConnected)
        );
    }
}
