use {
    super::Service,
    crate::{
        auction::entities::SessionState,
        error::EngineError,
    },
};

impl Service {
    /// Connects the session: checks the network and the contract, installs the
    /// subscriptions and loads the mirror.
    #[tracing::instrument(skip_all)]
    pub async fn initialize(&self) -> Result<(), EngineError> {
        let accounts = self.wallet.request_accounts().await?;
        let chain_id = self.wallet.chain_id().await?;
        self.apply_network(chain_id)?;

        let address = self.contract.address();
        let code_present = self
            .contract
            .code_present()
            .await
            .map_err(|e| EngineError::ConnectionUnavailable(e.to_message()))?;
        if !code_present {
            return Err(EngineError::ConnectionUnavailable(format!(
                "no contract deployed at {:?} on chain {}",
                address, chain_id
            )));
        }

        let account = accounts.first().copied();
        tracing::info!(account = ?account, chain_id, contract = ?address, "Session connected");
        self.repo.replace_session(SessionState::connected(account));
        self.install_subscriptions().await;
        self.refresh_all().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            auction::service::tests::TEST_CHAIN_ID,
            kernel::{
                contracts::MockAuctionHouse,
                wallet::MockWallet,
            },
        },
        ethers::types::{
            Address,
            H256,
            U256,
        },
    };

    #[tokio::test]
    async fn test_wrong_network_is_fatal() {
        let mut wallet = MockWallet::new();
        wallet.expect_request_accounts().returning(|| Ok(vec![]));
        wallet.expect_chain_id().returning(|| Ok(1));
        wallet.expect_subscribe().never();
        let mut contract = MockAuctionHouse::new();
        contract.expect_code_present().never();
        let service = Service::new_with_mocks(contract, wallet);

        assert_eq!(
            service.initialize().await,
            Err(EngineError::WrongNetwork {
                expected: TEST_CHAIN_ID,
                actual:   1,
            })
        );
        assert!(!service.is_network_open());
    }

    #[tokio::test]
    async fn test_missing_contract_code() {
        let mut wallet = MockWallet::new();
        wallet.expect_request_accounts().returning(|| Ok(vec![]));
        wallet.expect_chain_id().returning(|| Ok(TEST_CHAIN_ID));
        wallet.expect_subscribe().never();
        let mut contract = MockAuctionHouse::new();
        contract
            .expect_address()
            .returning(|| Address::repeat_byte(0xcc));
        contract.expect_code_present().returning(|| Ok(false));
        let service = Service::new_with_mocks(contract, wallet);

        assert!(matches!(
            service.initialize().await,
            Err(EngineError::ConnectionUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_transport_without_subscriptions_still_loads() {
        let account = Address::repeat_byte(0x01);
        let mut wallet = MockWallet::new();
        wallet
            .expect_request_accounts()
            .returning(move || Ok(vec![account]));
        wallet.expect_chain_id().returning(|| Ok(TEST_CHAIN_ID));
        wallet.expect_subscribe().times(2).returning(|_| {
            Err(EngineError::SubscriptionUnsupported(
                "http transport".to_string(),
            ))
        });
        let mut contract = MockAuctionHouse::new();
        contract
            .expect_address()
            .returning(|| Address::repeat_byte(0xcc));
        contract.expect_event_topics().returning(|| {
            vec![(
                crate::kernel::contracts::ContractEventKind::BidPlaced,
                H256::repeat_byte(1),
            )]
        });
        contract.expect_code_present().returning(|| Ok(true));
        contract
            .expect_admin()
            .returning(|| Ok(Address::repeat_byte(0xad)));
        contract.expect_balance().returning(|| Ok(U256::from(7)));
        contract
            .expect_collected_fees()
            .returning(|| Ok(U256::zero()));
        contract.expect_auction_fee().returning(|| Ok(U256::one()));
        contract.expect_destroyed().returning(|| Ok(false));
        contract.expect_block_number().returning(|| Ok(88));
        contract.expect_auction_ids().returning(|_| Ok(vec![]));
        contract
            .expect_pending_returns()
            .returning(|_| Ok(U256::from(2)));
        let service = Service::new_with_mocks(contract, wallet);

        assert_eq!(service.initialize().await, Ok(()));
        assert!(service.is_network_open());
        assert!(service.subscriptions.lock().await.handles().is_empty());
        let snapshot = service.get_snapshot();
        assert_eq!(snapshot.account(), Some(account));
        assert_eq!(snapshot.top.contract_balance, U256::from(7));
        assert_eq!(snapshot.top.current_block, 88);
        assert!(snapshot.session.claim_enabled);
    }

    #[tokio::test]
    async fn test_provider_unavailable() {
        let mut wallet = MockWallet::new();
        wallet.expect_request_accounts().returning(|| {
            Err(EngineError::ConnectionUnavailable(
                "connection refused".to_string(),
            ))
        });
        let service = Service::new_with_mocks(MockAuctionHouse::new(), wallet);
        assert!(matches!(
            service.initialize().await,
            Err(EngineError::ConnectionUnavailable(_))
        ));
    }
}
