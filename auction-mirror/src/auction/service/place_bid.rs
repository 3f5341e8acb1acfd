use {
    super::{
        bid_protocol::{
            compute_bid_payment,
            parse_bid_amount,
        },
        Service,
    },
    crate::{
        error::EngineError,
        kernel::{
            contracts::WriteRequest,
            entities::AuctionId,
        },
    },
    ethers::types::H256,
};

#[derive(Debug, Clone)]
pub struct PlaceBidInput {
    pub auction_id: AuctionId,
    /// New total bid in decimal ether, the buffered input is used when absent.
    pub amount:     Option<String>,
}

impl Service {
    #[tracing::instrument(skip_all, fields(auction_id = %input.auction_id))]
    pub async fn place_bid(&self, input: PlaceBidInput) -> Result<H256, EngineError> {
        let account = self.connected_account()?;
        let desired = match input.amount {
            Some(amount) => amount,
            None => self
                .repo
                .get_bid_input(input.auction_id)
                .await
                .ok_or(EngineError::InvalidAmount("no bid amount entered".to_string()))?,
        };
        let desired_total = parse_bid_amount(&desired)?;

        let leading_amount = self
            .repo
            .get_snapshot()
            .auctions
            .find_active(input.auction_id)
            .map(|auction| auction.current_price())
            .ok_or(EngineError::UnknownAuction(input.auction_id))?;
        let contribution = match self.contract.contribution(input.auction_id, account).await {
            Ok(contributed) => Some(contributed),
            Err(EngineError::ReadUnsupported(_)) => None,
            Err(e) => return Err(e),
        };
        let payment = compute_bid_payment(
            desired_total,
            leading_amount,
            contribution,
            self.config.bid_model,
        )?;
        tracing::debug!(payment = ?payment, "Bid payment computed");

        let tx_hash = self
            .submit(
                account,
                WriteRequest::PlaceBid {
                    auction_id: input.auction_id,
                    new_total:  payment.new_total,
                    payment:    payment.payment,
                },
            )
            .await?;
        self.repo.clear_bid_input(input.auction_id).await;
        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            auction::{
                entities::{
                    sample_auction,
                    AuctionCollections,
                    SessionState,
                },
                service::bid_protocol::BidModel,
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

    const BIDDER: Address = Address::repeat_byte(0xb1);

    fn service_with_auction(contract: MockAuctionHouse, bid_model: BidModel) -> Service {
        let service = Service::new_with_mocks_and_model(contract, MockWallet::new(), bid_model);
        service.repo.replace_auctions(AuctionCollections {
            active: vec![sample_auction(1, 100, Address::repeat_byte(0xbb))],
            ..Default::default()
        });
        service
            .repo
            .replace_session(SessionState::connected(Some(BIDDER)));
        service
    }

    /// Decimal ether string for an amount given in wei.
    fn wei(amount: &str) -> Option<String> {
        Some(format!("0.{:0>18}", amount))
    }

    #[tokio::test]
    async fn test_pays_difference_and_clears_buffer() {
        let mut contract = MockAuctionHouse::new();
        contract
            .expect_contribution()
            .times(1)
            .returning(|_, _| Ok(U256::from(100)));
        contract
            .expect_send()
            .withf(|from, request| {
                *from == BIDDER
                    && *request
                        == WriteRequest::PlaceBid {
                            auction_id: AuctionId::from(1),
                            new_total:  U256::from(150),
                            payment:    U256::from(50),
                        }
            })
            .times(1)
            .returning(|_, _| Ok(H256::repeat_byte(2)));
        let service = service_with_auction(contract, BidModel::Cumulative);
        service
            .set_bid_input(AuctionId::from(1), "0.00000000000000015".to_string())
            .await;
        let _in_flight = service.refresh_lock.lock().await;

        let result = service
            .place_bid(PlaceBidInput {
                auction_id: AuctionId::from(1),
                amount:     None,
            })
            .await;
        assert_eq!(result, Ok(H256::repeat_byte(2)));
        assert_eq!(service.repo.get_bid_input(AuctionId::from(1)).await, None);
    }

    #[tokio::test]
    async fn test_rejections_never_submit() {
        let mut contract = MockAuctionHouse::new();
        contract
            .expect_contribution()
            .returning(|_, _| Ok(U256::from(150)));
        contract.expect_send().never();
        let service = service_with_auction(contract, BidModel::Cumulative);

        assert!(matches!(
            service
                .place_bid(PlaceBidInput {
                    auction_id: AuctionId::from(1),
                    amount:     wei("90"),
                })
                .await,
            Err(EngineError::BidTooLow { .. })
        ));
        assert_eq!(
            service
                .place_bid(PlaceBidInput {
                    auction_id: AuctionId::from(1),
                    amount:     wei("150"),
                })
                .await,
            Err(EngineError::NoIncrementalPayment {
                desired:     U256::from(150),
                contributed: U256::from(150),
            })
        );
        assert_eq!(
            service
                .place_bid(PlaceBidInput {
                    auction_id: AuctionId::from(9),
                    amount:     wei("150"),
                })
                .await,
            Err(EngineError::UnknownAuction(AuctionId::from(9)))
        );
        assert!(matches!(
            service
                .place_bid(PlaceBidInput {
                    auction_id: AuctionId::from(1),
                    amount:     None,
                })
                .await,
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_ledger() {
        let mut contract = MockAuctionHouse::new();
        contract
            .expect_contribution()
            .returning(|_, _| Err(EngineError::ReadUnsupported("bidder ledger")));
        contract.expect_send().never();
        let service = service_with_auction(contract, BidModel::Cumulative);
        assert_eq!(
            service
                .place_bid(PlaceBidInput {
                    auction_id: AuctionId::from(1),
                    amount:     wei("150"),
                })
                .await,
            Err(EngineError::UnsupportedBidModel)
        );

        let mut contract = MockAuctionHouse::new();
        contract
            .expect_contribution()
            .returning(|_, _| Err(EngineError::ReadUnsupported("bidder ledger")));
        contract
            .expect_send()
            .withf(|_, request| request.value() == U256::from(150))
            .times(1)
            .returning(|_, _| Ok(H256::repeat_byte(3)));
        let service = service_with_auction(contract, BidModel::FullAmount);
        let _in_flight = service.refresh_lock.lock().await;
        assert_eq!(
            service
                .place_bid(PlaceBidInput {
                    auction_id: AuctionId::from(1),
                    amount:     wei("150"),
                })
                .await,
            Ok(H256::repeat_byte(3))
        );
    }

    #[tokio::test]
    async fn test_rejected_submission_keeps_buffer_and_skips_refresh() {
        let mut contract = MockAuctionHouse::new();
        contract
            .expect_contribution()
            .returning(|_, _| Ok(U256::zero()));
        contract
            .expect_send()
            .times(1)
            .returning(|_, _| Err(EngineError::SubmissionRejected("user denied".to_string())));
        contract.expect_admin().never();
        let service = service_with_auction(contract, BidModel::Cumulative);
        service
            .set_bid_input(AuctionId::from(1), "0.0000000000000002".to_string())
            .await;

        assert_eq!(
            service
                .place_bid(PlaceBidInput {
                    auction_id: AuctionId::from(1),
                    amount:     None,
                })
                .await,
            Err(EngineError::SubmissionRejected("user denied".to_string()))
        );
        assert!(service
            .repo
            .get_bid_input(AuctionId::from(1))
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_ledger_read_failure_aborts() {
        let mut contract = MockAuctionHouse::new();
        contract.expect_contribution().returning(|_, _| {
            Err(EngineError::ReadFailed {
                accessor: "bidder ledger",
                reason:   "timeout".to_string(),
            })
        });
        contract.expect_send().never();
        let service = service_with_auction(contract, BidModel::FullAmount);
        assert!(matches!(
            service
                .place_bid(PlaceBidInput {
                    auction_id: AuctionId::from(1),
                    amount:     wei("150"),
                })
                .await,
            Err(EngineError::ReadFailed { .. })
        ));
    }
}
