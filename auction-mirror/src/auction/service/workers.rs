use {
    super::Service,
    crate::{
        auction::entities::{
            RefreshTrigger,
            SessionState,
        },
        engine::{
            EXIT_CHECK_INTERVAL,
            SHOULD_EXIT,
        },
        error::EngineError,
        kernel::wallet::WalletEvent,
    },
    anyhow::{
        anyhow,
        Result,
    },
    std::sync::atomic::Ordering,
    tokio::sync::broadcast::error::RecvError,
};

impl Service {
    /// Drains the refresh queue and the wallet notifications until shutdown.
    pub async fn run_sync_loop(&self) -> Result<()> {
        tracing::info!(chain_id = self.config.chain_id, "Starting synchronizer...");
        let mut triggers = self
            .trigger_receiver
            .lock()
            .await
            .take()
            .ok_or(anyhow!("Synchronizer is already running"))?;
        let mut wallet_events = self.wallet.events();
        let mut exit_check_interval = tokio::time::interval(EXIT_CHECK_INTERVAL);

        while !SHOULD_EXIT.load(Ordering::Acquire) {
            tokio::select! {
                trigger = triggers.recv() => {
                    let trigger = trigger.ok_or(anyhow!("Refresh queue closed"))?;
                    self.handle_trigger(trigger);
                }
                event = wallet_events.recv() => {
                    match event {
                        Ok(event) => self.handle_wallet_event(event).await?,
                        Err(RecvError::Lagged(skipped)) => self.handle_wallet_lag(skipped).await,
                        Err(RecvError::Closed) => return Err(anyhow!("Wallet event channel closed")),
                    }
                }
                _ = exit_check_interval.tick() => {}
            }
        }
        tracing::info!("Shutting down synchronizer...");
        Ok(())
    }

    /// Starts a refresh for a trigger of the current subscription set.
    /// Returns false if the trigger belongs to a released set.
    pub fn handle_trigger(&self, trigger: RefreshTrigger) -> bool {
        if self.is_superseded(trigger.generation) {
            tracing::debug!(trigger = ?trigger, "Discarding trigger of a released subscription set");
            return false;
        }
        tracing::debug!(event = %trigger.event, "Contract event received");
        self.spawn_refresh();
        true
    }

    pub async fn handle_wallet_event(&self, event: WalletEvent) -> Result<(), EngineError> {
        match event {
            WalletEvent::AccountsChanged(accounts) => {
                let account = accounts.first().copied();
                tracing::info!(account = ?account, "Connected account changed");
                self.repo.replace_session(SessionState::connected(account));
                self.spawn_refresh();
                Ok(())
            }
            WalletEvent::ChainChanged(chain_id) => self.handle_network_change(chain_id).await,
        }
    }

    /// Skipped wallet events may include an account change, so the session is
    /// rebuilt from the accounts the wallet exposes now.
    pub async fn handle_wallet_lag(&self, skipped: u64) {
        tracing::warn!(skipped, "Wallet events lagged, reloading accounts");
        match self.wallet.request_accounts().await {
            Ok(accounts) => {
                let account = accounts.first().copied();
                if account != self.repo.get_snapshot().account() {
                    tracing::info!(account = ?account, "Connected account changed");
                    self.repo.replace_session(SessionState::connected(account));
                }
            }
            Err(e) => tracing::error!(error = ?e, "Failed to reload accounts"),
        }
        self.spawn_refresh();
    }

    fn spawn_refresh(&self) {
        self.task_tracker.spawn({
            let service = self.clone();
            async move {
                service.refresh_all().await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            auction::service::tests::TEST_CHAIN_ID,
            kernel::{
                contracts::{
                    ContractEventKind,
                    MockAuctionHouse,
                },
                wallet::{
                    MockWallet,
                    Subscription,
                },
            },
        },
        ethers::types::{
            Address,
            H256,
            U256,
        },
        futures::{
            stream,
            StreamExt,
        },
        std::sync::{
            atomic::AtomicU64,
            Arc,
        },
    };

    fn contract_expecting_refreshes(refreshes: usize) -> MockAuctionHouse {
        let mut contract = MockAuctionHouse::new();
        contract
            .expect_address()
            .returning(|| Address::repeat_byte(0xcc));
        contract.expect_event_topics().returning(|| {
            vec![
                (ContractEventKind::BidPlaced, H256::repeat_byte(1)),
                (ContractEventKind::AuctionCancelled, H256::repeat_byte(2)),
            ]
        });
        contract.expect_block_number().returning(|| Ok(500));
        contract
            .expect_admin()
            .times(refreshes)
            .returning(|| Ok(Address::repeat_byte(0xad)));
        contract
            .expect_balance()
            .times(refreshes)
            .returning(|| Ok(U256::zero()));
        contract
            .expect_collected_fees()
            .times(refreshes)
            .returning(|| Ok(U256::zero()));
        contract
            .expect_auction_fee()
            .times(refreshes)
            .returning(|| Ok(U256::from(5)));
        contract
            .expect_destroyed()
            .times(refreshes)
            .returning(|| Ok(false));
        contract
            .expect_auction_ids()
            .times(refreshes * 3)
            .returning(|_| Ok(vec![]));
        contract
    }

    fn counting_wallet(subscribed: Arc<AtomicU64>, released: Arc<AtomicU64>) -> MockWallet {
        let mut wallet = MockWallet::new();
        wallet.expect_subscribe().returning(move |_| {
            Ok(Subscription {
                id:            U256::from(subscribed.fetch_add(1, Ordering::AcqRel)),
                notifications: stream::pending().boxed(),
            })
        });
        wallet.expect_unsubscribe().returning(move |_| {
            released.fetch_add(1, Ordering::AcqRel);
            Ok(())
        });
        wallet
    }

    #[tokio::test]
    async fn test_network_change_mid_refresh_reinstalls_once() {
        let subscribed = Arc::new(AtomicU64::new(0));
        let released = Arc::new(AtomicU64::new(0));
        let mut contract = contract_expecting_refreshes(1);
        contract.expect_pending_returns().never();
        let service = Service::new_with_mocks(
            contract,
            counting_wallet(subscribed.clone(), released.clone()),
        );
        let old_generation = service.install_subscriptions().await;
        assert_eq!(subscribed.load(Ordering::Acquire), 3);

        // Stand in for a refresh that is still in flight.
        let in_flight = service.refresh_lock.lock().await;
        let reload = tokio::spawn({
            let service = service.clone();
            async move { service.handle_network_change(TEST_CHAIN_ID).await }
        });
        while subscribed.load(Ordering::Acquire) < 6 {
            tokio::task::yield_now().await;
        }
        assert!(service.is_superseded(old_generation));
        drop(in_flight);
        assert_eq!(reload.await.expect("reload task"), Ok(()));

        assert_eq!(released.load(Ordering::Acquire), 3);
        assert_eq!(subscribed.load(Ordering::Acquire), 6);
        assert_eq!(service.subscriptions.lock().await.handles().len(), 3);
        assert!(!service.handle_trigger(RefreshTrigger {
            generation: old_generation,
            event:      ContractEventKind::BidPlaced,
        }));
        assert_eq!(
            service.get_snapshot().top.owner,
            Address::repeat_byte(0xad)
        );
    }

    #[tokio::test]
    async fn test_switch_to_wrong_network_closes_gate() {
        let subscribed = Arc::new(AtomicU64::new(0));
        let released = Arc::new(AtomicU64::new(0));
        let service = Service::new_with_mocks(
            contract_expecting_refreshes(0),
            counting_wallet(subscribed.clone(), released.clone()),
        );
        service.install_subscriptions().await;

        assert_eq!(
            service
                .handle_wallet_event(WalletEvent::ChainChanged(1))
                .await,
            Err(EngineError::WrongNetwork {
                expected: TEST_CHAIN_ID,
                actual:   1,
            })
        );
        assert!(!service.is_network_open());
        assert_eq!(released.load(Ordering::Acquire), 3);
        assert_eq!(subscribed.load(Ordering::Acquire), 3);
        assert!(service.subscriptions.lock().await.handles().is_empty());
    }

    #[tokio::test]
    async fn test_account_change_refreshes_session() {
        let account = Address::repeat_byte(0x01);
        let mut contract = contract_expecting_refreshes(1);
        contract
            .expect_pending_returns()
            .withf(move |a| *a == account)
            .times(1)
            .returning(|_| Ok(U256::from(3)));
        let service = Service::new_with_mocks(contract, MockWallet::new());

        service
            .handle_wallet_event(WalletEvent::AccountsChanged(vec![account]))
            .await
            .expect("account change");
        service.task_tracker.close();
        service.task_tracker.wait().await;

        let snapshot = service.get_snapshot();
        assert_eq!(snapshot.account(), Some(account));
        assert_eq!(snapshot.session.claim_amount, U256::from(3));
    }

    #[tokio::test]
    async fn test_wallet_lag_reloads_accounts() {
        let stale = Address::repeat_byte(0x01);
        let current = Address::repeat_byte(0x02);
        let mut contract = contract_expecting_refreshes(1);
        contract
            .expect_pending_returns()
            .withf(move |a| *a == current)
            .times(1)
            .returning(|_| Ok(U256::from(9)));
        let mut wallet = MockWallet::new();
        wallet
            .expect_request_accounts()
            .times(1)
            .returning(move || Ok(vec![current, stale]));
        let service = Service::new_with_mocks(contract, wallet);
        service.repo.replace_session(SessionState::connected(Some(stale)));

        service.handle_wallet_lag(3).await;
        service.task_tracker.close();
        service.task_tracker.wait().await;

        let snapshot = service.get_snapshot();
        assert_eq!(snapshot.account(), Some(current));
        assert_eq!(snapshot.session.claim_amount, U256::from(9));
    }

    #[tokio::test]
    async fn test_current_trigger_starts_refresh() {
        let service = Service::new_with_mocks(contract_expecting_refreshes(1), MockWallet::new());
        let accepted = service.handle_trigger(RefreshTrigger {
            generation: service.current_generation(),
            event:      ContractEventKind::AuctionCreated,
        });
        assert!(accepted);
        service.task_tracker.close();
        service.task_tracker.wait().await;
        assert_eq!(service.get_snapshot().top.auction_fee, U256::from(5));
    }
}
