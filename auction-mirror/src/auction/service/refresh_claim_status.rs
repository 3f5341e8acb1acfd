use {
    super::Service,
    crate::auction::entities::Generation,
    ethers::types::U256,
};

impl Service {
    /// Recomputes the claimable amount of the connected account.
    ///
    /// An account switch during the read is not left to a coalesced refresh:
    /// the amount is read again for the account connected now.
    pub(super) async fn refresh_claim_status(&self, generation: Generation) -> bool {
        let mut account = self.repo.get_snapshot().account();
        loop {
            let claim_amount = match account {
                Some(account) => Self::read_or_default(
                    self.contract.pending_returns(account).await,
                    U256::zero(),
                ),
                None => U256::zero(),
            };
            if self.is_superseded(generation) {
                return false;
            }
            if self.repo.update_claim_status(account, claim_amount) {
                return true;
            }
            let current = self.repo.get_snapshot().account();
            tracing::debug!(
                previous = ?account,
                account = ?current,
                "Account changed while reading claim status, reading again"
            );
            account = current;
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            auction::entities::SessionState,
            kernel::{
                contracts::MockAuctionHouse,
                wallet::MockWallet,
            },
        },
        ethers::types::Address,
        std::sync::{
            Arc,
            OnceLock,
        },
    };

    #[tokio::test]
    async fn test_claim_enabled_for_pending_returns() {
        let account = Address::repeat_byte(0x01);
        let mut contract = MockAuctionHouse::new();
        contract
            .expect_pending_returns()
            .withf(move |a| *a == account)
            .times(1)
            .returning(|_| Ok(U256::from(25)));
        let service = Service::new_with_mocks(contract, MockWallet::new());
        service.repo.replace_session(SessionState::connected(Some(account)));

        assert!(service.refresh_claim_status(0).await);
        let session = service.get_snapshot().session;
        assert!(session.claim_enabled);
        assert_eq!(session.claim_amount, U256::from(25));
    }

    #[tokio::test]
    async fn test_account_switch_during_read_reads_new_account() {
        let first = Address::repeat_byte(0x01);
        let second = Address::repeat_byte(0x02);
        let service_cell: Arc<OnceLock<Service>> = Arc::new(OnceLock::new());
        let mut contract = MockAuctionHouse::new();
        contract
            .expect_pending_returns()
            .withf(move |a| *a == first)
            .times(1)
            .returning({
                let service_cell = service_cell.clone();
                move |_| {
                    let service = service_cell.get().expect("service is set");
                    service
                        .repo
                        .replace_session(SessionState::connected(Some(second)));
                    Ok(U256::from(25))
                }
            });
        contract
            .expect_pending_returns()
            .withf(move |a| *a == second)
            .times(1)
            .returning(|_| Ok(U256::from(40)));
        let service = Service::new_with_mocks(contract, MockWallet::new());
        let _ = service_cell.set(service.clone());
        service.repo.replace_session(SessionState::connected(Some(first)));

        assert!(service.refresh_claim_status(0).await);
        let snapshot = service.get_snapshot();
        assert_eq!(snapshot.account(), Some(second));
        assert!(snapshot.session.claim_enabled);
        assert_eq!(snapshot.session.claim_amount, U256::from(40));
    }

    #[tokio::test]
    async fn test_disconnected_account_reads_nothing() {
        let mut contract = MockAuctionHouse::new();
        contract.expect_pending_returns().never();
        let service = Service::new_with_mocks(contract, MockWallet::new());

        assert!(service.refresh_claim_status(0).await);
        assert!(!service.get_snapshot().session.claim_enabled);
    }
}
