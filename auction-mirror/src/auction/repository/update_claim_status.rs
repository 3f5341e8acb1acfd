use {
    super::Repository,
    crate::{
        auction::entities::SessionState,
        kernel::entities::Amount,
    },
    ethers::types::Address,
    std::sync::Arc,
};

impl Repository {
    /// Applies the claim amount only if `account` is still the connected one.
    /// Returns whether the session was updated.
    pub fn update_claim_status(&self, account: Option<Address>, claim_amount: Amount) -> bool {
        let previous = self.in_memory_store.session.rcu(|current| {
            if current.current_account != account {
                return current.clone();
            }
            Arc::new(SessionState::with_claim(account, claim_amount))
        });
        previous.current_account == account
    }
}
