use {
    crate::kernel::entities::Amount,
    ethers::types::Address,
};

/// Derived from the connected account, recomputed on every refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current_account: Option<Address>,
    pub claim_enabled:   bool,
    pub claim_amount:    Amount,
}

impl SessionState {
    pub fn connected(account: Option<Address>) -> Self {
        Self {
            current_account: account,
            ..Default::default()
        }
    }

    pub fn with_claim(account: Option<Address>, claim_amount: Amount) -> Self {
        Self {
            current_account: account,
            claim_enabled: !claim_amount.is_zero(),
            claim_amount,
        }
    }
}
