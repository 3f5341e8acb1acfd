use {
    crate::kernel::entities::{
        Amount,
        BlockNumber,
    },
    ethers::types::Address,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopState {
    /// Admin (or owner) of the contract, zero when the contract exposes neither.
    pub owner:            Address,
    pub contract_balance: Amount,
    pub collected_fees:   Amount,
    pub auction_fee:      Amount,
    pub destroyed:        bool,
    pub current_block:    BlockNumber,
}

impl TopState {
    pub fn is_admin(&self, account: Option<Address>) -> bool {
        !self.owner.is_zero() && account == Some(self.owner)
    }
}
