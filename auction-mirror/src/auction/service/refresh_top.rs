use {
    super::Service,
    crate::auction::entities::{
        Generation,
        TopState,
    },
    ethers::types::{
        Address,
        U256,
    },
};

impl Service {
    /// Reads the top level scalars, each one falls back to its own default.
    /// Returns false if the result was discarded.
    pub(super) async fn refresh_top(&self, generation: Generation) -> bool {
        let last = self.repo.get_snapshot().top;
        let top = TopState {
            owner:            Self::read_or_default(self.contract.admin().await, Address::zero()),
            contract_balance: Self::read_or_default(self.contract.balance().await, U256::zero()),
            collected_fees:   Self::read_or_default(
                self.contract.collected_fees().await,
                U256::zero(),
            ),
            auction_fee:      Self::read_or_default(
                self.contract.auction_fee().await,
                self.config.default_auction_fee,
            ),
            destroyed:        Self::read_or_default(self.contract.destroyed().await, false),
            current_block:    Self::read_or_default(
                self.contract.block_number().await,
                last.current_block,
            ),
        };
        if self.is_superseded(generation) {
            return false;
        }
        self.repo.replace_top(top);
        true
    }
}
