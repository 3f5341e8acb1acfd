use {
    crate::kernel::entities::{
        Amount,
        AuctionId,
        BlockNumber,
    },
    ethers::types::Address,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionRecord {
    pub id:              AuctionId,
    pub title:           String,
    pub seller:          Address,
    pub start_amount:    Amount,
    /// Absolute block height at which bidding closes.
    pub end_block:       BlockNumber,
    pub highest_amount:  Amount,
    pub highest_bidder:  Address,
    /// Contract defined phase code, `None` when the record carries no state field.
    pub lifecycle_state: Option<u64>,
}

impl AuctionRecord {
    /// A record claiming a bidder without any bid amount is reduced to "no bid".
    pub fn normalized(mut self) -> Self {
        if self.highest_amount.is_zero() && !self.highest_bidder.is_zero() {
            tracing::warn!(
                auction_id = %self.id,
                bidder = ?self.highest_bidder,
                "Auction reports a highest bidder without a bid amount, clearing bidder"
            );
            self.highest_bidder = Address::zero();
        }
        self
    }

    pub fn has_bid(&self) -> bool {
        !self.highest_amount.is_zero()
    }

    /// The amount a new bid has to beat.
    pub fn current_price(&self) -> Amount {
        if self.has_bid() {
            self.highest_amount
        } else {
            self.start_amount
        }
    }

    pub fn blocks_left(&self, current_block: BlockNumber) -> BlockNumber {
        self.end_block.saturating_sub(current_block)
    }

    pub fn has_ended(&self, current_block: BlockNumber) -> bool {
        self.blocks_left(current_block) == 0
    }

    pub fn is_seller(&self, account: Option<Address>) -> bool {
        account == Some(self.seller)
    }

    pub fn is_highest_bidder(&self, account: Option<Address>) -> bool {
        self.has_bid() && account == Some(self.highest_bidder)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuctionCollections {
    pub active:    Vec<AuctionRecord>,
    pub completed: Vec<AuctionRecord>,
    pub cancelled: Vec<AuctionRecord>,
}

impl AuctionCollections {
    pub fn find_active(&self, id: AuctionId) -> Option<&AuctionRecord> {
        self.active.iter().find(|auction| auction.id == id)
    }
}
