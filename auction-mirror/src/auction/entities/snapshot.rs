use {
    super::{
        AuctionCollections,
        AuctionRecord,
        SessionState,
        TopState,
    },
    crate::kernel::units::to_display,
    ethers::types::Address,
    std::sync::Arc,
};

/// Consistent read-only view of the mirror handed to consumers.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub top:      Arc<TopState>,
    pub auctions: Arc<AuctionCollections>,
    pub session:  Arc<SessionState>,
}

impl Snapshot {
    pub fn account(&self) -> Option<Address> {
        self.session.current_account
    }

    pub fn is_admin(&self) -> bool {
        self.top.is_admin(self.account())
    }

    pub fn can_create_auction(&self) -> bool {
        self.account().is_some() && !self.is_admin() && !self.top.destroyed
    }

    pub fn can_bid(&self, auction: &AuctionRecord) -> bool {
        self.account().is_some() && !auction.has_ended(self.top.current_block)
    }

    pub fn can_cancel(&self, auction: &AuctionRecord) -> bool {
        self.account().is_some() && (auction.is_seller(self.account()) || self.is_admin())
    }

    pub fn can_fulfill(&self, auction: &AuctionRecord) -> bool {
        self.can_cancel(auction) && auction.has_ended(self.top.current_block) && auction.has_bid()
    }

    pub fn log_summary(&self) {
        let top = &self.top;
        tracing::info!(
            account = ?self.account(),
            owner = ?top.owner,
            balance = %to_display(top.contract_balance),
            collected_fees = %to_display(top.collected_fees),
            auction_fee = %to_display(top.auction_fee),
            destroyed = top.destroyed,
            current_block = top.current_block,
            claimable = %to_display(self.session.claim_amount),
            is_admin = self.is_admin(),
            can_create_auction = self.can_create_auction(),
            "Contract state"
        );
        for (collection, auctions) in [
            ("active", &self.auctions.active),
            ("completed", &self.auctions.completed),
            ("cancelled", &self.auctions.cancelled),
        ] {
            for auction in auctions.iter() {
                tracing::info!(
                    collection,
                    auction_id = %auction.id,
                    title = %auction.title,
                    seller = ?auction.seller,
                    current_price = %to_display(auction.current_price()),
                    highest_bidder = ?auction.highest_bidder,
                    blocks_left = auction.blocks_left(top.current_block),
                    state = ?auction.lifecycle_state,
                    leading = auction.is_highest_bidder(self.account()),
                    can_bid = collection == "active" && self.can_bid(auction),
                    can_cancel = collection == "active" && self.can_cancel(auction),
                    can_fulfill = collection == "active" && self.can_fulfill(auction),
                    "Auction"
                );
            }
        }
    }
}
