use {
    super::entities::{
        AuctionCollections,
        SessionState,
        TopState,
    },
    crate::kernel::entities::AuctionId,
    arc_swap::ArcSwap,
    std::collections::HashMap,
    tokio::sync::RwLock,
};

mod clear_bid_input;
mod get_bid_input;
mod get_snapshot;
mod replace_auctions;
mod replace_session;
mod replace_top;
mod set_bid_input;
mod update_claim_status;
mod update_current_block;

/// Every field is replaced as a whole value, readers never see a torn update.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub top:        ArcSwap<TopState>,
    pub auctions:   ArcSwap<AuctionCollections>,
    pub session:    ArcSwap<SessionState>,
    pub bid_inputs: RwLock<HashMap<AuctionId, String>>,
}

#[derive(Debug, Default)]
pub struct Repository {
    pub in_memory_store: InMemoryStore,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }
}
