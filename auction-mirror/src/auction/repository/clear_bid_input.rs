use {
    super::Repository,
    crate::kernel::entities::AuctionId,
};

impl Repository {
    pub async fn clear_bid_input(&self, auction_id: AuctionId) {
        self.in_memory_store
            .bid_inputs
            .write()
            .await
            .remove(&auction_id);
    }
}
