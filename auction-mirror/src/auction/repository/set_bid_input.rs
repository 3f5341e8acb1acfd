use {
    super::Repository,
    crate::kernel::entities::AuctionId,
};

impl Repository {
    pub async fn set_bid_input(&self, auction_id: AuctionId, amount: String) {
        self.in_memory_store
            .bid_inputs
            .write()
            .await
            .insert(auction_id, amount);
    }
}
