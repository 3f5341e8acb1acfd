use {
    super::Repository,
    crate::kernel::entities::AuctionId,
};

impl Repository {
    pub async fn get_bid_input(&self, auction_id: AuctionId) -> Option<String> {
        self.in_memory_store
            .bid_inputs
            .read()
            .await
            .get(&auction_id)
            .cloned()
    }
}
