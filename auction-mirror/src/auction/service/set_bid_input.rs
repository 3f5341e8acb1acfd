use {
    super::Service,
    crate::kernel::entities::AuctionId,
};

impl Service {
    /// Buffers a bid amount typed for an auction until it is submitted.
    pub async fn set_bid_input(&self, auction_id: AuctionId, amount: String) {
        self.repo.set_bid_input(auction_id, amount).await;
    }
}
