use {
    super::Repository,
    crate::auction::entities::AuctionCollections,
};

impl Repository {
    pub fn replace_auctions(&self, auctions: AuctionCollections) {
        self.in_memory_store.auctions.store(auctions.into());
    }
}
