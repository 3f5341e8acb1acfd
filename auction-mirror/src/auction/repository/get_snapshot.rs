use {
    super::Repository,
    crate::auction::entities::Snapshot,
};

impl Repository {
    pub fn get_snapshot(&self) -> Snapshot {
        Snapshot {
            top:      self.in_memory_store.top.load_full(),
            auctions: self.in_memory_store.auctions.load_full(),
            session:  self.in_memory_store.session.load_full(),
        }
    }
}
