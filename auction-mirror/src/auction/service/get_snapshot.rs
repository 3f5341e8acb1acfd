use {
    super::Service,
    crate::auction::entities::Snapshot,
};

impl Service {
    pub fn get_snapshot(&self) -> Snapshot {
        self.repo.get_snapshot()
    }
}
