use {
    super::Repository,
    crate::auction::entities::SessionState,
};

impl Repository {
    pub fn replace_session(&self, session: SessionState) {
        self.in_memory_store.session.store(session.into());
    }
}
