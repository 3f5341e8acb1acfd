use {
    super::Repository,
    crate::auction::entities::TopState,
    std::sync::Arc,
};

impl Repository {
    /// Self destruction is terminal and the block counter only moves forward.
    pub fn replace_top(&self, top: TopState) {
        self.in_memory_store.top.rcu(|current| {
            Arc::new(TopState {
                destroyed: top.destroyed || current.destroyed,
                current_block: top.current_block.max(current.current_block),
                ..top.clone()
            })
        });
    }
}
