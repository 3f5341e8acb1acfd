use {
    super::Repository,
    crate::{
        auction::entities::TopState,
        kernel::entities::BlockNumber,
    },
    std::sync::Arc,
};

impl Repository {
    pub fn update_current_block(&self, block: BlockNumber) {
        self.in_memory_store.top.rcu(|current| {
            if block <= current.current_block {
                return current.clone();
            }
            Arc::new(TopState {
                current_block: block,
                ..current.as_ref().clone()
            })
        });
    }
}
