use {
    super::Service,
    std::sync::atomic::Ordering,
};

impl Service {
    /// Releases every subscription and stops accepting work. Safe to call repeatedly.
    pub async fn teardown(&self) {
        tracing::info!("Tearing down session");
        self.network_open.store(false, Ordering::Release);
        self.release_subscriptions().await;
        self.task_tracker.close();
    }
}
