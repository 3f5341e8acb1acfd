use {
    super::Service,
    crate::auction::entities::Generation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed,
    /// Another refresh was in flight, its result stands in for this one.
    Coalesced,
    /// The subscription set changed mid-flight, remaining writes were skipped.
    Superseded,
    GateClosed,
}

impl Service {
    /// Re-reads the whole contract state into the mirror.
    ///
    /// At most one refresh runs at a time. A request arriving while one is in
    /// flight returns `Coalesced` right away without touching the network.
    pub async fn refresh_all(&self) -> RefreshOutcome {
        if !self.is_network_open() {
            tracing::debug!("Network gate closed, skipping refresh");
            return RefreshOutcome::GateClosed;
        }
        let Ok(_guard) = self.refresh_lock.try_lock() else {
            tracing::debug!("Refresh already in flight, coalescing");
            return RefreshOutcome::Coalesced;
        };
        self.refresh_all_locked().await
    }

    /// Waits for any in-flight refresh before running a fresh one.
    pub(super) async fn refresh_all_after_pending(&self) -> RefreshOutcome {
        let _guard = self.refresh_lock.lock().await;
        if !self.is_network_open() {
            return RefreshOutcome::GateClosed;
        }
        self.refresh_all_locked().await
    }

    #[tracing::instrument(skip_all)]
    async fn refresh_all_locked(&self) -> RefreshOutcome {
        let generation: Generation = self.current_generation();
        let completed = self.refresh_top(generation).await
            && self.load_auctions(generation).await
            && self.refresh_claim_status(generation).await;
        if completed {
            tracing::debug!(generation, "Refresh completed");
            RefreshOutcome::Completed
        } else {
            tracing::info!(generation, "Subscription set changed during refresh, result discarded");
            RefreshOutcome::Superseded
        }
    }
}
