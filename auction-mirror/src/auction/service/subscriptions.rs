use {
    super::Service,
    crate::{
        auction::entities::{
            Generation,
            RefreshTrigger,
            SubscriptionHandle,
            SubscriptionSource,
        },
        error::EngineError,
        kernel::{
            contracts::ContractEventKind,
            entities::ChainId,
            wallet::{
                Notification,
                SubscriptionKind,
            },
        },
    },
    futures::{
        stream::BoxStream,
        StreamExt,
    },
    std::sync::atomic::Ordering,
    tokio::{
        sync::mpsc::error::TrySendError,
        task::JoinHandle,
    },
};

/// Subscriptions installed for one generation, together with the tasks draining them.
#[derive(Default)]
pub struct SubscriptionSet {
    generation: Generation,
    handles:    Vec<SubscriptionHandle>,
    forwarders: Vec<JoinHandle<()>>,
}

impl SubscriptionSet {
    pub fn handles(&self) -> &[SubscriptionHandle] {
        &self.handles
    }
}

impl Service {
    /// Installs the new-heads subscription and one log subscription per contract event.
    ///
    /// Missing subscription support only stops the matching updates, it never fails.
    #[tracing::instrument(skip_all)]
    pub async fn install_subscriptions(&self) -> Generation {
        let mut set = self.subscriptions.lock().await;
        if !set.handles.is_empty() {
            self.release_locked(&mut set).await;
        }
        let generation = self.current_generation();
        set.generation = generation;

        match self.wallet.subscribe(SubscriptionKind::NewHeads).await {
            Ok(subscription) => {
                set.handles.push(SubscriptionHandle {
                    id:     subscription.id,
                    source: SubscriptionSource::NewHeads,
                });
                set.forwarders
                    .push(self.spawn_block_forwarder(generation, subscription.notifications));
                match self.contract.block_number().await {
                    Ok(block) => self.repo.update_current_block(block),
                    Err(e) => tracing::warn!(error = ?e, "Failed to read initial block number"),
                }
            }
            Err(e) => {
                tracing::warn!(error = ?e, "Block notifications unavailable, block counter will not update")
            }
        }

        let address = self.contract.address();
        for (event, topic) in self.contract.event_topics() {
            match self
                .wallet
                .subscribe(SubscriptionKind::Logs { address, topic })
                .await
            {
                Ok(subscription) => {
                    set.handles.push(SubscriptionHandle {
                        id:     subscription.id,
                        source: SubscriptionSource::ContractEvent(event),
                    });
                    set.forwarders.push(self.spawn_event_forwarder(
                        generation,
                        event,
                        subscription.notifications,
                    ));
                }
                Err(e) => tracing::warn!(error = ?e, event = %event, "Failed to subscribe to contract event"),
            }
        }
        tracing::info!(
            generation,
            subscriptions = set.handles().len(),
            "Subscriptions installed"
        );
        generation
    }

    /// Releases every installed subscription. Calling it again is a no-op.
    pub async fn release_subscriptions(&self) {
        let mut set = self.subscriptions.lock().await;
        self.release_locked(&mut set).await;
    }

    async fn release_locked(&self, set: &mut SubscriptionSet) {
        tracing::debug!(
            generation = set.generation,
            subscriptions = set.handles.len(),
            "Releasing subscriptions"
        );
        // Invalidate in-flight refreshes and queued triggers of the old set.
        self.generation.fetch_add(1, Ordering::AcqRel);
        for forwarder in set.forwarders.drain(..) {
            forwarder.abort();
        }
        for handle in set.handles.drain(..) {
            if let Err(e) = self.wallet.unsubscribe(handle.id).await {
                tracing::warn!(error = ?e, id = ?handle.id, source = ?handle.source, "Failed to release subscription");
            }
        }
    }

    fn spawn_block_forwarder(
        &self,
        generation: Generation,
        mut notifications: BoxStream<'static, Notification>,
    ) -> JoinHandle<()> {
        let service = self.clone();
        self.task_tracker.spawn(async move {
            while let Some(notification) = notifications.next().await {
                if service.is_superseded(generation) {
                    break;
                }
                if let Notification::NewHead(block) = notification {
                    service.repo.update_current_block(block);
                }
            }
        })
    }

    fn spawn_event_forwarder(
        &self,
        generation: Generation,
        event: ContractEventKind,
        mut notifications: BoxStream<'static, Notification>,
    ) -> JoinHandle<()> {
        let service = self.clone();
        self.task_tracker.spawn(async move {
            while let Some(notification) = notifications.next().await {
                if service.is_superseded(generation) {
                    break;
                }
                if let Notification::Log(_) = notification {
                    service.enqueue_refresh(RefreshTrigger { generation, event });
                }
            }
        })
    }

    /// Queues a refresh. A full queue already guarantees a pending refresh.
    pub fn enqueue_refresh(&self, trigger: RefreshTrigger) {
        match self.trigger_sender.try_send(trigger) {
            Ok(()) => {}
            Err(TrySendError::Full(trigger)) => {
                tracing::debug!(trigger = ?trigger, "Refresh queue full, coalescing trigger")
            }
            Err(TrySendError::Closed(trigger)) => {
                tracing::warn!(trigger = ?trigger, "Refresh queue closed, dropping trigger")
            }
        }
    }

    /// Switching networks invalidates every subscription and the whole mirror.
    #[tracing::instrument(skip_all, fields(chain_id = chain_id))]
    pub async fn handle_network_change(&self, chain_id: ChainId) -> Result<(), EngineError> {
        tracing::warn!("Network changed, reloading subscriptions and state");
        self.release_subscriptions().await;
        self.apply_network(chain_id)?;
        self.install_subscriptions().await;
        self.refresh_all_after_pending().await;
        Ok(())
    }
}
