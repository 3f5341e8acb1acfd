use {
    super::{
        entities::{
            BlockNumber,
            ChainId,
        },
        rpc::RpcProvider,
    },
    crate::{
        engine::{
            EXIT_CHECK_INTERVAL,
            SHOULD_EXIT,
        },
        error::EngineError,
    },
    arc_swap::ArcSwap,
    async_trait::async_trait,
    ethers::{
        providers::{
            Middleware,
            PubsubClient,
            Ws,
        },
        types::{
            Address,
            Filter,
            Log,
            H256,
            U256,
            U64,
        },
    },
    futures::{
        stream::BoxStream,
        StreamExt,
    },
    serde::Deserialize,
    std::{
        sync::{
            atomic::Ordering,
            Arc,
        },
        time::Duration,
    },
    tokio::sync::broadcast,
};

#[cfg(test)]
use mockall::automock;

pub type SubscriptionId = U256;

const WALLET_EVENT_CHANNEL_SIZE: usize = 32;

/// Changes pushed by the account provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(ChainId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionKind {
    NewHeads,
    Logs { address: Address, topic: H256 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    NewHead(BlockNumber),
    Log(Log),
}

pub struct Subscription {
    pub id:            SubscriptionId,
    pub notifications: BoxStream<'static, Notification>,
}

/// The account and transport provider the engine talks through.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Accounts exposed to the engine, the selected one first.
    async fn request_accounts(&self) -> Result<Vec<Address>, EngineError>;
    async fn chain_id(&self) -> Result<ChainId, EngineError>;
    async fn subscribe(&self, kind: SubscriptionKind) -> Result<Subscription, EngineError>;
    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), EngineError>;
    fn events(&self) -> broadcast::Receiver<WalletEvent>;
}

/// Wallet backed by local signing keys and the node connection.
pub struct EvmWallet {
    provider:     RpcProvider,
    signers:      Vec<Address>,
    accounts:     ArcSwap<Vec<Address>>,
    event_sender: broadcast::Sender<WalletEvent>,
}

impl EvmWallet {
    pub fn new(provider: RpcProvider, signers: Vec<Address>) -> Self {
        let (event_sender, _) = broadcast::channel(WALLET_EVENT_CHANNEL_SIZE);
        Self {
            provider,
            accounts: ArcSwap::from_pointee(signers.clone()),
            signers,
            event_sender,
        }
    }

    /// Moves `account` to the front of the exposed list.
    pub fn select_account(&self, account: Address) -> Result<(), EngineError> {
        if !self.signers.contains(&account) {
            return Err(EngineError::InvalidAddress(format!(
                "{:?} has no signing key loaded",
                account
            )));
        }
        let mut accounts = vec![account];
        accounts.extend(self.signers.iter().filter(|a| **a != account));
        self.publish_accounts(accounts);
        Ok(())
    }

    pub fn disconnect(&self) {
        self.publish_accounts(vec![]);
    }

    fn publish_accounts(&self, accounts: Vec<Address>) {
        self.accounts.store(Arc::new(accounts.clone()));
        // No receiver only means nobody is listening yet.
        let _ = self
            .event_sender
            .send(WalletEvent::AccountsChanged(accounts));
    }

    /// Polls the provider chain id and reports every change as a wallet event.
    pub async fn run_chain_watcher(&self, poll_interval: Duration) -> anyhow::Result<()> {
        tracing::info!("Starting chain id watcher...");
        let mut exit_check_interval = tokio::time::interval(EXIT_CHECK_INTERVAL);
        let mut poll = tokio::time::interval(poll_interval);
        let mut last_chain_id: Option<ChainId> = None;
        while !SHOULD_EXIT.load(Ordering::Acquire) {
            tokio::select! {
                _ = poll.tick() => {
                    match self.provider.chain_id().await {
                        Ok(chain_id) => {
                            let chain_id = chain_id.as_u64();
                            if last_chain_id.is_some_and(|last| last != chain_id) {
                                tracing::warn!(chain_id, "Provider switched networks");
                                let _ = self.event_sender.send(WalletEvent::ChainChanged(chain_id));
                            }
                            last_chain_id = Some(chain_id);
                        }
                        Err(e) => tracing::error!(error = ?e, "Failed to poll chain id"),
                    }
                }
                _ = exit_check_interval.tick() => {}
            }
        }
        tracing::info!("Shutting down chain id watcher...");
        Ok(())
    }
}

#[derive(Deserialize)]
struct Head {
    number: U64,
}

fn decode_notification(kind: SubscriptionKind, raw: &str) -> Option<Notification> {
    match kind {
        SubscriptionKind::NewHeads => serde_json::from_str::<Head>(raw)
            .ok()
            .map(|head| Notification::NewHead(head.number.as_u64())),
        SubscriptionKind::Logs { .. } => serde_json::from_str::<Log>(raw).ok().map(Notification::Log),
    }
}

#[async_trait]
impl Wallet for EvmWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, EngineError> {
        Ok(self.accounts.load().as_ref().clone())
    }

    async fn chain_id(&self) -> Result<ChainId, EngineError> {
        self.provider
            .chain_id()
            .await
            .map(|chain_id| chain_id.as_u64())
            .map_err(|e| EngineError::ConnectionUnavailable(e.to_string()))
    }

    async fn subscribe(&self, kind: SubscriptionKind) -> Result<Subscription, EngineError> {
        let provider = match &self.provider {
            RpcProvider::Ws(provider) => provider,
            RpcProvider::Http(_) => {
                return Err(EngineError::SubscriptionUnsupported(
                    "http transport".to_string(),
                ))
            }
        };
        let id: SubscriptionId = match kind {
            SubscriptionKind::NewHeads => provider.request("eth_subscribe", ["newHeads"]).await,
            SubscriptionKind::Logs { address, topic } => {
                let filter = Filter::new().address(address).topic0(topic);
                provider.request("eth_subscribe", ("logs", filter)).await
            }
        }
        .map_err(|e| EngineError::SubscriptionUnsupported(e.to_string()))?;

        let transport: &Ws = (**provider).as_ref();
        let stream = PubsubClient::subscribe(transport, id)
            .map_err(|e| EngineError::SubscriptionUnsupported(e.to_string()))?;
        let notifications = stream
            .filter_map(move |raw| {
                let notification = decode_notification(kind, raw.get());
                if notification.is_none() {
                    tracing::warn!(raw = raw.get(), "Dropping undecodable notification");
                }
                futures::future::ready(notification)
            })
            .boxed();
        Ok(Subscription { id, notifications })
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), EngineError> {
        // Nothing is ever installed over http.
        let RpcProvider::Ws(provider) = &self.provider else {
            return Ok(());
        };
        let result = provider
            .unsubscribe(id)
            .await
            .map_err(|e| EngineError::SubscriptionUnsupported(e.to_string()));
        // Drop the local channel even if the node refused the request.
        let transport: &Ws = (**provider).as_ref();
        if let Err(e) = PubsubClient::unsubscribe(transport, id) {
            tracing::warn!(error = ?e, subscription_id = ?id, "Failed to drop local subscription channel");
        }
        result.map(|_| ())
    }

    fn events(&self) -> broadcast::Receiver<WalletEvent> {
        self.event_sender.subscribe()
    }
}
