use {
    super::{
        entities::RefreshTrigger,
        repository::Repository,
    },
    crate::{
        error::EngineError,
        kernel::{
            contracts::AuctionHouse,
            entities::{
                Amount,
                ChainId,
            },
            wallet::Wallet,
        },
    },
    bid_protocol::BidModel,
    std::sync::{
        atomic::{
            AtomicBool,
            AtomicU64,
            Ordering,
        },
        Arc,
    },
    subscriptions::SubscriptionSet,
    tokio::sync::{
        mpsc,
        Mutex,
    },
    tokio_util::task::TaskTracker,
};

pub mod ban_seller;
pub mod bid_protocol;
pub mod cancel_auction;
pub mod change_owner;
pub mod claim;
pub mod create_auction;
pub mod destroy;
pub mod fulfill_auction;
pub mod get_snapshot;
pub mod initialize;
pub mod load_auctions;
pub mod place_bid;
pub mod refresh_all;
pub mod refresh_claim_status;
pub mod refresh_top;
pub mod set_bid_input;
pub mod submit;
pub mod subscriptions;
pub mod teardown;
pub mod withdraw;
pub mod workers;

pub struct Config {
    pub chain_id:            ChainId,
    /// Used when the contract does not expose its auction fee.
    pub default_auction_fee: Amount,
    pub bid_model:           BidModel,
    pub trigger_queue_len:   usize,
}

pub struct ServiceInner {
    config:           Config,
    repo:             Arc<Repository>,
    contract:         Arc<dyn AuctionHouse>,
    wallet:           Arc<dyn Wallet>,
    /// Held for the whole duration of a full refresh.
    refresh_lock:     Mutex<()>,
    network_open:     AtomicBool,
    /// Bumped every time the subscription set is released.
    generation:       AtomicU64,
    subscriptions:    Mutex<SubscriptionSet>,
    trigger_sender:   mpsc::Sender<RefreshTrigger>,
    trigger_receiver: Mutex<Option<mpsc::Receiver<RefreshTrigger>>>,
    task_tracker:     TaskTracker,
}

#[derive(Clone)]
pub struct Service(Arc<ServiceInner>);

impl std::ops::Deref for Service {
    type Target = ServiceInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Service {
    pub fn new(
        config: Config,
        contract: Arc<dyn AuctionHouse>,
        wallet: Arc<dyn Wallet>,
        task_tracker: TaskTracker,
    ) -> Self {
        let (trigger_sender, trigger_receiver) = mpsc::channel(config.trigger_queue_len.max(1));
        Self(Arc::new(ServiceInner {
            config,
            repo: Arc::new(Repository::new()),
            contract,
            wallet,
            refresh_lock: Mutex::new(()),
            network_open: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            subscriptions: Mutex::new(SubscriptionSet::default()),
            trigger_sender,
            trigger_receiver: Mutex::new(Some(trigger_receiver)),
            task_tracker,
        }))
    }

    pub fn is_network_open(&self) -> bool {
        self.network_open.load(Ordering::Acquire)
    }

    pub fn ensure_network_open(&self) -> Result<(), EngineError> {
        if self.is_network_open() {
            Ok(())
        } else {
            Err(EngineError::NetworkGateClosed)
        }
    }

    /// Opens the gate only for the configured chain.
    pub fn apply_network(&self, chain_id: ChainId) -> Result<(), EngineError> {
        let open = chain_id == self.config.chain_id;
        self.network_open.store(open, Ordering::Release);
        if open {
            Ok(())
        } else {
            Err(EngineError::WrongNetwork {
                expected: self.config.chain_id,
                actual:   chain_id,
            })
        }
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn is_superseded(&self, generation: u64) -> bool {
        self.current_generation() != generation
    }

    /// Substitutes `default` for a read the contract cannot answer.
    fn read_or_default<T>(result: Result<T, EngineError>, default: T) -> T {
        match result {
            Ok(value) => value,
            Err(EngineError::ReadUnsupported(accessor)) => {
                tracing::debug!(accessor, "Accessor not exposed by contract, using default");
                default
            }
            Err(e) => {
                tracing::warn!(error = ?e, "Contract read failed, using default");
                default
            }
        }
    }
}
