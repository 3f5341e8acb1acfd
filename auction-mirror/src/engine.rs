use {
    crate::{
        auction::service::{
            self,
            Service,
        },
        config::{
            Config,
            RunOptions,
            SendOptions,
        },
        console::{
            dispatch_action,
            run_console,
        },
        kernel::{
            contracts::{
                load_abi,
                AuctionHouse,
                EvmAuctionHouse,
            },
            rpc::RpcProvider,
            units::to_base_units,
            wallet::EvmWallet,
        },
    },
    anyhow::anyhow,
    ethers::signers::{
        LocalWallet,
        Signer,
    },
    futures::future::join_all,
    std::{
        sync::{
            atomic::{
                AtomicBool,
                Ordering,
            },
            Arc,
        },
        time::Duration,
    },
    tokio_util::task::TaskTracker,
};

pub static SHOULD_EXIT: AtomicBool = AtomicBool::new(false);
pub const EXIT_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// A connected session: the synchronizing service plus the wallet behind it.
pub struct Engine {
    pub service:                Service,
    pub wallet:                 Arc<EvmWallet>,
    pub task_tracker:           TaskTracker,
    pub chain_id_poll_interval: Duration,
}

fn parse_signers(private_keys: &[String]) -> anyhow::Result<Vec<LocalWallet>> {
    private_keys
        .iter()
        .map(|key| key.trim())
        .filter(|key| !key.is_empty())
        .map(|key| {
            key.parse::<LocalWallet>()
                .map_err(|err| anyhow!("Invalid private key: {:?}", err))
        })
        .collect()
}

pub async fn connect(run_options: &RunOptions) -> anyhow::Result<Engine> {
    let config = Config::load(&run_options.config.config).map_err(|err| {
        anyhow!(
            "Failed to load config from file({path}): {:?}",
            err,
            path = run_options.config.config
        )
    })?;
    let default_auction_fee = to_base_units(&config.default_auction_fee)
        .map_err(|err| anyhow!("Invalid default_auction_fee: {}", err))?;

    let signers = parse_signers(&run_options.private_keys)?;
    for signer in signers.iter() {
        tracing::info!(address = ?signer.address(), "Loaded signing account");
    }
    if signers.is_empty() {
        tracing::warn!("No private keys configured, running read only");
    }

    let abi = load_abi(&config.abi_path).map_err(|err| {
        anyhow!(
            "Failed to load contract abi from file({path}): {:?}",
            err,
            path = config.abi_path
        )
    })?;
    let provider = RpcProvider::connect(&config.rpc_addr).await?;

    let wallet = Arc::new(EvmWallet::new(
        provider.clone(),
        signers.iter().map(|signer| signer.address()).collect(),
    ));
    let contract: Arc<dyn AuctionHouse> = match provider {
        RpcProvider::Ws(provider) => Arc::new(EvmAuctionHouse::new(
            config.contract,
            abi,
            provider,
            signers,
            config.target_chain_id,
        )),
        RpcProvider::Http(provider) => Arc::new(EvmAuctionHouse::new(
            config.contract,
            abi,
            provider,
            signers,
            config.target_chain_id,
        )),
    };
    let task_tracker = TaskTracker::new();
    let service = Service::new(
        service::Config {
            chain_id: config.target_chain_id,
            default_auction_fee,
            bid_model: config.bid_model,
            trigger_queue_len: config.trigger_queue_len,
        },
        contract,
        wallet.clone(),
        task_tracker.clone(),
    );
    Ok(Engine {
        service,
        wallet,
        task_tracker,
        chain_id_poll_interval: config.chain_id_poll_interval,
    })
}

fn register_shutdown_handler() {
    tokio::spawn(async move {
        tracing::info!("Registered shutdown signal handler...");
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = ?err, "Failed to listen for the shutdown signal");
            return;
        }
        tracing::info!("Shut down signal received, waiting for tasks...");
        SHOULD_EXIT.store(true, Ordering::Release);
    });
}

pub async fn start_engine(run_options: RunOptions) -> anyhow::Result<()> {
    register_shutdown_handler();
    let engine = connect(&run_options).await?;
    engine.service.initialize().await?;
    engine.service.get_snapshot().log_summary();

    let sync_loop = tokio::spawn({
        let service = engine.service.clone();
        async move {
            let result = service.run_sync_loop().await;
            SHOULD_EXIT.store(true, Ordering::Release);
            result
        }
    });
    let chain_watcher = tokio::spawn({
        let wallet = engine.wallet.clone();
        let poll_interval = engine.chain_id_poll_interval;
        async move { wallet.run_chain_watcher(poll_interval).await }
    });
    let console = tokio::spawn(run_console(
        engine.service.clone(),
        engine.wallet.clone(),
    ));

    let results = join_all(vec![sync_loop, chain_watcher, console]).await;
    engine.service.teardown().await;
    engine.task_tracker.wait().await;
    for result in results {
        result??;
    }
    Ok(())
}

pub async fn print_status(run_options: RunOptions) -> anyhow::Result<()> {
    let engine = connect(&run_options).await?;
    engine.service.initialize().await?;
    engine.service.get_snapshot().log_summary();
    engine.service.teardown().await;
    Ok(())
}

pub async fn send_action(send_options: SendOptions) -> anyhow::Result<()> {
    let engine = connect(&send_options.run).await?;
    engine.service.initialize().await?;
    let result = dispatch_action(&engine.service, send_options.action).await;
    engine.service.teardown().await;
    let tx_hash = result?;
    tracing::info!(tx_hash = ?tx_hash, "Request confirmed");
    engine.service.get_snapshot().log_summary();
    Ok(())
}
