use {
    crate::{
        auction::service::bid_protocol::BidModel,
        kernel::entities::{
            AuctionId,
            ChainId,
        },
    },
    anyhow::Result,
    clap::{
        crate_authors,
        crate_description,
        crate_name,
        crate_version,
        Args,
        Parser,
        Subcommand,
    },
    ethers::types::Address,
    serde::{
        Deserialize,
        Serialize,
    },
    std::{
        fs,
        time::Duration,
    },
};

const DEFAULT_AUCTION_FEE: &str = "0.02";
const DEFAULT_TRIGGER_QUEUE_LEN: usize = 64;
const DEFAULT_CHAIN_ID_POLL_INTERVAL: Duration = Duration::from_secs(5);

// `Options` is the command line surface of the mirror.
#[derive(Parser, Debug)]
#[command(name = crate_name!())]
#[command(author = crate_authors!())]
#[command(about = crate_description!())]
#[command(version = crate_version!())]
pub enum Options {
    /// Keep the mirror in sync and read commands from stdin.
    Run(RunOptions),
    /// Load the contract state once and print it.
    Status(RunOptions),
    /// Submit a single request and exit.
    Send(SendOptions),
}

#[derive(Args, Clone, Debug)]
pub struct RunOptions {
    #[command(flatten)]
    pub config: ConfigOptions,

    /// Hex encoded private keys of the accounts to sign with, comma separated.
    /// The first one is the initially connected account.
    #[arg(long = "private-key")]
    #[arg(env = "PRIVATE_KEYS")]
    #[arg(value_delimiter = ',')]
    pub private_keys: Vec<String>,
}

#[derive(Args, Clone, Debug)]
#[command(next_help_heading = "Config Options")]
#[group(id = "Config")]
pub struct ConfigOptions {
    /// Path to the configuration file of the mirrored contract.
    #[arg(long = "config")]
    #[arg(env = "AUCTION_MIRROR_CONFIG")]
    #[arg(default_value = "config.yaml")]
    pub config: String,
}

#[derive(Args, Clone, Debug)]
pub struct SendOptions {
    #[command(flatten)]
    pub run: RunOptions,

    #[command(subcommand)]
    pub action: ActionCommand,
}

/// State changing requests, shared by the `send` subcommand and the console.
#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum ActionCommand {
    /// Create an auction, paying the auction fee.
    CreateAuction {
        #[arg(long)]
        title:           String,
        /// Start price in ether.
        #[arg(long)]
        start_amount:    String,
        #[arg(long)]
        duration_blocks: String,
    },
    /// Raise your bid on an auction to a new total.
    Bid {
        #[arg(long)]
        auction_id: AuctionId,
        /// New total in ether, the buffered input is used when omitted.
        #[arg(long)]
        amount:     Option<String>,
    },
    Cancel {
        #[arg(long)]
        auction_id: AuctionId,
    },
    Fulfill {
        #[arg(long)]
        auction_id: AuctionId,
    },
    /// Claim the pending returns of the connected account.
    Claim,
    /// Withdraw the collected fees.
    Withdraw,
    ChangeOwner {
        #[arg(long)]
        new_owner: String,
    },
    BanSeller {
        #[arg(long)]
        seller: String,
    },
    /// Self destruct the contract.
    Destroy,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint. Block and event notifications need a ws:// or wss:// one,
    /// over http(s) the mirror only refreshes on request.
    #[serde(alias = "rpc_ws_addr")]
    pub rpc_addr:               String,
    /// The only network the engine operates on.
    pub target_chain_id:        ChainId,
    /// Address of the auction house contract.
    pub contract:               Address,
    /// JSON ABI of the contract, either a bare array or a compiler artifact.
    pub abi_path:               String,
    /// Auction fee in ether used when the contract does not expose one.
    #[serde(default = "default_auction_fee")]
    pub default_auction_fee:    String,
    #[serde(default)]
    pub bid_model:              BidModel,
    #[serde(default = "default_trigger_queue_len")]
    pub trigger_queue_len:      usize,
    #[serde(with = "humantime_serde", default = "default_chain_id_poll_interval")]
    pub chain_id_poll_interval: Duration,
}

fn default_auction_fee() -> String {
    DEFAULT_AUCTION_FEE.to_string()
}

fn default_trigger_queue_len() -> usize {
    DEFAULT_TRIGGER_QUEUE_LEN
}

fn default_chain_id_poll_interval() -> Duration {
    DEFAULT_CHAIN_ID_POLL_INTERVAL
}

impl Config {
    pub fn load(path: &str) -> Result<Config> {
        let yaml_content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&yaml_content)?;
        Ok(config)
    }
}
