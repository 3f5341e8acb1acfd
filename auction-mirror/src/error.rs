use {
    crate::kernel::{
        entities::{
            Amount,
            AuctionId,
            ChainId,
        },
        units::to_display,
    },
    ethers::types::Address,
    std::fmt,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No wallet or provider could be reached
    ConnectionUnavailable(String),
    /// The provider is connected to a different network than the configured one
    WrongNetwork { expected: ChainId, actual: ChainId },
    /// The network gate is closed, refreshes and writes are refused
    NetworkGateClosed,
    /// The contract does not expose an optional accessor
    ReadUnsupported(&'static str),
    /// The accessor exists but calling it failed
    ReadFailed {
        accessor: &'static str,
        reason:   String,
    },
    /// The amount could not be parsed into a positive number of base units
    InvalidAmount(String),
    /// The bid does not exceed the current leading amount
    BidTooLow { desired: Amount, leading: Amount },
    /// The account already contributed at least the desired total
    NoIncrementalPayment {
        desired:     Amount,
        contributed: Amount,
    },
    /// The contract keeps no per-bidder ledger and the full amount fallback is not enabled
    UnsupportedBidModel,
    /// The wallet or the contract rejected the request
    SubmissionRejected(String),
    /// The notification transport cannot install subscriptions
    SubscriptionUnsupported(String),
    /// No account is connected
    NotConnected,
    /// The admin account may not create auctions
    AdminCannotCreateAuction,
    /// The contract has been destroyed
    ContractDestroyed,
    /// The account is on the banned seller list
    SellerBanned(Address),
    /// The auction title is empty
    EmptyTitle,
    /// The duration is not a whole number of blocks greater than zero
    InvalidDuration(String),
    /// A required address field was left empty
    EmptyAddress(&'static str),
    /// An address field could not be parsed
    InvalidAddress(String),
    /// The auction is not in the active collection of the mirror
    UnknownAuction(AuctionId),
}

impl EngineError {
    pub fn to_message(&self) -> String {
        match self {
            EngineError::ConnectionUnavailable(reason) => {
                format!("Wallet connection unavailable: {}", reason)
            }
            EngineError::WrongNetwork { expected, actual } => format!(
                "Wrong network: connected to chain {} but chain {} is required, switch networks and restart",
                actual, expected
            ),
            EngineError::NetworkGateClosed => {
                "Wallet is not on the configured network, refresh and writes are disabled"
                    .to_string()
            }
            EngineError::ReadUnsupported(accessor) => {
                format!("Contract does not expose {}", accessor)
            }
            EngineError::ReadFailed { accessor, reason } => {
                format!("Reading {} failed: {}", accessor, reason)
            }
            EngineError::InvalidAmount(reason) => format!("Invalid amount: {}", reason),
            EngineError::BidTooLow { desired, leading } => format!(
                "Bid of {} ETH must be higher than the current amount of {} ETH",
                to_display(*desired),
                to_display(*leading)
            ),
            EngineError::NoIncrementalPayment {
                desired,
                contributed,
            } => format!(
                "You already contributed {} ETH to this auction, a new total of {} ETH adds nothing",
                to_display(*contributed),
                to_display(*desired)
            ),
            EngineError::UnsupportedBidModel => {
                "Contract keeps no per-bidder ledger, cannot compute the incremental payment (set bid_model: full_amount to send the full amount)"
                    .to_string()
            }
            EngineError::SubmissionRejected(reason) => format!("Request rejected: {}", reason),
            EngineError::SubscriptionUnsupported(reason) => {
                format!("Subscriptions are not supported: {}", reason)
            }
            EngineError::NotConnected => "No wallet account is connected".to_string(),
            EngineError::AdminCannotCreateAuction => {
                "The admin account is not allowed to create auctions".to_string()
            }
            EngineError::ContractDestroyed => {
                "The contract is destroyed, new auctions are not allowed".to_string()
            }
            EngineError::SellerBanned(seller) => {
                format!("Address {:?} is on the banned seller list", seller)
            }
            EngineError::EmptyTitle => "Auction title must not be empty".to_string(),
            EngineError::InvalidDuration(value) => format!(
                "Duration must be a whole number of blocks >= 1, got {:?}",
                value
            ),
            EngineError::EmptyAddress(field) => format!("Enter the {} address", field),
            EngineError::InvalidAddress(value) => format!("{:?} is not a valid address", value),
            EngineError::UnknownAuction(id) => format!("Auction {} is not active", id),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_message())
    }
}

impl std::error::Error for EngineError {}
