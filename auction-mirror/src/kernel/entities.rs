use {
    crate::error::EngineError,
    ethers::types::{
        Address,
        U256,
    },
    std::{
        fmt,
        str::FromStr,
    },
};

pub type ChainId = u64;
pub type BlockNumber = u64;

/// Native value in base units (wei).
pub type Amount = U256;

/// Identifier the contract assigns to an auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AuctionId(pub U256);

impl fmt::Display for AuctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AuctionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::from_dec_str(s.trim())
            .map(AuctionId)
            .map_err(|e| format!("Invalid auction id {:?}: {}", s, e))
    }
}

impl From<u64> for AuctionId {
    fn from(value: u64) -> Self {
        AuctionId(U256::from(value))
    }
}

/// Parses a user supplied address, `field` names the input in the error.
pub fn parse_address(value: &str, field: &'static str) -> Result<Address, EngineError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EngineError::EmptyAddress(field));
    }
    Address::from_str(value).map_err(|e| EngineError::InvalidAddress(format!("{}: {}", value, e)))
}
