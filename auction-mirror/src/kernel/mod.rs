pub mod contracts;
pub mod entities;
pub mod rpc;
pub mod units;
pub mod wallet;
