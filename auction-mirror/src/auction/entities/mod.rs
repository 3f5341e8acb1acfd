mod auction;
mod session;
mod snapshot;
mod subscription;
mod top_state;

pub use {
    auction::*,
    session::*,
    snapshot::*,
    subscription::*,
    top_state::*,
};

#[cfg(test)]
pub use auction::tests::sample_auction;
