use crate::kernel::{
    contracts::ContractEventKind,
    wallet::SubscriptionId,
};

/// Counter identifying one installed subscription set.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionSource {
    NewHeads,
    ContractEvent(ContractEventKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionHandle {
    pub id:     SubscriptionId,
    pub source: SubscriptionSource,
}

/// A contract event asking for a full refresh. The payload of the event is not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTrigger {
    pub generation: Generation,
    pub event:      ContractEventKind,
}
