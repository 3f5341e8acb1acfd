use {
    super::entities::{
        Amount,
        AuctionId,
        BlockNumber,
        ChainId,
    },
    crate::{
        auction::entities::AuctionRecord,
        error::EngineError,
    },
    async_trait::async_trait,
    ethers::{
        abi::{
            Abi,
            Detokenize,
            Token,
            Tokenize,
        },
        contract::{
            Contract,
            ContractError,
            EthError,
        },
        middleware::SignerMiddleware,
        providers::Middleware,
        signers::{
            LocalWallet,
            Signer,
        },
        types::{
            Address,
            H256,
            U256,
        },
    },
    std::{
        collections::HashMap,
        fs,
        sync::Arc,
    },
    strum::IntoEnumIterator,
};

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuctionList {
    Active,
    Completed,
    Cancelled,
}

impl AuctionList {
    pub fn accessor(&self) -> &'static str {
        match self {
            AuctionList::Active => "getActiveAuctions",
            AuctionList::Completed => "getCompletedAuctions",
            AuctionList::Cancelled => "getCancelledAuctions",
        }
    }
}

/// Events that invalidate the mirror. Variant names match the ABI event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum ContractEventKind {
    AuctionCreated,
    BidPlaced,
    AuctionCancelled,
    AuctionFulfilled,
    OwnerChanged,
    SellerBanned,
    Withdraw,
    ClaimPaid,
    ContractDestroyed,
}

/// Accessors resolved from the contract ABI. `None` means the contract does not expose it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub admin:           Option<&'static str>,
    pub collected_fees:  Option<&'static str>,
    pub auction_fee:     Option<&'static str>,
    pub destroyed:       Option<&'static str>,
    pub active_ids:      Option<&'static str>,
    pub completed_ids:   Option<&'static str>,
    pub cancelled_ids:   Option<&'static str>,
    pub auction_record:  Option<&'static str>,
    pub banned_sellers:  Option<&'static str>,
    pub contribution:    Option<&'static str>,
    pub pending_returns: Option<&'static str>,
    pub events:          Vec<(ContractEventKind, H256)>,
}

impl Capabilities {
    /// The first candidate present in the ABI wins.
    pub fn probe(abi: &Abi) -> Self {
        let first = |candidates: &[&'static str]| {
            candidates
                .iter()
                .copied()
                .find(|name| abi.functions.contains_key(*name))
        };
        Self {
            admin:           first(&["PERMANENT_ADMIN", "owner"]),
            collected_fees:  first(&["getWithdrawable"]),
            auction_fee:     first(&["AUCTION_FEE", "auctionFee"]),
            destroyed:       first(&["destroyed"]),
            active_ids:      first(&[AuctionList::Active.accessor()]),
            completed_ids:   first(&[AuctionList::Completed.accessor()]),
            cancelled_ids:   first(&[AuctionList::Cancelled.accessor()]),
            auction_record:  first(&["auctions"]),
            banned_sellers:  first(&["bannedSellers"]),
            contribution:    first(&["bids", "userBids"]),
            pending_returns: first(&["pendingReturns", "getPendingReturns"]),
            events:          ContractEventKind::iter()
                .filter_map(|kind| {
                    abi.event(&kind.to_string())
                        .ok()
                        .map(|event| (kind, event.signature()))
                })
                .collect(),
        }
    }

    pub fn list_accessor(&self, list: AuctionList) -> Option<&'static str> {
        match list {
            AuctionList::Active => self.active_ids,
            AuctionList::Completed => self.completed_ids,
            AuctionList::Cancelled => self.cancelled_ids,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteRequest {
    CreateAuction {
        title:           String,
        start_amount:    Amount,
        duration_blocks: u64,
        fee:             Amount,
    },
    PlaceBid {
        auction_id: AuctionId,
        new_total:  Amount,
        payment:    Amount,
    },
    CancelAuction {
        auction_id: AuctionId,
    },
    FulfillAuction {
        auction_id: AuctionId,
    },
    Claim,
    Withdraw,
    ChangeOwner {
        new_owner: Address,
    },
    BanSeller {
        seller: Address,
    },
    Destroy,
}

impl WriteRequest {
    pub fn method_name(&self) -> &'static str {
        match self {
            WriteRequest::CreateAuction { .. } => "createAuction",
            WriteRequest::PlaceBid { .. } => "placeBid",
            WriteRequest::CancelAuction { .. } => "cancelAuction",
            WriteRequest::FulfillAuction { .. } => "fulfillAuction",
            WriteRequest::Claim => "claim",
            WriteRequest::Withdraw => "withdraw",
            WriteRequest::ChangeOwner { .. } => "changeOwner",
            WriteRequest::BanSeller { .. } => "banSeller",
            WriteRequest::Destroy => "destroy",
        }
    }

    /// Native value attached to the transaction.
    pub fn value(&self) -> Amount {
        match self {
            WriteRequest::CreateAuction { fee, .. } => *fee,
            WriteRequest::PlaceBid { payment, .. } => *payment,
            _ => U256::zero(),
        }
    }
}

/// Typed handle on the deployed auction house.
///
/// Every read is best effort: an accessor missing from the contract yields
/// `EngineError::ReadUnsupported`, a failing call yields `EngineError::ReadFailed`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuctionHouse: Send + Sync {
    fn address(&self) -> Address;
    fn event_topics(&self) -> Vec<(ContractEventKind, H256)>;

    async fn code_present(&self) -> Result<bool, EngineError>;
    async fn block_number(&self) -> Result<BlockNumber, EngineError>;
    async fn balance(&self) -> Result<Amount, EngineError>;

    async fn admin(&self) -> Result<Address, EngineError>;
    async fn collected_fees(&self) -> Result<Amount, EngineError>;
    async fn auction_fee(&self) -> Result<Amount, EngineError>;
    async fn destroyed(&self) -> Result<bool, EngineError>;
    async fn auction_ids(&self, list: AuctionList) -> Result<Vec<AuctionId>, EngineError>;
    async fn auction(&self, id: AuctionId) -> Result<AuctionRecord, EngineError>;
    async fn is_banned_seller(&self, seller: Address) -> Result<bool, EngineError>;
    async fn contribution(&self, id: AuctionId, bidder: Address) -> Result<Amount, EngineError>;
    async fn pending_returns(&self, account: Address) -> Result<Amount, EngineError>;

    /// Signs the request with `from`, submits it and waits for the receipt.
    async fn send(&self, from: Address, request: WriteRequest) -> Result<H256, EngineError>;
}

pub fn load_abi(path: &str) -> anyhow::Result<Abi> {
    let content = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    // Accept both a bare ABI array and a compiler artifact with an "abi" field.
    let abi = match value.get("abi") {
        Some(abi) => serde_json::from_value(abi.clone())?,
        None => serde_json::from_value(value)?,
    };
    Ok(abi)
}

fn read_failed(accessor: &'static str) -> impl Fn(String) -> EngineError {
    move |reason| EngineError::ReadFailed { accessor, reason }
}

fn describe_contract_error<M: Middleware>(error: ContractError<M>) -> String {
    match error {
        ContractError::Revert(data) => format!(
            "contract reverted: {}",
            String::decode_with_selector(&data).unwrap_or("unable to decode revert".to_string())
        ),
        other => other.to_string(),
    }
}

fn field<'a>(fields: &'a HashMap<&str, Token>, name: &str) -> Option<&'a Token> {
    fields.get(name)
}

fn uint_field(fields: &HashMap<&str, Token>, name: &str) -> Option<U256> {
    match field(fields, name) {
        Some(Token::Uint(value)) => Some(*value),
        _ => None,
    }
}

fn u64_field(fields: &HashMap<&str, Token>, name: &str) -> Option<u64> {
    let value = uint_field(fields, name)?;
    match u64::try_from(value) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(field = name, value = %value, "Auction field out of range, using default");
            None
        }
    }
}

/// Maps the outputs of the `auctions(id)` getter onto a record by output name.
pub fn decode_auction_record(
    id: AuctionId,
    output_names: &[String],
    token: Token,
) -> AuctionRecord {
    let values = match token {
        Token::Tuple(values) => values,
        single => vec![single],
    };
    let fields: HashMap<&str, Token> = output_names
        .iter()
        .map(String::as_str)
        .zip(values)
        .collect();

    AuctionRecord {
        id:              uint_field(&fields, "id").map(AuctionId).unwrap_or(id),
        title:           match field(&fields, "title") {
            Some(Token::String(title)) => title.clone(),
            _ => String::new(),
        },
        seller:          match field(&fields, "seller") {
            Some(Token::Address(seller)) => *seller,
            _ => Address::zero(),
        },
        start_amount:    uint_field(&fields, "startPrice").unwrap_or_default(),
        end_block:       u64_field(&fields, "endBlock").unwrap_or_default(),
        highest_amount:  uint_field(&fields, "highestBid").unwrap_or_default(),
        highest_bidder:  match field(&fields, "highestBidder") {
            Some(Token::Address(bidder)) => *bidder,
            _ => Address::zero(),
        },
        lifecycle_state: u64_field(&fields, "state"),
    }
    .normalized()
}

pub type SignableProvider<M> = SignerMiddleware<M, LocalWallet>;

/// Contract adapter over any provider, websocket and http alike.
pub struct EvmAuctionHouse<M> {
    contract:     Contract<M>,
    provider:     Arc<M>,
    signers:      HashMap<Address, LocalWallet>,
    chain_id:     ChainId,
    capabilities: Capabilities,
}

impl<M: Middleware + Clone + 'static> EvmAuctionHouse<M> {
    pub fn new(
        address: Address,
        abi: Abi,
        provider: Arc<M>,
        signers: Vec<LocalWallet>,
        chain_id: ChainId,
    ) -> Self {
        let capabilities = Capabilities::probe(&abi);
        tracing::info!(capabilities = ?capabilities, "Resolved contract accessors");
        Self {
            contract: Contract::new(address, abi, provider.clone()),
            provider,
            signers: signers
                .into_iter()
                .map(|signer| (signer.address(), signer.with_chain_id(chain_id)))
                .collect(),
            chain_id,
            capabilities,
        }
    }

    async fn read<T: Tokenize, D: Detokenize + Send + Sync>(
        &self,
        accessor: Option<&'static str>,
        label: &'static str,
        args: T,
    ) -> Result<D, EngineError> {
        let name = accessor.ok_or(EngineError::ReadUnsupported(label))?;
        self.contract
            .method::<T, D>(name, args)
            .map_err(|e| read_failed(label)(e.to_string()))?
            .call()
            .await
            .map_err(|e| read_failed(label)(describe_contract_error(e)))
    }

    fn signed_contract(&self, from: Address) -> Result<Contract<SignableProvider<M>>, EngineError> {
        let signer = self.signers.get(&from).cloned().ok_or_else(|| {
            EngineError::SubmissionRejected(format!("no signer available for {:?}", from))
        })?;
        let client = Arc::new(SignerMiddleware::new((*self.provider).clone(), signer));
        Ok(Contract::new(
            self.contract.address(),
            self.contract.abi().clone(),
            client,
        ))
    }
}

#[async_trait]
impl<M: Middleware + Clone + 'static> AuctionHouse for EvmAuctionHouse<M> {
    fn address(&self) -> Address {
        self.contract.address()
    }

    fn event_topics(&self) -> Vec<(ContractEventKind, H256)> {
        self.capabilities.events.clone()
    }

    async fn code_present(&self) -> Result<bool, EngineError> {
        self.provider
            .get_code(self.contract.address(), None)
            .await
            .map(|code| !code.is_empty())
            .map_err(|e| read_failed("code")(e.to_string()))
    }

    async fn block_number(&self) -> Result<BlockNumber, EngineError> {
        self.provider
            .get_block_number()
            .await
            .map(|block| block.as_u64())
            .map_err(|e| read_failed("block number")(e.to_string()))
    }

    async fn balance(&self) -> Result<Amount, EngineError> {
        self.provider
            .get_balance(self.contract.address(), None)
            .await
            .map_err(|e| read_failed("balance")(e.to_string()))
    }

    async fn admin(&self) -> Result<Address, EngineError> {
        self.read(self.capabilities.admin, "admin", ()).await
    }

    async fn collected_fees(&self) -> Result<Amount, EngineError> {
        self.read(self.capabilities.collected_fees, "collected fees", ())
            .await
    }

    async fn auction_fee(&self) -> Result<Amount, EngineError> {
        self.read(self.capabilities.auction_fee, "auction fee", ())
            .await
    }

    async fn destroyed(&self) -> Result<bool, EngineError> {
        self.read(self.capabilities.destroyed, "destroyed flag", ())
            .await
    }

    async fn auction_ids(&self, list: AuctionList) -> Result<Vec<AuctionId>, EngineError> {
        let ids: Vec<U256> = self
            .read(self.capabilities.list_accessor(list), list.accessor(), ())
            .await?;
        Ok(ids.into_iter().map(AuctionId).collect())
    }

    async fn auction(&self, id: AuctionId) -> Result<AuctionRecord, EngineError> {
        let name = self
            .capabilities
            .auction_record
            .ok_or(EngineError::ReadUnsupported("auction record"))?;
        let output_names: Vec<String> = self
            .contract
            .abi()
            .function(name)
            .map_err(|e| read_failed("auction record")(e.to_string()))?
            .outputs
            .iter()
            .map(|output| output.name.clone())
            .collect();
        let token: Token = self
            .read(self.capabilities.auction_record, "auction record", id.0)
            .await?;
        Ok(decode_auction_record(id, &output_names, token))
    }

    async fn is_banned_seller(&self, seller: Address) -> Result<bool, EngineError> {
        self.read(self.capabilities.banned_sellers, "banned sellers", seller)
            .await
    }

    async fn contribution(&self, id: AuctionId, bidder: Address) -> Result<Amount, EngineError> {
        self.read(
            self.capabilities.contribution,
            "bidder ledger",
            (id.0, bidder),
        )
        .await
    }

    async fn pending_returns(&self, account: Address) -> Result<Amount, EngineError> {
        self.read(self.capabilities.pending_returns, "pending returns", account)
            .await
    }

    #[tracing::instrument(skip_all, fields(method = request.method_name(), from = ?from))]
    async fn send(&self, from: Address, request: WriteRequest) -> Result<H256, EngineError> {
        let contract = self.signed_contract(from)?;
        let name = request.method_name();
        let call = match &request {
            WriteRequest::CreateAuction {
                title,
                start_amount,
                duration_blocks,
                ..
            } => contract.method::<_, ()>(
                name,
                (title.clone(), *start_amount, U256::from(*duration_blocks)),
            ),
            WriteRequest::PlaceBid {
                auction_id,
                new_total,
                ..
            } => contract.method::<_, ()>(name, (auction_id.0, *new_total)),
            WriteRequest::CancelAuction { auction_id }
            | WriteRequest::FulfillAuction { auction_id } => {
                contract.method::<_, ()>(name, auction_id.0)
            }
            WriteRequest::ChangeOwner { new_owner } => contract.method::<_, ()>(name, *new_owner),
            WriteRequest::BanSeller { seller } => contract.method::<_, ()>(name, *seller),
            WriteRequest::Claim | WriteRequest::Withdraw | WriteRequest::Destroy => {
                contract.method::<_, ()>(name, ())
            }
        }
        .map_err(|e| EngineError::SubmissionRejected(e.to_string()))?
        .from(from)
        .value(request.value());

        let pending = call
            .send()
            .await
            .map_err(|e| EngineError::SubmissionRejected(describe_contract_error(e)))?;
        let tx_hash = *pending;
        tracing::debug!(tx_hash = ?tx_hash, chain_id = self.chain_id, "Transaction sent");

        let receipt = pending
            .await
            .map_err(|e| EngineError::SubmissionRejected(e.to_string()))?
            .ok_or_else(|| {
                EngineError::SubmissionRejected(format!("transaction {:?} was dropped", tx_hash))
            })?;
        if receipt.status == Some(0.into()) {
            return Err(EngineError::SubmissionRejected(format!(
                "transaction {:?} reverted",
                tx_hash
            )));
        }
        Ok(tx_hash)
    }
}
