use {
    super::Service,
    crate::{
        error::EngineError,
        kernel::contracts::WriteRequest,
    },
    ethers::types::{
        Address,
        H256,
    },
};

impl Service {
    /// The account write requests are signed with. Requires an open network gate.
    pub(super) fn connected_account(&self) -> Result<Address, EngineError> {
        self.ensure_network_open()?;
        self.repo
            .get_snapshot()
            .account()
            .ok_or(EngineError::NotConnected)
    }

    /// Submits the request and refreshes the mirror once it is mined.
    /// A rejected request leaves the mirror untouched.
    pub(super) async fn submit(
        &self,
        from: Address,
        request: WriteRequest,
    ) -> Result<H256, EngineError> {
        let method = request.method_name();
        let tx_hash = self.contract.send(from, request).await.map_err(|e| {
            tracing::error!(error = ?e, method, "Request rejected");
            e
        })?;
        tracing::info!(method, tx_hash = ?tx_hash, "Request confirmed");
        self.refresh_all().await;
        Ok(tx_hash)
    }
}
