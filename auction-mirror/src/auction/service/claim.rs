use {
    super::Service,
    crate::{
        error::EngineError,
        kernel::contracts::WriteRequest,
    },
    ethers::types::H256,
};

impl Service {
    /// Pays out the pending returns of the connected account.
    #[tracing::instrument(skip_all)]
    pub async fn claim(&self) -> Result<H256, EngineError> {
        let account = self.connected_account()?;
        self.submit(account, WriteRequest::Claim).await
    }
}
