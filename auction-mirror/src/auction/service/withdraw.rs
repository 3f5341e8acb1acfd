use {
    super::Service,
    crate::{
        error::EngineError,
        kernel::contracts::WriteRequest,
    },
    ethers::types::H256,
};

impl Service {
    /// Withdraws the collected fees to the admin.
    #[tracing::instrument(skip_all)]
    pub async fn withdraw(&self) -> Result<H256, EngineError> {
        let account = self.connected_account()?;
        self.submit(account, WriteRequest::Withdraw).await
    }
}
