use {
    super::Service,
    crate::{
        error::EngineError,
        kernel::contracts::WriteRequest,
    },
    ethers::types::H256,
};

impl Service {
    #[tracing::instrument(skip_all)]
    pub async fn destroy(&self) -> Result<H256, EngineError> {
        let account = self.connected_account()?;
        self.submit(account, WriteRequest::Destroy).await
    }
}
