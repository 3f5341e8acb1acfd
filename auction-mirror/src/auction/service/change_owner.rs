use {
    super::Service,
    crate::{
        error::EngineError,
        kernel::{
            contracts::WriteRequest,
            entities::parse_address,
        },
    },
    ethers::types::H256,
};

#[derive(Debug, Clone)]
pub struct ChangeOwnerInput {
    pub new_owner: String,
}

impl Service {
    #[tracing::instrument(skip_all, fields(new_owner = %input.new_owner))]
    pub async fn change_owner(&self, input: ChangeOwnerInput) -> Result<H256, EngineError> {
        let account = self.connected_account()?;
        let new_owner = parse_address(&input.new_owner, "new owner")?;
        self.submit(account, WriteRequest::ChangeOwner { new_owner })
            .await
    }
}
