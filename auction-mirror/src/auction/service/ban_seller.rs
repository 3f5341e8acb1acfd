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
pub struct BanSellerInput {
    pub seller: String,
}

impl Service {
    #[tracing::instrument(skip_all, fields(seller = %input.seller))]
    pub async fn ban_seller(&self, input: BanSellerInput) -> Result<H256, EngineError> {
        let account = self.connected_account()?;
        let seller = parse_address(&input.seller, "seller")?;
        self.submit(account, WriteRequest::BanSeller { seller }).await
    }
}
