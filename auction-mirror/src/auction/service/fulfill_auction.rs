use {
    super::Service,
    crate::{
        error::EngineError,
        kernel::{
            contracts::WriteRequest,
            entities::AuctionId,
        },
    },
    ethers::types::H256,
};

#[derive(Debug, Clone)]
pub struct FulfillAuctionInput {
    pub auction_id: AuctionId,
}

impl Service {
    #[tracing::instrument(skip_all, fields(auction_id = %input.auction_id))]
    pub async fn fulfill_auction(&self, input: FulfillAuctionInput) -> Result<H256, EngineError> {
        let account = self.connected_account()?;
        self.submit(
            account,
            WriteRequest::FulfillAuction {
                auction_id: input.auction_id,
            },
        )
        .await
    }
}
