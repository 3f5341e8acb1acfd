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
pub struct CancelAuctionInput {
    pub auction_id: AuctionId,
}

impl Service {
    #[tracing::instrument(skip_all, fields(auction_id = %input.auction_id))]
    pub async fn cancel_auction(&self, input: CancelAuctionInput) -> Result<H256, EngineError> {
        let account = self.connected_account()?;
        self.submit(
            account,
            WriteRequest::CancelAuction {
                auction_id: input.auction_id,
            },
        )
        .await
    }
}
