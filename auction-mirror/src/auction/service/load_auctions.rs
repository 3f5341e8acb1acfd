use {
    super::Service,
    crate::{
        auction::entities::{
            AuctionCollections,
            AuctionRecord,
            Generation,
        },
        kernel::contracts::AuctionList,
    },
};

impl Service {
    async fn load_auction_list(&self, list: AuctionList) -> Vec<AuctionRecord> {
        let ids = Self::read_or_default(self.contract.auction_ids(list).await, vec![]);
        let mut auctions = Vec::with_capacity(ids.len());
        for id in ids {
            match self.contract.auction(id).await {
                Ok(auction) => auctions.push(auction.normalized()),
                Err(e) => {
                    tracing::warn!(error = ?e, auction_id = %id, list = ?list, "Failed to load auction, skipping")
                }
            }
        }
        auctions
    }

    /// Reloads the three auction collections and swaps them in together.
    pub(super) async fn load_auctions(&self, generation: Generation) -> bool {
        let auctions = AuctionCollections {
            active:    self.load_auction_list(AuctionList::Active).await,
            completed: self.load_auction_list(AuctionList::Completed).await,
            cancelled: self.load_auction_list(AuctionList::Cancelled).await,
        };
        if self.is_superseded(generation) {
            return false;
        }
        self.repo.replace_auctions(auctions);
        true
    }
}
