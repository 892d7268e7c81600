// Bid endpoints

use tracing::debug;

use crate::client::LottoClient;
use crate::error::Error;
use crate::models::{BidPage, BidRecord, CreateBidRequest};

impl LottoClient {
    /// Place one bid. `POST bids/create`
    ///
    /// Not idempotent: every successful call creates a new server-side bid.
    pub async fn create_bid(&self, req: &CreateBidRequest) -> Result<BidRecord, Error> {
        debug!(slot_id = %req.slot_id, number = ?req.number, jp = ?req.jp_numbers, "creating bid");
        self.post("bids/create", req).await
    }

    /// Bids placed by the signed-in agent. `GET bids/my?page=&pageSize=`
    pub async fn my_bids(&self, page: u32, page_size: u32) -> Result<BidPage, Error> {
        self.get_with_params(
            "bids/my",
            &[("page", page.to_string()), ("pageSize", page_size.to_string())],
        )
        .await
    }
}
