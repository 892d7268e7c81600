// Slot endpoints
//
// Betting windows, either flat or grouped by local date key.

use tracing::debug;

use crate::client::LottoClient;
use crate::error::Error;
use crate::models::{GroupedSlots, SlotSummary};

impl LottoClient {
    /// Slots grouped by `YYYY-MM-DD` date key. `GET slots/grouped`
    pub async fn slots_grouped_by_date(&self) -> Result<GroupedSlots, Error> {
        debug!("listing slots grouped by date");
        self.get("slots/grouped").await
    }

    /// Every slot, flat. `GET slots`
    pub async fn list_slots(&self) -> Result<Vec<SlotSummary>, Error> {
        debug!("listing slots");
        self.get("slots").await
    }
}
