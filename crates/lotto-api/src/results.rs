// Draw result endpoints

use tracing::debug;

use crate::client::LottoClient;
use crate::error::Error;
use crate::models::{ResultSlot, ResultsByDate};

impl LottoClient {
    /// Every published result, flat. `GET results`
    pub async fn list_results(&self) -> Result<Vec<ResultSlot>, Error> {
        debug!("listing results");
        self.get("results").await
    }

    /// Results for one local date (today when `None`). `GET results/by-date`
    pub async fn results_by_date(&self, date: Option<&str>) -> Result<ResultsByDate, Error> {
        debug!(?date, "listing results by date");
        match date {
            Some(d) => {
                self.get_with_params("results/by-date", &[("date", d.to_owned())])
                    .await
            }
            None => self.get("results/by-date").await,
        }
    }

    /// Result for a single slot. `GET results/{slotId}`
    pub async fn result_for_slot(&self, slot_id: &str) -> Result<ResultSlot, Error> {
        debug!(slot_id, "fetching slot result");
        self.get(&format!("results/{slot_id}")).await
    }
}
