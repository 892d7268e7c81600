// ── Cart entries ──
//
// One `CartEntry` is one pending wager. Entries are grouped into
// partitions by local date plus slot time label; every cart operation
// except add works inside a single partition.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lotto_api::models::CreateBidRequest;

use super::product::{JACKPOT_LEN, ProductType};

// ── EntryId ─────────────────────────────────────────────────────────

/// Locally generated, session-unique identifier for a cart entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, enough to pick an entry in a short list.
    pub fn short(&self) -> String {
        self.0.simple().to_string().chars().take(8).collect()
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ── PartitionKey ────────────────────────────────────────────────────

/// Composite `date + slot time` key that groups cart entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartitionKey {
    /// Local draw date.
    pub date: NaiveDate,
    /// Slot time label as the server formats it (`HH:MM`).
    pub time: String,
}

impl PartitionKey {
    pub fn new(date: NaiveDate, time: impl Into<String>) -> Self {
        Self {
            date,
            time: time.into(),
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.date.format("%Y-%m-%d"), self.time)
    }
}

// ── Entry payload ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
}

/// What was wagered. The variant always matches the list holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "product", rename_all = "snake_case")]
pub enum Wager {
    LuckyDraw { number: u8, count: u32 },
    Jackpot { numbers: [u8; JACKPOT_LEN] },
}

impl Wager {
    pub fn product(&self) -> ProductType {
        match self {
            Self::LuckyDraw { .. } => ProductType::LuckyDraw,
            Self::Jackpot { .. } => ProductType::Jackpot,
        }
    }

    /// Units this wager costs: the quantity for Lucky Draw, one per
    /// Jackpot combination.
    pub fn units(&self) -> u32 {
        match self {
            Self::LuckyDraw { count, .. } => *count,
            Self::Jackpot { .. } => 1,
        }
    }
}

impl fmt::Display for Wager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LuckyDraw { number, count } => write!(f, "{number:02} x{count}"),
            Self::Jackpot { numbers } => {
                let parts: Vec<String> = numbers.iter().map(|n| format!("{n:02}")).collect();
                f.write_str(&parts.join("-"))
            }
        }
    }
}

/// Remote state of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EntryStatus {
    /// Not yet accepted by the server.
    #[default]
    Pending,
    /// Accepted; `bid_id` is the server's bid identifier.
    Submitted { bid_id: String },
}

impl EntryStatus {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }
}

// ── CartEntry ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: EntryId,
    /// Remote slot the wager targets.
    pub slot_id: String,
    pub customer: Customer,
    pub wager: Wager,
    pub partition: PartitionKey,
    pub status: EntryStatus,
}

impl CartEntry {
    pub fn product(&self) -> ProductType {
        self.wager.product()
    }

    /// Bid-creation body for this entry. Date and time are not sent; the
    /// slot id carries them.
    pub fn to_request(&self) -> CreateBidRequest {
        let (number, count, jp_numbers) = match self.wager {
            Wager::LuckyDraw { number, count } => (Some(number), Some(count), None),
            Wager::Jackpot { numbers } => (None, None, Some(numbers)),
        };
        CreateBidRequest {
            customer_name: self.customer.name.clone(),
            customer_phone: self.customer.phone.clone(),
            slot_id: self.slot_id.clone(),
            number,
            count,
            jp_numbers,
            note: None,
        }
    }
}
