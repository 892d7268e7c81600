// Lotto API request/response types
//
// Wire models for the platform's JSON API. The backend is loose about
// numeric types (decimal columns arrive as strings) and optional fields,
// so amounts go through `amount::*` and most fields carry
// `#[serde(default)]`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Amount decoding ──────────────────────────────────────────────────

/// Decoders for monetary fields that may arrive as a JSON number, a
/// numeric string, or null.
pub mod amount {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    fn from_raw(raw: Option<Raw>) -> Option<f64> {
        match raw? {
            Raw::Number(n) => Some(n),
            Raw::Text(s) => s.trim().parse().ok(),
        }
    }

    /// `Option<f64>` that tolerates strings and unparsable text (-> `None`).
    pub fn optional<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
        Ok(from_raw(Option::<Raw>::deserialize(de)?))
    }

    /// `f64` that tolerates strings; anything unparsable becomes `0.0`.
    pub fn lenient<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
        Ok(from_raw(Option::<Raw>::deserialize(de)?).unwrap_or(0.0))
    }
}

// ── Slots ────────────────────────────────────────────────────────────

/// Product type of a slot: Lucky Draw or Jackpot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotType {
    #[serde(rename = "LD")]
    LuckyDraw,
    #[serde(rename = "JP")]
    Jackpot,
}

/// Lifecycle status of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Open,
    Closed,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Per-slot prize settings (`settingsJson`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSettings {
    /// Price of one bid unit (LD) or one combination (JP).
    #[serde(default, deserialize_with = "amount::optional")]
    pub bid_prize: Option<f64>,
    #[serde(default, deserialize_with = "amount::optional")]
    pub winning_prize: Option<f64>,
}

/// One slot as returned by the slot listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSummary {
    pub id: String,
    #[serde(default)]
    pub unique_slot_id: Option<String>,
    #[serde(rename = "type")]
    pub slot_type: SlotType,
    pub status: SlotStatus,
    /// Draw time, ISO-8601 UTC.
    #[serde(default)]
    pub slot_time: Option<String>,
    /// Draw time in local wall-clock form, `HH:MM`.
    #[serde(default)]
    pub slot_time_formatted: String,
    /// Betting window close, ISO-8601 UTC. Kept raw: some rows carry
    /// malformed timestamps and callers decide how to treat them.
    #[serde(default)]
    pub window_close_at: Option<String>,
    #[serde(default)]
    pub settings_json: SlotSettings,
}

/// `GET slots/grouped` -- `{ "YYYY-MM-DD": [SlotSummary, ...] }`.
pub type GroupedSlots = BTreeMap<String, Vec<SlotSummary>>;

// ── Bids ─────────────────────────────────────────────────────────────

/// `POST bids/create` body.
///
/// Lucky Draw bids carry `number` + `count`; Jackpot bids carry
/// `jpNumbers`. The two shapes share one DTO on the server side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBidRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub slot_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jp_numbers: Option<[u8; 6]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A bid as stored by the server (create response and history rows).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidRecord {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub slot_id: String,
    #[serde(default)]
    pub number: Option<u8>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub jp_numbers: Option<Vec<u8>>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `GET bids/my` page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidPage {
    #[serde(default)]
    pub items: Vec<BidRecord>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

// ── Results ──────────────────────────────────────────────────────────

/// Draw result for one slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSlot {
    pub slot_id: String,
    #[serde(default)]
    pub unique_slot_id: Option<String>,
    #[serde(rename = "type")]
    pub slot_type: SlotType,
    /// Local date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// Local time, e.g. `8:00PM`.
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub winning_number: Option<u8>,
    #[serde(default)]
    pub winning_combo: Option<Vec<u8>>,
    #[serde(default)]
    pub announced_at: Option<String>,
    #[serde(default)]
    pub slot_time: Option<String>,
}

/// `GET results/by-date` -- results for one day split by product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsByDate {
    pub date: String,
    #[serde(rename = "LD", default)]
    pub lucky_draw: Vec<ResultSlot>,
    #[serde(rename = "JP", default)]
    pub jackpot: Vec<ResultSlot>,
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default, deserialize_with = "amount::optional")]
    pub commission_pct: Option<f64>,
    #[serde(default)]
    pub is_phone_verified: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `POST auth/login` response. Tokens are also set as cookies.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub dob: String,
    pub gender: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user_id: String,
}

/// Generic `{ "message": "..." }` acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetTokenResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub reset_token: String,
}

/// A signed-in device from `GET auth/devices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSession {
    pub id: String,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub last_used_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ── Wallet ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    #[serde(default, deserialize_with = "amount::lenient")]
    pub total_balance: f64,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub available_balance: f64,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub commission_earned: f64,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub reserved_winning: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub tx_type: String,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub amount: f64,
    #[serde(default, deserialize_with = "amount::optional")]
    pub balance_after: Option<f64>,
    #[serde(default)]
    pub trans_id: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletHistoryPage {
    #[serde(default)]
    pub items: Vec<WalletTransaction>,
    #[serde(default)]
    pub total: u64,
}

/// Body for deposit requests and winning settlements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransferRequest {
    pub amount: f64,
    pub trans_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn slot_settings_accept_numeric_strings() {
        let settings: SlotSettings =
            serde_json::from_str(r#"{"bidPrize":"2.50","winningPrize":1000}"#).unwrap();
        assert_eq!(settings.bid_prize, Some(2.5));
        assert_eq!(settings.winning_prize, Some(1000.0));
    }

    #[test]
    fn unknown_slot_status_does_not_fail() {
        let status: SlotStatus = serde_json::from_str(r#""DRAWING""#).unwrap();
        assert_eq!(status, SlotStatus::Unknown);
    }

    #[test]
    fn lucky_draw_request_omits_jackpot_fields() {
        let req = CreateBidRequest {
            customer_name: "Ali".into(),
            customer_phone: "0123456789".into(),
            slot_id: "slot-1".into(),
            number: Some(5),
            count: Some(20),
            jp_numbers: None,
            note: None,
        };
        insta::assert_json_snapshot!(req, @r#"
        {
          "customerName": "Ali",
          "customerPhone": "0123456789",
          "slotId": "slot-1",
          "number": 5,
          "count": 20
        }
        "#);
    }

    #[test]
    fn wallet_balance_tolerates_nulls() {
        let bal: WalletBalance = serde_json::from_str(
            r#"{"totalBalance":"120.00","availableBalance":null,"commissionEarned":3}"#,
        )
        .unwrap();
        assert!((bal.total_balance - 120.0).abs() < f64::EPSILON);
        assert!(bal.available_balance.abs() < f64::EPSILON);
        assert!(bal.reserved_winning.abs() < f64::EPSILON);
    }
}
