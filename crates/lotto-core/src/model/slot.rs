// ── Slot domain type ──
//
// A slot is one scheduled betting window. The wire shape keeps
// timestamps as raw strings; here they are parsed once, and a price the
// server left out or zeroed falls back to one unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use lotto_api::models::{SlotStatus as WireStatus, SlotSummary};

use super::product::ProductType;

/// Price used when a slot carries no usable `bidPrize`.
pub const DEFAULT_BID_PRICE: f64 = 1.0;

/// Slot lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Open,
    Closed,
    Completed,
    Cancelled,
    Unknown,
}

impl From<WireStatus> for SlotStatus {
    fn from(s: WireStatus) -> Self {
        match s {
            WireStatus::Open => Self::Open,
            WireStatus::Closed => Self::Closed,
            WireStatus::Completed => Self::Completed,
            WireStatus::Cancelled => Self::Cancelled,
            WireStatus::Unknown => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    /// Human-readable slot code (`LD-20261017-2000`).
    pub code: Option<String>,
    pub product: ProductType,
    pub status: SlotStatus,
    /// Local draw time label, `HH:MM`.
    pub time_label: String,
    pub draw_time: Option<DateTime<Utc>>,
    /// End of the betting window. `None` when missing or unparsable.
    pub window_close_at: Option<DateTime<Utc>>,
    /// Price of one unit (Lucky Draw) or one combination (Jackpot).
    pub bid_price: f64,
    pub winning_prize: Option<f64>,
}

impl Slot {
    /// When the countdown runs out: window close, else the draw itself.
    pub fn closes_at(&self) -> Option<DateTime<Utc>> {
        self.window_close_at.or(self.draw_time)
    }

    /// `HH:MM` as a 12-hour label (`20:00` -> `8:00 PM`). Labels that do
    /// not parse are returned unchanged.
    pub fn display_time(&self) -> String {
        twelve_hour(&self.time_label)
    }
}

pub(crate) fn twelve_hour(label: &str) -> String {
    let Some((h, m)) = label.split_once(':') else {
        return label.to_owned();
    };
    let (Ok(h), Ok(m)) = (h.trim().parse::<u32>(), m.trim().parse::<u32>()) else {
        return label.to_owned();
    };
    let period = if h >= 12 { "PM" } else { "AM" };
    let display_h = match h {
        0 => 12,
        13.. => h - 12,
        _ => h,
    };
    format!("{display_h}:{m:02} {period}")
}

fn parse_instant(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(e) => {
            debug!(raw, error = %e, "ignoring malformed slot timestamp");
            None
        }
    }
}

impl From<SlotSummary> for Slot {
    fn from(s: SlotSummary) -> Self {
        let bid_price = s
            .settings_json
            .bid_prize
            .filter(|p| *p > 0.0)
            .unwrap_or(DEFAULT_BID_PRICE);
        Self {
            draw_time: parse_instant(s.slot_time.as_deref()),
            window_close_at: parse_instant(s.window_close_at.as_deref()),
            id: s.id,
            code: s.unique_slot_id,
            product: s.slot_type.into(),
            status: s.status.into(),
            time_label: s.slot_time_formatted,
            bid_price,
            winning_prize: s.settings_json.winning_prize,
        }
    }
}
