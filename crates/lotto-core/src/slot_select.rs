// ── Slot selection ──
//
// Pure functions that pick the active date and slot from the grouped
// slot listing. Callers re-run `evaluate` whenever the listing, the
// requested date, the product or the clock changes and render whatever
// comes back; nothing here holds state between calls.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use tracing::warn;

use lotto_api::models::GroupedSlots;

use crate::model::{ProductType, Slot, SlotStatus};

/// How far ahead a date may be and still be offered.
pub const BOOKING_WINDOW_DAYS: u64 = 7;

/// Slots keyed by local date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotBoard {
    by_date: BTreeMap<NaiveDate, Vec<Slot>>,
}

impl SlotBoard {
    pub fn new(by_date: BTreeMap<NaiveDate, Vec<Slot>>) -> Self {
        Self { by_date }
    }

    /// Build from the wire listing. Keys that are not `YYYY-MM-DD` are
    /// dropped with a warning.
    pub fn from_grouped(grouped: GroupedSlots) -> Self {
        let by_date = grouped
            .into_iter()
            .filter_map(|(key, slots)| match NaiveDate::parse_from_str(&key, "%Y-%m-%d") {
                Ok(date) => Some((date, slots.into_iter().map(Slot::from).collect())),
                Err(e) => {
                    warn!(key, error = %e, "skipping slot group with bad date key");
                    None
                }
            })
            .collect();
        Self { by_date }
    }

    pub fn has_date(&self, date: NaiveDate) -> bool {
        self.by_date.contains_key(&date)
    }

    /// Slots on `date` for `product`, in server order.
    pub fn slots_for(&self, date: NaiveDate, product: ProductType) -> Vec<&Slot> {
        self.by_date
            .get(&date)
            .map(|slots| slots.iter().filter(|s| s.product == product).collect())
            .unwrap_or_default()
    }

    pub fn find(&self, slot_id: &str) -> Option<(NaiveDate, &Slot)> {
        self.by_date
            .iter()
            .find_map(|(d, slots)| slots.iter().find(|s| s.id == slot_id).map(|s| (*d, s)))
    }

    /// Dates with slots between `today` and `today + 7 days`, ascending.
    pub fn available_dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let max = today
            .checked_add_days(Days::new(BOOKING_WINDOW_DAYS))
            .unwrap_or(NaiveDate::MAX);
        self.by_date.range(today..=max).map(|(d, _)| *d).collect()
    }

    /// The requested date when it has slots, else the first available one.
    pub fn resolve_date(&self, requested: Option<NaiveDate>, today: NaiveDate) -> Option<NaiveDate> {
        match requested {
            Some(d) if self.has_date(d) => Some(d),
            _ => self.available_dates(today).first().copied(),
        }
    }
}

/// A slot can't take bids once it is not `OPEN` or its window has
/// closed. A slot with no readable close time stays bookable.
pub fn is_slot_disabled(slot: &Slot, now: DateTime<Utc>) -> bool {
    if slot.status != SlotStatus::Open {
        return true;
    }
    slot.window_close_at.is_some_and(|close| close <= now)
}

/// First open slot whose window is still running, else the first slot.
pub fn select_slot<'a>(slots: &[&'a Slot], now: DateTime<Utc>) -> Option<&'a Slot> {
    slots
        .iter()
        .find(|s| !is_slot_disabled(s, now))
        .or_else(|| slots.first())
        .copied()
}

/// Where the date/slot picker stands.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionState<'a> {
    /// No listing or no bookable date.
    NoDateSelected,
    /// A date is chosen but the listing has not arrived yet.
    DateSelected { date: NaiveDate },
    /// The date has no slots for the active product.
    SlotsLoaded { date: NaiveDate },
    SlotSelected {
        date: NaiveDate,
        slot: &'a Slot,
        slots: Vec<&'a Slot>,
    },
}

impl<'a> SelectionState<'a> {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::NoDateSelected => None,
            Self::DateSelected { date } | Self::SlotsLoaded { date } | Self::SlotSelected { date, .. } => {
                Some(*date)
            }
        }
    }

    pub fn slot(&self) -> Option<&'a Slot> {
        match self {
            Self::SlotSelected { slot, .. } => Some(*slot),
            _ => None,
        }
    }
}

/// Re-derive the selection from scratch.
///
/// `board` is `None` while the listing is loading. `requested_slot`
/// wins over auto-selection when it names a slot in the filtered list.
pub fn evaluate<'a>(
    board: Option<&'a SlotBoard>,
    requested_date: Option<NaiveDate>,
    requested_slot: Option<&str>,
    product: ProductType,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> SelectionState<'a> {
    let Some(board) = board else {
        return match requested_date {
            Some(date) => SelectionState::DateSelected { date },
            None => SelectionState::NoDateSelected,
        };
    };
    let Some(date) = board.resolve_date(requested_date, today) else {
        return SelectionState::NoDateSelected;
    };
    let slots = board.slots_for(date, product);
    let chosen = requested_slot
        .and_then(|id| slots.iter().copied().find(|s| s.id == id))
        .or_else(|| select_slot(&slots, now));
    match chosen {
        Some(slot) => SelectionState::SlotSelected { date, slot, slots },
        None => SelectionState::SlotsLoaded { date },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, h, m, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn slot(id: &str, product: ProductType, status: SlotStatus, close: Option<DateTime<Utc>>) -> Slot {
        Slot {
            id: id.into(),
            code: None,
            product,
            status,
            time_label: "12:00".into(),
            draw_time: None,
            window_close_at: close,
            bid_price: 1.0,
            winning_prize: None,
        }
    }

    fn board() -> SlotBoard {
        let mut by_date = BTreeMap::new();
        by_date.insert(
            day(17),
            vec![
                slot("ld-early", ProductType::LuckyDraw, SlotStatus::Open, Some(at(3, 45))),
                slot("ld-closed", ProductType::LuckyDraw, SlotStatus::Closed, Some(at(11, 45))),
                slot("ld-late", ProductType::LuckyDraw, SlotStatus::Open, Some(at(11, 45))),
                slot("jp", ProductType::Jackpot, SlotStatus::Open, Some(at(16, 0))),
            ],
        );
        by_date.insert(day(16), vec![slot("old", ProductType::LuckyDraw, SlotStatus::Completed, None)]);
        by_date.insert(day(20), vec![slot("ld-20", ProductType::LuckyDraw, SlotStatus::Open, None)]);
        by_date.insert(day(30), vec![slot("far", ProductType::LuckyDraw, SlotStatus::Open, None)]);
        SlotBoard::new(by_date)
    }

    #[test]
    fn available_dates_span_seven_days_forward() {
        assert_eq!(board().available_dates(day(17)), vec![day(17), day(20)]);
    }

    #[test]
    fn missing_date_falls_back_to_first_available() {
        let b = board();
        assert_eq!(b.resolve_date(Some(day(19)), day(17)), Some(day(17)));
        assert_eq!(b.resolve_date(Some(day(20)), day(17)), Some(day(20)));
        assert_eq!(b.resolve_date(None, day(18)), Some(day(20)));
        assert_eq!(SlotBoard::default().resolve_date(None, day(17)), None);
    }

    #[test]
    fn picks_first_open_slot_with_future_close() {
        let b = board();
        let slots = b.slots_for(day(17), ProductType::LuckyDraw);
        assert_eq!(select_slot(&slots, at(2, 0)).unwrap().id, "ld-early");
        assert_eq!(select_slot(&slots, at(4, 0)).unwrap().id, "ld-late");
    }

    #[test]
    fn falls_back_to_first_slot_when_all_closed() {
        let b = board();
        let slots = b.slots_for(day(17), ProductType::LuckyDraw);
        assert_eq!(select_slot(&slots, at(23, 0)).unwrap().id, "ld-early");
        assert!(select_slot(&[], at(0, 0)).is_none());
    }

    #[test]
    fn disabled_rule() {
        let open = slot("a", ProductType::LuckyDraw, SlotStatus::Open, Some(at(12, 0)));
        assert!(!is_slot_disabled(&open, at(11, 59)));
        assert!(is_slot_disabled(&open, at(12, 0)));
        let cancelled = slot("b", ProductType::LuckyDraw, SlotStatus::Cancelled, None);
        assert!(is_slot_disabled(&cancelled, at(0, 0)));
        let no_close = slot("c", ProductType::LuckyDraw, SlotStatus::Open, None);
        assert!(!is_slot_disabled(&no_close, at(23, 0)));
    }

    #[test]
    fn evaluate_walks_the_states() {
        let b = board();
        assert_eq!(
            evaluate(None, None, None, ProductType::LuckyDraw, at(0, 0), day(17)),
            SelectionState::NoDateSelected
        );
        assert_eq!(
            evaluate(None, Some(day(17)), None, ProductType::LuckyDraw, at(0, 0), day(17)),
            SelectionState::DateSelected { date: day(17) }
        );
        assert_eq!(
            evaluate(Some(&b), Some(day(20)), None, ProductType::Jackpot, at(0, 0), day(17)),
            SelectionState::SlotsLoaded { date: day(20) }
        );

        let state = evaluate(Some(&b), None, None, ProductType::LuckyDraw, at(4, 0), day(17));
        assert_eq!(state.date(), Some(day(17)));
        assert_eq!(state.slot().unwrap().id, "ld-late");

        let state = evaluate(Some(&b), None, Some("ld-closed"), ProductType::LuckyDraw, at(4, 0), day(17));
        assert_eq!(state.slot().unwrap().id, "ld-closed");
    }

    #[test]
    fn from_grouped_skips_bad_keys() {
        let grouped: GroupedSlots = serde_json::from_value(serde_json::json!({
            "2026-10-17": [{ "id": "x", "type": "LD", "status": "OPEN", "slotTimeFormatted": "12:00" }],
            "someday": [{ "id": "y", "type": "LD", "status": "OPEN", "slotTimeFormatted": "12:00" }]
        }))
        .unwrap();
        let b = SlotBoard::from_grouped(grouped);
        assert!(b.has_date(day(17)));
        assert!(b.find("y").is_none());
        assert_eq!(b.find("x").unwrap().0, day(17));
    }
}
