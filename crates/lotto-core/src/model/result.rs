// ── Draw results ──

use serde::{Deserialize, Serialize};

use lotto_api::models::ResultSlot;

use super::product::ProductType;

/// Published outcome of one slot's draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResult {
    pub slot_id: String,
    pub code: Option<String>,
    pub product: ProductType,
    /// Local date and time labels as the server formats them.
    pub date: String,
    pub time: String,
    pub winning_number: Option<u8>,
    pub winning_combo: Option<Vec<u8>>,
}

impl DrawResult {
    /// Whether a winner has actually been announced.
    pub fn is_announced(&self) -> bool {
        match self.product {
            ProductType::LuckyDraw => self.winning_number.is_some(),
            ProductType::Jackpot => self.winning_combo.as_ref().is_some_and(|c| !c.is_empty()),
        }
    }

    /// Winner as shown on a results board: two-digit number, dashed
    /// combination, or `??` while unknown.
    pub fn display(&self) -> String {
        match self.product {
            ProductType::LuckyDraw => winning_display(self.winning_number),
            ProductType::Jackpot => match &self.winning_combo {
                Some(combo) if !combo.is_empty() => combo
                    .iter()
                    .map(|n| format!("{n:02}"))
                    .collect::<Vec<_>>()
                    .join("-"),
                _ => "??".to_owned(),
            },
        }
    }
}

/// Two-digit zero-padded winning number, `??` when unknown.
pub fn winning_display(number: Option<u8>) -> String {
    number.map_or_else(|| "??".to_owned(), |n| format!("{n:02}"))
}

impl From<ResultSlot> for DrawResult {
    fn from(r: ResultSlot) -> Self {
        Self {
            slot_id: r.slot_id,
            code: r.unique_slot_id,
            product: r.slot_type.into(),
            date: r.date,
            time: r.time,
            winning_number: r.winning_number,
            winning_combo: r.winning_combo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(product: ProductType) -> DrawResult {
        DrawResult {
            slot_id: "s".into(),
            code: None,
            product,
            date: "2026-10-17".into(),
            time: "8:00PM".into(),
            winning_number: None,
            winning_combo: None,
        }
    }

    #[test]
    fn unknown_winner_shows_question_marks() {
        assert_eq!(winning_display(None), "??");
        assert_eq!(result(ProductType::LuckyDraw).display(), "??");
        assert!(!result(ProductType::Jackpot).is_announced());
    }

    #[test]
    fn numbers_are_zero_padded() {
        assert_eq!(winning_display(Some(0)), "00");
        assert_eq!(winning_display(Some(7)), "07");
        let mut jp = result(ProductType::Jackpot);
        jp.winning_combo = Some(vec![6, 19, 22, 1, 30, 2]);
        assert_eq!(jp.display(), "06-19-22-01-30-02");
        assert!(jp.is_announced());
    }
}
