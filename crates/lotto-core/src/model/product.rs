// ── Product types and number ranges ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Smallest number a bettor may pick.
pub const MIN_NUMBER: u8 = 0;
/// Largest number a bettor may pick, for both products.
pub const MAX_NUMBER: u8 = 37;
/// Smallest Lucky Draw quantity.
pub const MIN_COUNT: u32 = 1;
/// Largest Lucky Draw quantity per entry.
pub const MAX_COUNT: u32 = 80;
/// Numbers in one Jackpot combination.
pub const JACKPOT_LEN: usize = 6;

/// The two wager products sold per slot.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum ProductType {
    /// One number plus a quantity of units.
    #[default]
    #[strum(serialize = "LD", serialize = "ld", to_string = "Lucky Draw")]
    LuckyDraw,
    /// A fixed combination of six numbers.
    #[strum(serialize = "JP", serialize = "jp", to_string = "Jackpot")]
    Jackpot,
}

impl ProductType {
    /// Wire code (`LD` / `JP`).
    pub fn code(self) -> &'static str {
        match self {
            Self::LuckyDraw => "LD",
            Self::Jackpot => "JP",
        }
    }
}

impl From<lotto_api::models::SlotType> for ProductType {
    fn from(t: lotto_api::models::SlotType) -> Self {
        match t {
            lotto_api::models::SlotType::LuckyDraw => Self::LuckyDraw,
            lotto_api::models::SlotType::Jackpot => Self::Jackpot,
        }
    }
}

impl From<ProductType> for lotto_api::models::SlotType {
    fn from(p: ProductType) -> Self {
        match p {
            ProductType::LuckyDraw => Self::LuckyDraw,
            ProductType::Jackpot => Self::Jackpot,
        }
    }
}
