// ── Domain model ──
//
// Canonical types shared by the cart, the reconciler and slot selection.
// Wire shapes stay in `lotto_api::models`; conversions live next to the
// domain type they produce.

pub mod entry;
pub mod product;
pub mod result;
pub mod slot;

pub use entry::{CartEntry, Customer, EntryId, EntryStatus, PartitionKey, Wager};
pub use product::{JACKPOT_LEN, MAX_COUNT, MAX_NUMBER, MIN_COUNT, MIN_NUMBER, ProductType};
pub use result::{DrawResult, winning_display};
pub use slot::{Slot, SlotStatus};
