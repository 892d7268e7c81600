// ── Bid cart ──
//
// Session-local wager collection: form state, batch parsing and
// validation, and the partition-scoped cart itself. Nothing in here
// touches the network; submission lives in `crate::submit`.

pub mod form;
pub mod manager;
pub mod parse;

use thiserror::Error;

pub use form::{BidForm, FieldUpdate, FormField, JackpotForm, LuckyDrawForm};
pub use manager::{BidCart, SlotTarget};

use crate::model::{EntryId, ProductType};

/// A field-level validation failure. The whole submission is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: FormField,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors from cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No cart entry with id {0}")]
    EntryNotFound(EntryId),

    #[error("Entry {0} was already accepted by the server and cannot be edited")]
    AlreadySubmitted(EntryId),

    #[error("The {form} form cannot add to a {slot} slot")]
    ProductMismatch {
        form: ProductType,
        slot: ProductType,
    },

    #[error("Jackpot position {0} is out of range (expected 0-5)")]
    PositionOutOfRange(usize),
}
