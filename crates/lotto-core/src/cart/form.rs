// ── Form state ──
//
// Typed form model for the add/edit panel. Input is kept as the raw
// text the user typed; parsing happens on submit in `parse`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::Display;

use super::CartError;
use crate::model::{CartEntry, EntryId, JACKPOT_LEN, ProductType, Wager};

/// Fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display)]
pub enum FormField {
    #[strum(to_string = "customer name")]
    CustomerName,
    #[strum(to_string = "customer phone")]
    CustomerPhone,
    #[strum(to_string = "bid number")]
    Numbers,
    #[strum(to_string = "bid count")]
    Counts,
}

/// One edit to the active form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    CustomerName(String),
    CustomerPhone(String),
    /// Lucky Draw number text, `#`-separated in add mode.
    Numbers(String),
    /// Lucky Draw count text, `#`-separated in add mode.
    Counts(String),
    /// One position of the Jackpot combination.
    JackpotNumber { index: usize, value: String },
}

impl FieldUpdate {
    pub fn field(&self) -> FormField {
        match self {
            Self::CustomerName(_) => FormField::CustomerName,
            Self::CustomerPhone(_) => FormField::CustomerPhone,
            Self::Numbers(_) | Self::JackpotNumber { .. } => FormField::Numbers,
            Self::Counts(_) => FormField::Counts,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LuckyDrawForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub numbers: String,
    pub counts: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JackpotForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub numbers: [String; JACKPOT_LEN],
}

/// Both product forms, the entry being edited, and per-field errors.
#[derive(Debug, Clone, Default)]
pub struct BidForm {
    product: ProductType,
    pub(crate) lucky: LuckyDrawForm,
    pub(crate) jackpot: JackpotForm,
    editing: Option<EntryId>,
    errors: BTreeMap<FormField, String>,
}

impl BidForm {
    pub fn product(&self) -> ProductType {
        self.product
    }

    pub fn lucky_draw(&self) -> &LuckyDrawForm {
        &self.lucky
    }

    pub fn jackpot(&self) -> &JackpotForm {
        &self.jackpot
    }

    /// Entry currently loaded for editing, if any.
    pub fn editing(&self) -> Option<EntryId> {
        self.editing
    }

    pub fn error(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// Switch product. Drops any in-progress edit.
    pub(crate) fn set_product(&mut self, product: ProductType) {
        if self.product != product {
            self.reset();
            self.product = product;
        }
    }

    /// Apply one field edit to the active product's form and clear that
    /// field's error.
    pub fn apply(&mut self, update: FieldUpdate) -> Result<(), CartError> {
        let field = update.field();
        match (self.product, update) {
            (ProductType::LuckyDraw, FieldUpdate::CustomerName(v)) => self.lucky.customer_name = v,
            (ProductType::LuckyDraw, FieldUpdate::CustomerPhone(v)) => {
                self.lucky.customer_phone = v;
            }
            (ProductType::LuckyDraw, FieldUpdate::Numbers(v)) => self.lucky.numbers = v,
            (ProductType::LuckyDraw, FieldUpdate::Counts(v)) => self.lucky.counts = v,
            (ProductType::Jackpot, FieldUpdate::CustomerName(v)) => self.jackpot.customer_name = v,
            (ProductType::Jackpot, FieldUpdate::CustomerPhone(v)) => {
                self.jackpot.customer_phone = v;
            }
            (ProductType::Jackpot, FieldUpdate::JackpotNumber { index, value }) => {
                let slot = self
                    .jackpot
                    .numbers
                    .get_mut(index)
                    .ok_or(CartError::PositionOutOfRange(index))?;
                *slot = value;
            }
            // Lucky Draw fields on the Jackpot form and vice versa have
            // nowhere to go.
            (ProductType::Jackpot, FieldUpdate::Numbers(_) | FieldUpdate::Counts(_))
            | (ProductType::LuckyDraw, FieldUpdate::JackpotNumber { .. }) => return Ok(()),
        }
        self.errors.remove(&field);
        Ok(())
    }

    /// Clear both forms, all errors and the editing marker.
    pub fn reset(&mut self) {
        self.lucky = LuckyDrawForm::default();
        self.jackpot = JackpotForm::default();
        self.editing = None;
        self.errors.clear();
    }

    pub(crate) fn set_error(&mut self, field: FormField, message: String) {
        self.errors.insert(field, message);
    }

    /// Load an entry's fields back into the matching form.
    pub(crate) fn load(&mut self, entry: &CartEntry) {
        self.set_product(entry.product());
        self.errors.clear();
        match &entry.wager {
            Wager::LuckyDraw { number, count } => {
                self.lucky = LuckyDrawForm {
                    customer_name: entry.customer.name.clone(),
                    customer_phone: entry.customer.phone.clone(),
                    numbers: number.to_string(),
                    counts: count.to_string(),
                };
            }
            Wager::Jackpot { numbers } => {
                self.jackpot = JackpotForm {
                    customer_name: entry.customer.name.clone(),
                    customer_phone: entry.customer.phone.clone(),
                    numbers: numbers.map(|n| n.to_string()),
                };
            }
        }
        self.editing = Some(entry.id);
    }
}
