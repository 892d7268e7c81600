// ── Bid cart manager ──
//
// Two parallel entry lists (Lucky Draw, Jackpot) plus the form that
// feeds them. All views, totals and bulk removals are scoped to one
// product and one partition.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::form::{BidForm, FieldUpdate};
use super::parse::{jackpot_wager, lucky_draw_wagers};
use super::{CartError, ValidationError};
use crate::model::{CartEntry, Customer, EntryId, EntryStatus, PartitionKey, ProductType, Slot, Wager};

/// Where new entries go: a slot on a local date, with its unit price.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotTarget {
    pub slot_id: String,
    pub product: ProductType,
    pub partition: PartitionKey,
    pub price: f64,
}

impl SlotTarget {
    pub fn new(slot: &Slot, date: NaiveDate) -> Self {
        Self {
            slot_id: slot.id.clone(),
            product: slot.product,
            partition: PartitionKey::new(date, slot.time_label.clone()),
            price: slot.bid_price,
        }
    }
}

/// Session-local bid cart.
#[derive(Debug, Default)]
pub struct BidCart {
    lucky_draw: Vec<CartEntry>,
    jackpot: Vec<CartEntry>,
    form: BidForm,
}

impl BidCart {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Form ─────────────────────────────────────────────────────────

    pub fn form(&self) -> &BidForm {
        &self.form
    }

    /// Active product (the form being filled and the list being shown).
    pub fn product(&self) -> ProductType {
        self.form.product()
    }

    /// Switch the active product. Any in-progress edit is dropped.
    pub fn set_product(&mut self, product: ProductType) {
        self.form.set_product(product);
    }

    pub fn update(&mut self, update: FieldUpdate) -> Result<(), CartError> {
        self.form.apply(update)
    }

    /// Clear the form and the editing marker.
    pub fn reset_form(&mut self) {
        self.form.reset();
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Validate the active form and add its entries to `target`.
    ///
    /// In add mode every number/count pair becomes one new entry. With an
    /// entry loaded for editing, that entry is replaced in place. A
    /// validation failure records the field error and adds nothing. On
    /// success the form is reset.
    pub fn add_entries(&mut self, target: &SlotTarget) -> Result<Vec<EntryId>, CartError> {
        let product = self.form.product();
        let editing = self.form.editing();
        if target.product != product {
            return Err(CartError::ProductMismatch {
                form: product,
                slot: target.product,
            });
        }

        let parsed: Result<(Customer, Vec<Wager>), ValidationError> = match product {
            ProductType::LuckyDraw => lucky_draw_wagers(&self.form.lucky, editing.is_some()),
            ProductType::Jackpot => jackpot_wager(&self.form.jackpot).map(|(c, w)| (c, vec![w])),
        };
        let (customer, wagers) = match parsed {
            Ok(ok) => ok,
            Err(e) => {
                debug!(field = %e.field, message = %e.message, "cart input rejected");
                self.form.set_error(e.field, e.message.clone());
                return Err(e.into());
            }
        };

        let ids = if let Some(id) = editing {
            let wager = wagers
                .into_iter()
                .next()
                .ok_or(CartError::EntryNotFound(id))?;
            let entry = self
                .list_mut(product)
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or(CartError::EntryNotFound(id))?;
            if entry.status.is_submitted() {
                self.form.reset();
                return Err(CartError::AlreadySubmitted(id));
            }
            entry.slot_id.clone_from(&target.slot_id);
            entry.customer = customer;
            entry.wager = wager;
            entry.partition = target.partition.clone();
            debug!(%id, partition = %target.partition, "cart entry replaced");
            vec![id]
        } else {
            let new_entries: Vec<CartEntry> = wagers
                .into_iter()
                .map(|wager| CartEntry {
                    id: EntryId::new(),
                    slot_id: target.slot_id.clone(),
                    customer: customer.clone(),
                    wager,
                    partition: target.partition.clone(),
                    status: EntryStatus::Pending,
                })
                .collect();
            let ids = new_entries.iter().map(|e| e.id).collect::<Vec<_>>();
            debug!(count = ids.len(), partition = %target.partition, %product, "cart entries added");
            self.list_mut(product).extend(new_entries);
            ids
        };

        self.form.reset();
        Ok(ids)
    }

    /// Load an entry into the form for editing. The entry stays in the
    /// cart until the form is resubmitted.
    pub fn edit_entry(&mut self, id: EntryId) -> Result<(), CartError> {
        let entry = self.get(id).ok_or(CartError::EntryNotFound(id))?;
        if entry.status.is_submitted() {
            return Err(CartError::AlreadySubmitted(id));
        }
        let entry = entry.clone();
        self.form.load(&entry);
        debug!(%id, "cart entry loaded for editing");
        Ok(())
    }

    /// Remove one entry. Deleting the entry being edited resets the form.
    pub fn delete_entry(&mut self, id: EntryId) -> Result<CartEntry, CartError> {
        let removed = [ProductType::LuckyDraw, ProductType::Jackpot]
            .into_iter()
            .find_map(|p| {
                let list = self.list_mut(p);
                list.iter()
                    .position(|e| e.id == id)
                    .map(|idx| list.remove(idx))
            })
            .ok_or(CartError::EntryNotFound(id))?;
        if self.form.editing() == Some(id) {
            self.form.reset();
        }
        debug!(%id, "cart entry deleted");
        Ok(removed)
    }

    /// Remove every `product` entry in `key`'s partition. Returns how
    /// many were removed; other partitions are untouched.
    pub fn clear_partition(&mut self, product: ProductType, key: &PartitionKey) -> usize {
        let list = self.list_mut(product);
        let before = list.len();
        list.retain(|e| &e.partition != key);
        let removed = before - list.len();
        if self.form.editing().is_some_and(|id| self.get(id).is_none()) {
            self.form.reset();
        }
        info!(%product, partition = %key, removed, "cart partition cleared");
        removed
    }

    /// Record that the server accepted an entry. An accepted entry can
    /// no longer be edited, so a form holding it is reset.
    pub(crate) fn mark_submitted(&mut self, id: EntryId, bid_id: String) {
        for list in [&mut self.lucky_draw, &mut self.jackpot] {
            if let Some(entry) = list.iter_mut().find(|e| e.id == id) {
                entry.status = EntryStatus::Submitted { bid_id };
                break;
            }
        }
        if self.form.editing() == Some(id) {
            debug!(%id, "edited entry was accepted; form reset");
            self.form.reset();
        }
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn get(&self, id: EntryId) -> Option<&CartEntry> {
        self.lucky_draw
            .iter()
            .chain(&self.jackpot)
            .find(|e| e.id == id)
    }

    /// Entries of `product` in `key`'s partition, in insertion order.
    pub fn partition(&self, product: ProductType, key: &PartitionKey) -> Vec<&CartEntry> {
        self.list(product)
            .iter()
            .filter(|e| &e.partition == key)
            .collect()
    }

    /// Amount due for a partition: sum of units times the slot's unit
    /// price. Plain `f64` arithmetic, no currency rounding.
    pub fn total(&self, product: ProductType, key: &PartitionKey, price: f64) -> f64 {
        self.list(product)
            .iter()
            .filter(|e| &e.partition == key)
            .map(|e| f64::from(e.wager.units()) * price)
            .sum()
    }

    /// Entries across both products and all partitions.
    pub fn len(&self) -> usize {
        self.lucky_draw.len() + self.jackpot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries not yet accepted by the server, across all partitions.
    pub fn pending(&self) -> usize {
        self.lucky_draw
            .iter()
            .chain(&self.jackpot)
            .filter(|e| !e.status.is_submitted())
            .count()
    }

    fn list(&self, product: ProductType) -> &Vec<CartEntry> {
        match product {
            ProductType::LuckyDraw => &self.lucky_draw,
            ProductType::Jackpot => &self.jackpot,
        }
    }

    fn list_mut(&mut self, product: ProductType) -> &mut Vec<CartEntry> {
        match product {
            ProductType::LuckyDraw => &mut self.lucky_draw,
            ProductType::Jackpot => &mut self.jackpot,
        }
    }
}
