use serde::{Deserialize, Serialize};

use crate::Amount;
use crate::model::{CartLine, LineId, LineRef};
use crate::pricing::{PricingConfig, Totals};

/// The cart aggregate: ordered lines plus fields derived from them.
///
/// Serialized as the persisted cart record. Derived fields are written for
/// readers of the record but are recomputed, never trusted, on restore.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    items: Vec<CartLine>,
    #[serde(default)]
    subtotal: Amount,
    #[serde(default, alias = "gst")]
    tax: Amount,
    #[serde(default)]
    delivery_fee: Amount,
    #[serde(default)]
    total: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    promo_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    discount: Option<Amount>,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.items
    }

    pub fn line(&self, id: &LineId) -> Option<&CartLine> {
        self.items.iter().find(|line| &line.id == id)
    }

    pub fn subtotal(&self) -> Amount {
        self.subtotal
    }

    pub fn tax(&self) -> Amount {
        self.tax
    }

    pub fn delivery_fee(&self) -> Amount {
        self.delivery_fee
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn promo_code(&self) -> Option<&str> {
        self.promo_code.as_deref()
    }

    pub fn discount(&self) -> Option<Amount> {
        self.discount
    }

    /// Sum of quantities across all lines, saturating at `u32::MAX`.
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn totals(&self) -> Totals {
        Totals {
            subtotal: self.subtotal,
            tax: self.tax,
            delivery_fee: self.delivery_fee,
            discount: self.discount.unwrap_or_default(),
            total: self.total,
        }
    }

    pub(super) fn contains(&self, id: &LineId) -> bool {
        self.line(id).is_some()
    }

    /// Resolve a reference to the id of an existing line.
    pub(super) fn resolve(&self, line: &LineRef) -> Option<LineId> {
        match line {
            LineRef::Id(id) => self.contains(id).then(|| id.clone()),
            LineRef::Position(pos) => pos
                .checked_sub(1)
                .and_then(|idx| self.items.get(idx))
                .map(|line| line.id.clone()),
        }
    }

    pub(super) fn push(&mut self, line: CartLine) {
        self.items.push(line);
    }

    pub(super) fn remove(&mut self, id: &LineId) -> Option<CartLine> {
        let idx = self.items.iter().position(|line| &line.id == id)?;
        Some(self.items.remove(idx))
    }

    /// Replace a line's quantity in place. `quantity` must be positive.
    pub(super) fn set_quantity(&mut self, id: &LineId, quantity: u32) -> bool {
        match self.items.iter_mut().find(|line| &line.id == id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub(super) fn set_promo(&mut self, code: String, discount: Amount) {
        self.promo_code = Some(code);
        self.discount = Some(discount);
    }

    /// Drop lines a restored record may carry with a zero quantity.
    pub(super) fn drop_empty_lines(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|line| line.quantity > 0);
        before - self.items.len()
    }

    /// Recompute every derived field from the lines and current discount.
    pub(super) fn reprice(&mut self, config: &PricingConfig) {
        let totals = Totals::compute(&self.items, self.discount, config);
        self.subtotal = totals.subtotal;
        self.tax = totals.tax;
        self.delivery_fee = totals.delivery_fee;
        self.total = totals.total;
    }
}
