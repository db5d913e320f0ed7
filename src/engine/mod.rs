//! Cart engine.
//!
//! The engine owns the cart aggregate, applies operations to it and keeps
//! every derived total consistent with the current lines and discount.
//! Each mutation is written through to a [`CartStore`] under a fixed key.
//! Also supports an async stream of operations.

use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::Amount;
use crate::model::{CartLine, LineId, LineRef, NewLine, Operation};
use crate::notice::{Notice, NoticeSink};
use crate::pricing::PricingConfig;
use crate::store::{CART_STORAGE_KEY, CartStore};

mod state;
pub use state::Cart;

mod error;
pub use error::EngineError;

/// Source of millisecond timestamps for line ids.
pub type Clock = Box<dyn FnMut() -> i64 + Send>;

/// What an operation did to the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    LineAdded { id: LineId, name: String },
    /// `line` is `None` when no line matched.
    LineRemoved { line: Option<CartLine> },
    /// `line` is `None` when no line matched.
    QuantityUpdated { line: Option<LineId>, quantity: u32 },
    PromoApplied { code: String, discount: Amount },
    PromoRejected { code: String },
    Cleared,
}

impl Outcome {
    /// `false` only for a rejected promo code.
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::PromoRejected { .. })
    }
}

/// The cart engine.
///
/// Holds the cart, the pricing config and the storage port it persists to.
pub struct CartEngine<S> {
    cart: Cart,
    config: PricingConfig,
    store: S,
    clock: Clock,
    /// Last stamp used in a generated line id
    last_stamp: i64,
}

/// Public API
impl<S: CartStore> CartEngine<S> {
    /// Build an engine, restoring any cart persisted in `store`.
    ///
    /// A missing, unreadable or malformed record yields an empty cart.
    pub fn new(store: S, config: PricingConfig) -> Self {
        let cart = Self::hydrate(&store, &config);
        Self {
            cart,
            config,
            store,
            clock: Box::new(|| jiff::Timestamp::now().as_millisecond()),
            last_stamp: 0,
        }
    }

    /// Replace the line-id clock.
    pub fn with_clock(mut self, clock: impl FnMut() -> i64 + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Run the engine over a stream of operations, reporting notices to `sink`
    pub async fn run(
        &mut self,
        mut stream: impl Stream<Item = Operation> + Unpin,
        sink: &mut impl NoticeSink,
    ) {
        while let Some(op) = stream.next().await {
            // the cart already changed even if the write failed, which `step` logs
            let (outcome, _persisted) = self.step(op);
            if let Some(notice) = Notice::for_outcome(&outcome) {
                sink.notify(notice);
            }
        }
    }

    /// Apply a single operation on top of the current cart
    pub fn apply(&mut self, op: Operation) -> Result<Outcome, EngineError> {
        Self::finish(self.step(op))
    }

    /// Append a new line. Identical candidates always get separate lines.
    pub fn add_line(&mut self, line: NewLine) -> Result<Outcome, EngineError> {
        Self::finish(self.add(line))
    }

    /// Remove a line. A reference to no line leaves the cart unchanged.
    pub fn remove_line(&mut self, line: impl Into<LineRef>) -> Result<Outcome, EngineError> {
        Self::finish(self.remove(line.into()))
    }

    /// Set a line's quantity; zero or negative is the same as removal.
    ///
    /// Quantities above `u32::MAX` are clamped to it.
    pub fn set_quantity(
        &mut self,
        line: impl Into<LineRef>,
        quantity: i64,
    ) -> Result<Outcome, EngineError> {
        Self::finish(self.quantity(line.into(), quantity))
    }

    /// Apply a promo code, replacing any discount already active.
    ///
    /// An unrecognized code leaves the cart untouched and is reported as
    /// [`Outcome::PromoRejected`].
    pub fn apply_promo(&mut self, code: &str) -> Result<Outcome, EngineError> {
        Self::finish(self.promo(code))
    }

    /// Reset to the empty cart and remove the persisted record.
    pub fn clear(&mut self) -> Result<Outcome, EngineError> {
        Self::finish(self.reset())
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Sum of quantities across all lines.
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// What an operation did in memory, and whether it reached the store
type Step = (Outcome, Result<(), EngineError>);

/// Private API
impl<S: CartStore> CartEngine<S> {
    /// Small helper to log `apply` results
    fn log_result(
        op: &str,
        outcome: &Outcome,
        persisted: &Result<(), EngineError>,
        amount: Option<Amount>,
    ) {
        match (outcome, persisted, amount) {
            (_, Err(e), _) => {
                warn!(outcome = ?outcome, reason = %e, "{op} not persisted");
            }
            (Outcome::PromoRejected { code }, Ok(()), _) => {
                info!(code = %code, "{op} skipped");
            }
            (_, Ok(()), Some(amt)) => {
                info!(outcome = ?outcome, amount = %amt, "{op} applied");
            }
            (_, Ok(()), None) => {
                info!(outcome = ?outcome, "{op} applied");
            }
        }
    }

    fn finish((outcome, persisted): Step) -> Result<Outcome, EngineError> {
        persisted.map(|()| outcome)
    }

    fn step(&mut self, op: Operation) -> Step {
        match op {
            Operation::AddLine(line) => self.add(line),
            Operation::RemoveLine(line) => self.remove(line),
            Operation::SetQuantity(line, quantity) => self.quantity(line, quantity),
            Operation::ApplyPromo(code) => self.promo(&code),
            Operation::Clear => self.reset(),
        }
    }

    fn add(&mut self, line: NewLine) -> Step {
        let id = self.next_line_id(&line);
        let line = CartLine::from_new(id.clone(), line);
        let amount = line.amount();
        let outcome = Outcome::LineAdded {
            id,
            name: line.name.clone(),
        };

        self.cart.push(line);
        let persisted = self.commit();
        Self::log_result("add", &outcome, &persisted, Some(amount));
        (outcome, persisted)
    }

    fn remove(&mut self, line: LineRef) -> Step {
        let removed = self
            .cart
            .resolve(&line)
            .and_then(|id| self.cart.remove(&id));

        let amount = removed.as_ref().map(CartLine::amount);
        let outcome = Outcome::LineRemoved { line: removed };
        let persisted = self.commit();
        Self::log_result("remove", &outcome, &persisted, amount);
        (outcome, persisted)
    }

    fn quantity(&mut self, line: LineRef, quantity: i64) -> Step {
        if quantity <= 0 {
            return self.remove(line);
        }
        // larger than any cart can hold; clamp
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        let updated = self
            .cart
            .resolve(&line)
            .filter(|id| self.cart.set_quantity(id, quantity));

        let outcome = Outcome::QuantityUpdated {
            line: updated,
            quantity,
        };
        let persisted = self.commit();
        Self::log_result("quantity", &outcome, &persisted, None);
        (outcome, persisted)
    }

    fn promo(&mut self, code: &str) -> Step {
        let Some((canonical, discount)) = self.config.promos.lookup(code) else {
            let outcome = Outcome::PromoRejected {
                code: code.to_string(),
            };
            Self::log_result("promo", &outcome, &Ok(()), None);
            return (outcome, Ok(()));
        };

        let canonical = canonical.to_string();
        self.cart.set_promo(canonical.clone(), discount);
        let outcome = Outcome::PromoApplied {
            code: canonical,
            discount,
        };
        let persisted = self.commit();
        Self::log_result("promo", &outcome, &persisted, Some(discount));
        (outcome, persisted)
    }

    fn reset(&mut self) -> Step {
        self.cart = Cart::default();
        let outcome = Outcome::Cleared;
        let persisted = self
            .store
            .remove(CART_STORAGE_KEY)
            .map_err(EngineError::from);
        Self::log_result("clear", &outcome, &persisted, None);
        (outcome, persisted)
    }

    /// Restore the persisted cart, falling back to an empty one
    fn hydrate(store: &S, config: &PricingConfig) -> Cart {
        let raw = match store.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Cart::default(),
            Err(e) => {
                warn!(reason = %e, "persisted cart unreadable, starting empty");
                return Cart::default();
            }
        };

        match serde_json::from_str::<Cart>(&raw) {
            Ok(mut cart) => {
                let dropped = cart.drop_empty_lines();
                if dropped > 0 {
                    warn!(dropped, "dropped restored lines with zero quantity");
                }
                // stored totals are not trusted
                cart.reprice(config);
                info!(lines = cart.lines().len(), total = %cart.total(), "cart restored");
                cart
            }
            Err(e) => {
                warn!(reason = %e, "persisted cart malformed, starting empty");
                Cart::default()
            }
        }
    }

    /// Generate `{itemId}-{millis}`, unique within this cart
    fn next_line_id(&mut self, line: &NewLine) -> LineId {
        let mut stamp = (self.clock)().max(self.last_stamp + 1);
        let mut id = LineId::new(format!("{}-{stamp}", line.item_id));
        while self.cart.contains(&id) {
            stamp += 1;
            id = LineId::new(format!("{}-{stamp}", line.item_id));
        }
        self.last_stamp = stamp;
        id
    }

    /// Recompute totals and write the whole cart through to the store
    fn commit(&mut self) -> Result<(), EngineError> {
        self.cart.reprice(&self.config);
        debug!(
            subtotal = %self.cart.subtotal(),
            tax = %self.cart.tax(),
            delivery_fee = %self.cart.delivery_fee(),
            total = %self.cart.total(),
            "cart repriced"
        );

        let record = serde_json::to_string(&self.cart)?;
        self.store.set(CART_STORAGE_KEY, &record)?;
        Ok(())
    }
}
