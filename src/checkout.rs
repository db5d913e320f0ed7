//! Order placement over the cart engine.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::Amount;
use crate::engine::{CartEngine, EngineError};
use crate::store::CartStore;

/// Errors that block an order from being placed
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    Upi,
    Card,
    CashOnDelivery,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::Card => "card",
            PaymentMethod::CashOnDelivery => "cod",
        })
    }
}

/// Delivery details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub pincode: String,
    /// Optional delivery instructions.
    pub instructions: String,
}

impl CheckoutForm {
    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("pincode", &self.pincode),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn validate(&self) -> Result<(), CheckoutError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::MissingFields(missing))
        }
    }
}

/// A placed order, captured before the cart is cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub total: Amount,
    pub item_count: u32,
    pub payment: PaymentMethod,
}

/// Validate the form, confirm the order and clear the cart.
///
/// On any validation failure the cart is left untouched. Once validated the
/// order stands; a failure to remove the persisted record is only logged.
pub fn place_order<S: CartStore>(
    engine: &mut CartEngine<S>,
    form: &CheckoutForm,
    payment: PaymentMethod,
) -> Result<OrderConfirmation, CheckoutError> {
    if engine.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    form.validate()?;

    let order = OrderConfirmation {
        total: engine.cart().total(),
        item_count: engine.item_count(),
        payment,
    };
    if let Err(e) = engine.clear() {
        warn!(reason = %e, "placed order's cart record not removed");
    }

    info!(
        total = %order.total,
        items = order.item_count,
        payment = %order.payment,
        "order placed"
    );
    Ok(order)
}
