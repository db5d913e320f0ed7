//! User-facing notifications.
//!
//! The engine never displays anything; it returns an [`Outcome`] and this
//! module decides what, if anything, the user should see.

use tracing::{info, warn};

use crate::checkout::{CheckoutError, OrderConfirmation};
use crate::engine::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Destructive,
}

/// A transient message: title, description and severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    /// Quantity updates and clears are silent.
    pub fn for_outcome(outcome: &Outcome) -> Option<Self> {
        match outcome {
            Outcome::LineAdded { name, .. } => Some(Self::info(
                "Added to cart",
                format!("{name} has been added to your cart"),
            )),
            Outcome::LineRemoved { .. } => Some(Self::info(
                "Removed from cart",
                "Item has been removed from your cart",
            )),
            Outcome::PromoApplied { discount, .. } => {
                let saved = match discount.as_whole() {
                    Some(whole) => whole.to_string(),
                    None => discount.to_string(),
                };
                Some(Self::info("Promo applied!", format!("You saved ₹{saved}")))
            }
            Outcome::PromoRejected { .. } => Some(Self::destructive(
                "Invalid promo code",
                "Please check the code and try again",
            )),
            Outcome::QuantityUpdated { .. } | Outcome::Cleared => None,
        }
    }

    pub fn order_placed(order: &OrderConfirmation) -> Self {
        Self::info(
            "Order placed!",
            format!(
                "Your order of ₹{} has been confirmed. Track your order in the Track Order page.",
                order.total
            ),
        )
    }

    pub fn for_checkout_error(error: &CheckoutError) -> Self {
        match error {
            CheckoutError::EmptyCart => {
                Self::destructive("Cart is empty", "Add something to your cart first")
            }
            CheckoutError::MissingFields(_) => {
                Self::destructive("Missing information", "Please fill in all required fields")
            }
            CheckoutError::Engine(_) => {
                Self::destructive("Order failed", "Your order could not be completed")
            }
        }
    }
}

/// Destination for notices.
pub trait NoticeSink {
    fn notify(&mut self, notice: Notice);
}

/// Collects notices, mostly for tests.
impl NoticeSink for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// Emits notices as log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NoticeSink for TracingSink {
    fn notify(&mut self, notice: Notice) {
        match notice.severity {
            Severity::Info => info!(title = %notice.title, "{}", notice.description),
            Severity::Destructive => warn!(title = %notice.title, "{}", notice.description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Amount;
    use crate::checkout::PaymentMethod;
    use crate::model::LineId;

    #[test]
    fn added_names_the_item() {
        let notice = Notice::for_outcome(&Outcome::LineAdded {
            id: LineId::new("coke-1"),
            name: "Coca Cola".to_string(),
        })
        .unwrap();
        assert_eq!(notice.title, "Added to cart");
        assert_eq!(notice.description, "Coca Cola has been added to your cart");
        assert_eq!(notice.severity, Severity::Info);
    }

    #[test]
    fn removed_is_reported_even_without_a_match() {
        let notice = Notice::for_outcome(&Outcome::LineRemoved { line: None }).unwrap();
        assert_eq!(notice.title, "Removed from cart");
    }

    #[test]
    fn promo_applied_names_the_discount() {
        let notice = Notice::for_outcome(&Outcome::PromoApplied {
            code: "FIRST50".to_string(),
            discount: Amount::from_whole(50),
        })
        .unwrap();
        assert_eq!(notice.title, "Promo applied!");
        assert_eq!(notice.description, "You saved ₹50");
    }

    #[test]
    fn fractional_discount_keeps_decimals() {
        let notice = Notice::for_outcome(&Outcome::PromoApplied {
            code: "HALF".to_string(),
            discount: Amount::from_float(12.5),
        })
        .unwrap();
        assert_eq!(notice.description, "You saved ₹12.50");
    }

    #[test]
    fn promo_rejected_is_destructive() {
        let notice = Notice::for_outcome(&Outcome::PromoRejected {
            code: "BOGUS".to_string(),
        })
        .unwrap();
        assert_eq!(notice.title, "Invalid promo code");
        assert_eq!(notice.severity, Severity::Destructive);
    }

    #[test]
    fn quantity_and_clear_are_silent() {
        let quantity = Outcome::QuantityUpdated {
            line: None,
            quantity: 2,
        };
        assert_eq!(Notice::for_outcome(&quantity), None);
        assert_eq!(Notice::for_outcome(&Outcome::Cleared), None);
    }

    #[test]
    fn order_placed_shows_total() {
        let order = OrderConfirmation {
            total: Amount::from_float(324.45),
            item_count: 2,
            payment: PaymentMethod::Upi,
        };
        let notice = Notice::order_placed(&order);
        assert_eq!(notice.title, "Order placed!");
        assert!(notice.description.starts_with("Your order of ₹324.45 has been confirmed."));
    }

    #[test]
    fn missing_fields_notice() {
        let notice = Notice::for_checkout_error(&CheckoutError::MissingFields(vec!["email"]));
        assert_eq!(notice.title, "Missing information");
        assert_eq!(notice.severity, Severity::Destructive);
    }

    #[test]
    fn vec_sink_collects() {
        let mut sink: Vec<Notice> = Vec::new();
        sink.notify(Notice::info("a", "b"));
        TracingSink.notify(Notice::destructive("c", "d"));
        assert_eq!(sink.len(), 1);
    }
}
