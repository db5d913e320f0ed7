//! Economic constants, the promo table and the pricing function.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Amount;
use crate::model::CartLine;

/// Errors that can occur when loading a pricing configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read pricing config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid pricing config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Recognized promo codes, keyed by their canonical upper-case form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Amount>", into = "BTreeMap<String, Amount>")]
pub struct PromoTable {
    codes: BTreeMap<String, Amount>,
}

impl PromoTable {
    pub fn new(codes: impl IntoIterator<Item = (impl AsRef<str>, Amount)>) -> Self {
        Self {
            codes: codes
                .into_iter()
                .map(|(code, discount)| (canonical(code.as_ref()), discount))
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            codes: BTreeMap::new(),
        }
    }

    /// Case-insensitive lookup returning the canonical code and its discount.
    pub fn lookup(&self, code: &str) -> Option<(&str, Amount)> {
        self.codes
            .get_key_value(&canonical(code))
            .map(|(code, discount)| (code.as_str(), *discount))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for PromoTable {
    /// The three demo codes.
    fn default() -> Self {
        Self::new([
            ("FIRST50", Amount::from_whole(50)),
            ("SAVE100", Amount::from_whole(100)),
            ("WELCOME", Amount::from_whole(75)),
        ])
    }
}

impl From<BTreeMap<String, Amount>> for PromoTable {
    fn from(codes: BTreeMap<String, Amount>) -> Self {
        Self::new(codes)
    }
}

impl From<PromoTable> for BTreeMap<String, Amount> {
    fn from(table: PromoTable) -> Self {
        table.codes
    }
}

fn canonical(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Tax, delivery and promo settings applied on every recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingConfig {
    /// Tax rate in basis points (500 = 5%).
    pub tax_rate_bps: u32,
    pub delivery_fee: Amount,
    /// Subtotals at or above this ship free.
    pub free_delivery_threshold: Amount,
    pub promos: PromoTable,
}

impl PricingConfig {
    pub const TAX_RATE_BPS: u32 = 500;
    pub const DELIVERY_FEE: Amount = Amount::from_whole(49);
    pub const FREE_DELIVERY_THRESHOLD: Amount = Amount::from_whole(299);

    /// Load a config from a JSON file; absent fields keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn delivery_fee_for(&self, subtotal: Amount) -> Amount {
        if subtotal >= self.free_delivery_threshold {
            Amount::ZERO
        } else {
            self.delivery_fee
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate_bps: Self::TAX_RATE_BPS,
            delivery_fee: Self::DELIVERY_FEE,
            free_delivery_threshold: Self::FREE_DELIVERY_THRESHOLD,
            promos: PromoTable::default(),
        }
    }
}

/// Derived monetary fields of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub subtotal: Amount,
    pub tax: Amount,
    pub delivery_fee: Amount,
    pub discount: Amount,
    pub total: Amount,
}

impl Totals {
    /// The one pricing function: every derived field comes from here.
    ///
    /// A cart with no lines has nothing to deliver, so it carries no delivery
    /// fee and recomputing an empty cart yields the empty-cart state.
    pub fn compute(lines: &[CartLine], discount: Option<Amount>, config: &PricingConfig) -> Self {
        let subtotal: Amount = lines.iter().map(CartLine::amount).sum();
        let tax = subtotal.rate(config.tax_rate_bps);
        let delivery_fee = if lines.is_empty() {
            Amount::ZERO
        } else {
            config.delivery_fee_for(subtotal)
        };
        let discount = discount.unwrap_or_default();

        Self {
            subtotal,
            tax,
            delivery_fee,
            discount,
            total: subtotal + tax + delivery_fee - discount,
        }
    }
}
