//! Core domain types for the cart engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Amount;

/// Unique cart line identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pizza size code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SizeCode {
    #[serde(rename = "R")]
    Regular,
    #[default]
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
}

impl SizeCode {
    pub const ALL: [SizeCode; 3] = [SizeCode::Regular, SizeCode::Medium, SizeCode::Large];

    pub fn code(self) -> &'static str {
        match self {
            SizeCode::Regular => "R",
            SizeCode::Medium => "M",
            SizeCode::Large => "L",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SizeCode::Regular => "Regular",
            SizeCode::Medium => "Medium",
            SizeCode::Large => "Large",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SizeCode::Regular => "7 inch",
            SizeCode::Medium => "9 inch",
            SizeCode::Large => "12 inch",
        }
    }
}

impl fmt::Display for SizeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown size code '{0}'")]
pub struct UnknownSize(pub String);

impl FromStr for SizeCode {
    type Err = UnknownSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "R" | "r" => Ok(SizeCode::Regular),
            "M" | "m" => Ok(SizeCode::Medium),
            "L" | "l" => Ok(SizeCode::Large),
            other => Err(UnknownSize(other.to_string())),
        }
    }
}

/// Toppings split across the two halves of a pizza.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HalfAndHalf {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

/// Per-line customization record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customizations {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub toppings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_and_half: Option<HalfAndHalf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crust: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Customizations {
    pub fn with_toppings(toppings: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            toppings: toppings.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// An add-to-cart candidate, already resolved from the catalog by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLine {
    pub item_id: ItemId,
    pub name: String,
    /// Unit price including any per-unit customization surcharge.
    pub price: Amount,
    pub quantity: u32,
    pub size: Option<SizeCode>,
    pub customizations: Option<Customizations>,
    pub image: String,
}

impl NewLine {
    /// Create a candidate with quantity 1 and no customization.
    pub fn new(item_id: impl Into<String>, name: impl Into<String>, price: Amount) -> Self {
        Self {
            item_id: ItemId::new(item_id),
            name: name.into(),
            price,
            quantity: 1,
            size: None,
            customizations: None,
            image: String::new(),
        }
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn size(mut self, size: SizeCode) -> Self {
        self.size = Some(size);
        self
    }

    pub fn customizations(mut self, customizations: Customizations) -> Self {
        self.customizations = Some(customizations);
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// One entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: LineId,
    pub item_id: ItemId,
    pub name: String,
    pub price: Amount,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customizations: Option<Customizations>,
    #[serde(default)]
    pub image: String,
}

impl CartLine {
    /// Snapshot a candidate into a line. A zero quantity is raised to 1.
    pub fn from_new(id: LineId, line: NewLine) -> Self {
        Self {
            id,
            item_id: line.item_id,
            name: line.name,
            price: line.price,
            quantity: line.quantity.max(1),
            size: line.size,
            customizations: line.customizations,
            image: line.image,
        }
    }

    /// Unit price times quantity.
    pub fn amount(&self) -> Amount {
        self.price.times(self.quantity)
    }
}

/// How an operation points at a cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRef {
    /// Exact generated line id.
    Id(LineId),
    /// 1-based position in the cart's insertion order.
    Position(usize),
}

impl From<LineId> for LineRef {
    fn from(id: LineId) -> Self {
        LineRef::Id(id)
    }
}

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineRef::Id(id) => write!(f, "{id}"),
            LineRef::Position(pos) => write!(f, "#{pos}"),
        }
    }
}

/// An operation representing the possible inputs of the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Append a new line.
    AddLine(NewLine),
    /// Remove a line; no-op if it does not exist.
    RemoveLine(LineRef),
    /// Replace a line's quantity; zero or negative removes the line.
    SetQuantity(LineRef, i64),
    /// Apply a promo code, replacing any active discount.
    ApplyPromo(String),
    /// Reset to the empty cart and erase the persisted record.
    Clear,
}
