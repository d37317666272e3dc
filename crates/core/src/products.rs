//! Products

use std::{fmt, num::ParseIntError, str::FromStr};

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Product identifier, unique within a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    /// Create a product id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw numeric id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl FromStr for ProductId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Display title
    pub title: String,

    /// Shelf price
    pub price: Money<'static, Currency>,

    /// Image URL, may be empty
    pub image: String,

    /// Category name
    pub category: String,

    /// Long description
    pub description: String,

    /// Average rating between 0 and 5
    pub rating: Decimal,

    /// Whether the product can be purchased
    pub in_stock: bool,
}

impl Product {
    /// Image URL, falling back to a generated placeholder when none is set.
    #[must_use]
    pub fn image_url(&self) -> String {
        image_or_placeholder(&self.image, self.id)
    }
}

/// Placeholder image URL for a product.
#[must_use]
pub fn placeholder_image(id: ProductId) -> String {
    format!("https://picsum.photos/seed/product-{id}/300/300")
}

pub(crate) fn image_or_placeholder(image: &str, id: ProductId) -> String {
    if image.trim().is_empty() {
        placeholder_image(id)
    } else {
        image.to_string()
    }
}
