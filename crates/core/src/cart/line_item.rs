//! Cart line items

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::{
    pricing::{TotalPriceError, line_total, money_from_decimal, money_to_decimal},
    products::{Product, ProductId, image_or_placeholder},
};

/// One product's entry in the cart, with title, price and image captured when
/// the product was first added.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    id: ProductId,
    title: String,
    price: Money<'static, Currency>,
    image: String,
    quantity: u32,
}

impl LineItem {
    /// Snapshot a product into a new line item.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        }
    }

    /// Product id
    #[must_use]
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Title at add time
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Unit price at add time
    #[must_use]
    pub fn price(&self) -> &Money<'static, Currency> {
        &self.price
    }

    /// Image at add time
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Image URL, falling back to a placeholder when none was captured.
    #[must_use]
    pub fn image_url(&self) -> String {
        image_or_placeholder(&self.image, self.id)
    }

    /// Quantity, always at least one
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns [`TotalPriceError::Overflow`] if the total does not fit in minor units.
    pub fn total(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        line_total(&self.price, self.quantity)
    }

    /// Persisted form of this line.
    #[must_use]
    pub fn to_stored(&self) -> StoredLineItem {
        StoredLineItem {
            id: self.id,
            title: self.title.clone(),
            price: money_to_decimal(&self.price),
            image: self.image.clone(),
            quantity: self.quantity,
        }
    }

    /// Rebuild a line from its persisted form. Lines with a zero quantity or a
    /// price that does not fit the currency are dropped.
    #[must_use]
    pub fn from_stored(stored: StoredLineItem, currency: &'static Currency) -> Option<Self> {
        if stored.quantity == 0 {
            return None;
        }

        let price = money_from_decimal(stored.price, currency)?;

        Some(Self {
            id: stored.id,
            title: stored.title,
            price,
            image: stored.image,
            quantity: stored.quantity,
        })
    }
}

/// JSON shape of a line item in the blob store:
/// `{"id":1,"title":"…","price":99.99,"image":"…","quantity":3}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLineItem {
    /// Product id
    pub id: ProductId,

    /// Title snapshot
    pub title: String,

    /// Unit price snapshot in major units
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Image snapshot
    #[serde(default)]
    pub image: String,

    /// Quantity
    pub quantity: u32,
}
