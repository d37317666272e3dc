//! Product Fixtures

use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    pricing::money_from_decimal,
    products::{Product, ProductId},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: u32,

    /// Product title
    pub title: String,

    /// Product price (e.g., "99.99 USD")
    pub price: String,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Category name
    pub category: String,

    /// Description text
    #[serde(default)]
    pub description: String,

    /// Rating (e.g., "4.5")
    pub rating: String,

    /// Stock flag
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,
}

fn in_stock_default() -> bool {
    true
}

impl TryFrom<ProductFixture> for Product {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;

        if minor_units < 0 {
            return Err(FixtureError::InvalidPrice(fixture.price));
        }

        let rating = parse_rating(fixture.id, &fixture.rating)?;

        Ok(Product {
            id: ProductId::new(fixture.id),
            title: fixture.title,
            price: Money::from_minor(minor_units, currency),
            image: fixture.image,
            category: fixture.category,
            description: fixture.description,
            rating,
            in_stock: fixture.in_stock,
        })
    }
}

/// Parse price string (e.g., "99.99 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = parse_currency(currency_code)?;

    let minor_units = money_from_decimal(amount, currency)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .to_minor_units();

    Ok((minor_units, currency))
}

/// Resolve an ISO currency code supported by the fixtures.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for any other code.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

fn parse_rating(id: u32, s: &str) -> Result<Decimal, FixtureError> {
    let rating = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidRating(id, s.to_string()))?;

    if rating < Decimal::ZERO || rating > Decimal::from(5) {
        return Err(FixtureError::InvalidRating(id, s.to_string()));
    }

    Ok(rating)
}
