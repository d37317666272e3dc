//! Fixtures

use thiserror::Error;

pub mod products;

/// Bundled sample product fixture.
pub const SAMPLE_PRODUCTS_YAML: &str = include_str!("../../../../fixtures/products/sample.yml");

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid rating value
    #[error("Invalid rating for product {0}: {1}")]
    InvalidRating(u32, String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Two products share an id
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(u32),

    /// No products loaded
    #[error("No products in fixture; currency unknown")]
    NoProducts,
}
