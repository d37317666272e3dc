//! Catalog
//!
//! Read-only queries over the product list. Every lookup is a linear scan in
//! catalog order; nothing here mutates the products.

use std::{cmp::Ordering, str::FromStr};

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    fixtures::{FixtureError, SAMPLE_PRODUCTS_YAML, products::ProductsFixture},
    products::{Product, ProductId},
};

/// Minimum rating (4.3) for a product to be featured.
pub const FEATURED_MIN_RATING: Decimal = Decimal::from_parts(43, 0, 0, false, 1);

/// Maximum number of featured products.
pub const FEATURED_LIMIT: usize = 6;

/// Maximum number of related products.
pub const RELATED_LIMIT: usize = 4;

/// Category filter value that matches every product.
pub const ALL_CATEGORIES: &str = "all";

/// Sort orders offered by the listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Title, A to Z
    #[default]
    NameAsc,

    /// Title, Z to A
    NameDesc,

    /// Cheapest first
    PriceAsc,

    /// Most expensive first
    PriceDesc,
}

impl SortKey {
    /// Every sort key, in the order the listing offers them.
    pub const ALL: [SortKey; 4] = [
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
    ];

    /// The select option value for this key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
        }
    }
}

/// Unrecognised sort key.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

/// Immutable product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    currency: &'static Currency,
}

impl Catalog {
    /// Build a catalog from already-parsed products.
    ///
    /// # Errors
    ///
    /// Returns a `FixtureError` when the list is empty, when two products share
    /// an id, or when product currencies differ.
    pub fn new(products: Vec<Product>) -> Result<Self, FixtureError> {
        let currency = products
            .first()
            .map(|product| product.price.currency())
            .ok_or(FixtureError::NoProducts)?;

        let mut seen = FxHashSet::default();

        for product in &products {
            if !seen.insert(product.id) {
                return Err(FixtureError::DuplicateProduct(product.id.get()));
            }

            let product_currency = product.price.currency();

            if product_currency != currency {
                return Err(FixtureError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    product_currency.iso_alpha_code.to_string(),
                ));
            }
        }

        Ok(Self { products, currency })
    }

    /// Parse a catalog from YAML fixture content.
    ///
    /// # Errors
    ///
    /// Returns a `FixtureError` if the YAML is invalid or any product fails validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        let fixture: ProductsFixture = serde_norway::from_str(yaml)?;

        let products = fixture
            .products
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(products)
    }

    /// The bundled twelve-product sample catalog.
    ///
    /// # Errors
    ///
    /// Returns a `FixtureError` if the bundled fixture is invalid.
    pub fn sample() -> Result<Self, FixtureError> {
        Self::from_yaml(SAMPLE_PRODUCTS_YAML)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All products as references, ready for sorting or rendering.
    #[must_use]
    pub fn all(&self) -> Vec<&Product> {
        self.products.iter().collect()
    }

    /// Currency every product is priced in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Find a product by id.
    #[must_use]
    pub fn get_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Products whose category exactly matches `category` (case-sensitive).
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.category == category)
            .collect()
    }

    /// Category filter where blank or [`ALL_CATEGORIES`] selects everything.
    #[must_use]
    pub fn filter_category(&self, category: &str) -> Vec<&Product> {
        let category = category.trim();

        if category.is_empty() || category == ALL_CATEGORIES {
            return self.all();
        }

        self.by_category(category)
    }

    /// Top rated products, best first.
    #[must_use]
    pub fn featured(&self) -> Vec<&Product> {
        let mut featured: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| product.rating >= FEATURED_MIN_RATING)
            .collect();

        featured.sort_by(|a, b| b.rating.cmp(&a.rating));
        featured.truncate(FEATURED_LIMIT);

        featured
    }

    /// Other products from the same category, in catalog order.
    #[must_use]
    pub fn related(&self, exclude: ProductId, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.id != exclude && product.category == category)
            .take(RELATED_LIMIT)
            .collect()
    }

    /// Case-insensitive match on title, category or description.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();

        if needle.is_empty() {
            return self.all();
        }

        self.products
            .iter()
            .filter(|product| {
                product.title.to_lowercase().contains(&needle)
                    || product.category.to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = FxHashSet::default();

        self.products
            .iter()
            .map(|product| product.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }
}

/// Sort products by a select option value; unknown keys keep the input order.
#[must_use]
pub fn sort<'p>(products: Vec<&'p Product>, key: &str) -> Vec<&'p Product> {
    match key.parse::<SortKey>() {
        Ok(key) => sort_by_key(products, key),
        Err(_unknown) => products,
    }
}

/// Stable sort of products by the given key.
#[must_use]
pub fn sort_by_key(mut products: Vec<&Product>, key: SortKey) -> Vec<&Product> {
    match key {
        SortKey::NameAsc => products.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortKey::NameDesc => products.sort_by(|a, b| compare_titles(&b.title, &a.title)),
        SortKey::PriceAsc => products.sort_by_key(|product| product.price.to_minor_units()),
        SortKey::PriceDesc => products.sort_by(|a, b| {
            b.price
                .to_minor_units()
                .cmp(&a.price.to_minor_units())
        }),
    }

    products
}

/// Case-insensitive title order; titles differing only in case put the
/// lowercase form first.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
