//! Cart
//!
//! The cart store is the single source of truth for cart contents. Every
//! mutation writes the whole line-item list back to the blob store before it
//! returns; there is no delta persistence and no versioning, so two processes
//! sharing a store overwrite each other's snapshots.

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    catalog::Catalog,
    pricing::{TotalPriceError, total_price},
    products::ProductId,
    store::{BlobStore, StoreError, load_json_or_default, save_json},
};

pub mod line_item;
pub mod saved;

pub use line_item::{LineItem, StoredLineItem};
pub use saved::SavedCart;

/// Blob store key holding the cart snapshot.
pub const CART_KEY: &str = "cart";

/// Blob store key holding saved carts.
pub const SAVED_CARTS_KEY: &str = "savedCarts";

/// Errors raised by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity input was blank, non-numeric or zero.
    #[error("invalid quantity: {0:?}")]
    InvalidQuantity(String),

    /// Quantity would exceed the supported maximum.
    #[error("quantity for product {0} is too large")]
    QuantityOverflow(ProductId),

    /// The operation needs a non-empty cart.
    #[error("Your cart is empty!")]
    EmptyCart,

    /// Total could not be calculated.
    #[error(transparent)]
    Price(#[from] TotalPriceError),

    /// Snapshot could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a cart mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended.
    Added {
        /// Product id
        id: ProductId,
        /// Quantity of the new line
        quantity: u32,
    },

    /// An existing line's quantity changed.
    QuantityChanged {
        /// Product id
        id: ProductId,
        /// New quantity
        quantity: u32,
    },

    /// A line was removed.
    Removed(ProductId),

    /// Every line was removed.
    Cleared,

    /// Nothing changed (unknown product, or product not in the cart).
    Unchanged,
}

/// Parse a quantity typed into a quantity field.
///
/// Values may be zero or negative (which remove the line); blank and
/// non-numeric input is rejected.
///
/// # Errors
///
/// Returns [`CartError::InvalidQuantity`] if the input is not an integer.
pub fn parse_quantity(input: &str) -> Result<i64, CartError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_err| CartError::InvalidQuantity(input.to_string()))
}

/// Ordered cart line items persisted in a blob store.
#[derive(Debug)]
pub struct CartStore<S: BlobStore> {
    items: Vec<LineItem>,
    currency: &'static Currency,
    store: S,
}

impl<S: BlobStore> CartStore<S> {
    /// Load the cart snapshot from `store`. Absent or malformed snapshots load
    /// as an empty cart.
    pub fn load(store: S, currency: &'static Currency) -> Self {
        let stored: Vec<StoredLineItem> = load_json_or_default(&store, CART_KEY);
        let stored_len = stored.len();

        let items = restore_lines(stored, currency);

        if items.len() != stored_len {
            warn!(
                dropped = stored_len - items.len(),
                "dropped unusable cart lines from stored snapshot"
            );
        }

        debug!(lines = items.len(), "loaded cart");

        Self {
            items,
            currency,
            store,
        }
    }

    /// Add `quantity` units of a catalog product.
    ///
    /// Unknown products are ignored and report [`CartChange::Unchanged`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a zero quantity,
    /// [`CartError::QuantityOverflow`] if the line would overflow, or a
    /// [`CartError::Store`] if the snapshot cannot be written.
    pub fn add(
        &mut self,
        catalog: &Catalog,
        id: ProductId,
        quantity: u32,
    ) -> Result<CartChange, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity.to_string()));
        }

        let Some(product) = catalog.get_by_id(id) else {
            debug!(%id, "ignoring add for unknown product");

            return Ok(CartChange::Unchanged);
        };

        let mut items = self.items.clone();

        let change = if let Some(line) = items.iter_mut().find(|line| line.id() == id) {
            let quantity = line
                .quantity()
                .checked_add(quantity)
                .ok_or(CartError::QuantityOverflow(id))?;

            line.set_quantity(quantity);

            CartChange::QuantityChanged { id, quantity }
        } else {
            items.push(LineItem::from_product(product, quantity));

            CartChange::Added { id, quantity }
        };

        self.commit(items)?;

        debug!(?change, "cart add");

        Ok(change)
    }

    /// Remove the line for `id`, if present.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::Store`] if the snapshot cannot be written.
    pub fn remove(&mut self, id: ProductId) -> Result<CartChange, CartError> {
        let mut items = self.items.clone();
        items.retain(|line| line.id() != id);

        let change = if items.len() == self.items.len() {
            CartChange::Unchanged
        } else {
            CartChange::Removed(id)
        };

        self.commit(items)?;

        debug!(?change, "cart remove");

        Ok(change)
    }

    /// Set the quantity of the line for `id`. Zero or negative quantities remove
    /// the line; ids not in the cart are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] for quantities above `u32::MAX`,
    /// or a [`CartError::Store`] if the snapshot cannot be written.
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) -> Result<CartChange, CartError> {
        if !self.contains(id) {
            return Ok(CartChange::Unchanged);
        }

        if quantity <= 0 {
            return self.remove(id);
        }

        let quantity = u32::try_from(quantity).map_err(|_err| CartError::QuantityOverflow(id))?;

        let mut items = self.items.clone();

        if let Some(line) = items.iter_mut().find(|line| line.id() == id) {
            line.set_quantity(quantity);
        }

        self.commit(items)?;

        debug!(%id, quantity, "cart set quantity");

        Ok(CartChange::QuantityChanged { id, quantity })
    }

    /// Parse a quantity field and apply it with [`CartStore::set_quantity`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for non-numeric input, leaving the
    /// cart untouched, or any error from `set_quantity`.
    pub fn set_quantity_text(&mut self, id: ProductId, input: &str) -> Result<CartChange, CartError> {
        let quantity = parse_quantity(input)?;

        self.set_quantity(id, quantity)
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::Store`] if the snapshot cannot be written.
    pub fn clear(&mut self) -> Result<CartChange, CartError> {
        self.commit(Vec::new())?;

        debug!("cart cleared");

        Ok(CartChange::Cleared)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Sum of snapshot price times quantity across all lines.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if the total overflows.
    pub fn total_price(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        total_price(
            self.items.iter().map(|line| (line.price(), line.quantity())),
            self.currency,
        )
    }

    /// Whether the cart has a line for `id`.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|line| line.id() == id)
    }

    /// The line for `id`, if any.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|line| line.id() == id)
    }

    /// Lines in first-add order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency of the cart totals.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Put the current cart aside under [`SAVED_CARTS_KEY`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] when there is nothing to save, or a
    /// [`CartError::Store`] if the saved list cannot be written.
    pub fn save_for_later(&mut self, now: Timestamp) -> Result<SavedCart, CartError> {
        if self.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let mut saved = self.saved_carts();

        let snapshot = SavedCart::new(
            self.items.iter().map(LineItem::to_stored).collect(),
            now,
            saved.len() + 1,
        );

        saved.push(snapshot.clone());

        save_json(&self.store, SAVED_CARTS_KEY, &saved)?;

        debug!(id = snapshot.id, name = %snapshot.name, "saved cart for later");

        Ok(snapshot)
    }

    /// Saved carts in save order. Malformed data reads as an empty list.
    #[must_use]
    pub fn saved_carts(&self) -> Vec<SavedCart> {
        load_json_or_default(&self.store, SAVED_CARTS_KEY)
    }

    /// Replace the cart with a saved cart's lines. Unknown ids leave the cart
    /// untouched and return `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError::Store`] if the snapshot cannot be written.
    pub fn restore_saved(&mut self, id: i64) -> Result<Option<SavedCart>, CartError> {
        let Some(saved) = self.saved_carts().into_iter().find(|saved| saved.id == id) else {
            debug!(id, "saved cart not found");

            return Ok(None);
        };

        self.commit(restore_lines(saved.items.clone(), self.currency))?;

        debug!(id, lines = self.items.len(), "restored saved cart");

        Ok(Some(saved))
    }

    /// Write `items` to the store, then make them the cart contents. A failed
    /// write leaves the cart as it was.
    fn commit(&mut self, items: Vec<LineItem>) -> Result<(), CartError> {
        let stored: Vec<StoredLineItem> = items.iter().map(LineItem::to_stored).collect();

        save_json(&self.store, CART_KEY, &stored)?;

        self.items = items;

        Ok(())
    }
}

fn restore_lines(stored: Vec<StoredLineItem>, currency: &'static Currency) -> Vec<LineItem> {
    let mut items: Vec<LineItem> = Vec::with_capacity(stored.len());

    for line in stored
        .into_iter()
        .filter_map(|line| LineItem::from_stored(line, currency))
    {
        if items.iter().any(|existing| existing.id() == line.id()) {
            continue;
        }

        items.push(line);
    }

    items
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::store::{FailingStore, MemoryStore};

    use super::*;

    fn cart() -> Result<(Catalog, CartStore<Rc<MemoryStore>>, Rc<MemoryStore>), Box<dyn std::error::Error>> {
        let catalog = Catalog::sample()?;
        let store = Rc::new(MemoryStore::new());
        let cart = CartStore::load(Rc::clone(&store), catalog.currency());

        Ok((catalog, cart, store))
    }

    const HEADPHONES: ProductId = ProductId::new(1);
    const MOUSE: ProductId = ProductId::new(7);

    #[test]
    fn add_appends_snapshot_line() -> TestResult {
        let (catalog, mut cart, _store) = cart()?;

        let change = cart.add(&catalog, HEADPHONES, 1)?;

        assert_eq!(change, CartChange::Added { id: HEADPHONES, quantity: 1 });
        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.get(HEADPHONES).map(LineItem::title),
            Some("Wireless Bluetooth Headphones")
        );

        Ok(())
    }

    #[test]
    fn repeated_adds_sum_quantities() -> TestResult {
        let (catalog, mut cart, _store) = cart()?;

        cart.add(&catalog, HEADPHONES, 1)?;
        let change = cart.add(&catalog, HEADPHONES, 2)?;

        assert_eq!(change, CartChange::QuantityChanged { id: HEADPHONES, quantity: 3 });
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(HEADPHONES).map(LineItem::quantity), Some(3));
        assert_eq!(
            cart.get(HEADPHONES).map(LineItem::total).transpose()?,
            Some(Money::from_minor(29997, USD))
        );

        Ok(())
    }

    #[test]
    fn add_unknown_product_is_noop() -> TestResult {
        let (catalog, mut cart, store) = cart()?;

        let change = cart.add(&catalog, ProductId::new(404), 1)?;

        assert_eq!(change, CartChange::Unchanged);
        assert!(cart.is_empty());
        assert_eq!(store.get(CART_KEY)?, None);

        Ok(())
    }

    #[test]
    fn add_zero_quantity_is_rejected() -> TestResult {
        let (catalog, mut cart, _store) = cart()?;

        assert!(matches!(
            cart.add(&catalog, HEADPHONES, 0),
            Err(CartError::InvalidQuantity(_))
        ));
        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn add_overflowing_quantity_is_rejected() -> TestResult {
        let (catalog, mut cart, _store) = cart()?;

        cart.add(&catalog, HEADPHONES, u32::MAX)?;

        assert!(matches!(
            cart.add(&catalog, HEADPHONES, 1),
            Err(CartError::QuantityOverflow(id)) if id == HEADPHONES
        ));
        assert_eq!(cart.get(HEADPHONES).map(LineItem::quantity), Some(u32::MAX));

        Ok(())
    }

    #[test]
    fn set_quantity_zero_or_negative_removes() -> TestResult {
        let (catalog, mut cart, _store) = cart()?;

        cart.add(&catalog, HEADPHONES, 2)?;
        cart.add(&catalog, MOUSE, 1)?;

        assert_eq!(cart.set_quantity(HEADPHONES, 0)?, CartChange::Removed(HEADPHONES));
        assert_eq!(cart.set_quantity(MOUSE, -5)?, CartChange::Removed(MOUSE));
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);

        Ok(())
    }

    #[test]
    fn set_quantity_replaces_quantity() -> TestResult {
        let (catalog, mut cart, _store) = cart()?;

        cart.add(&catalog, HEADPHONES, 2)?;

        assert_eq!(
            cart.set_quantity(HEADPHONES, 5)?,
            CartChange::QuantityChanged { id: HEADPHONES, quantity: 5 }
        );
        assert_eq!(cart.total_items(), 5);

        Ok(())
    }

    #[test]
    fn set_quantity_for_missing_line_is_noop() -> TestResult {
        let (_catalog, mut cart, store) = cart()?;

        assert_eq!(cart.set_quantity(HEADPHONES, 3)?, CartChange::Unchanged);
        assert!(cart.is_empty());
        assert_eq!(store.get(CART_KEY)?, None);

        Ok(())
    }

    #[test]
    fn set_quantity_text_rejects_non_numeric() -> TestResult {
        let (catalog, mut cart, _store) = cart()?;

        cart.add(&catalog, HEADPHONES, 2)?;

        assert!(matches!(
            cart.set_quantity_text(HEADPHONES, ""),
            Err(CartError::InvalidQuantity(_))
        ));
        assert!(matches!(
            cart.set_quantity_text(HEADPHONES, "two"),
            Err(CartError::InvalidQuantity(_))
        ));
        assert_eq!(cart.get(HEADPHONES).map(LineItem::quantity), Some(2));

        cart.set_quantity_text(HEADPHONES, " 4 ")?;
        assert_eq!(cart.get(HEADPHONES).map(LineItem::quantity), Some(4));

        Ok(())
    }

    #[test]
    fn remove_missing_line_leaves_cart_unchanged() -> TestResult {
        let (catalog, mut cart, _store) = cart()?;

        cart.add(&catalog, HEADPHONES, 1)?;
        let before = cart.items().to_vec();

        assert_eq!(cart.remove(MOUSE)?, CartChange::Unchanged);
        assert_eq!(cart.items(), before.as_slice());

        Ok(())
    }

    #[test]
    fn totals_use_snapshot_prices() -> TestResult {
        let (catalog, mut cart, _store) = cart()?;

        cart.add(&catalog, HEADPHONES, 2)?;
        cart.add(&catalog, MOUSE, 1)?;

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price()?, Money::from_minor(2 * 9999 + 2499, USD));

        Ok(())
    }

    #[test]
    fn clear_empties_cart_and_snapshot() -> TestResult {
        let (catalog, mut cart, store) = cart()?;

        cart.add(&catalog, HEADPHONES, 2)?;
        cart.clear()?;

        assert_eq!(cart.total_items(), 0);
        assert_eq!(store.get(CART_KEY)?, Some("[]".to_string()));

        Ok(())
    }

    #[test]
    fn load_restores_persisted_lines_in_order() -> TestResult {
        let (catalog, mut cart, store) = cart()?;

        cart.add(&catalog, MOUSE, 1)?;
        cart.add(&catalog, HEADPHONES, 3)?;

        let reloaded = CartStore::load(Rc::clone(&store), catalog.currency());

        assert_eq!(reloaded.items(), cart.items());

        Ok(())
    }

    #[test]
    fn load_malformed_snapshot_is_empty() -> TestResult {
        let store = MemoryStore::new();
        store.put(CART_KEY, "not json")?;

        let cart = CartStore::load(&store, USD);

        assert!(cart.is_empty());

        Ok(())
    }

    #[test]
    fn load_drops_zero_quantity_and_duplicate_lines() -> TestResult {
        let store = MemoryStore::new();
        store.put(
            CART_KEY,
            r#"[{"id":1,"title":"A","price":1.5,"image":"","quantity":2},
                {"id":2,"title":"B","price":2,"image":"","quantity":0},
                {"id":1,"title":"A","price":1.5,"image":"","quantity":9}]"#,
        )?;

        let cart = CartStore::load(&store, USD);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(HEADPHONES).map(LineItem::quantity), Some(2));
        assert_eq!(cart.total_price()?, Money::from_minor(300, USD));

        Ok(())
    }

    #[test]
    fn save_for_later_requires_items() -> TestResult {
        let (_catalog, mut cart, _store) = cart()?;

        let now: Timestamp = "2024-03-01T12:00:00Z".parse()?;

        assert!(matches!(cart.save_for_later(now), Err(CartError::EmptyCart)));
        assert!(cart.saved_carts().is_empty());

        Ok(())
    }

    #[test]
    fn save_and_restore_saved_cart() -> TestResult {
        let (catalog, mut cart, _store) = cart()?;

        cart.add(&catalog, HEADPHONES, 2)?;
        let now: Timestamp = "2024-03-01T12:00:00Z".parse()?;
        let saved = cart.save_for_later(now)?;

        assert_eq!(saved.name, "Saved Cart 1");
        assert_eq!(saved.total_items(), 2);

        cart.clear()?;
        let restored = cart.restore_saved(saved.id)?;

        assert_eq!(restored.map(|saved| saved.id), Some(saved.id));
        assert_eq!(cart.get(HEADPHONES).map(LineItem::quantity), Some(2));

        let later: Timestamp = "2024-03-02T12:00:00Z".parse()?;
        assert_eq!(cart.save_for_later(later)?.name, "Saved Cart 2");
        assert_eq!(cart.saved_carts().len(), 2);

        Ok(())
    }

    #[test]
    fn restore_unknown_saved_cart_is_noop() -> TestResult {
        let (catalog, mut cart, _store) = cart()?;

        cart.add(&catalog, MOUSE, 1)?;

        assert!(cart.restore_saved(42)?.is_none());
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn parse_quantity_accepts_signed_integers() -> TestResult {
        assert_eq!(parse_quantity("3")?, 3);
        assert_eq!(parse_quantity("-1")?, -1);
        assert!(parse_quantity("1.5").is_err());
        assert!(parse_quantity(" ").is_err());

        Ok(())
    }

    #[test]
    fn failed_writes_leave_cart_unchanged() -> TestResult {
        let catalog = Catalog::sample()?;
        let store = FailingStore::default();
        let mut cart = CartStore::load(&store, catalog.currency());

        cart.add(&catalog, HEADPHONES, 1)?;
        let saved = cart.save_for_later("2024-03-01T12:00:00Z".parse()?)?;
        let snapshot = store.get(CART_KEY)?;
        let before = cart.items().to_vec();

        store.fail_writes(true);

        assert!(matches!(
            cart.add(&catalog, HEADPHONES, 2),
            Err(CartError::Store(_))
        ));
        assert!(matches!(
            cart.add(&catalog, MOUSE, 1),
            Err(CartError::Store(_))
        ));
        assert!(matches!(
            cart.set_quantity(HEADPHONES, 5),
            Err(CartError::Store(_))
        ));
        assert!(matches!(cart.remove(HEADPHONES), Err(CartError::Store(_))));
        assert!(matches!(cart.clear(), Err(CartError::Store(_))));
        assert!(matches!(
            cart.restore_saved(saved.id),
            Err(CartError::Store(_))
        ));

        assert_eq!(cart.items(), before.as_slice());
        assert_eq!(cart.get(HEADPHONES).map(LineItem::quantity), Some(1));
        assert_eq!(store.get(CART_KEY)?, snapshot);

        store.fail_writes(false);
        cart.add(&catalog, MOUSE, 1)?;

        assert_eq!(cart.len(), 2);

        Ok(())
    }
}
