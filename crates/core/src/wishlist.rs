//! Wishlist

use tracing::debug;

use crate::{
    products::ProductId,
    store::{BlobStore, StoreError, load_json_or_default, save_json},
};

/// Blob store key holding wishlisted product ids.
pub const WISHLIST_KEY: &str = "wishlist";

/// Outcome of adding to the wishlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistChange {
    /// The id was appended.
    Added(ProductId),

    /// The id was already wishlisted.
    AlreadyPresent(ProductId),
}

/// Ordered, duplicate-free product ids persisted in a blob store.
#[derive(Debug)]
pub struct Wishlist<S: BlobStore> {
    ids: Vec<ProductId>,
    store: S,
}

impl<S: BlobStore> Wishlist<S> {
    /// Load the wishlist from `store`; malformed data loads as empty.
    pub fn load(store: S) -> Self {
        let mut ids: Vec<ProductId> = load_json_or_default(&store, WISHLIST_KEY);

        let mut seen = Vec::with_capacity(ids.len());
        ids.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(*id);
                true
            }
        });

        Self { ids, store }
    }

    /// Append `id` unless it is already present.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the list cannot be written.
    pub fn add(&mut self, id: ProductId) -> Result<WishlistChange, StoreError> {
        if self.contains(id) {
            return Ok(WishlistChange::AlreadyPresent(id));
        }

        let mut ids = self.ids.clone();
        ids.push(id);

        save_json(&self.store, WISHLIST_KEY, &ids)?;

        self.ids = ids;

        debug!(%id, "wishlisted product");

        Ok(WishlistChange::Added(id))
    }

    /// Wishlisted ids in add order.
    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    /// Whether `id` is wishlisted.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of wishlisted ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is wishlisted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
