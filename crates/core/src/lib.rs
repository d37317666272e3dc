//! Storefront
//!
//! Catalog, cart and page logic for a small storefront. All state lives in a
//! [`Storefront`](storefront::Storefront) value backed by a key-value [`BlobStore`](store::BlobStore);
//! pages are rendered into plain view records rather than markup.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod discounts;
pub mod events;
pub mod fixtures;
pub mod notices;
pub mod pages;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod store;
pub mod storefront;
pub mod views;
pub mod wishlist;
