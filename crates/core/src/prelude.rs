//! Storefront prelude.
//!
//! Use this in front ends that drive a [`Storefront`].

pub use crate::{
    cart::{CartChange, CartError, CartStore, LineItem, SavedCart},
    catalog::{Catalog, SortKey},
    checkout::{CheckoutOrigin, CheckoutState},
    discounts::DiscountCode,
    events::{Action, UiEvent, bind},
    notices::{Notice, NoticeKind, Notices},
    pages::{CartPage, HomePage, ProductPage, Route, ShopPage, ShopQuery},
    products::{Product, ProductId},
    store::{BlobStore, FileStore, MemoryStore, StoreError},
    storefront::{Dispatch, FollowUp, Scheduled, Storefront, StorefrontError},
    views::{CartRegions, CartView, ProductDetailView, ProductGridView, Region},
};
