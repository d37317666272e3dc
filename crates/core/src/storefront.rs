//! Storefront
//!
//! The single owner of catalog, cart, wishlist and checkout state. Front ends
//! hold one `Storefront` and pass it by `&mut` to [`Storefront::dispatch`];
//! there is no global cart.

use std::time::Duration;

use jiff::Timestamp;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::{CartChange, CartError, CartStore},
    catalog::Catalog,
    checkout::{Checkout, CheckoutError, CheckoutOrigin},
    discounts::DiscountCode,
    events::{Action, UiEvent, bind},
    notices::{self, Notice, Notices},
    pages::{BUY_NOW_DELAY, Route, ShopQuery, shop_listing},
    pricing::TotalPriceError,
    products::ProductId,
    store::{BlobStore, StoreError},
    views::{CartRegions, ProductGridView, render_regions},
    wishlist::{Wishlist, WishlistChange},
};

/// Errors that cannot be shown to the shopper as a notice.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Cart operation failed
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout transition failed
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Blob store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Total could not be calculated
    #[error(transparent)]
    Price(#[from] TotalPriceError),
}

/// Work the front end should run once a delay has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Call [`Storefront::resume`] to finish the running checkout
    CompleteCheckout,

    /// Move to another page
    Navigate(Route),
}

/// A follow-up and how long to wait before running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    /// Wait before running
    pub delay: Duration,

    /// What to run
    pub then: FollowUp,
}

/// Result of dispatching an action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    /// Notices to show, in order
    pub notices: Notices,

    /// Page to move to immediately
    pub navigate: Option<Route>,

    /// Delayed follow-up
    pub scheduled: Option<Scheduled>,

    /// Re-rendered cart regions, present when the cart or discount changed
    pub cart: Option<CartRegions>,

    /// Re-rendered shop listing, present after a sort change
    pub listing: Option<ProductGridView>,
}

impl Dispatch {
    fn notice(notice: Notice) -> Self {
        let mut dispatch = Self::default();
        dispatch.notices.push(notice);
        dispatch
    }

    fn navigate(route: Route) -> Self {
        Self {
            navigate: Some(route),
            ..Self::default()
        }
    }
}

/// Storefront state container.
#[derive(Debug)]
pub struct Storefront<S: BlobStore + Clone> {
    catalog: Catalog,
    cart: CartStore<S>,
    wishlist: Wishlist<S>,
    checkout: Checkout,
    discount: Option<DiscountCode>,
}

impl<S: BlobStore + Clone> Storefront<S> {
    /// Load persisted cart and wishlist state from `store`.
    pub fn new(catalog: Catalog, store: S) -> Self {
        let cart = CartStore::load(store.clone(), catalog.currency());
        let wishlist = Wishlist::load(store);

        info!(
            products = catalog.len(),
            cart_lines = cart.len(),
            wishlist = wishlist.len(),
            "storefront ready"
        );

        Self {
            catalog,
            cart,
            wishlist,
            checkout: Checkout::new(),
            discount: None,
        }
    }

    /// Product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Cart.
    #[must_use]
    pub fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    /// Wishlist.
    #[must_use]
    pub fn wishlist(&self) -> &Wishlist<S> {
        &self.wishlist
    }

    /// Checkout state machine.
    #[must_use]
    pub fn checkout(&self) -> &Checkout {
        &self.checkout
    }

    /// Applied discount code, if any.
    #[must_use]
    pub fn discount(&self) -> Option<&DiscountCode> {
        self.discount.as_ref()
    }

    /// Bind a UI event and dispatch the resulting action. Events that bind to
    /// nothing produce an empty [`Dispatch`].
    ///
    /// # Errors
    ///
    /// See [`Storefront::dispatch`].
    pub fn handle(&mut self, event: &UiEvent) -> Result<Dispatch, StorefrontError> {
        let Some(action) = bind(event) else {
            debug!(class = %event.class, "event bound to nothing");

            return Ok(Dispatch::default());
        };

        self.dispatch(action)
    }

    /// Run an action at the current time.
    ///
    /// # Errors
    ///
    /// See [`Storefront::dispatch_at`].
    pub fn dispatch(&mut self, action: Action) -> Result<Dispatch, StorefrontError> {
        self.dispatch_at(action, Timestamp::now())
    }

    /// Run an action, re-rendering every cart region when the cart changes.
    /// Rejected input and empty-cart conditions become error notices.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the blob store fails or a total
    /// overflows.
    pub fn dispatch_at(&mut self, action: Action, now: Timestamp) -> Result<Dispatch, StorefrontError> {
        debug!(?action, "dispatch");

        let dispatch = match action {
            Action::AddToCart { id, quantity } => self.add_to_cart(id, quantity)?,
            Action::BuyNow { id, quantity } => {
                let mut dispatch = self.add_to_cart(id, quantity)?;

                dispatch.scheduled = Some(Scheduled {
                    delay: BUY_NOW_DELAY,
                    then: FollowUp::Navigate(Route::Cart),
                });

                dispatch
            }
            Action::SetQuantity { id, quantity } => {
                let change = self.cart.set_quantity(id, quantity);

                self.cart_changed(change)?
            }
            Action::SetQuantityText { id, text } => {
                let change = self.cart.set_quantity_text(id, &text);

                self.cart_changed(change)?
            }
            Action::Remove(id) => {
                let change = self.cart.remove(id);

                self.cart_changed(change)?
            }
            Action::ViewProduct(id) => Dispatch::navigate(Route::Product(id)),
            Action::ContinueShopping => Dispatch::navigate(Route::Shop),
            Action::Checkout(origin) => self.begin_checkout(origin)?,
            Action::Sort(key) => Dispatch {
                listing: Some(shop_listing(self, &ShopQuery::sorted(key))),
                ..Dispatch::default()
            },
            Action::ClearCart => {
                if self.cart.is_empty() {
                    Dispatch::notice(Notice::info(notices::CART_ALREADY_EMPTY))
                } else {
                    let change = self.cart.clear();

                    self.cart_changed(change)?
                }
            }
            Action::SaveForLater => match self.cart.save_for_later(now) {
                Ok(_) => Dispatch::notice(Notice::success(notices::CART_SAVED)),
                Err(CartError::EmptyCart) => Dispatch::notice(Notice::error(notices::CART_EMPTY)),
                Err(error) => return Err(error.into()),
            },
            Action::RestoreSaved(id) => match self.cart.restore_saved(id)? {
                Some(_) => {
                    let mut dispatch = Dispatch::notice(Notice::success(notices::SAVED_CART_LOADED));
                    dispatch.cart = Some(self.regions()?);
                    dispatch
                }
                None => Dispatch::notice(Notice::error(notices::SAVED_CART_NOT_FOUND)),
            },
            Action::AddToWishlist(id) => match self.wishlist.add(id)? {
                WishlistChange::Added(_) => Dispatch::notice(Notice::success(notices::WISHLIST_ADDED)),
                WishlistChange::AlreadyPresent(_) => {
                    Dispatch::notice(Notice::info(notices::WISHLIST_PRESENT))
                }
            },
            Action::ApplyDiscount(code) => match DiscountCode::parse(&code) {
                Ok(code) => {
                    self.discount = Some(code);

                    let mut dispatch = Dispatch::notice(Notice::success(notices::DISCOUNT_APPLIED));
                    dispatch.cart = Some(self.regions()?);
                    dispatch
                }
                Err(error) => Dispatch::notice(Notice::error(error.to_string())),
            },
        };

        Ok(dispatch)
    }

    /// Run a follow-up once its delay has elapsed.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the checkout cannot be completed.
    pub fn resume(&mut self, follow_up: FollowUp) -> Result<Dispatch, StorefrontError> {
        match follow_up {
            FollowUp::CompleteCheckout => self.finish_checkout(),
            FollowUp::Navigate(route) => Ok(Dispatch::navigate(route)),
        }
    }

    /// Complete the running checkout, emptying the cart.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Checkout`] if no checkout is running or the
    /// cart cannot be cleared.
    pub fn finish_checkout(&mut self) -> Result<Dispatch, StorefrontError> {
        self.checkout.complete(&mut self.cart)?;
        self.discount = None;

        let mut dispatch = Dispatch::notice(Notice::success(notices::PURCHASE_COMPLETE));
        dispatch.cart = Some(self.regions()?);

        Ok(dispatch)
    }

    /// Render every cart region.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if a total overflows.
    pub fn regions(&self) -> Result<CartRegions, TotalPriceError> {
        render_regions(&self.cart, self.discount.as_ref())
    }

    fn add_to_cart(&mut self, id: ProductId, quantity: u32) -> Result<Dispatch, StorefrontError> {
        let change = self.cart.add(&self.catalog, id, quantity);

        let added = matches!(
            change,
            Ok(CartChange::Added { .. } | CartChange::QuantityChanged { .. })
        );

        let mut dispatch = self.cart_changed(change)?;

        if added {
            dispatch.notices.push(Notice::success(notices::ITEM_ADDED));
        }

        Ok(dispatch)
    }

    fn begin_checkout(&mut self, origin: CheckoutOrigin) -> Result<Dispatch, StorefrontError> {
        match self.checkout.begin(&self.cart, origin) {
            Ok(delay) => {
                let mut dispatch = Dispatch::notice(Notice::info(origin.submit_notice()));

                dispatch.scheduled = Some(Scheduled {
                    delay,
                    then: FollowUp::CompleteCheckout,
                });

                Ok(dispatch)
            }
            Err(CheckoutError::EmptyCart) => Ok(Dispatch::notice(Notice::error(notices::CART_EMPTY))),
            Err(CheckoutError::AlreadySubmitting) => Ok(Dispatch::notice(Notice::info(
                CheckoutError::AlreadySubmitting.to_string(),
            ))),
            Err(error) => Err(error.into()),
        }
    }

    fn cart_changed(
        &self,
        change: Result<CartChange, CartError>,
    ) -> Result<Dispatch, StorefrontError> {
        let notice = match change {
            Ok(CartChange::Added { .. } | CartChange::QuantityChanged { .. }) => None,
            Ok(CartChange::Removed(_)) => Some(Notice::info(notices::ITEM_REMOVED)),
            Ok(CartChange::Cleared) => Some(Notice::info(notices::CART_CLEARED)),
            Ok(CartChange::Unchanged) => return Ok(Dispatch::default()),
            Err(CartError::InvalidQuantity(_)) => {
                return Ok(Dispatch::notice(Notice::error(notices::INVALID_QUANTITY)));
            }
            Err(CartError::QuantityOverflow(_)) => {
                return Ok(Dispatch::notice(Notice::error(notices::QUANTITY_TOO_LARGE)));
            }
            Err(error) => return Err(error.into()),
        };

        let mut dispatch = Dispatch {
            cart: Some(self.regions()?),
            ..Dispatch::default()
        };

        dispatch.notices.extend(notice);

        Ok(dispatch)
    }
}
