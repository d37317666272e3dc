//! Checkout
//!
//! Simulated checkout: submitting waits for a fixed delay, then completing
//! empties the cart. Nothing is charged or sent anywhere.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::{CartError, CartStore},
    store::BlobStore,
};

/// Which checkout button started the checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutOrigin {
    /// Button in the cart sidebar
    Sidebar,

    /// Button on the cart page
    Page,
}

impl CheckoutOrigin {
    /// How long the simulated checkout takes.
    #[must_use]
    pub const fn delay(self) -> Duration {
        match self {
            CheckoutOrigin::Sidebar => Duration::from_secs(1),
            CheckoutOrigin::Page => Duration::from_secs(2),
        }
    }

    /// Notice shown while the checkout is in progress.
    #[must_use]
    pub const fn submit_notice(self) -> &'static str {
        match self {
            CheckoutOrigin::Sidebar => "Checkout functionality would be implemented here!",
            CheckoutOrigin::Page => "Redirecting to checkout...",
        }
    }
}

/// Checkout progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    /// No checkout running
    #[default]
    Idle,

    /// Waiting for the simulated delay to elapse
    Submitting {
        /// Button that started the checkout
        origin: CheckoutOrigin,
    },

    /// Purchase finished and the cart was emptied
    Completed,
}

/// Errors raised by checkout transitions.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout needs at least one line item.
    #[error("Your cart is empty!")]
    EmptyCart,

    /// A checkout is already running.
    #[error("checkout already in progress")]
    AlreadySubmitting,

    /// `complete` was called without a running checkout.
    #[error("no checkout in progress")]
    NotSubmitting,

    /// The cart could not be cleared.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Checkout state machine.
#[derive(Debug, Default)]
pub struct Checkout {
    state: CheckoutState,
}

impl Checkout {
    /// Create an idle checkout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Start a checkout, returning how long the caller should wait before
    /// calling [`Checkout::complete`]. A completed checkout may begin again.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines, or
    /// [`CheckoutError::AlreadySubmitting`] if a checkout is running.
    pub fn begin<S: BlobStore>(
        &mut self,
        cart: &CartStore<S>,
        origin: CheckoutOrigin,
    ) -> Result<Duration, CheckoutError> {
        if let CheckoutState::Submitting { .. } = self.state {
            return Err(CheckoutError::AlreadySubmitting);
        }

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.state = CheckoutState::Submitting { origin };

        debug!(?origin, items = cart.total_items(), "checkout started");

        Ok(origin.delay())
    }

    /// Finish a running checkout and empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotSubmitting`] if no checkout is running, or
    /// [`CheckoutError::Cart`] if the cart cannot be cleared. The state stays
    /// `Submitting` when clearing fails.
    pub fn complete<S: BlobStore>(
        &mut self,
        cart: &mut CartStore<S>,
    ) -> Result<CheckoutOrigin, CheckoutError> {
        let CheckoutState::Submitting { origin } = self.state else {
            return Err(CheckoutError::NotSubmitting);
        };

        cart.clear()?;

        self.state = CheckoutState::Completed;

        info!(?origin, "checkout completed");

        Ok(origin)
    }

    /// Return to `Idle`.
    pub fn reset(&mut self) {
        self.state = CheckoutState::Idle;
    }
}
