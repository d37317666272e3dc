//! Notices
//!
//! Short messages shown to the shopper after an action.

use std::fmt;

use smallvec::SmallVec;

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Something worked
    Success,

    /// Neutral information
    Info,

    /// Something was refused
    Error,
}

impl NoticeKind {
    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Info => "info",
            NoticeKind::Error => "error",
        }
    }
}

/// A transient message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub kind: NoticeKind,

    /// Message text
    pub message: String,
}

impl Notice {
    /// Success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// Info notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    /// Error notice.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)
    }
}

/// Notices raised by one action; rarely more than two.
pub type Notices = SmallVec<[Notice; 2]>;

pub(crate) const ITEM_ADDED: &str = "Item added to cart!";
pub(crate) const ITEM_REMOVED: &str = "Item removed from cart!";
pub(crate) const CART_EMPTY: &str = "Your cart is empty!";
pub(crate) const CART_ALREADY_EMPTY: &str = "Your cart is already empty!";
pub(crate) const CART_CLEARED: &str = "Cart cleared!";
pub(crate) const CART_SAVED: &str = "Cart saved for later!";
pub(crate) const SAVED_CART_LOADED: &str = "Saved cart loaded!";
pub(crate) const SAVED_CART_NOT_FOUND: &str = "Saved cart not found";
pub(crate) const WISHLIST_ADDED: &str = "Added to wishlist!";
pub(crate) const WISHLIST_PRESENT: &str = "Already in wishlist!";
pub(crate) const DISCOUNT_APPLIED: &str = "10% discount applied!";
pub(crate) const INVALID_QUANTITY: &str = "Please enter a valid quantity";
pub(crate) const QUANTITY_TOO_LARGE: &str = "Quantity is too large";
pub(crate) const PURCHASE_COMPLETE: &str = "Thank you for your purchase!";
