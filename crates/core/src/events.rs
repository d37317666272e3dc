//! Event binding
//!
//! UI events are delegated by class name: a front end reports which class was
//! hit along with the product id and value it carried, and [`bind`] maps that
//! to an [`Action`] for [`Storefront::dispatch`](crate::storefront::Storefront::dispatch).

use crate::{
    checkout::CheckoutOrigin,
    products::ProductId,
    views::{classes, ids},
};

/// Something the shopper did to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    /// Class of the element that received the event
    pub class: String,

    /// `data-product-id` of the element or its card
    pub product_id: Option<ProductId>,

    /// Element value (`data-quantity`, an input's text, a select's value, or
    /// the element id for buttons that share a class)
    pub value: Option<String>,
}

impl UiEvent {
    /// Event on an element with `class`.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            product_id: None,
            value: None,
        }
    }

    /// Attach a product id.
    #[must_use]
    pub fn with_product(mut self, id: ProductId) -> Self {
        self.product_id = Some(id);
        self
    }

    /// Attach a value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A state change or navigation requested by the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Add units of a product
    AddToCart {
        /// Product id
        id: ProductId,
        /// Units to add
        quantity: u32,
    },

    /// Set a line's quantity from a +/- button
    SetQuantity {
        /// Product id
        id: ProductId,
        /// New quantity, zero or less removes
        quantity: i64,
    },

    /// Set a line's quantity from typed text
    SetQuantityText {
        /// Product id
        id: ProductId,
        /// Raw field text
        text: String,
    },

    /// Remove a line
    Remove(ProductId),

    /// Open a product's detail page
    ViewProduct(ProductId),

    /// Start checkout
    Checkout(CheckoutOrigin),

    /// Re-sort the shop listing
    Sort(String),

    /// Go back to the shop
    ContinueShopping,

    /// Empty the cart
    ClearCart,

    /// Put the cart aside
    SaveForLater,

    /// Replace the cart with a saved cart
    RestoreSaved(i64),

    /// Wishlist a product
    AddToWishlist(ProductId),

    /// Add to cart then go to the cart page
    BuyNow {
        /// Product id
        id: ProductId,
        /// Units to add
        quantity: u32,
    },

    /// Apply a discount code
    ApplyDiscount(String),
}

/// Quantity carried by an add button; anything missing or not a positive
/// integer adds one unit.
fn add_quantity(value: Option<&str>) -> u32 {
    value
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|quantity| *quantity > 0)
        .unwrap_or(1)
}

/// Map a delegated event to an action. Events on unknown classes, or missing
/// the product id or value their class needs, bind to nothing.
#[must_use]
pub fn bind(event: &UiEvent) -> Option<Action> {
    let value = event.value.as_deref();

    let action = match event.class.as_str() {
        classes::ADD_TO_CART_BTN => Action::AddToCart {
            id: event.product_id?,
            quantity: add_quantity(value),
        },
        classes::BUY_NOW_BTN => Action::BuyNow {
            id: event.product_id?,
            quantity: add_quantity(value),
        },
        classes::QUANTITY_BTN => Action::SetQuantity {
            id: event.product_id?,
            quantity: value?.trim().parse().ok()?,
        },
        classes::QUANTITY_INPUT => Action::SetQuantityText {
            id: event.product_id?,
            text: value.unwrap_or_default().to_string(),
        },
        classes::REMOVE_BTN => Action::Remove(event.product_id?),
        classes::PRODUCT_CARD => Action::ViewProduct(event.product_id?),
        classes::WISHLIST_BTN => Action::AddToWishlist(event.product_id?),
        classes::CHECKOUT_BTN => {
            let origin = if value == Some(ids::CHECKOUT_BTN_SIDEBAR) {
                CheckoutOrigin::Sidebar
            } else {
                CheckoutOrigin::Page
            };

            Action::Checkout(origin)
        }
        classes::SORT_SELECT => Action::Sort(value.unwrap_or_default().to_string()),
        classes::CONTINUE_SHOPPING_BTN => Action::ContinueShopping,
        classes::CLEAR_CART_BTN => Action::ClearCart,
        classes::SAVE_CART_BTN => Action::SaveForLater,
        classes::LOAD_SAVED_CART_BTN => Action::RestoreSaved(value?.trim().parse().ok()?),
        classes::APPLY_DISCOUNT_BTN => Action::ApplyDiscount(value.unwrap_or_default().to_string()),
        _ => return None,
    };

    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: ProductId = ProductId::new(4);

    #[test]
    fn add_button_defaults_to_one_unit() {
        let event = UiEvent::new(classes::ADD_TO_CART_BTN).with_product(ID);

        assert_eq!(
            bind(&event),
            Some(Action::AddToCart { id: ID, quantity: 1 })
        );

        let zero = event.clone().with_value("0");
        assert_eq!(bind(&zero), Some(Action::AddToCart { id: ID, quantity: 1 }));

        let three = event.with_value("3");
        assert_eq!(bind(&three), Some(Action::AddToCart { id: ID, quantity: 3 }));
    }

    #[test]
    fn add_button_without_product_binds_nothing() {
        assert_eq!(bind(&UiEvent::new(classes::ADD_TO_CART_BTN)), None);
    }

    #[test]
    fn quantity_button_carries_target_quantity() {
        let event = UiEvent::new(classes::QUANTITY_BTN)
            .with_product(ID)
            .with_value("0");

        assert_eq!(bind(&event), Some(Action::SetQuantity { id: ID, quantity: 0 }));
    }

    #[test]
    fn quantity_input_keeps_raw_text() {
        let event = UiEvent::new(classes::QUANTITY_INPUT)
            .with_product(ID)
            .with_value("abc");

        assert_eq!(
            bind(&event),
            Some(Action::SetQuantityText {
                id: ID,
                text: "abc".to_string()
            })
        );
    }

    #[test]
    fn checkout_origin_follows_button_id() {
        let sidebar = UiEvent::new(classes::CHECKOUT_BTN).with_value(ids::CHECKOUT_BTN_SIDEBAR);
        let page = UiEvent::new(classes::CHECKOUT_BTN).with_value(ids::CHECKOUT_BTN);

        assert_eq!(bind(&sidebar), Some(Action::Checkout(CheckoutOrigin::Sidebar)));
        assert_eq!(bind(&page), Some(Action::Checkout(CheckoutOrigin::Page)));
    }

    #[test]
    fn card_click_views_product() {
        let event = UiEvent::new(classes::PRODUCT_CARD).with_product(ID);

        assert_eq!(bind(&event), Some(Action::ViewProduct(ID)));
    }

    #[test]
    fn sort_select_passes_key_through() {
        let event = UiEvent::new(classes::SORT_SELECT).with_value("price-desc");

        assert_eq!(bind(&event), Some(Action::Sort("price-desc".to_string())));
    }

    #[test]
    fn unknown_class_binds_nothing() {
        assert_eq!(bind(&UiEvent::new("hero").with_product(ID)), None);
    }
}
