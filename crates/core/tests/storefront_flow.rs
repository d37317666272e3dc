//! End-to-end flows through the storefront container

use std::{rc::Rc, time::Duration};

use jiff::Timestamp;
use storefront::{
    pages::{self, ShopQuery},
    prelude::*,
    views::{EMPTY_CART, NO_RELATED_PRODUCTS, PRODUCT_NOT_FOUND, classes, ids},
};
use testresult::TestResult;

fn open_storefront() -> Result<(Storefront<Rc<MemoryStore>>, Rc<MemoryStore>), Box<dyn std::error::Error>>
{
    let store = Rc::new(MemoryStore::new());
    let storefront = Storefront::new(Catalog::sample()?, Rc::clone(&store));

    Ok((storefront, store))
}

fn messages(dispatch: &Dispatch) -> Vec<&str> {
    dispatch
        .notices
        .iter()
        .map(|notice| notice.message.as_str())
        .collect()
}

#[test]
fn add_button_updates_every_region() -> TestResult {
    let (mut storefront, _store) = open_storefront()?;

    let event = UiEvent::new(classes::ADD_TO_CART_BTN)
        .with_product(ProductId::new(1))
        .with_value("2");

    let dispatch = storefront.handle(&event)?;

    assert_eq!(messages(&dispatch), vec!["Item added to cart!"]);

    let regions = dispatch.cart.ok_or("cart regions not re-rendered")?;

    assert_eq!(regions.badge.count, 2);
    assert_eq!(regions.sidebar.total, "$199.98");
    assert_eq!(regions.page.total, regions.sidebar.total);
    assert_eq!(regions.summary.total, "$215.98");

    Ok(())
}

#[test]
fn unknown_product_add_is_silent() -> TestResult {
    let (mut storefront, _store) = open_storefront()?;

    let dispatch = storefront.dispatch(Action::AddToCart {
        id: ProductId::new(99),
        quantity: 1,
    })?;

    assert!(dispatch.notices.is_empty());
    assert!(dispatch.cart.is_none());
    assert!(storefront.cart().is_empty());

    Ok(())
}

#[test]
fn quantity_buttons_and_input() -> TestResult {
    let (mut storefront, _store) = open_storefront()?;
    let id = ProductId::new(6);

    storefront.dispatch(Action::AddToCart { id, quantity: 1 })?;

    let plus = UiEvent::new(classes::QUANTITY_BTN)
        .with_product(id)
        .with_value("2");
    storefront.handle(&plus)?;
    assert_eq!(storefront.cart().total_items(), 2);

    let typed = UiEvent::new(classes::QUANTITY_INPUT)
        .with_product(id)
        .with_value("lots");
    let rejected = storefront.handle(&typed)?;
    assert_eq!(messages(&rejected), vec!["Please enter a valid quantity"]);
    assert_eq!(storefront.cart().total_items(), 2);

    let minus = UiEvent::new(classes::QUANTITY_BTN)
        .with_product(id)
        .with_value("0");
    let removed = storefront.handle(&minus)?;
    assert_eq!(messages(&removed), vec!["Item removed from cart!"]);
    assert!(storefront.cart().is_empty());

    Ok(())
}

#[test]
fn checkout_from_empty_cart_is_refused() -> TestResult {
    let (mut storefront, _store) = open_storefront()?;

    let dispatch = storefront.dispatch(Action::Checkout(CheckoutOrigin::Page))?;

    assert_eq!(messages(&dispatch), vec!["Your cart is empty!"]);
    assert_eq!(dispatch.notices.first().map(|n| n.kind), Some(NoticeKind::Error));
    assert!(dispatch.scheduled.is_none());
    assert_eq!(storefront.checkout().state(), CheckoutState::Idle);

    Ok(())
}

#[test]
fn sidebar_checkout_completes_after_delay() -> TestResult {
    let (mut storefront, store) = open_storefront()?;

    storefront.dispatch(Action::AddToCart {
        id: ProductId::new(2),
        quantity: 1,
    })?;

    let event = UiEvent::new(classes::CHECKOUT_BTN).with_value(ids::CHECKOUT_BTN_SIDEBAR);
    let started = storefront.handle(&event)?;

    assert_eq!(
        messages(&started),
        vec!["Checkout functionality would be implemented here!"]
    );
    assert_eq!(
        started.scheduled,
        Some(Scheduled {
            delay: Duration::from_secs(1),
            then: FollowUp::CompleteCheckout
        })
    );

    let finished = storefront.resume(FollowUp::CompleteCheckout)?;

    assert_eq!(messages(&finished), vec!["Thank you for your purchase!"]);
    assert_eq!(storefront.checkout().state(), CheckoutState::Completed);
    assert!(storefront.cart().is_empty());
    assert_eq!(store.get("cart")?.as_deref(), Some("[]"));

    let regions = finished.cart.ok_or("cart regions not re-rendered")?;
    assert_eq!(regions.page.empty_message, Some(EMPTY_CART));

    Ok(())
}

#[test]
fn page_checkout_waits_two_seconds() -> TestResult {
    let (mut storefront, _store) = open_storefront()?;

    storefront.dispatch(Action::AddToCart {
        id: ProductId::new(2),
        quantity: 1,
    })?;

    let started = storefront.dispatch(Action::Checkout(CheckoutOrigin::Page))?;

    assert_eq!(messages(&started), vec!["Redirecting to checkout..."]);
    assert_eq!(
        started.scheduled.map(|scheduled| scheduled.delay),
        Some(Duration::from_secs(2))
    );

    Ok(())
}

#[test]
fn cart_page_clear_and_discount() -> TestResult {
    let (mut storefront, _store) = open_storefront()?;

    let already = storefront.dispatch(Action::ClearCart)?;
    assert_eq!(messages(&already), vec!["Your cart is already empty!"]);

    storefront.dispatch(Action::AddToCart {
        id: ProductId::new(10),
        quantity: 1,
    })?;

    let missing = storefront.dispatch(Action::ApplyDiscount("  ".to_string()))?;
    assert_eq!(messages(&missing), vec!["Please enter a discount code"]);

    let invalid = storefront.dispatch(Action::ApplyDiscount("SAVE50".to_string()))?;
    assert_eq!(messages(&invalid), vec!["Invalid discount code"]);

    let applied = storefront.dispatch(Action::ApplyDiscount("SAVE10".to_string()))?;
    assert_eq!(messages(&applied), vec!["10% discount applied!"]);

    let page = pages::cart_page(&storefront)?;
    assert_eq!(page.summary.subtotal, "$89.99");
    assert_eq!(page.summary.discount.as_deref(), Some("-$9.00"));
    assert_eq!(page.summary.shipping, "FREE");
    assert_eq!(page.summary.tax, "$6.48");
    assert_eq!(page.summary.total, "$87.47");

    let cleared = storefront.dispatch(Action::ClearCart)?;
    assert_eq!(messages(&cleared), vec!["Cart cleared!"]);
    assert!(storefront.cart().is_empty());

    Ok(())
}

#[test]
fn save_and_restore_for_later() -> TestResult {
    let (mut storefront, _store) = open_storefront()?;
    let now: Timestamp = "2024-05-01T09:30:00Z".parse()?;

    let empty = storefront.dispatch_at(Action::SaveForLater, now)?;
    assert_eq!(messages(&empty), vec!["Your cart is empty!"]);

    storefront.dispatch(Action::AddToCart {
        id: ProductId::new(4),
        quantity: 2,
    })?;

    let saved = storefront.dispatch_at(Action::SaveForLater, now)?;
    assert_eq!(messages(&saved), vec!["Cart saved for later!"]);

    storefront.dispatch(Action::ClearCart)?;

    let missing = storefront.dispatch(Action::RestoreSaved(1))?;
    assert_eq!(messages(&missing), vec!["Saved cart not found"]);

    let restored = storefront.dispatch(Action::RestoreSaved(now.as_millisecond()))?;
    assert_eq!(messages(&restored), vec!["Saved cart loaded!"]);
    assert_eq!(storefront.cart().total_items(), 2);

    Ok(())
}

#[test]
fn wishlist_add_twice() -> TestResult {
    let (mut storefront, store) = open_storefront()?;
    let event = UiEvent::new(classes::WISHLIST_BTN).with_product(ProductId::new(3));

    assert_eq!(messages(&storefront.handle(&event)?), vec!["Added to wishlist!"]);
    assert_eq!(messages(&storefront.handle(&event)?), vec!["Already in wishlist!"]);
    assert_eq!(store.get("wishlist")?.as_deref(), Some("[3]"));

    Ok(())
}

#[test]
fn buy_now_navigates_to_cart() -> TestResult {
    let (mut storefront, _store) = open_storefront()?;

    let dispatch = storefront.dispatch(Action::BuyNow {
        id: ProductId::new(9),
        quantity: 1,
    })?;

    assert_eq!(messages(&dispatch), vec!["Item added to cart!"]);
    assert_eq!(
        dispatch.scheduled.map(|scheduled| scheduled.then),
        Some(FollowUp::Navigate(Route::Cart))
    );

    let moved = storefront.resume(FollowUp::Navigate(Route::Cart))?;
    assert_eq!(moved.navigate, Some(Route::Cart));

    Ok(())
}

#[test]
fn card_click_and_continue_shopping_navigate() -> TestResult {
    let (mut storefront, _store) = open_storefront()?;

    let card = UiEvent::new(classes::PRODUCT_CARD).with_product(ProductId::new(5));

    assert_eq!(
        storefront.handle(&card)?.navigate,
        Some(Route::Product(ProductId::new(5)))
    );
    assert_eq!(
        storefront.dispatch(Action::ContinueShopping)?.navigate,
        Some(Route::Shop)
    );

    Ok(())
}

#[test]
fn sort_select_rerenders_listing() -> TestResult {
    let (mut storefront, _store) = open_storefront()?;

    let event = UiEvent::new(classes::SORT_SELECT).with_value("price-desc");
    let listing = storefront.handle(&event)?.listing.ok_or("listing not re-rendered")?;

    assert_eq!(
        listing.cards().iter().map(|card| card.id.get()).collect::<Vec<_>>(),
        vec![2, 11, 1, 10, 9, 12, 5, 4, 6, 3, 7, 8]
    );

    Ok(())
}

#[test]
fn home_shows_featured_products() -> TestResult {
    let (storefront, _store) = open_storefront()?;

    let home = pages::home(&storefront)?;

    assert_eq!(
        home.featured.cards().iter().map(|card| card.id.get()).collect::<Vec<_>>(),
        vec![3, 4, 10, 1, 8, 6]
    );
    assert_eq!(home.cart.badge.count, 0);

    Ok(())
}

#[test]
fn shop_defaults_to_name_order_and_filters() -> TestResult {
    let (storefront, _store) = open_storefront()?;

    let shop = pages::shop(&storefront, &ShopQuery::default())?;

    assert_eq!(shop.sort, "name-asc");
    assert_eq!(shop.products.cards().first().map(|card| card.id.get()), Some(9));

    let fashion = ShopQuery {
        category: "Fashion".to_string(),
        ..ShopQuery::default()
    };
    let listing = pages::shop_listing(&storefront, &fashion);

    assert_eq!(
        listing.cards().iter().map(|card| card.id.get()).collect::<Vec<_>>(),
        vec![5, 12]
    );

    let nothing = ShopQuery {
        search: "telescope".to_string(),
        ..ShopQuery::default()
    };

    assert!(matches!(
        pages::shop_listing(&storefront, &nothing),
        ProductGridView::Empty { .. }
    ));
    assert_eq!(pages::shop_loading(), ProductGridView::Loading);

    Ok(())
}

#[test]
fn product_page_bootstrap() -> TestResult {
    let (storefront, _store) = open_storefront()?;

    assert_eq!(
        pages::product(&storefront, "")?,
        ProductPage::Redirect(Route::Shop)
    );
    assert_eq!(
        pages::product(&storefront, "?id=abc")?,
        ProductPage::Redirect(Route::Shop)
    );

    let ProductPage::Detail { view, .. } = pages::product(&storefront, "?id=404")? else {
        panic!("Expected a detail page");
    };
    assert_eq!(view.title(), PRODUCT_NOT_FOUND);
    assert_eq!(
        view.related(),
        &ProductGridView::Empty {
            message: NO_RELATED_PRODUCTS
        }
    );

    let ProductPage::Detail { view, .. } = pages::product(&storefront, "?id=5")? else {
        panic!("Expected a detail page");
    };
    assert_eq!(view.title(), "Leather Wallet Brown");
    assert_eq!(
        view.related().cards().iter().map(|card| card.id.get()).collect::<Vec<_>>(),
        vec![12]
    );

    Ok(())
}

#[test]
fn state_survives_restart() -> TestResult {
    let (mut storefront, store) = open_storefront()?;

    storefront.dispatch(Action::AddToCart {
        id: ProductId::new(7),
        quantity: 3,
    })?;
    storefront.dispatch(Action::AddToWishlist(ProductId::new(7)))?;

    let restarted = Storefront::new(Catalog::sample()?, Rc::clone(&store));

    assert_eq!(restarted.cart().items(), storefront.cart().items());
    assert!(restarted.wishlist().contains(ProductId::new(7)));

    Ok(())
}
