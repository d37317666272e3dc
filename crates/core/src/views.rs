//! Views
//!
//! Render functions turn catalog and cart state into plain view records. They
//! never touch the blob store; a front end re-renders a whole region from the
//! returned record on every refresh.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};

use crate::{
    cart::{CartStore, LineItem},
    discounts::DiscountCode,
    pages::Route,
    pricing::{CartSummary, TotalPriceError},
    products::{Product, ProductId},
    store::BlobStore,
};

/// Element ids the page templates provide.
pub mod ids {
    /// Header badge with the cart item count
    pub const CART_COUNT: &str = "cart-count";
    /// Cart page line item container
    pub const CART_ITEMS: &str = "cart-items";
    /// Sidebar line item container
    pub const CART_ITEMS_SIDEBAR: &str = "cart-items-sidebar";
    /// Cart page total
    pub const CART_TOTAL: &str = "cart-total";
    /// Sidebar total
    pub const CART_TOTAL_SIDEBAR: &str = "cart-total-sidebar";
    /// Cart page empty state
    pub const EMPTY_CART_MESSAGE: &str = "empty-cart-message";
    /// Cart page checkout button
    pub const CHECKOUT_BTN: &str = "checkout-btn";
    /// Sidebar checkout button
    pub const CHECKOUT_BTN_SIDEBAR: &str = "checkout-btn-sidebar";
    /// Detail page image
    pub const PRODUCT_MAIN_IMAGE: &str = "product-main-image";
    /// Detail page title
    pub const PRODUCT_TITLE: &str = "product-title";
    /// Detail page price
    pub const PRODUCT_PRICE: &str = "product-price";
    /// Detail page description
    pub const PRODUCT_DESCRIPTION: &str = "product-description";
    /// Detail page category
    pub const PRODUCT_CATEGORY: &str = "product-category";
    /// Detail page stock label
    pub const PRODUCT_AVAILABILITY: &str = "product-availability";
    /// Detail page related products grid
    pub const RELATED_PRODUCTS_GRID: &str = "related-products-grid";
    /// Home and shop product grid
    pub const PRODUCTS_GRID: &str = "products-grid";
    /// Shop sort dropdown
    pub const SORT_SELECT: &str = "sort-select";
}

/// Class names that event delegation matches on.
pub mod classes {
    /// Add to cart button, carries `data-product-id` and `data-quantity`
    pub const ADD_TO_CART_BTN: &str = "add-to-cart-btn";
    /// Line item +/- button
    pub const QUANTITY_BTN: &str = "quantity-btn";
    /// Line item quantity field
    pub const QUANTITY_INPUT: &str = "quantity-input";
    /// Line item remove button
    pub const REMOVE_BTN: &str = "remove-btn";
    /// Product card, navigates to the detail page
    pub const PRODUCT_CARD: &str = "product-card";
    /// Checkout buttons
    pub const CHECKOUT_BTN: &str = "checkout-btn";
    /// Sort dropdown
    pub const SORT_SELECT: &str = "sort-select";
    /// Continue shopping button
    pub const CONTINUE_SHOPPING_BTN: &str = "continue-shopping-btn";
    /// Clear cart button
    pub const CLEAR_CART_BTN: &str = "clear-cart-btn";
    /// Save for later button
    pub const SAVE_CART_BTN: &str = "save-cart-btn";
    /// Restore saved cart button, carries the saved cart id as its value
    pub const LOAD_SAVED_CART_BTN: &str = "load-saved-cart-btn";
    /// Wishlist button
    pub const WISHLIST_BTN: &str = "wishlist-btn";
    /// Buy now button
    pub const BUY_NOW_BTN: &str = "buy-now-btn";
    /// Discount code apply button, carries the code as its value
    pub const APPLY_DISCOUNT_BTN: &str = "apply-discount-btn";
}

/// Largest quantity selectable on the detail page.
pub const MAX_DETAIL_QUANTITY: u32 = 99;

const STARS: u8 = 5;

/// Format money for display, e.g. `$1,299.97`.
#[must_use]
pub fn format_price(money: &Money<'_, Currency>) -> String {
    format!("{money}")
}

/// Star breakdown of a rating out of five.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    /// Whole stars
    pub full: u8,

    /// Whether a half star follows the whole stars
    pub half: bool,

    /// Outlined stars
    pub empty: u8,
}

impl StarRating {
    /// Whole part of the rating as full stars, any fraction as one half star,
    /// the rest outlined.
    #[must_use]
    pub fn from_rating(rating: Decimal) -> Self {
        let rating = rating.clamp(Decimal::ZERO, Decimal::from(STARS));

        let full = rating.floor().to_u8().unwrap_or(0);
        let ceil = rating.ceil().to_u8().unwrap_or(STARS);

        Self {
            full,
            half: !rating.fract().is_zero(),
            empty: STARS.saturating_sub(ceil),
        }
    }
}

impl std::fmt::Display for StarRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for _ in 0..self.full {
            f.write_str("★")?;
        }

        if self.half {
            f.write_str("⯪")?;
        }

        for _ in 0..self.empty {
            f.write_str("☆")?;
        }

        Ok(())
    }
}

/// Product card in a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    /// Product id, also the card's `data-product-id`
    pub id: ProductId,

    /// Title
    pub title: String,

    /// Image URL or placeholder
    pub image_url: String,

    /// Category
    pub category: String,

    /// Raw rating
    pub rating: Decimal,

    /// Star breakdown of the rating
    pub stars: StarRating,

    /// Formatted price
    pub price: String,

    /// Detail page link
    pub href: String,

    /// Quantity the card's add to cart button adds
    pub add_quantity: u32,
}

impl ProductCard {
    /// Card for `product`.
    #[must_use]
    pub fn new(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            image_url: product.image_url(),
            category: product.category.clone(),
            rating: product.rating,
            stars: StarRating::from_rating(product.rating),
            price: format_price(&product.price),
            href: Route::Product(product.id).href(),
            add_quantity: 1,
        }
    }
}

/// Empty-state text for the shop and home grids.
pub const NO_PRODUCTS_FOUND: &str = "No products found";

/// Empty-state text for the related products grid.
pub const NO_RELATED_PRODUCTS: &str = "No related products found.";

/// Text shown while a listing is loading.
pub const LOADING_PRODUCTS: &str = "Loading products...";

/// Contents of a product grid.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductGridView {
    /// Listing not ready yet
    Loading,

    /// Nothing to show
    Empty {
        /// Empty-state message
        message: &'static str,
    },

    /// Cards in display order
    Cards(Vec<ProductCard>),
}

impl ProductGridView {
    /// Cards of the grid, empty unless the grid has products.
    #[must_use]
    pub fn cards(&self) -> &[ProductCard] {
        match self {
            ProductGridView::Cards(cards) => cards,
            ProductGridView::Loading | ProductGridView::Empty { .. } => &[],
        }
    }
}

/// Render `products` as a grid, falling back to `empty_message`.
#[must_use]
pub fn render_product_grid(products: &[&Product], empty_message: &'static str) -> ProductGridView {
    if products.is_empty() {
        return ProductGridView::Empty {
            message: empty_message,
        };
    }

    ProductGridView::Cards(products.iter().map(|product| ProductCard::new(product)).collect())
}

/// Label shown for purchasable products.
pub const IN_STOCK: &str = "In Stock";

/// Label shown on the stock line and purchase buttons of unavailable products.
pub const OUT_OF_STOCK: &str = "Out of Stock";

/// Title shown when a product id does not resolve.
pub const PRODUCT_NOT_FOUND: &str = "Product Not Found";

/// Body shown when a product id does not resolve.
pub const PRODUCT_NOT_FOUND_MESSAGE: &str =
    "Sorry, the product you're looking for could not be found.";

/// Detail page contents for a found product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    /// Product id
    pub id: ProductId,

    /// Title
    pub title: String,

    /// Image URL or placeholder
    pub image_url: String,

    /// Formatted price
    pub price: String,

    /// Description
    pub description: String,

    /// Category
    pub category: String,

    /// "In Stock" or "Out of Stock"
    pub availability: &'static str,

    /// Raw rating
    pub rating: Decimal,

    /// Star breakdown of the rating
    pub stars: StarRating,

    /// Quantity input maximum, zero when out of stock
    pub quantity_max: u32,

    /// Whether the quantity input and purchase buttons are disabled
    pub purchase_disabled: bool,

    /// Add to cart button label
    pub add_to_cart_label: &'static str,

    /// Buy now button label
    pub buy_now_label: &'static str,

    /// Related products grid
    pub related: ProductGridView,
}

/// Detail page view.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductDetailView {
    /// The product exists
    Found(Box<ProductDetail>),

    /// No product has the requested id
    NotFound {
        /// Related grid, always empty
        related: ProductGridView,
    },
}

impl ProductDetailView {
    /// Title element text.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            ProductDetailView::Found(detail) => &detail.title,
            ProductDetailView::NotFound { .. } => PRODUCT_NOT_FOUND,
        }
    }

    /// Related products grid.
    #[must_use]
    pub fn related(&self) -> &ProductGridView {
        match self {
            ProductDetailView::Found(detail) => &detail.related,
            ProductDetailView::NotFound { related } => related,
        }
    }
}

/// Render the detail view for an optional product and its related products.
#[must_use]
pub fn render_product_detail(product: Option<&Product>, related: &[&Product]) -> ProductDetailView {
    let related = render_product_grid(related, NO_RELATED_PRODUCTS);

    let Some(product) = product else {
        return ProductDetailView::NotFound { related };
    };

    let (availability, quantity_max, add_to_cart_label, buy_now_label) = if product.in_stock {
        (IN_STOCK, MAX_DETAIL_QUANTITY, "Add to Cart", "Buy Now")
    } else {
        (OUT_OF_STOCK, 0, OUT_OF_STOCK, OUT_OF_STOCK)
    };

    ProductDetailView::Found(Box::new(ProductDetail {
        id: product.id,
        title: product.title.clone(),
        image_url: product.image_url(),
        price: format_price(&product.price),
        description: product.description.clone(),
        category: product.category.clone(),
        availability,
        rating: product.rating,
        stars: StarRating::from_rating(product.rating),
        quantity_max,
        purchase_disabled: !product.in_stock,
        add_to_cart_label,
        buy_now_label,
        related,
    }))
}

/// Cart render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Slide-out cart on every page
    Sidebar,

    /// Dedicated cart page
    Page,
}

impl Region {
    /// Id of the region's line item container.
    #[must_use]
    pub const fn items_id(self) -> &'static str {
        match self {
            Region::Sidebar => ids::CART_ITEMS_SIDEBAR,
            Region::Page => ids::CART_ITEMS,
        }
    }

    /// Id of the region's total element.
    #[must_use]
    pub const fn total_id(self) -> &'static str {
        match self {
            Region::Sidebar => ids::CART_TOTAL_SIDEBAR,
            Region::Page => ids::CART_TOTAL,
        }
    }

    /// Id of the region's checkout button.
    #[must_use]
    pub const fn checkout_id(self) -> &'static str {
        match self {
            Region::Sidebar => ids::CHECKOUT_BTN_SIDEBAR,
            Region::Page => ids::CHECKOUT_BTN,
        }
    }
}

/// One line item as rendered in a cart region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    /// Product id
    pub id: ProductId,

    /// Snapshot title
    pub title: String,

    /// Snapshot image or placeholder
    pub image_url: String,

    /// Formatted unit price
    pub price: String,

    /// Quantity
    pub quantity: u32,

    /// Quantity the minus button sets; zero removes the line
    pub decrement_to: i64,

    /// Quantity the plus button sets
    pub increment_to: i64,

    /// Formatted line total, shown on the cart page only
    pub line_total: Option<String>,
}

/// Empty-state heading shared by both cart regions.
pub const EMPTY_CART: &str = "Your cart is empty";

/// Empty-state body on the cart page.
pub const EMPTY_CART_HINT: &str = "Looks like you haven't added any items to your cart yet.";

/// A cart region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    /// Target region
    pub region: Region,

    /// Lines in cart order, empty when the cart is empty
    pub lines: Vec<CartLineView>,

    /// Formatted cart total
    pub total: String,

    /// Empty-state message, present only when there are no lines
    pub empty_message: Option<&'static str>,
}

impl CartView {
    /// Whether the empty state is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Render one line item for `region`.
///
/// # Errors
///
/// Returns a [`TotalPriceError`] if the line total overflows.
pub fn render_cart_line(line: &LineItem, region: Region) -> Result<CartLineView, TotalPriceError> {
    let line_total = match region {
        Region::Sidebar => None,
        Region::Page => Some(format_price(&line.total()?)),
    };

    let quantity = i64::from(line.quantity());

    Ok(CartLineView {
        id: line.id(),
        title: line.title().to_string(),
        image_url: line.image_url(),
        price: format_price(line.price()),
        quantity: line.quantity(),
        decrement_to: quantity - 1,
        increment_to: quantity + 1,
        line_total,
    })
}

/// Render a cart region from the current cart snapshot.
///
/// # Errors
///
/// Returns a [`TotalPriceError`] if a total overflows.
pub fn render_cart<S: BlobStore>(
    cart: &CartStore<S>,
    region: Region,
) -> Result<CartView, TotalPriceError> {
    let lines = cart
        .items()
        .iter()
        .map(|line| render_cart_line(line, region))
        .collect::<Result<Vec<_>, _>>()?;

    let empty_message = lines.is_empty().then_some(EMPTY_CART);

    Ok(CartView {
        region,
        lines,
        total: format_price(&cart.total_price()?),
        empty_message,
    })
}

/// Header cart count badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartBadge {
    /// Sum of line quantities
    pub count: u64,
}

/// Render the cart count badge.
#[must_use]
pub fn render_badge<S: BlobStore>(cart: &CartStore<S>) -> CartBadge {
    CartBadge {
        count: cart.total_items(),
    }
}

/// Cart page order summary, formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummaryView {
    /// Subtotal
    pub subtotal: String,

    /// Discount taken off, present when a code is applied
    pub discount: Option<String>,

    /// Applied discount code
    pub discount_code: Option<&'static str>,

    /// Shipping, "FREE" above the threshold
    pub shipping: String,

    /// Tax
    pub tax: String,

    /// Total payable
    pub total: String,
}

/// Render the cart page summary.
///
/// # Errors
///
/// Returns a [`TotalPriceError`] if any amount overflows.
pub fn render_summary<S: BlobStore>(
    cart: &CartStore<S>,
    discount: Option<&DiscountCode>,
) -> Result<CartSummaryView, TotalPriceError> {
    let summary = CartSummary::calculate(cart.total_price()?, discount)?;

    Ok(summary_view(&summary, discount))
}

fn summary_view(summary: &CartSummary, discount: Option<&DiscountCode>) -> CartSummaryView {
    let shipping = if summary.shipping.to_minor_units() == 0 {
        "FREE".to_string()
    } else {
        format_price(&summary.shipping)
    };

    CartSummaryView {
        subtotal: format_price(&summary.subtotal),
        discount: discount.map(|_code| format!("-{}", format_price(&summary.discount))),
        discount_code: discount.map(DiscountCode::code),
        shipping,
        tax: format_price(&summary.tax),
        total: format_price(&summary.total),
    }
}

/// Every cart-derived region, refreshed together after a cart change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRegions {
    /// Header count
    pub badge: CartBadge,

    /// Sidebar region
    pub sidebar: CartView,

    /// Cart page region
    pub page: CartView,

    /// Cart page summary
    pub summary: CartSummaryView,
}

/// Render every cart region from one cart snapshot.
///
/// # Errors
///
/// Returns a [`TotalPriceError`] if a total overflows.
pub fn render_regions<S: BlobStore>(
    cart: &CartStore<S>,
    discount: Option<&DiscountCode>,
) -> Result<CartRegions, TotalPriceError> {
    Ok(CartRegions {
        badge: render_badge(cart),
        sidebar: render_cart(cart, Region::Sidebar)?,
        page: render_cart(cart, Region::Page)?,
        summary: render_summary(cart, discount)?,
    })
}
