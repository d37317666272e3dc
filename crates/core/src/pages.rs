//! Pages
//!
//! Routes between the storefront's pages and the bootstrap run when each page
//! loads.

use std::{fmt, time::Duration};

use crate::{
    cart::SavedCart,
    catalog::{ALL_CATEGORIES, SortKey, sort},
    pricing::TotalPriceError,
    products::ProductId,
    store::BlobStore,
    storefront::Storefront,
    views::{
        CartRegions, CartSummaryView, CartView, NO_PRODUCTS_FOUND, ProductDetailView,
        ProductGridView, Region, render_cart, render_product_detail, render_product_grid,
        render_regions, render_summary,
    },
};

/// Simulated latency before the shop listing is shown.
pub const LISTING_DELAY: Duration = Duration::from_millis(500);

/// Delay between "Buy now" and the move to the cart page.
pub const BUY_NOW_DELAY: Duration = Duration::from_millis(500);

/// A storefront page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page with featured products
    Home,

    /// Full listing
    Shop,

    /// Product detail page
    Product(ProductId),

    /// Cart page
    Cart,
}

impl Route {
    /// Relative link to the page.
    #[must_use]
    pub fn href(self) -> String {
        match self {
            Route::Home => "index.html".to_string(),
            Route::Shop => "shop.html".to_string(),
            Route::Product(id) => format!("product.html?id={id}"),
            Route::Cart => "cart.html".to_string(),
        }
    }

    /// Resolve a relative link. Product links without a usable id resolve to
    /// the shop.
    #[must_use]
    pub fn parse(href: &str) -> Option<Self> {
        let (path, query) = href.split_once('?').unwrap_or((href, ""));

        let route = match path.trim_start_matches('/') {
            "" | "index.html" => Route::Home,
            "shop.html" => Route::Shop,
            "cart.html" => Route::Cart,
            "product.html" => product_id_from_query(query).map_or(Route::Shop, Route::Product),
            _ => return None,
        };

        Some(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

/// The `id` parameter of a query string, if present and numeric.
#[must_use]
pub fn product_id_from_query(query: &str) -> Option<ProductId> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "id")
        .and_then(|(_, value)| value.parse().ok())
}

/// Home page contents.
#[derive(Debug, Clone, PartialEq)]
pub struct HomePage {
    /// Featured products
    pub featured: ProductGridView,

    /// Cart regions
    pub cart: CartRegions,
}

/// Render the home page.
///
/// # Errors
///
/// Returns a [`TotalPriceError`] if a cart total overflows.
pub fn home<S: BlobStore + Clone>(storefront: &Storefront<S>) -> Result<HomePage, TotalPriceError> {
    let featured = storefront.catalog().featured();

    Ok(HomePage {
        featured: render_product_grid(&featured, NO_PRODUCTS_FOUND),
        cart: render_regions(storefront.cart(), storefront.discount())?,
    })
}

/// Shop listing options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopQuery {
    /// Sort key, unrecognised keys keep catalog order
    pub sort: String,

    /// Category filter, [`ALL_CATEGORIES`] for every product
    pub category: String,

    /// Search text, blank for every product
    pub search: String,
}

impl Default for ShopQuery {
    fn default() -> Self {
        Self {
            sort: SortKey::default().as_str().to_string(),
            category: ALL_CATEGORIES.to_string(),
            search: String::new(),
        }
    }
}

impl ShopQuery {
    /// Default listing with another sort key.
    pub fn sorted(sort: impl Into<String>) -> Self {
        Self {
            sort: sort.into(),
            ..Self::default()
        }
    }
}

/// Shop page contents.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopPage {
    /// Sort key the listing was rendered with
    pub sort: String,

    /// Categories offered by the filter
    pub categories: Vec<String>,

    /// Listing
    pub products: ProductGridView,

    /// Cart regions
    pub cart: CartRegions,
}

/// Placeholder shown for [`LISTING_DELAY`] before the listing renders.
#[must_use]
pub fn shop_loading() -> ProductGridView {
    ProductGridView::Loading
}

/// Render the shop listing for `query`.
#[must_use]
pub fn shop_listing<S: BlobStore + Clone>(
    storefront: &Storefront<S>,
    query: &ShopQuery,
) -> ProductGridView {
    let catalog = storefront.catalog();

    let products: Vec<_> = catalog
        .search(&query.search)
        .into_iter()
        .filter(|product| {
            query.category.trim().is_empty()
                || query.category == ALL_CATEGORIES
                || product.category == query.category
        })
        .collect();

    render_product_grid(&sort(products, &query.sort), NO_PRODUCTS_FOUND)
}

/// Render the shop page.
///
/// # Errors
///
/// Returns a [`TotalPriceError`] if a cart total overflows.
pub fn shop<S: BlobStore + Clone>(
    storefront: &Storefront<S>,
    query: &ShopQuery,
) -> Result<ShopPage, TotalPriceError> {
    Ok(ShopPage {
        sort: query.sort.clone(),
        categories: storefront
            .catalog()
            .categories()
            .into_iter()
            .map(str::to_string)
            .collect(),
        products: shop_listing(storefront, query),
        cart: render_regions(storefront.cart(), storefront.discount())?,
    })
}

/// Product page bootstrap outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductPage {
    /// No usable id in the query, go to this route instead
    Redirect(Route),

    /// Detail view, possibly "Product Not Found"
    Detail {
        /// Detail view
        view: ProductDetailView,

        /// Cart regions
        cart: CartRegions,
    },
}

/// Render the product page addressed by a query string such as `?id=3`.
///
/// # Errors
///
/// Returns a [`TotalPriceError`] if a cart total overflows.
pub fn product<S: BlobStore + Clone>(
    storefront: &Storefront<S>,
    query: &str,
) -> Result<ProductPage, TotalPriceError> {
    let Some(id) = product_id_from_query(query) else {
        return Ok(ProductPage::Redirect(Route::Shop));
    };

    let catalog = storefront.catalog();
    let product = catalog.get_by_id(id);

    let related = product
        .map(|product| catalog.related(id, &product.category))
        .unwrap_or_default();

    Ok(ProductPage::Detail {
        view: render_product_detail(product, &related),
        cart: render_regions(storefront.cart(), storefront.discount())?,
    })
}

/// Cart page contents.
#[derive(Debug, Clone, PartialEq)]
pub struct CartPage {
    /// Line items with per-line totals
    pub cart: CartView,

    /// Order summary
    pub summary: CartSummaryView,

    /// Carts saved for later
    pub saved_carts: Vec<SavedCart>,

    /// Sidebar copy of the cart
    pub sidebar: CartView,
}

/// Render the cart page.
///
/// # Errors
///
/// Returns a [`TotalPriceError`] if a total overflows.
pub fn cart_page<S: BlobStore + Clone>(
    storefront: &Storefront<S>,
) -> Result<CartPage, TotalPriceError> {
    let cart = storefront.cart();

    Ok(CartPage {
        cart: render_cart(cart, Region::Page)?,
        summary: render_summary(cart, storefront.discount())?,
        saved_carts: cart.saved_carts(),
        sidebar: render_cart(cart, Region::Sidebar)?,
    })
}
