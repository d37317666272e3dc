//! Terminal rendering of view records

use std::io;

use storefront::{
    cart::SavedCart,
    notices::{Notice, NoticeKind},
    pages::{CartPage, HomePage, ProductPage, ShopPage},
    products::Product,
    views::{
        CartRegions, CartSummaryView, CartView, EMPTY_CART_HINT, LOADING_PRODUCTS,
        PRODUCT_NOT_FOUND_MESSAGE, ProductDetailView, ProductGridView, Region,
    },
};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    right_aligned: Columns<std::ops::Range<usize>>,
) -> io::Result<()> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Alignment::center());
    table.modify(right_aligned, Alignment::right());

    writeln!(out, "{table}")
}

/// Write notices, one per line.
pub fn write_notices<'n>(
    out: &mut impl io::Write,
    notices: impl IntoIterator<Item = &'n Notice>,
) -> io::Result<()> {
    for notice in notices {
        let marker = match notice.kind {
            NoticeKind::Success => "✓",
            NoticeKind::Info => "i",
            NoticeKind::Error => "✗",
        };

        writeln!(out, "{marker} {}", notice.message)?;
    }

    Ok(())
}

/// Write a product grid as a table.
pub fn write_grid(out: &mut impl io::Write, title: &str, grid: &ProductGridView) -> io::Result<()> {
    writeln!(out, "\n{title}")?;

    let cards = match grid {
        ProductGridView::Loading => return writeln!(out, "{LOADING_PRODUCTS}"),
        ProductGridView::Empty { message } => return writeln!(out, "{message}"),
        ProductGridView::Cards(cards) => cards,
    };

    let mut builder = Builder::default();

    builder.push_record(["ID", "Product", "Category", "Rating", "Price"]);

    for card in cards {
        builder.push_record([
            card.id.to_string(),
            card.title.clone(),
            card.category.clone(),
            format!("{} ({}/5)", card.stars, card.rating),
            card.price.clone(),
        ]);
    }

    write_table(out, builder, Columns::new(4..5))
}

/// Write a cart region.
pub fn write_cart(out: &mut impl io::Write, cart: &CartView) -> io::Result<()> {
    let heading = match cart.region {
        Region::Sidebar => "Cart",
        Region::Page => "Shopping Cart",
    };

    writeln!(out, "\n{heading}")?;

    if let Some(message) = cart.empty_message {
        writeln!(out, "{message}")?;

        if cart.region == Region::Page {
            writeln!(out, "{EMPTY_CART_HINT}")?;
        }

        return Ok(());
    }

    let mut builder = Builder::default();

    match cart.region {
        Region::Sidebar => builder.push_record(["ID", "Item", "Price", "Qty"]),
        Region::Page => builder.push_record(["ID", "Item", "Price", "Qty", "Total"]),
    }

    for line in &cart.lines {
        let mut record = vec![
            line.id.to_string(),
            line.title.clone(),
            line.price.clone(),
            line.quantity.to_string(),
        ];

        record.extend(line.line_total.clone());

        builder.push_record(record);
    }

    let last = match cart.region {
        Region::Sidebar => 4,
        Region::Page => 5,
    };

    write_table(out, builder, Columns::new(2..last))?;

    writeln!(out, "Total: {}", cart.total)
}

/// Write the order summary.
pub fn write_summary(out: &mut impl io::Write, summary: &CartSummaryView) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["Order Summary", ""]);
    builder.push_record(["Subtotal", summary.subtotal.as_str()]);

    if let (Some(code), Some(discount)) = (summary.discount_code, &summary.discount) {
        builder.push_record([format!("Discount ({code})"), discount.clone()]);
    }

    builder.push_record(["Shipping", summary.shipping.as_str()]);
    builder.push_record(["Tax", summary.tax.as_str()]);
    builder.push_record(["Total", summary.total.as_str()]);

    write_table(out, builder, Columns::new(1..2))
}

/// Write the header badge and sidebar.
pub fn write_regions(out: &mut impl io::Write, regions: &CartRegions) -> io::Result<()> {
    writeln!(out, "\nItems in cart: {}", regions.badge.count)?;

    write_cart(out, &regions.sidebar)
}

/// Write the home page.
pub fn write_home(out: &mut impl io::Write, page: &HomePage) -> io::Result<()> {
    write_grid(out, "Featured Products", &page.featured)?;
    write_regions(out, &page.cart)
}

/// Write the shop page.
pub fn write_shop(out: &mut impl io::Write, page: &ShopPage) -> io::Result<()> {
    writeln!(out, "\nCategories: {}", page.categories.join(", "))?;
    write_grid(out, &format!("Shop (sorted by {})", page.sort), &page.products)?;
    write_regions(out, &page.cart)
}

/// Write the product page.
pub fn write_product(out: &mut impl io::Write, page: &ProductPage) -> io::Result<()> {
    let ProductPage::Detail { view, cart } = page else {
        return Ok(());
    };

    match view {
        ProductDetailView::Found(detail) => {
            writeln!(out, "\n{}", detail.title)?;
            writeln!(out, "{} ({}/5)", detail.stars, detail.rating)?;
            writeln!(out, "Price: {}", detail.price)?;
            writeln!(out, "Category: {}", detail.category)?;
            writeln!(out, "Availability: {}", detail.availability)?;
            writeln!(out, "Image: {}", detail.image_url)?;
            writeln!(out, "\n{}", detail.description)?;

            if detail.purchase_disabled {
                writeln!(out, "\n[{}]", detail.add_to_cart_label)?;
            } else {
                writeln!(
                    out,
                    "\n[{}] [{}] quantity 1..={}",
                    detail.add_to_cart_label, detail.buy_now_label, detail.quantity_max
                )?;
            }
        }
        ProductDetailView::NotFound { .. } => {
            writeln!(out, "\n{}", view.title())?;
            writeln!(out, "{PRODUCT_NOT_FOUND_MESSAGE}")?;
        }
    }

    write_grid(out, "Related Products", view.related())?;
    write_regions(out, cart)
}

/// Write the cart page.
pub fn write_cart_page(out: &mut impl io::Write, page: &CartPage) -> io::Result<()> {
    write_cart(out, &page.cart)?;

    if !page.cart.is_empty() {
        write_summary(out, &page.summary)?;
    }

    if !page.saved_carts.is_empty() {
        write_saved_carts(out, &page.saved_carts)?;
    }

    Ok(())
}

/// Write carts saved for later.
pub fn write_saved_carts(out: &mut impl io::Write, saved: &[SavedCart]) -> io::Result<()> {
    writeln!(out, "\nSaved Carts")?;

    if saved.is_empty() {
        return writeln!(out, "No saved carts");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Saved", "Items"]);

    for cart in saved {
        builder.push_record([
            cart.id.to_string(),
            cart.name.clone(),
            cart.date.to_string(),
            cart.total_items().to_string(),
        ]);
    }

    write_table(out, builder, Columns::new(3..4))
}

/// Write wishlisted products.
pub fn write_wishlist(out: &mut impl io::Write, products: &[&Product]) -> io::Result<()> {
    writeln!(out, "\nWishlist")?;

    if products.is_empty() {
        return writeln!(out, "Your wishlist is empty");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Product", "Category"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.title.clone(),
            product.category.clone(),
        ]);
    }

    write_table(out, builder, Columns::new(0..1))
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use storefront::{
        catalog::Catalog,
        events::Action,
        pages,
        products::ProductId,
        store::MemoryStore,
        storefront::Storefront,
    };
    use testresult::TestResult;

    use super::*;

    fn render(write: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> Result<String, Box<dyn std::error::Error>> {
        let mut out = Vec::new();

        write(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn home_lists_featured_products() -> TestResult {
        let storefront = Storefront::new(Catalog::sample()?, Rc::new(MemoryStore::new()));
        let page = pages::home(&storefront)?;

        let text = render(|out| write_home(out, &page))?;

        assert!(text.contains("Featured Products"));
        assert!(text.contains("Ceramic Coffee Mug Set"));
        assert!(text.contains("$29.99"));
        assert!(text.contains("Your cart is empty"));

        Ok(())
    }

    #[test]
    fn cart_page_shows_lines_and_summary() -> TestResult {
        let mut storefront = Storefront::new(Catalog::sample()?, Rc::new(MemoryStore::new()));

        storefront.dispatch(Action::AddToCart {
            id: ProductId::new(1),
            quantity: 3,
        })?;

        let page = pages::cart_page(&storefront)?;
        let text = render(|out| write_cart_page(out, &page))?;

        assert!(text.contains("Wireless Bluetooth Headphones"));
        assert!(text.contains("$299.97"));
        assert!(text.contains("Order Summary"));
        assert!(text.contains("FREE"));

        Ok(())
    }

    #[test]
    fn notices_are_marked_by_kind() -> TestResult {
        let notices = [Notice::success("Item added to cart!"), Notice::error("Your cart is empty!")];

        let text = render(|out| write_notices(out, &notices))?;

        assert_eq!(text, "✓ Item added to cart!\n✗ Your cart is empty!\n");

        Ok(())
    }
}
