//! Command handlers
//!
//! Each command loads the storefront from the data directory, runs one page
//! bootstrap or UI event, and writes the result to stdout.

use std::{io, thread};

use storefront::{
    catalog::Catalog,
    events::{Action, UiEvent},
    pages::{self, LISTING_DELAY, ProductPage, Route, ShopQuery},
    products::ProductId,
    store::FileStore,
    storefront::{Dispatch, FollowUp, Storefront},
    views::{classes, ids},
};
use tracing::{debug, info};

use crate::{
    config::{CartCommand, CheckoutButton, Cli, Command, WishlistCommand},
    output,
};

struct Session<W> {
    storefront: Storefront<FileStore>,
    out: W,
    wait: bool,
}

/// Run the parsed command against the configured data directory.
///
/// # Errors
///
/// Returns a message describing the first failure.
pub fn run(cli: Cli) -> Result<(), String> {
    let store = FileStore::open(&cli.data_dir)
        .map_err(|error| format!("failed to open {}: {error}", cli.data_dir.display()))?;

    let catalog = Catalog::sample().map_err(|error| format!("failed to load catalog: {error}"))?;

    info!(data_dir = %cli.data_dir.display(), "opened storefront data");

    let mut session = Session {
        storefront: Storefront::new(catalog, store),
        out: io::stdout().lock(),
        wait: !cli.no_wait,
    };

    session.run(cli.command)
}

impl<W: io::Write> Session<W> {
    fn run(&mut self, command: Command) -> Result<(), String> {
        match command {
            Command::Home => self.home(),
            Command::Shop(args) => self.shop(&ShopQuery {
                sort: args.sort,
                category: args.category,
                search: args.search,
            }),
            Command::Product { query } => self.product(&query),
            Command::Cart { command } => self.cart(command.unwrap_or(CartCommand::Show)),
            Command::Checkout { button } => self.checkout(button),
            Command::Wishlist { command } => self.wishlist(command),
            Command::Buy { id, quantity } => self.event(
                UiEvent::new(classes::BUY_NOW_BTN)
                    .with_product(ProductId::new(id))
                    .with_value(quantity.to_string()),
            ),
        }
    }

    fn home(&mut self) -> Result<(), String> {
        let page = pages::home(&self.storefront).map_err(|error| error.to_string())?;

        output::write_home(&mut self.out, &page).map_err(write_error)
    }

    fn shop(&mut self, query: &ShopQuery) -> Result<(), String> {
        if self.wait {
            output::write_grid(&mut self.out, "Shop", &pages::shop_loading()).map_err(write_error)?;
            thread::sleep(LISTING_DELAY);
        }

        let page = pages::shop(&self.storefront, query).map_err(|error| error.to_string())?;

        output::write_shop(&mut self.out, &page).map_err(write_error)
    }

    fn product(&mut self, query: &str) -> Result<(), String> {
        let query = if query.contains('=') {
            query.to_string()
        } else {
            format!("id={query}")
        };

        let page = pages::product(&self.storefront, &query).map_err(|error| error.to_string())?;

        if let ProductPage::Redirect(route) = page {
            debug!(%route, "product page redirected");

            return self.navigate(route);
        }

        output::write_product(&mut self.out, &page).map_err(write_error)
    }

    fn cart_page(&mut self) -> Result<(), String> {
        let page = pages::cart_page(&self.storefront).map_err(|error| error.to_string())?;

        output::write_cart_page(&mut self.out, &page).map_err(write_error)
    }

    fn cart(&mut self, command: CartCommand) -> Result<(), String> {
        match command {
            CartCommand::Show => self.cart_page(),
            CartCommand::Add { id, quantity } => self.action(Action::AddToCart {
                id: ProductId::new(id),
                quantity,
            }),
            CartCommand::Set { id, quantity } => self.event(
                UiEvent::new(classes::QUANTITY_INPUT)
                    .with_product(ProductId::new(id))
                    .with_value(quantity),
            ),
            CartCommand::Remove { id } => {
                self.event(UiEvent::new(classes::REMOVE_BTN).with_product(ProductId::new(id)))
            }
            CartCommand::Clear => self.event(UiEvent::new(classes::CLEAR_CART_BTN)),
            CartCommand::Save => self.event(UiEvent::new(classes::SAVE_CART_BTN)),
            CartCommand::Saved => {
                let saved = self.storefront.cart().saved_carts();

                output::write_saved_carts(&mut self.out, &saved).map_err(write_error)
            }
            CartCommand::Restore { id } => {
                self.event(UiEvent::new(classes::LOAD_SAVED_CART_BTN).with_value(id.to_string()))
            }
            CartCommand::Summary { code } => {
                if let Some(code) = code {
                    let dispatch = self.dispatch(Action::ApplyDiscount(code))?;

                    output::write_notices(&mut self.out, &dispatch.notices).map_err(write_error)?;
                }

                self.cart_page()
            }
        }
    }

    fn checkout(&mut self, button: CheckoutButton) -> Result<(), String> {
        let button_id = match button {
            CheckoutButton::Sidebar => ids::CHECKOUT_BTN_SIDEBAR,
            CheckoutButton::Page => ids::CHECKOUT_BTN,
        };

        self.event(UiEvent::new(classes::CHECKOUT_BTN).with_value(button_id))
    }

    fn wishlist(&mut self, command: WishlistCommand) -> Result<(), String> {
        match command {
            WishlistCommand::Add { id } => {
                self.event(UiEvent::new(classes::WISHLIST_BTN).with_product(ProductId::new(id)))
            }
            WishlistCommand::List => {
                let catalog = self.storefront.catalog();

                let products: Vec<_> = self
                    .storefront
                    .wishlist()
                    .ids()
                    .iter()
                    .filter_map(|id| catalog.get_by_id(*id))
                    .collect();

                output::write_wishlist(&mut self.out, &products).map_err(write_error)
            }
        }
    }

    fn event(&mut self, event: UiEvent) -> Result<(), String> {
        let dispatch = self
            .storefront
            .handle(&event)
            .map_err(|error| error.to_string())?;

        self.follow(dispatch)
    }

    fn action(&mut self, action: Action) -> Result<(), String> {
        let dispatch = self.dispatch(action)?;

        self.follow(dispatch)
    }

    fn dispatch(&mut self, action: Action) -> Result<Dispatch, String> {
        self.storefront
            .dispatch(action)
            .map_err(|error| error.to_string())
    }

    /// Show a dispatch result, then run any delayed follow-up.
    fn follow(&mut self, dispatch: Dispatch) -> Result<(), String> {
        output::write_notices(&mut self.out, &dispatch.notices).map_err(write_error)?;

        if let Some(regions) = &dispatch.cart {
            output::write_regions(&mut self.out, regions).map_err(write_error)?;
        }

        if let Some(route) = dispatch.navigate {
            return self.navigate(route);
        }

        let Some(scheduled) = dispatch.scheduled else {
            return Ok(());
        };

        if self.wait {
            thread::sleep(scheduled.delay);
        }

        match scheduled.then {
            FollowUp::Navigate(route) => self.navigate(route),
            FollowUp::CompleteCheckout => {
                let finished = self
                    .storefront
                    .resume(FollowUp::CompleteCheckout)
                    .map_err(|error| error.to_string())?;

                self.follow(finished)
            }
        }
    }

    fn navigate(&mut self, route: Route) -> Result<(), String> {
        writeln!(self.out, "\n→ {route}").map_err(write_error)?;

        match route {
            Route::Home => self.home(),
            Route::Shop => self.shop(&ShopQuery::default()),
            Route::Product(id) => self.product(&id.to_string()),
            Route::Cart => self.cart_page(),
        }
    }
}

fn write_error(error: io::Error) -> String {
    format!("failed to write output: {error}")
}
