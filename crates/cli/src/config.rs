//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, global = true, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Storefront terminal front end
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Browse the storefront and manage a cart", long_about = None)]
pub struct Cli {
    /// Directory holding cart, saved cart and wishlist files
    #[arg(long, global = true, env = "STOREFRONT_DATA_DIR", default_value = ".storefront")]
    pub data_dir: PathBuf,

    /// Skip simulated loading and checkout delays
    #[arg(long, global = true, env = "STOREFRONT_NO_WAIT")]
    pub no_wait: bool,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Load configuration from `.env`, the environment and arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments cannot be parsed.
    pub fn load() -> Result<Self, clap::Error> {
        // A missing .env file is fine
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Top-level commands, one per page or page action.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Featured products and the cart sidebar
    Home,

    /// Product listing
    Shop(ShopArgs),

    /// Product detail page, e.g. `product 3` or `product '?id=3'`
    Product {
        /// Product id or query string
        query: String,
    },

    /// Cart page and cart actions
    Cart {
        #[command(subcommand)]
        command: Option<CartCommand>,
    },

    /// Check out the current cart
    Checkout {
        /// Which checkout button to press
        #[arg(long = "from", value_enum, default_value_t = CheckoutButton::Page)]
        button: CheckoutButton,
    },

    /// Wishlist actions
    Wishlist {
        #[command(subcommand)]
        command: WishlistCommand,
    },

    /// Add to cart and go straight to the cart page
    Buy {
        /// Product id
        id: u32,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
}

/// Shop listing options.
#[derive(Debug, Args)]
pub struct ShopArgs {
    /// Sort key (name-asc, name-desc, price-asc, price-desc)
    #[arg(long, default_value = "name-asc")]
    pub sort: String,

    /// Category name, or `all`
    #[arg(long, default_value = "all")]
    pub category: String,

    /// Search text matched against title, category and description
    #[arg(long, default_value = "")]
    pub search: String,
}

/// Cart subcommands.
#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart page (default)
    Show,

    /// Add a product
    Add {
        /// Product id
        id: u32,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Type a quantity into a line's quantity field; zero or less removes
    Set {
        /// Product id
        id: u32,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: String,
    },

    /// Remove a line
    Remove {
        /// Product id
        id: u32,
    },

    /// Remove every line
    Clear,

    /// Put the cart aside for later
    Save,

    /// List carts saved for later
    Saved,

    /// Replace the cart with a saved cart
    Restore {
        /// Saved cart id
        id: i64,
    },

    /// Order summary, optionally with a discount code
    Summary {
        /// Discount code
        #[arg(long)]
        code: Option<String>,
    },
}

/// Wishlist subcommands.
#[derive(Clone, Copy, Debug, Subcommand)]
pub enum WishlistCommand {
    /// Wishlist a product
    Add {
        /// Product id
        id: u32,
    },

    /// List wishlisted products
    List,
}

/// Checkout buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CheckoutButton {
    /// Button in the cart sidebar
    Sidebar,

    /// Button on the cart page
    Page,
}
