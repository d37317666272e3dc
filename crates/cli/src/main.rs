//! Storefront terminal front end

use std::process;

mod commands;
mod config;
mod logging;
mod output;

use config::Cli;

/// Storefront CLI entry point
pub fn main() {
    // Help and version requests exit through clap as well
    let cli = Cli::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = logging::init_subscriber(&cli.logging) {
        fail(&error.to_string());
    }

    if let Err(error) = commands::run(cli) {
        fail(&error);
    }
}

fn fail(message: &str) -> ! {
    #[expect(
        clippy::print_stderr,
        reason = "errors are reported on stderr so page output stays on stdout"
    )]
    {
        eprintln!("{message}");
    }

    #[expect(clippy::exit, reason = "non-zero status for failed commands")]
    process::exit(1);
}
