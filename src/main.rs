//! Librarian - interactive library catalog manager

use std::io;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use librarian::{cli::Menu, config::AppConfig, repository::BooksRepository, Catalog};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing; logs go to stderr, the menu owns stdout
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("librarian={}", config.logging.level).into());

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs() {
        registry.with(fmt_layer.json()).init();
    } else {
        registry.with(fmt_layer).init();
    }

    tracing::info!("Starting Librarian v{}", env!("CARGO_PKG_VERSION"));

    let repository = BooksRepository::new(config.storage.data_file.clone());
    let mut catalog = Catalog::open(repository, config.loans.clone());

    let stdin = io::stdin();
    let mut menu = Menu::new(&mut catalog, stdin.lock(), io::stdout());
    menu.run().context("Terminal I/O failed")?;

    Ok(())
}
