//! # Till Checkout Library
//!
//! Console checkout for the Till convenience store.
//!
//! ## Module Organization
//! ```text
//! till_checkout/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── config.rs       ◄─── CheckoutConfig (TOML + env overrides)
//! ├── console.rs      ◄─── Prompt trait, stdin/stdout implementation
//! ├── session.rs      ◄─── Purchase loop
//! ├── view.rs         ◄─── Catalog, question, receipt rendering
//! └── error.rs        ◄─── ConfigError, SessionError
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (stderr, so receipts stay clean on stdout)
//! 2. Load configuration
//! 3. Load the catalog and promotions snapshots
//! 4. Run the session on stdin/stdout

pub mod config;
pub mod console;
pub mod error;
pub mod session;
pub mod view;

use anyhow::Context;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

use till_core::PricingEngine;
use till_store::SnapshotStore;

use config::CheckoutConfig;
use console::ConsolePrompt;
use session::Session;

/// Runs the checkout until the customer is done.
pub fn run() -> anyhow::Result<()> {
    init_tracing();

    let config = CheckoutConfig::load(None).context("failed to load checkout configuration")?;
    let today = config.today();
    info!(
        products = %config.data.products_path.display(),
        promotions = %config.data.promotions_path.display(),
        %today,
        format = %config.session.receipt_format,
        "Configuration loaded"
    );

    let store = SnapshotStore::new(config.snapshot_config());
    let catalog = store.load_catalog().context("failed to load the product catalog")?;
    let promotions = store
        .load_promotions()
        .context("failed to load the promotions")?;

    let stdin = io::stdin();
    let prompt = ConsolePrompt::new(stdin.lock(), io::stdout());
    let mut session = Session::new(
        PricingEngine::new(catalog, promotions),
        &store,
        prompt,
        config.membership_policy(),
        today,
        config.session.receipt_format,
    );
    session.run().context("checkout session failed")?;

    info!("Checkout closed");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show allocation and stock details
/// - `RUST_LOG=till_core=trace` - Show trace for the core only
/// - Default: warnings, plus INFO for the till crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("warn,till_core=info,till_store=info,till_checkout=info")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
