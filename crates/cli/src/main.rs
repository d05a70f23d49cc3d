//! Rocketshoes CLI - drive the local cart from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! rs-cart show
//!
//! # Add one unit of product 3
//! rs-cart add 3
//!
//! # Set product 3 to 2 units
//! rs-cart update 3 2
//!
//! # Remove product 3
//! rs-cart remove 3
//! ```
//!
//! Configuration is read from the environment (see `rocketshoes_cart::config`).
//! Failed operations print their notice to stderr and exit with status 1.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_cart::CartConfig;
use rocketshoes_core::ProductId;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rs-cart")]
#[command(author, version, about = "Rocketshoes cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product identifier
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product identifier
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Product identifier
        product_id: ProductId,

        /// New quantity (must be at least 1)
        amount: u32,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration first (needed for Sentry init)
    let config = CartConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to warn level so command output stays clean if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_cart=warn,rs_cart=warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let code = match config {
        Ok(config) => match run(cli, &config).await {
            Ok(()) => 0,
            // Already reported to the user as a notice
            Err(commands::CommandError::Cart(e)) => {
                tracing::debug!("Cart operation failed: {e}");
                1
            }
            Err(e) => {
                tracing::error!("Command failed: {e}");
                1
            }
        },
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            2
        }
    };

    // Flush pending Sentry events before exiting
    drop(sentry_guard);
    std::process::exit(code);
}

async fn run(cli: Cli, config: &CartConfig) -> Result<(), commands::CommandError> {
    let cart = commands::cart::open(config)?;
    match cli.command {
        Commands::Show => commands::cart::show(&cart).await,
        Commands::Add { product_id } => commands::cart::add(&cart, product_id).await,
        Commands::Remove { product_id } => commands::cart::remove(&cart, product_id).await,
        Commands::Update { product_id, amount } => {
            commands::cart::update(&cart, product_id, amount).await
        }
    }
}
