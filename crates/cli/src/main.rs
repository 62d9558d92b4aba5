//! Cart CLI - Inspect and edit a persisted shopping cart.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog
//! cart --catalog catalog.yaml catalog
//!
//! # Add two of product 1 and one of product 2, then show the cart
//! cart --catalog catalog.yaml add 1
//! cart --catalog catalog.yaml add 1
//! cart --catalog catalog.yaml add 2
//! cart --catalog catalog.yaml show
//!
//! # Replace the whole cart
//! cart --catalog catalog.yaml set 1=3 4=1
//! ```
//!
//! # Commands
//!
//! - `catalog` - List products
//! - `show` - Show line items and subtotal
//! - `add` / `remove-one` / `remove` / `clear` - Edit the cart
//! - `quantity` - Print the quantity of one product
//! - `set` - Replace all line items
//!
//! Settings fall back to `CART_CATALOG_PATH`, `CART_STORAGE_PATH` and
//! `CART_STORAGE_KEY` (see `cart_store::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cart_core::{CartItem, ProductId};

mod commands;

#[derive(Parser)]
#[command(name = "cart")]
#[command(author, version, about = "Shopping cart CLI tools")]
struct Cli {
    /// Product catalog file (.json, .yaml or .yml)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Session storage file
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Session storage key
    #[arg(long, global = true)]
    key: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog products
    Catalog,
    /// Show line items and subtotal
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Remove one unit of a product
    RemoveOne {
        /// Product ID
        id: ProductId,
    },
    /// Remove a product entirely
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Remove every product
    Clear,
    /// Print the quantity of a product
    Quantity {
        /// Product ID
        id: ProductId,
    },
    /// Replace all line items
    Set {
        /// Line items as `<id>=<quantity>`
        #[arg(value_parser = commands::cart::parse_item, required = true)]
        items: Vec<CartItem>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.json);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let overrides = commands::Overrides {
        catalog: cli.catalog,
        storage: cli.storage,
        key: cli.key,
    };
    let config = commands::resolve_config(overrides)?;

    match cli.command {
        Commands::Catalog => commands::catalog::list(&config)?,
        Commands::Show => commands::cart::show(&commands::open_store(&config)?),
        Commands::Add { id } => commands::cart::add(&mut commands::open_store(&config)?, id),
        Commands::RemoveOne { id } => {
            commands::cart::remove_one(&mut commands::open_store(&config)?, id);
        }
        Commands::Remove { id } => commands::cart::remove(&mut commands::open_store(&config)?, id),
        Commands::Clear => commands::cart::clear(&mut commands::open_store(&config)?),
        Commands::Quantity { id } => {
            commands::cart::quantity(&commands::open_store(&config)?, id);
        }
        Commands::Set { items } => {
            commands::cart::set(&mut commands::open_store(&config)?, items)?;
        }
    }
    Ok(())
}
