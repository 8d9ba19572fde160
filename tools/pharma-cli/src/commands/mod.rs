//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// List line items with totals.
    Show,
    /// Add a product to the cart.
    Add {
        /// Product ID.
        product_id: String,
        /// Product name shown on the line.
        name: String,
        /// Unit price in whole currency units.
        unit_price: i64,
        /// Quantity to add. Fractions are truncated, anything below 1 adds 1.
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        quantity: f64,
    },
    /// Set the quantity of a line. Zero or less removes it.
    Update {
        /// Product ID.
        product_id: String,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line from the cart.
    Remove {
        /// Product ID.
        product_id: String,
    },
    /// Empty the cart.
    Clear,
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: Option<CatalogCommand>,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products.
    List {
        /// Only names starting with this letter.
        #[arg(short, long)]
        letter: Option<char>,
        /// Only products in this category ID.
        #[arg(short, long)]
        category: Option<String>,
        /// Only hot products.
        #[arg(long)]
        hot: bool,
        /// Case-insensitive search in name and description.
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List categories.
    Categories,
    /// Add a catalog product to the cart at its net rate.
    Add {
        /// Product ID.
        product_id: String,
        /// Quantity to add.
        #[arg(short, long, default_value = "1")]
        quantity: i64,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Show what would be ordered without submitting.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
