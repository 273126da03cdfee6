use clap::{Parser, Subcommand, ValueEnum};
use shared::CategoryMetric;
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(name = "inventory-cli")]
#[command(about = "Inventory dashboard, catalog and reports from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Override api.base_url
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Stock metrics, category distribution and low-stock items")]
    Dashboard,

    #[command(about = "Category charts, top products and ABC classification")]
    Reports {
        /// Export the full ABC classification as CSV
        #[arg(long)]
        csv: bool,

        /// With --csv, export totals per category instead
        #[arg(long, value_enum, requires = "csv")]
        by_category: Option<CategoryField>,
    },

    #[command(about = "Browse and manage the product catalog")]
    Products {
        #[command(subcommand)]
        command: ProductsCommand,
    },

    #[command(about = "Record a stock movement")]
    Move {
        #[command(subcommand)]
        command: MoveCommand,
    },

    #[command(about = "Check that the backend is reachable")]
    Health,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    #[command(about = "List every product")]
    List,

    #[command(about = "Search products by name or category")]
    Search { term: String },

    #[command(about = "Show a product with its recent movements")]
    Show { id: i64 },

    #[command(about = "Register a product")]
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        category: String,

        #[arg(long, default_value = "un")]
        unit: String,

        #[arg(long, default_value = "0")]
        quantity: Decimal,

        #[arg(long)]
        unit_price: Decimal,
    },

    #[command(about = "Delete a product")]
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum MoveCommand {
    #[command(about = "Add stock to a product")]
    Entry(MovementArgs),

    #[command(about = "Remove stock from a product")]
    Exit(MovementArgs),
}

#[derive(clap::Args)]
pub struct MovementArgs {
    pub item_id: i64,

    pub quantity: Decimal,

    /// Price of this movement, defaults to the product's unit price
    #[arg(long)]
    pub unit_price: Option<Decimal>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CategoryField {
    Quantity,
    Value,
}

impl From<CategoryField> for CategoryMetric {
    fn from(field: CategoryField) -> Self {
        match field {
            CategoryField::Quantity => CategoryMetric::Quantity,
            CategoryField::Value => CategoryMetric::Value,
        }
    }
}
