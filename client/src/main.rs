//! Inventory MRP - command line client
//!
//! Renders the dashboard and reports views and drives the catalog and
//! movement operations against the inventory backend.

use std::sync::Arc;

use clap::Parser;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    movement_lines, CreateItemInput, CreateMovementInput, DashboardView, Item, MovementKind,
    ReportsView,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inventory_mrp_client::{ApiClient, Config, InventoryStore, ReportingService};

mod cli;

use cli::{Cli, Commands, MoveCommand, MovementArgs, ProductsCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_cli=info,inventory_mrp_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let mut config = Config::load()?;
    if let Some(base_url) = cli.base_url.clone() {
        config.api.base_url = base_url;
    }

    tracing::debug!("Environment: {}", config.environment);
    tracing::debug!("Backend: {}", config.api.base_url);

    let api = ApiClient::with_timeout(&config.api.base_url, config.api.timeout())?;
    let store = Arc::new(
        InventoryStore::new(api, config.retry.list_policy())
            .with_movements_limit(config.reports.movements_limit),
    );
    let reporting = ReportingService::new(store.clone(), config.reports.report_options()?);

    match cli.command {
        Commands::Dashboard => {
            let view = reporting.dashboard().await?;
            output(cli.json, &view, print_dashboard)?;
        }
        Commands::Reports {
            csv: true,
            by_category: Some(field),
        } => {
            print!("{}", reporting.category_csv(field.into()).await?);
        }
        Commands::Reports {
            csv: true,
            by_category: None,
        } => {
            print!("{}", reporting.abc_csv().await?);
        }
        Commands::Reports { csv: false, .. } => {
            let view = reporting.reports().await?;
            output(cli.json, &view, print_reports)?;
        }
        Commands::Products { command } => run_products(&store, command, cli.json).await?,
        Commands::Move { command } => {
            let (kind, args) = match command {
                MoveCommand::Entry(args) => (MovementKind::Entry, args),
                MoveCommand::Exit(args) => (MovementKind::Exit, args),
            };
            run_move(&store, kind, args, cli.json).await?;
        }
        Commands::Health => {
            let health = store.api().health().await?;
            output(cli.json, &health, |h| println!("Backend status: {}", h.status))?;
        }
    }

    Ok(())
}

async fn run_products(
    store: &InventoryStore,
    command: ProductsCommand,
    json: bool,
) -> anyhow::Result<()> {
    match command {
        ProductsCommand::List => {
            let items = store.items().await?;
            output(json, &items, |items| print_items(items))?;
        }
        ProductsCommand::Search { term } => {
            let items = store.api().search_items(&term).await?;
            output(json, &items, |items| print_items(items))?;
        }
        ProductsCommand::Show { id } => {
            let (item, movements) = store.product_detail(id).await;
            let item = item?;
            let lines = movement_lines(&movements?);
            if json {
                let detail = serde_json::json!({ "item": item, "movements": lines });
                println!("{}", serde_json::to_string_pretty(&detail)?);
                return Ok(());
            }

            println!("#{} {} ({})", item.id, item.name, item.category);
            println!(
                "  {} {} at {} = {}{}",
                item.quantity,
                item.unit,
                item.unit_price,
                item.total_value,
                if item.low_stock { "  [low stock]" } else { "" }
            );
            if lines.is_empty() {
                println!("No movements recorded.");
            }
            for line in lines {
                println!(
                    "  {}  {:<5} {:>10}  -> {}",
                    line.timestamp.format("%Y-%m-%d %H:%M"),
                    line.direction,
                    line.signed_quantity,
                    line.quantity_after
                );
            }
        }
        ProductsCommand::Create {
            name,
            category,
            unit,
            quantity,
            unit_price,
        } => {
            let input = CreateItemInput {
                name,
                category,
                unit,
                quantity,
                unit_price,
            };
            let item = store.create_item(&input).await?;
            output(json, &item, |item| {
                println!("Product #{} \"{}\" created.", item.id, item.name)
            })?;
        }
        ProductsCommand::Delete { id } => {
            store.delete_item(id).await?;
            if !json {
                println!("Product #{} deleted.", id);
            }
        }
    }
    Ok(())
}

async fn run_move(
    store: &InventoryStore,
    movement_type: MovementKind,
    args: MovementArgs,
    json: bool,
) -> anyhow::Result<()> {
    let input = CreateMovementInput {
        item_id: args.item_id,
        movement_type,
        quantity: args.quantity,
        unit_price: args.unit_price,
    };
    let movement = store.create_movement(&input).await?;
    output(json, &movement, |m| {
        println!(
            "{} of {} recorded for product #{}; stock is now {}.",
            m.movement_type, m.quantity, m.item_id, m.quantity_after
        )
    })
}

/// Print `value` as JSON or through `text`
fn output<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

fn print_items(items: &[Item]) {
    if items.is_empty() {
        println!("No products registered.");
        return;
    }
    for item in items {
        println!(
            "{:>5}  {:<30} {:<15} {:>10} {:<4} {:>12}{}",
            item.id,
            item.name,
            item.category,
            item.quantity,
            item.unit,
            item.total_value,
            if item.low_stock { "  low" } else { "" }
        );
    }
}

fn print_dashboard(view: &DashboardView) {
    println!("SKUs:        {}", view.metrics.total_skus);
    println!("Units:       {}", view.metrics.total_units);
    println!("Categories:  {}", view.metrics.total_categories);

    println!();
    println!("Stock by category");
    for point in &view.category_distribution {
        println!("  {:<20} {:>10}", point.label, point.value);
    }

    println!();
    println!("Low stock (below {} units)", view.low_stock.threshold);
    if let Some(message) = &view.low_stock.empty_message {
        println!("  {}", message);
    }
    for item in &view.low_stock.items {
        println!("  #{} {}: {} {}", item.id, item.name, item.quantity, item.unit);
    }
}

fn print_reports(view: &ReportsView) {
    println!("Products by category");
    for point in &view.products_by_category {
        println!("  {:<20} {:>10}", point.label, point.value);
    }

    println!();
    println!("Cost by category");
    for point in &view.cost_by_category {
        println!("  {:<20} {:>12}", point.label, point.value);
    }

    println!();
    println!("Top products by value");
    for (rank, item) in view.top_products.iter().enumerate() {
        println!("  {}. {:<30} {:>12}", rank + 1, item.name, item.total_value);
    }

    let abc = &view.abc;
    println!();
    println!(
        "ABC classification (A <= {}%, B <= {}%)",
        (abc.threshold_a * Decimal::ONE_HUNDRED).normalize(),
        (abc.threshold_b * Decimal::ONE_HUNDRED).normalize()
    );
    for card in &abc.cards {
        println!(
            "  {}: {} products, {}% of value",
            card.klass,
            card.count,
            (card.share * Decimal::ONE_HUNDRED).round_dp(1)
        );
    }
    for row in &abc.table.rows {
        println!(
            "  {}  {:<30} {:>12} {:>6}%",
            row.klass,
            row.item.name,
            row.item.total_value,
            (row.cumulative * Decimal::ONE_HUNDRED).round_dp(1)
        );
    }
    if let Some(notice) = &abc.table.notice {
        println!("  {}", notice);
    }
}
