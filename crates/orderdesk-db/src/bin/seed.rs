//! # Seed Data Generator
//!
//! Populates a database with demo data for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./database.db (or $ORDERDESK_DB_PATH)
//! cargo run -p orderdesk-db --bin seed
//!
//! # Specify database path
//! cargo run -p orderdesk-db --bin seed -- --db ./data/orders.db
//! ```
//!
//! ## Generated Data
//! - Two customers: Erika Mustermann (Bielefeld) and Hans Wurst (Irgendwo)
//! - A handful of products
//! - One order for Erika
//!
//! Prints a JSON summary of everything it created.

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use orderdesk_core::{Customer, CustomerFields, Money, Order, OrderDetailLine, OrderLine, Product};
use orderdesk_db::pool::{DB_PATH_ENV, DEFAULT_DB_PATH};
use orderdesk_db::{Database, DbConfig};

/// Demo products: (name, description, price in cents).
const PRODUCTS: &[(&str, Option<&str>, i64)] = &[
    ("Green Tea", Some("Loose leaf, 100 g"), 450),
    ("Coffee Beans", Some("Medium roast, 500 g"), 1299),
    ("Mug", Some("Stoneware, 300 ml"), 899),
    ("Gift Card", None, 2500),
];

/// Order Desk seed data generator.
#[derive(Debug, Parser)]
#[command(name = "seed", version)]
struct Args {
    /// Database file path
    #[arg(short, long, env = DB_PATH_ENV, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,
}

#[derive(Debug, Serialize)]
struct Summary {
    database: String,
    customers: Vec<Customer>,
    products: Vec<Product>,
    order: Order,
    lines: Vec<OrderDetailLine>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();

    info!(path = %args.db.display(), "Seeding database");

    let db = Database::new(DbConfig::new(&args.db)).await?;

    let existing = db.customers().count().await?;
    if existing > 0 {
        eprintln!("Database already has {} customers", existing);
        eprintln!("  Skipping seed to avoid duplicates.");
        eprintln!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let erika = db
        .customers()
        .create(
            &CustomerFields::new()
                .name("Erika Mustermann")
                .road("Zum Beispiel")
                .house_number(1)
                .post_code("42838")
                .town("Bielefeld"),
        )
        .await?;

    let hans = db
        .customers()
        .create(
            &CustomerFields::new()
                .name("Hans Wurst")
                .house_number(1)
                .post_code("27895")
                .town("Irgendwo"),
        )
        .await?;

    let mut products = Vec::with_capacity(PRODUCTS.len());
    for (name, description, cents) in PRODUCTS {
        products.push(
            db.products()
                .add(name, *description, Money::from_cents(*cents))
                .await?,
        );
    }

    let lines: Vec<OrderLine> = products
        .iter()
        .take(3)
        .zip([2, 1, 4])
        .map(|(product, quantity)| OrderLine::new(product.product_number, quantity))
        .collect();

    let order = db.orders().create_order(erika.id, &lines).await?;
    let detail = db.orders().get_lines(order.order_number).await?;

    info!(order_number = order.order_number, cost = %order.cost, "Seed complete");

    let summary = Summary {
        database: args.db.display().to_string(),
        customers: vec![erika, hans],
        products,
        order,
        lines: detail,
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);

    db.close().await;
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=orderdesk=trace` - Show trace for orderdesk crates only
/// - Default: INFO, DEBUG for orderdesk crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,orderdesk=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
