//! # Seed Data Generator
//!
//! Populates the database with development data: the shop record, a set of
//! categories and products, and a few days' worth of ledger movements so
//! the report screens have something to show.
//!
//! ## Usage
//! ```bash
//! # Default database (./adega_dev.db)
//! cargo run -p adega-db --bin seed
//!
//! # Custom product count and path
//! cargo run -p adega-db --bin seed -- --count 200 --db ./data/adega.db
//! ```

use std::env;

use adega_core::{Money, DEFAULT_SHOP_NAME};
use adega_db::{Database, DbConfig, NewProduct};
use tracing_subscriber::EnvFilter;

/// Categories and products for realistic adega data.
const CATALOG: &[(&str, &[&str])] = &[
    (
        "Vinhos Tintos",
        &[
            "Vinho Tinto Seco",
            "Vinho Tinto Suave",
            "Cabernet Sauvignon",
            "Merlot Reserva",
            "Malbec Argentino",
            "Carmenere Chileno",
        ],
    ),
    (
        "Vinhos Brancos",
        &[
            "Vinho Branco Seco",
            "Chardonnay",
            "Sauvignon Blanc",
            "Moscato",
        ],
    ),
    (
        "Espumantes",
        &["Espumante Brut", "Espumante Moscatel", "Prosecco"],
    ),
    (
        "Cervejas",
        &[
            "Cerveja Pilsen 600ml",
            "Cerveja IPA Lata",
            "Cerveja de Trigo",
            "Cerveja Puro Malte",
        ],
    ),
    (
        "Destilados",
        &[
            "Cachaça Artesanal",
            "Whisky 8 Anos",
            "Gin Seco",
            "Vodka Importada",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = usize::MAX; // default: the whole catalog
    let mut db_path = String::from("./adega_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(usize::MAX);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Adega Stock Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Max products to generate (default: all)");
                println!("  -d, --db <PATH>    Database file path (default: ./adega_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🍷 Adega Stock Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let shop = db.shops().get_or_create(DEFAULT_SHOP_NAME).await?;
    println!("✓ Shop: {} ({})", shop.name, shop.id);

    // Check existing products
    let existing = db.products().count(&shop.id).await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Generate catalog
    println!();
    println!("Generating catalog...");

    let catalog = db.catalog();
    let ledger = db.ledger();
    let mut product_ids = Vec::new();
    let mut generated = 0usize;

    for (category_name, names) in CATALOG {
        let category = catalog.create_category(category_name).await?;

        for (idx, name) in names.iter().enumerate() {
            if generated >= count {
                break;
            }

            // Deterministic pseudo-random data keyed on the running index
            let seed = generated * 37 + idx;
            let sale = 899 + ((seed * 53) % 9100) as i64; // R$ 8,99 - R$ 99,99
            let cost = sale * (55 + (seed % 25) as i64) / 100;
            let barcode = format!("789{:010}", 1_000_000 + seed * 7919);

            let product = catalog
                .create_product(
                    &shop.id,
                    NewProduct {
                        name: (*name).to_string(),
                        barcode: Some(barcode),
                        category_id: Some(category.id.clone()),
                        cost_price: Money::from_centavos(cost),
                        sale_price: Money::from_centavos(sale),
                        initial_quantity: 0,
                    },
                )
                .await?;

            product_ids.push(product.id);
            generated += 1;
        }
    }

    println!("✓ Generated {} products", generated);

    // Put the catalog through the ledger: a restock plus some sales
    println!();
    println!("Recording movements...");

    let mut entries = 0usize;
    let mut exits = 0usize;

    for (idx, product_id) in product_ids.iter().enumerate() {
        let stocked = 12 + (idx % 24) as i64;
        ledger
            .record_entry(&shop.id, product_id, stocked, Some("carga inicial"))
            .await?;
        entries += 1;

        // Roughly two thirds of the products have sold something
        if idx % 3 != 0 {
            let sold = 1 + (idx % 5) as i64;
            ledger.record_exit(&shop.id, product_id, sold, None).await?;
            exits += 1;
        }
    }

    println!("✓ Recorded {} entries and {} exits", entries, exits);

    // Show what the report screens will see
    let today = db.reports().sales_today(&shop.id).await?;
    println!();
    println!(
        "Sales today: {} movements, {} units, total {}",
        today.movement_count, today.total_quantity, today.total_value
    );

    let low = db.reports().low_stock(&shop.id, None).await?;
    println!("Low stock products: {}", low.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
