//! # Seed Data Generator
//!
//! Populates a database with demo clients and their shipments.
//!
//! ## Usage
//! ```bash
//! # 5 clients with 40 products each (default)
//! cargo run -p freight-api --bin seed
//!
//! # Custom amounts and path
//! cargo run -p freight-api --bin seed -- --clients 20 --products 100 --db ./data/freight.db
//! ```
//!
//! Every demo client is called `demo_N` and logs in with `freight-demo`.
//! Products cycle through a handful of cargo types, plates and ports; every
//! third one goes to a vault so searches and discounts have something to show.

use chrono::{Duration, TimeZone, Utc};
use std::env;

use freight_api::commands::auth::{authenticate, register};
use freight_api::commands::clients::list_clients;
use freight_api::commands::products::create_product;
use freight_api::{telemetry, ApiConfig, AppContext};
use freight_core::{NewClient, NewProduct};

const DEMO_PASSWORD: &str = "freight-demo";

const KINDS: &[&str] = &[
    "electronics",
    "furniture",
    "textiles",
    "machinery",
    "perishables",
    "chemicals",
];

const PLATES: &[&str] = &["ABC-123", "KLM-480", "QRS-901", "XYZ-777"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut clients: usize = 5;
    let mut products: usize = 40;
    let mut config = ApiConfig::load()?;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--clients" | "-c" => {
                if i + 1 < args.len() {
                    clients = args[i + 1].parse().unwrap_or(5);
                    i += 1;
                }
            }
            "--products" | "-p" => {
                if i + 1 < args.len() {
                    products = args[i + 1].parse().unwrap_or(40);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Freight Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --clients <N>   Demo clients to create (default: 5)");
                println!("  -p, --products <N>  Products per client (default: 40)");
                println!("  -d, --db <PATH>     Database file path (default: $FREIGHT_DB_PATH or ./freight.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Freight Seed Data Generator");
    println!("===========================");
    println!("Database: {}", config.database_path.display());
    println!("Clients:  {}", clients);
    println!("Products: {} per client", products);
    println!();

    let (ctx, db) = AppContext::bootstrap(config).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = list_clients(&ctx, None).await?;
    if !existing.is_empty() {
        println!("⚠ Database already has clients");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        db.close().await;
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0;

    for c in 0..clients {
        let response = register(&ctx, demo_client(c)).await?;
        let principal = authenticate(&ctx, Some(&response.token)).await?;

        for p in 0..products {
            if let Err(e) = create_product(&ctx, &principal, demo_product(c * products + p)).await {
                eprintln!("Failed to insert product {} for demo_{}: {}", p, c, e);
                continue;
            }
            generated += 1;
        }

        println!("  demo_{}: {} products", c, products);
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} clients and {} products in {:?}", clients, generated, elapsed);
    println!("  Log in as demo_0 / {}", DEMO_PASSWORD);

    db.close().await;
    Ok(())
}

fn demo_client(index: usize) -> NewClient {
    NewClient {
        username: format!("demo_{}", index),
        password: DEMO_PASSWORD.to_string(),
        name: "Demo".to_string(),
        surname: format!("Client {}", index),
    }
}

/// Deterministic product for `seed`.
fn demo_product(seed: usize) -> NewProduct {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).single();
    let joined_at = base.map(|b| b + Duration::hours((seed as i64 * 7) % 2000));
    let delivered_at = joined_at.map(|j| j + Duration::hours(24 + (seed as i64 % 96)));

    let goes_to_vault = seed % 3 == 0;

    NewProduct {
        guide_number: Some(format!("FRG{:07}", seed)),
        kind: Some(KINDS[seed % KINDS.len()].to_string()),
        quantity: Some(1 + ((seed * 13) % 40) as i64),
        joined_at,
        delivered_at,
        shipping_price: Some(50.0 + ((seed * 37) % 950) as f64),
        vehicle_plate: Some(PLATES[seed % PLATES.len()].to_string()),
        port: Some(if goes_to_vault { 0 } else { 1 + (seed % 4) as i64 }),
        vault: Some(if goes_to_vault { 1 + (seed % 2) as i64 } else { 0 }),
    }
}
