//! # Seed Data Generator
//!
//! Populates a database with example categories, products and an admin user
//! for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p farmacia-db --bin seed
//!
//! # Specify database path and admin password
//! cargo run -p farmacia-db --bin seed -- --db ./data/farmacia.db --password s3cr3t-pass
//! ```
//!
//! The admin account is `root@root.com`. Products expire one to three years
//! from today and belong to the admin.

use chrono::{Days, Utc};
use std::env;

use farmacia_core::{CategoryInput, CredentialHasher, NewUserAccount, ProductInput};
use farmacia_db::{Database, DbConfig};

const ADMIN_LOGIN: &str = "root@root.com";
const DEFAULT_ADMIN_PASSWORD: &str = "rootroot";

/// (name, description, products)
/// Product tuple: (name, brand, manufacturer, price_cents, prescription_required)
type SeedProduct = (&'static str, &'static str, &'static str, i64, bool);

const CATALOG: &[(&str, &str, &[SeedProduct])] = &[
    (
        "Analgésicos",
        "Alívio de dores e febre",
        &[
            ("Dipirona 500mg", "Medley", "Sanofi", 899, false),
            ("Paracetamol 750mg", "Tylenol", "Johnson & Johnson", 1549, false),
            ("Ibuprofeno 600mg", "Advil", "Pfizer", 2190, false),
        ],
    ),
    (
        "Antibióticos",
        "Venda com retenção de receita",
        &[
            ("Amoxicilina 500mg", "EMS", "EMS", 3290, true),
            ("Azitromicina 500mg", "Eurofarma", "Eurofarma", 4150, true),
        ],
    ),
    (
        "Vitaminas",
        "Suplementos vitamínicos e minerais",
        &[
            ("Vitamina C 1g", "Redoxon", "Bayer", 2799, false),
            ("Vitamina D 2000UI", "Addera", "Mantecorp", 5990, false),
        ],
    ),
    (
        "Higiene Pessoal",
        "Cuidados diários",
        &[
            ("Creme Dental 90g", "Colgate", "Colgate-Palmolive", 649, false),
            ("Protetor Solar FPS 50", "Episol", "Mantecorp", 7490, false),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./farmacia.db");
    let mut password = String::from(DEFAULT_ADMIN_PASSWORD);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--password" | "-p" => {
                if i + 1 < args.len() {
                    password = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Farmácia Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>          Database file path (default: ./farmacia.db)");
                println!("  -p, --password <SECRET>  Admin password (default: {DEFAULT_ADMIN_PASSWORD})");
                println!("  -h, --help               Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Farmácia Seed Data Generator");
    println!("===============================");
    println!("Database: {db_path}");
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.categories().list_all().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} categories", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let admin = match db.users().find_by_login(ADMIN_LOGIN).await? {
        Some(account) => account,
        None => {
            let password_hash = CredentialHasher::default().hash(&password)?;
            db.users()
                .insert(&NewUserAccount {
                    name: "Root".to_string(),
                    login: ADMIN_LOGIN.to_string(),
                    password_hash,
                    photo: None,
                })
                .await?
        }
    };
    println!("✓ Admin user: {} (id {})", admin.login, admin.id);

    let today = Utc::now().date_naive();
    let mut generated = 0u64;

    for (category_name, description, products) in CATALOG {
        let category = db
            .categories()
            .insert(&CategoryInput {
                name: category_name.to_string(),
                description: Some(description.to_string()),
            })
            .await?;

        for (name, brand, manufacturer, price_cents, prescription_required) in *products {
            let expiration_date = today
                .checked_add_days(Days::new(365 * (1 + generated % 3)))
                .unwrap_or(today);

            let input = ProductInput {
                name: name.to_string(),
                description: None,
                price_cents: *price_cents,
                brand: brand.to_string(),
                manufacturer: manufacturer.to_string(),
                expiration_date,
                photo: None,
                quantity: 10 + (generated as i32 * 7) % 90,
                prescription_required: *prescription_required,
                category_id: category.id,
            };

            if let Err(e) = db.products().insert(admin.id, &input).await {
                eprintln!("Failed to insert {name}: {e}");
                continue;
            }
            generated += 1;
        }

        println!("  {category_name}: {} products", products.len());
    }

    println!();
    println!("✓ Generated {generated} products");

    let found = db.products().search_by_name("vitamina").await?;
    println!("  Search 'vitamina': {} results", found.len());

    db.close().await;
    Ok(())
}
