//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Ownership and Timestamps
//! ```text
//! insert(owner_id, input)   owner_id = caller's user, created_at = updated_at = now
//! update(id, input)         owner_id and created_at untouched, updated_at = now
//! ```
//!
//! `category_id` is enforced by a foreign key. A product whose category
//! disappears between the service's existence check and the write fails
//! with `DbError::ForeignKeyViolation`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::contains_pattern;
use crate::error::{DbError, DbResult};
use farmacia_core::{EntityId, Product, ProductInput};

const SELECT_PRODUCT: &str = r#"
    SELECT
        id,
        name,
        description,
        price_cents,
        brand,
        manufacturer,
        expiration_date,
        photo,
        quantity,
        prescription_required,
        category_id,
        owner_id,
        created_at,
        updated_at
    FROM products
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let found = repo.search_by_name("dipirona").await?;
/// let product = repo.find_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product, ordered by id.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn find_by_id(&self, id: EntityId) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!("{SELECT_PRODUCT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Products whose name contains `term` (ASCII case-insensitive).
    pub async fn search_by_name(&self, term: &str) -> DbResult<Vec<Product>> {
        debug!(term = %term, "Searching products");

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"{SELECT_PRODUCT} WHERE name LIKE ?1 ESCAPE '\' ORDER BY name"#
        ))
        .bind(contains_pattern(term))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Inserts a product owned by `owner_id`.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with id and timestamps
    /// * `Err(DbError::ForeignKeyViolation)` - unknown category or owner
    pub async fn insert(&self, owner_id: EntityId, input: &ProductInput) -> DbResult<Product> {
        debug!(name = %input.name, owner_id, "Inserting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, description, price_cents, brand, manufacturer,
                expiration_date, photo, quantity, prescription_required,
                category_id, owner_id, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9,
                ?10, ?11, ?12, ?12
            )
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price_cents)
        .bind(&input.brand)
        .bind(&input.manufacturer)
        .bind(input.expiration_date)
        .bind(&input.photo)
        .bind(input.quantity)
        .bind(input.prescription_required)
        .bind(input.category_id)
        .bind(owner_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            name: input.name.clone(),
            description: input.description.clone(),
            price_cents: input.price_cents,
            brand: input.brand.clone(),
            manufacturer: input.manufacturer.clone(),
            expiration_date: input.expiration_date,
            photo: input.photo.clone(),
            quantity: input.quantity,
            prescription_required: input.prescription_required,
            category_id: input.category_id,
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces a product's editable fields, keeping owner and creation time.
    ///
    /// ## Returns
    /// * `Ok(Product)` - the stored product after the update
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: EntityId, input: &ProductInput) -> DbResult<Product> {
        debug!(id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                brand = ?5,
                manufacturer = ?6,
                expiration_date = ?7,
                photo = ?8,
                quantity = ?9,
                prescription_required = ?10,
                category_id = ?11,
                updated_at = ?12
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price_cents)
        .bind(&input.brand)
        .bind(&input.manufacturer)
        .bind(input.expiration_date)
        .bind(&input.photo)
        .bind(input.quantity)
        .bind(input.prescription_required)
        .bind(input.category_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn delete(&self, id: EntityId) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
