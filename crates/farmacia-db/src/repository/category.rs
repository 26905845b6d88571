//! # Category Repository
//!
//! Deleting a category removes its products through the
//! `ON DELETE CASCADE` foreign key (requires `foreign_keys = ON`, set by
//! [`Database::new`](crate::Database::new)).

use sqlx::SqlitePool;
use tracing::debug;

use super::contains_pattern;
use crate::error::{DbError, DbResult};
use farmacia_core::{Category, CategoryInput, EntityId};

/// Repository for product categories.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists every category, ordered by id.
    pub async fn list_all(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a category by id.
    pub async fn find_by_id(&self, id: EntityId) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Categories whose name contains `term` (ASCII case-insensitive).
    pub async fn search_by_name(&self, term: &str) -> DbResult<Vec<Category>> {
        debug!(term = %term, "Searching categories");

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description
            FROM categories
            WHERE name LIKE ?1 ESCAPE '\'
            ORDER BY name
            "#,
        )
        .bind(contains_pattern(term))
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// True if a category with this id exists.
    pub async fn exists(&self, id: EntityId) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Inserts a category and returns it with its assigned id.
    pub async fn insert(&self, input: &CategoryInput) -> DbResult<Category> {
        debug!(name = %input.name, "Inserting category");

        let result = sqlx::query("INSERT INTO categories (name, description) VALUES (?1, ?2)")
            .bind(&input.name)
            .bind(&input.description)
            .execute(&self.pool)
            .await?;

        Ok(Category {
            id: result.last_insert_rowid(),
            name: input.name.clone(),
            description: input.description.clone(),
        })
    }

    /// Replaces a category's fields.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no category with that id
    pub async fn update(&self, id: EntityId, input: &CategoryInput) -> DbResult<Category> {
        debug!(id, "Updating category");

        let result = sqlx::query("UPDATE categories SET name = ?2, description = ?3 WHERE id = ?1")
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(Category {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
        })
    }

    /// Deletes a category and, by cascade, its products.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no category with that id
    pub async fn delete(&self, id: EntityId) -> DbResult<()> {
        debug!(id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
