//! # Product Service
//!
//! ## Write Checks (in order)
//! 1. `update` only: the product exists (`NotFound`)
//! 2. Field rules, with the expiration date compared to today in UTC
//!    (`Validation`)
//! 3. The referenced category exists (`UnknownCategory`)
//!
//! The creating user becomes the owner; updates never change the owner.

use chrono::Utc;
use tracing::{info, warn};

use super::{ServiceError, ServiceResult};
use farmacia_core::validation::validate_product_input;
use farmacia_core::{CoreError, EntityId, Product, ProductInput, User};
use farmacia_db::{CategoryRepository, DbError, ProductRepository};

/// Validated CRUD over products.
#[derive(Debug, Clone)]
pub struct ProductService {
    products: ProductRepository,
    categories: CategoryRepository,
}

impl ProductService {
    pub fn new(products: ProductRepository, categories: CategoryRepository) -> Self {
        ProductService {
            products,
            categories,
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.products.list_all().await?)
    }

    /// ## Errors
    /// - `NotFound` if no product has this id
    pub async fn find_by_id(&self, id: EntityId) -> ServiceResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Product", id).into())
    }

    /// Products whose name contains `fragment`, ignoring case.
    pub async fn search_by_name(&self, fragment: &str) -> ServiceResult<Vec<Product>> {
        Ok(self.products.search_by_name(fragment.trim()).await?)
    }

    /// Creates a product owned by `owner`.
    pub async fn create(&self, owner: &User, input: ProductInput) -> ServiceResult<Product> {
        let input = self.checked(input).await?;

        let product = self
            .products
            .insert(owner.id, &input)
            .await
            .map_err(|e| category_race(e, input.category_id))?;

        info!(id = product.id, owner_id = owner.id, "Product created");
        Ok(product)
    }

    /// Replaces a product's fields; the owner is kept.
    pub async fn update(&self, id: EntityId, input: ProductInput) -> ServiceResult<Product> {
        self.find_by_id(id).await?;

        let input = self.checked(input).await?;

        let product = self
            .products
            .update(id, &input)
            .await
            .map_err(|e| category_race(e, input.category_id))?;

        info!(id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: EntityId) -> ServiceResult<()> {
        self.find_by_id(id).await?;
        self.products.delete(id).await?;
        info!(id, "Product deleted");
        Ok(())
    }

    /// Normalizes, validates and checks the category reference.
    async fn checked(&self, input: ProductInput) -> ServiceResult<ProductInput> {
        let input = input.normalized();
        validate_product_input(&input, Utc::now().date_naive())?;

        if !self.categories.exists(input.category_id).await? {
            return Err(CoreError::UnknownCategory(input.category_id).into());
        }

        Ok(input)
    }
}

/// The category vanished between the existence check and the write.
fn category_race(err: DbError, category_id: EntityId) -> ServiceError {
    match err {
        DbError::ForeignKeyViolation { .. } => {
            warn!(category_id, "Category removed during product write");
            CoreError::UnknownCategory(category_id).into()
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use farmacia_core::{CategoryInput, NewUserAccount};
    use farmacia_db::{Database, DbConfig};

    struct Fixture {
        service: ProductService,
        db: Database,
        owner: User,
        category_id: EntityId,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let owner = db
            .users()
            .insert(&NewUserAccount {
                name: "Root".to_string(),
                login: "root@root.com".to_string(),
                password_hash: "x".to_string(),
                photo: None,
            })
            .await
            .unwrap()
            .into_user();
        let category = db
            .categories()
            .insert(&CategoryInput {
                name: "Analgésicos".to_string(),
                description: None,
            })
            .await
            .unwrap();

        Fixture {
            service: ProductService::new(db.products(), db.categories()),
            db,
            owner,
            category_id: category.id,
        }
    }

    fn input(category_id: EntityId) -> ProductInput {
        ProductInput {
            name: "Dipirona 500mg".to_string(),
            description: None,
            price_cents: 899,
            brand: "Medley".to_string(),
            manufacturer: "Sanofi".to_string(),
            expiration_date: Utc::now()
                .date_naive()
                .checked_add_days(Days::new(365))
                .unwrap(),
            photo: None,
            quantity: 5,
            prescription_required: false,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_create_sets_owner() {
        let f = fixture().await;

        let product = f.service.create(&f.owner, input(f.category_id)).await.unwrap();
        assert_eq!(product.owner_id, f.owner.id);
        assert_eq!(f.service.find_by_id(product.id).await.unwrap().owner_id, f.owner.id);
    }

    #[tokio::test]
    async fn test_unknown_category() {
        let f = fixture().await;

        assert!(matches!(
            f.service.create(&f.owner, input(404)).await,
            Err(ServiceError::Core(CoreError::UnknownCategory(404)))
        ));
        assert!(f.service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expired_or_today_rejected() {
        let f = fixture().await;

        let mut today = input(f.category_id);
        today.expiration_date = Utc::now().date_naive();
        let err = f.service.create(&f.owner, today).await.unwrap_err();
        let ServiceError::Core(CoreError::Validation(errors)) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert!(errors.has_field("expiration_date"));
    }

    #[tokio::test]
    async fn test_update_keeps_owner_and_checks_existence() {
        let f = fixture().await;
        let created = f.service.create(&f.owner, input(f.category_id)).await.unwrap();

        let mut changes = input(f.category_id);
        changes.price_cents = 1099;
        let updated = f.service.update(created.id, changes.clone()).await.unwrap();
        assert_eq!(updated.price_cents, 1099);
        assert_eq!(updated.owner_id, f.owner.id);

        assert!(matches!(
            f.service.update(999, changes).await,
            Err(ServiceError::Core(CoreError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let f = fixture().await;
        let created = f.service.create(&f.owner, input(f.category_id)).await.unwrap();

        f.service.delete(created.id).await.unwrap();
        assert!(f.db.products().find_by_id(created.id).await.unwrap().is_none());
        assert!(matches!(
            f.service.delete(created.id).await,
            Err(ServiceError::Core(CoreError::NotFound { .. }))
        ));
    }
}
