//! Category operations.

use tracing::info;

use super::ServiceResult;
use farmacia_core::validation::validate_category_input;
use farmacia_core::{Category, CategoryInput, CoreError, EntityId};
use farmacia_db::CategoryRepository;

/// Validated CRUD over categories.
#[derive(Debug, Clone)]
pub struct CategoryService {
    categories: CategoryRepository,
}

impl CategoryService {
    pub fn new(categories: CategoryRepository) -> Self {
        CategoryService { categories }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.categories.list_all().await?)
    }

    /// ## Errors
    /// - `NotFound` if no category has this id
    pub async fn find_by_id(&self, id: EntityId) -> ServiceResult<Category> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Category", id).into())
    }

    /// Categories whose name contains `fragment`, ignoring case.
    pub async fn search_by_name(&self, fragment: &str) -> ServiceResult<Vec<Category>> {
        Ok(self.categories.search_by_name(fragment.trim()).await?)
    }

    pub async fn create(&self, input: CategoryInput) -> ServiceResult<Category> {
        let input = input.normalized();
        validate_category_input(&input)?;

        let category = self.categories.insert(&input).await?;
        info!(id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// ## Errors
    /// - `NotFound` if no category has this id
    /// - `Validation` for bad fields
    pub async fn update(&self, id: EntityId, input: CategoryInput) -> ServiceResult<Category> {
        self.find_by_id(id).await?;

        let input = input.normalized();
        validate_category_input(&input)?;

        let category = self.categories.update(id, &input).await?;
        info!(id, "Category updated");
        Ok(category)
    }

    /// Deletes the category and its products.
    pub async fn delete(&self, id: EntityId) -> ServiceResult<()> {
        self.find_by_id(id).await?;
        self.categories.delete(id).await?;
        info!(id, "Category deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServiceError;
    use farmacia_db::{Database, DbConfig};

    async fn service() -> CategoryService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CategoryService::new(db.categories())
    }

    fn input(name: &str) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
            description: Some("  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_normalizes() {
        let service = service().await;

        let created = service.create(input("  Vitaminas ")).await.unwrap();
        assert_eq!(created.name, "Vitaminas");
        assert_eq!(created.description, None);
        assert_eq!(service.find_by_id(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_invalid() {
        let service = service().await;
        assert!(matches!(
            service.create(input("AB")).await,
            Err(ServiceError::Core(CoreError::Validation(_)))
        ));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_category() {
        let service = service().await;

        for result in [
            service.find_by_id(5).await.map(|_| ()),
            service.update(5, input("Vitaminas")).await.map(|_| ()),
            service.delete(5).await,
        ] {
            assert!(matches!(
                result,
                Err(ServiceError::Core(CoreError::NotFound { .. }))
            ));
        }
    }

    #[tokio::test]
    async fn test_search_ignores_case() {
        let service = service().await;
        service.create(input("Higiene Pessoal")).await.unwrap();

        assert_eq!(service.search_by_name("higiene").await.unwrap().len(), 1);
        assert_eq!(service.search_by_name("PESSOAL").await.unwrap().len(), 1);
    }
}
