//! # Service Layer
//!
//! Business operations sitting between the HTTP routes and the repositories.
//!
//! ```text
//! routes ──► AuthService ──────► dyn UserStore ──► users
//!        ──► CategoryService ──► CategoryRepository ──► categories
//!        ──► ProductService ───► ProductRepository ──► products
//! ```
//!
//! Services return [`ServiceError`], which keeps domain failures
//! ([`CoreError`]) apart from infrastructure failures ([`DbError`]).

pub mod category_service;
pub mod product_service;
pub mod user_service;

pub use category_service::CategoryService;
pub use product_service::ProductService;
pub use user_service::{AuthService, AuthenticatedSession};

use farmacia_core::{CoreError, ValidationErrors};
use farmacia_db::DbError;
use thiserror::Error;

/// Failure of a service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Domain failure (validation, duplicate login, not found, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failure not translated into a domain error.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Core(CoreError::Validation(errors))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
