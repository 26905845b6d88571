//! # Error Types
//!
//! Domain-specific error types for farmacia-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  farmacia-core errors (this file)                                       │
//! │  ├── CoreError         - Domain failures the caller can act on          │
//! │  ├── ValidationErrors  - Every failing field of one input               │
//! │  └── ValidationError   - A single failing field                         │
//! │                                                                         │
//! │  farmacia-db errors (separate crate)                                    │
//! │  └── DbError           - Database operation failures                    │
//! │                                                                         │
//! │  API errors (apps/api)                                                  │
//! │  └── ApiError          - What HTTP clients see (code + status)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → ApiError → Client   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, id, login)
//! 3. Errors are enum variants, never String
//! 4. Authentication failures never say which half of the credential was wrong

use std::fmt;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is recoverable by the caller: none of them is fatal to the
/// process.
#[derive(Debug, Error)]
pub enum CoreError {
    /// One or more input fields broke their rules.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The login identifier already belongs to another account.
    ///
    /// ## When This Occurs
    /// - Registering a login that is already stored
    /// - Updating a user to a login owned by a different user
    /// - Losing a concurrent race for the same login (reported by the store)
    #[error("Login '{0}' is already registered")]
    DuplicateLogin(String),

    /// Login attempt rejected.
    ///
    /// Deliberately carries no detail: an unknown login and a wrong password
    /// produce the same error so accounts cannot be enumerated.
    #[error("Invalid login or password")]
    AuthenticationFailed,

    /// Entity lookup by id found nothing.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A product references a category that does not exist.
    #[error("Category {0} does not exist")]
    UnknownCategory(i64),

    /// Password hashing failed (bad parameters, RNG failure).
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single failing input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., not an email address, not a URL).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Date must lie strictly after today.
    #[error("{field} must be a future date")]
    MustBeFuture { field: String },
}

impl ValidationError {
    /// Name of the field that failed.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::MustBeFuture { field } => field,
        }
    }
}

// =============================================================================
// Validation Errors (collection)
// =============================================================================

/// Every failing field of one input, in the order the rules ran.
///
/// Validators collect instead of stopping at the first failure so a client
/// can fix a whole form in one round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        ValidationErrors(Vec::new())
    }

    /// Records a failing field.
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Records the error of a single-field check, if it failed.
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.push(error);
        }
    }

    /// Returns true if no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the failing fields.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Returns true if the given field is among the failures.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    /// `Ok(())` when nothing failed, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for CoreError {
    fn from(error: ValidationError) -> Self {
        CoreError::Validation(error.into())
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DuplicateLogin("a@x.com".to_string());
        assert_eq!(err.to_string(), "Login 'a@x.com' is already registered");

        let err = CoreError::not_found("User", 42);
        assert_eq!(err.to_string(), "User not found: 42");

        assert_eq!(
            CoreError::AuthenticationFailed.to_string(),
            "Invalid login or password"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "login".to_string(),
        };
        assert_eq!(err.to_string(), "login is required");
        assert_eq!(err.field(), "login");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        };
        assert_eq!(err.to_string(), "password must be at least 8 characters");
    }

    #[test]
    fn test_validation_errors_collects_and_joins() {
        let mut errors = ValidationErrors::new();
        errors.check(Ok(()));
        errors.check(Err(ValidationError::Required {
            field: "name".to_string(),
        }));
        errors.push(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });

        assert_eq!(errors.len(), 2);
        assert!(errors.has_field("name"));
        assert!(errors.has_field("quantity"));
        assert!(!errors.has_field("brand"));
        assert_eq!(
            errors.to_string(),
            "name is required; quantity must be positive"
        );
        assert!(errors.into_result().is_err());
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "login".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(ref e) if e.len() == 1));
    }
}
