//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the API                                │
//! │                                                                         │
//! │  Handler → Service                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  CoreError::Validation ────────► 400 VALIDATION_ERROR (+ fields)       │
//! │  CoreError::DuplicateLogin ────► 400 VALIDATION_ERROR                  │
//! │  CoreError::UnknownCategory ───► 400 VALIDATION_ERROR                  │
//! │  CoreError::AuthenticationFailed ► 401 UNAUTHORIZED + WWW-Authenticate │
//! │  CoreError::NotFound ──────────► 404 NOT_FOUND                         │
//! │  DbError (constraint) ─────────► 400 VALIDATION_ERROR                  │
//! │  DbError (other), Hashing ─────► 500, generic message, logged          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Body
//! ```json
//! {
//!   "code": "VALIDATION_ERROR",
//!   "message": "Validation failed",
//!   "fields": [{ "field": "login", "message": "login is required" }]
//! }
//! ```
//! `fields` is omitted when empty.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::ServiceError;
use farmacia_core::{CoreError, ValidationErrors};
use farmacia_db::DbError;

/// Challenge sent with every 401.
pub const BASIC_CHALLENGE: &str = r#"Basic realm="farmacia""#;

/// Error returned from HTTP handlers.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Per-field problems, for validation failures
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldIssue>,
}

/// One failing input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Missing or rejected credentials (401)
    Unauthorized,

    /// Resource not found (404)
    NotFound,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a validation error pointing at one field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        ApiError {
            fields: vec![FieldIssue {
                field: field.to_string(),
                message: message.clone(),
            }],
            ..ApiError::validation(message)
        }
    }

    /// Creates the 401 used for every credential problem.
    pub fn unauthorized() -> Self {
        ApiError::new(ErrorCode::Unauthorized, "Invalid login or password")
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, Json(self)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BASIC_CHALLENGE),
            );
        }

        response
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError {
            fields: errors
                .iter()
                .map(|e| FieldIssue {
                    field: e.field().to_string(),
                    message: e.to_string(),
                })
                .collect(),
            ..ApiError::validation("Validation failed")
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(errors) => errors.into(),
            CoreError::DuplicateLogin(_) => ApiError::invalid_field("login", err.to_string()),
            CoreError::UnknownCategory(_) => {
                ApiError::invalid_field("category_id", err.to_string())
            }
            CoreError::AuthenticationFailed => ApiError::unauthorized(),
            CoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            CoreError::Hashing(e) => {
                tracing::error!("Password hashing failed: {}", e);
                ApiError::internal("Internal server error")
            }
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{field} '{value}' already exists"))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database busy")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(e) => e.into(),
            ServiceError::Db(e) => e.into(),
        }
    }
}

/// Malformed or mistyped JSON bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

/// Path segments that don't parse (e.g. `/users/abc`).
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use farmacia_core::ValidationError;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                CoreError::DuplicateLogin("a@x.com".into()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (CoreError::UnknownCategory(9).into(), StatusCode::BAD_REQUEST),
            (CoreError::AuthenticationFailed.into(), StatusCode::UNAUTHORIZED),
            (CoreError::not_found("User", 1).into(), StatusCode::NOT_FOUND),
            (
                CoreError::Hashing("boom".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DbError::QueryFailed("syntax".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DbError::duplicate("users.login", "a@x.com").into(),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status(), status, "{error:?}");
        }
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err: ApiError = DbError::QueryFailed("no such table: users".into()).into();
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_validation_body_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::Required {
            field: "login".into(),
        });
        errors.push(ValidationError::TooShort {
            field: "password".into(),
            min: 8,
        });

        let json = serde_json::to_value(ApiError::from(errors)).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["fields"][0]["field"], "login");
        assert_eq!(json["fields"][1]["field"], "password");
    }

    #[test]
    fn test_fields_omitted_when_empty() {
        let json = serde_json::to_value(ApiError::not_found("User", "7")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert!(json.get("fields").is_none());
    }

    #[test]
    fn test_unauthorized_carries_challenge() {
        let response = ApiError::unauthorized().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            BASIC_CHALLENGE
        );
    }
}
