//! # farmacia-core: Pure Business Logic for the Pharmacy Backend
//!
//! This crate holds the domain model of the pharmacy inventory: users,
//! categories and products, the rules their fields must satisfy, and the
//! one-way hashing applied to user passwords. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Farmácia Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/api (axum HTTP server)                     │   │
//! │  │   Access Gate ──► AuthService / CategoryService / ProductService│   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ farmacia-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ validation │  │   error   │  │credentials│  │   │
//! │  │   │   User    │  │  rules per │  │ CoreError │  │  Argon2id │  │   │
//! │  │   │  Product  │  │   field    │  │ Validation│  │ hash/verify│ │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 farmacia-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Category, Product and their inputs)
//! - [`validation`] - Field rules, collected into [`ValidationErrors`]
//! - [`credentials`] - Salted one-way password hashing
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use farmacia_core::types::UserInput;
//! use farmacia_core::validation::validate_registration;
//!
//! let input = UserInput {
//!     name: "Antonio Bandeira".to_string(),
//!     login: "a@x.com".to_string(),
//!     password: Some("123456789".to_string()),
//!     photo: None,
//! };
//! assert!(validate_registration(&input).is_ok());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod credentials;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use credentials::CredentialHasher;
pub use error::{CoreError, CoreResult, ValidationError, ValidationErrors};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum length of a user's display name.
pub const USER_NAME_MIN: usize = 3;

/// Maximum length of a user's display name.
pub const USER_NAME_MAX: usize = 100;

/// Minimum password length accepted on registration or change.
pub const PASSWORD_MIN: usize = 8;

/// Maximum length of a user's photo URL.
pub const USER_PHOTO_MAX: usize = 5000;

/// Largest accepted product price in cents (10 integer digits, 2 fraction digits).
pub const MAX_PRICE_CENTS: i64 = 99_999_999_999;
