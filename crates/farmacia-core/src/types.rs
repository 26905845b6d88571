//! # Domain Types
//!
//! Core domain types used throughout the pharmacy backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │      User       │   │    Category     │   │      Product        │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │   │  id             │   │  id                 │   │
//! │  │  name           │◄──┼─────────────────┼───│  owner_id (FK)      │   │
//! │  │  login (unique) │   │  name           │◄──│  category_id (FK)   │   │
//! │  │  photo          │   │  description    │   │  price_cents, ...   │   │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────────┘   │
//! │          ▲                                                              │
//! │          │ into_user()  (hash dropped)                                  │
//! │  ┌───────┴─────────┐                                                    │
//! │  │   UserAccount   │   stored row, carries password_hash               │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Secret Handling
//! [`User`] is the only user shape that is ever serialized. It has no
//! password field at all, so a response cannot leak one. [`UserAccount`]
//! carries the hash for the authentication path and redacts it in `Debug`.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the store to users, categories and products.
pub type EntityId = i64;

// =============================================================================
// User
// =============================================================================

/// Public view of an account. Never contains secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier (immutable).
    pub id: EntityId,

    /// Display name.
    pub name: String,

    /// Login identifier (email-shaped, unique).
    pub login: String,

    /// Optional photo URL.
    pub photo: Option<String>,
}

/// A stored account row, including the password hash.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserAccount {
    pub id: EntityId,
    pub name: String,
    pub login: String,
    /// Argon2 PHC string. Never the plaintext.
    pub password_hash: String,
    pub photo: Option<String>,
}

impl UserAccount {
    /// Consumes the account, dropping the hash.
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            login: self.login,
            photo: self.photo,
        }
    }
}

impl fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("login", &self.login)
            .field("password_hash", &"<redacted>")
            .field("photo", &self.photo)
            .finish()
    }
}

/// An account about to be inserted (the store assigns the id).
#[derive(Clone)]
pub struct NewUserAccount {
    pub name: String,
    pub login: String,
    pub password_hash: String,
    pub photo: Option<String>,
}

impl fmt::Debug for NewUserAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUserAccount")
            .field("name", &self.name)
            .field("login", &self.login)
            .field("password_hash", &"<redacted>")
            .field("photo", &self.photo)
            .finish()
    }
}

/// User fields as submitted by a client, for registration or update.
///
/// `password` is required on registration and optional on update (absent
/// means "keep the current password").
#[derive(Clone, Default, Deserialize)]
pub struct UserInput {
    pub name: String,
    pub login: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl UserInput {
    /// Trims name and login, and turns a blank photo into `None`.
    ///
    /// The login keeps its case: uniqueness is case-sensitive as stored.
    pub fn normalized(self) -> Self {
        UserInput {
            name: self.name.trim().to_string(),
            login: self.login.trim().to_string(),
            password: self.password,
            photo: self
                .photo
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        }
    }
}

impl fmt::Debug for UserInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserInput")
            .field("name", &self.name)
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("photo", &self.photo)
            .finish()
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category (e.g. "Analgésicos").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
}

/// Category fields as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryInput {
    /// Trims the name and turns a blank description into `None`.
    pub fn normalized(self) -> Self {
        CategoryInput {
            name: self.name.trim().to_string(),
            description: non_blank(self.description),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product held in the pharmacy's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: EntityId,

    pub name: String,

    pub description: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    pub brand: String,

    pub manufacturer: String,

    /// Expiration date; always after the day the product was saved.
    pub expiration_date: NaiveDate,

    pub photo: Option<String>,

    /// Units in stock.
    pub quantity: i32,

    /// Sale requires retaining the prescription.
    pub prescription_required: bool,

    pub category_id: EntityId,

    /// User who registered the product.
    pub owner_id: EntityId,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Product fields as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    pub brand: String,
    pub manufacturer: String,
    pub expiration_date: NaiveDate,
    #[serde(default)]
    pub photo: Option<String>,
    pub quantity: i32,
    pub prescription_required: bool,
    pub category_id: EntityId,
}

impl ProductInput {
    /// Trims text fields and turns blank optional fields into `None`.
    pub fn normalized(self) -> Self {
        ProductInput {
            name: self.name.trim().to_string(),
            description: non_blank(self.description),
            brand: self.brand.trim().to_string(),
            manufacturer: self.manufacturer.trim().to_string(),
            photo: non_blank(self.photo),
            ..self
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> UserAccount {
        UserAccount {
            id: 7,
            name: "Antonio Bandeira".to_string(),
            login: "a@x.com".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            photo: None,
        }
    }

    #[test]
    fn test_user_json_has_no_password() {
        let json = serde_json::to_value(account().into_user()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("password_hash"));
        assert_eq!(obj["login"], "a@x.com");
    }

    #[test]
    fn test_account_debug_redacts_hash() {
        let rendered = format!("{:?}", account());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("argon2id"));
    }

    #[test]
    fn test_user_input_debug_redacts_password() {
        let input = UserInput {
            password: Some("123456789".to_string()),
            ..Default::default()
        };
        assert!(!format!("{input:?}").contains("123456789"));
    }

    #[test]
    fn test_user_input_normalized() {
        let input = UserInput {
            name: "  Root ".to_string(),
            login: " Root@Genesis.com ".to_string(),
            password: Some(" spaced secret ".to_string()),
            photo: Some("   ".to_string()),
        }
        .normalized();

        assert_eq!(input.name, "Root");
        // case is preserved
        assert_eq!(input.login, "Root@Genesis.com");
        // passwords are never trimmed
        assert_eq!(input.password.as_deref(), Some(" spaced secret "));
        assert_eq!(input.photo, None);
    }

    #[test]
    fn test_user_input_password_optional_in_json() {
        let input: UserInput =
            serde_json::from_str(r#"{"name":"Root","login":"root@x.com"}"#).unwrap();
        assert!(input.password.is_none());
        assert!(input.photo.is_none());
    }

    #[test]
    fn test_product_input_normalized() {
        let input: ProductInput = serde_json::from_str(
            r#"{
                "name": " Dipirona 500mg ",
                "description": "",
                "price_cents": 1299,
                "brand": " Medley ",
                "manufacturer": "Sanofi",
                "expiration_date": "2099-01-31",
                "quantity": 10,
                "prescription_required": false,
                "category_id": 1
            }"#,
        )
        .unwrap();
        let input = input.normalized();

        assert_eq!(input.name, "Dipirona 500mg");
        assert_eq!(input.brand, "Medley");
        assert_eq!(input.description, None);
        assert_eq!(input.photo, None);
        assert_eq!(
            input.expiration_date,
            NaiveDate::from_ymd_opt(2099, 1, 31).unwrap()
        );
    }
}
