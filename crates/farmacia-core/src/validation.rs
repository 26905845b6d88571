//! # Validation Module
//!
//! Field rules for every input the API accepts.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (apps/api)                                    │
//! │  └── Type validation (JSON deserialization)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Lengths, formats, ranges                                          │
//! │  └── Every failing field collected into ValidationErrors               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE(users.login)                                               │
//! │  └── Foreign keys (product → category, product → owner)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Single-field validators return [`ValidationResult`]; the `validate_*_input`
//! and `validate_registration` functions run all rules for a record and return
//! every failure at once. Lengths are counted in characters, not bytes.
//!
//! ## Usage
//! ```rust
//! use farmacia_core::validation::{validate_login, validate_password};
//!
//! assert!(validate_login("a@x.com").is_ok());
//! assert!(validate_password("short").is_err());
//! ```

use chrono::NaiveDate;

use crate::error::{ValidationError, ValidationErrors};
use crate::types::{CategoryInput, ProductInput, UserInput};
use crate::{MAX_PRICE_CENTS, PASSWORD_MIN, USER_NAME_MAX, USER_NAME_MIN, USER_PHOTO_MAX};

/// Result type for single-field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Shared Rules
// =============================================================================

/// Checks a required text field's length in characters.
fn required_length(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let len = value.chars().count();

    if len == 0 {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Checks an optional text field; `None` always passes.
fn optional_length(
    field: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> ValidationResult<()> {
    match value {
        Some(v) => required_length(field, v, min, max),
        None => Ok(()),
    }
}

// =============================================================================
// User Validators
// =============================================================================

/// Validates a user's display name (3–100 characters).
pub fn validate_user_name(name: &str) -> ValidationResult<()> {
    required_length("name", name, USER_NAME_MIN, USER_NAME_MAX)
}

/// Validates the login identifier has an email shape.
///
/// ## Rules
/// - Not empty, no whitespace, no `:` (the Basic credential separator)
/// - Exactly one `@` with a non-empty local part
/// - Domain has at least one `.` and no empty labels
///
/// ## Example
/// ```rust
/// use farmacia_core::validation::validate_login;
///
/// assert!(validate_login("root@root.com").is_ok());
/// assert!(validate_login("root").is_err());
/// assert!(validate_login("root@localhost").is_err());
/// ```
pub fn validate_login(login: &str) -> ValidationResult<()> {
    if login.is_empty() {
        return Err(ValidationError::Required {
            field: "login".to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "login".to_string(),
        reason: reason.to_string(),
    };

    if login.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }
    if login.contains(':') {
        return Err(invalid("must not contain ':'"));
    }

    let (local, domain) = login
        .split_once('@')
        .ok_or_else(|| invalid("must be an email address"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must be an email address"));
    }
    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err(invalid("email domain is malformed"));
    }
    Ok(())
}

/// Validates a plaintext password (at least 8 characters).
///
/// Passwords are taken as-is: surrounding whitespace counts.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    if password.chars().count() < PASSWORD_MIN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: PASSWORD_MIN,
        });
    }
    Ok(())
}

/// Validates an optional user photo URL.
///
/// Accepts `http://` or `https://` URLs without whitespace, up to 5000
/// characters. Callers normalize an empty string to `None` first.
pub fn validate_user_photo(photo: Option<&str>) -> ValidationResult<()> {
    let Some(photo) = photo else {
        return Ok(());
    };

    if photo.chars().count() > USER_PHOTO_MAX {
        return Err(ValidationError::TooLong {
            field: "photo".to_string(),
            max: USER_PHOTO_MAX,
        });
    }

    let rest = photo
        .strip_prefix("https://")
        .or_else(|| photo.strip_prefix("http://"));

    match rest {
        Some(rest) if !rest.is_empty() && !photo.chars().any(char::is_whitespace) => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "photo".to_string(),
            reason: "must be an http(s) URL".to_string(),
        }),
    }
}

fn user_fields(input: &UserInput, errors: &mut ValidationErrors) {
    errors.check(validate_user_name(&input.name));
    errors.check(validate_login(&input.login));
    errors.check(validate_user_photo(input.photo.as_deref()));
}

/// Validates a registration: name, login, photo and a mandatory password.
pub fn validate_registration(input: &UserInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    user_fields(input, &mut errors);
    match input.password.as_deref() {
        Some(password) => errors.check(validate_password(password)),
        None => errors.push(ValidationError::Required {
            field: "password".to_string(),
        }),
    }
    errors.into_result()
}

/// Validates an update: like registration, but the password may be absent.
pub fn validate_user_update(input: &UserInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    user_fields(input, &mut errors);
    if let Some(password) = input.password.as_deref() {
        errors.check(validate_password(password));
    }
    errors.into_result()
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a category (name 3–100, description up to 500).
pub fn validate_category_input(input: &CategoryInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(required_length("name", &input.name, 3, 100));
    errors.check(optional_length(
        "description",
        input.description.as_deref(),
        1,
        500,
    ));
    errors.into_result()
}

/// Validates a price in cents: positive, at most 10 integer digits.
pub fn validate_price_cents(price_cents: i64) -> ValidationResult<()> {
    if price_cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price_cents".to_string(),
        });
    }
    if price_cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price_cents".to_string(),
            min: 1,
            max: MAX_PRICE_CENTS,
        });
    }
    Ok(())
}

/// Validates an expiration date lies strictly after `today`.
pub fn validate_expiration_date(date: NaiveDate, today: NaiveDate) -> ValidationResult<()> {
    if date <= today {
        return Err(ValidationError::MustBeFuture {
            field: "expiration_date".to_string(),
        });
    }
    Ok(())
}

/// Validates a product against every field rule.
///
/// `today` is passed in so this stays free of clock access; the service
/// supplies the current UTC date. Category existence is checked by the
/// service, not here.
pub fn validate_product_input(
    input: &ProductInput,
    today: NaiveDate,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(required_length("name", &input.name, 3, 200));
    errors.check(optional_length(
        "description",
        input.description.as_deref(),
        10,
        1000,
    ));
    errors.check(validate_price_cents(input.price_cents));
    errors.check(required_length("brand", &input.brand, 2, 200));
    errors.check(required_length("manufacturer", &input.manufacturer, 2, 200));
    errors.check(validate_expiration_date(input.expiration_date, today));
    errors.check(optional_length("photo", input.photo.as_deref(), 10, 500));

    if input.quantity < 1 {
        errors.push(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    errors.into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================
