//! # Repository Module
//!
//! Database repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service (apps/api)                                                    │
//! │       │                                                                 │
//! │       │  db.users().find_by_login("a@x.com")                           │
//! │       ▼                                                                 │
//! │  UserRepository / CategoryRepository / ProductRepository              │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lookups return `Ok(None)` when nothing matches; updates and deletes that
//! touch no row return `DbError::NotFound`.
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Credential store
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD and name search
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and name search

pub mod category;
pub mod product;
pub mod user;

/// Builds a `LIKE` pattern matching `term` anywhere, with `%`, `_` and `\`
/// in the term taken literally. Pair with `ESCAPE '\'`.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("dipi"), "%dipi%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
    }
}
