//! # User Repository
//!
//! The credential store: user rows including their password hashes.
//!
//! Login uniqueness is owned by the `UNIQUE` index on `users.login`, not by
//! a prior lookup. A losing concurrent insert or update surfaces as
//! `DbError::UniqueViolation { field: "users.login", value: <login> }`.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use farmacia_core::{EntityId, NewUserAccount, UserAccount};

/// The `table.column` SQLite reports for a duplicate login.
pub const LOGIN_COLUMN: &str = "users.login";

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Finds an account by its exact (case-sensitive) login.
    pub async fn find_by_login(&self, login: &str) -> DbResult<Option<UserAccount>> {
        let account = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, name, login, password_hash, photo
            FROM users
            WHERE login = ?1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Finds an account by id.
    pub async fn find_by_id(&self, id: EntityId) -> DbResult<Option<UserAccount>> {
        let account = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, name, login, password_hash, photo
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Lists every account, ordered by id.
    pub async fn list_all(&self) -> DbResult<Vec<UserAccount>> {
        let accounts = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, name, login, password_hash, photo
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    /// Inserts a new account and returns it with its assigned id.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - login already stored
    pub async fn insert(&self, account: &NewUserAccount) -> DbResult<UserAccount> {
        debug!(login = %account.login, "Inserting user");

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, login, password_hash, photo)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&account.name)
        .bind(&account.login)
        .bind(&account.password_hash)
        .bind(&account.photo)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&account.login))?;

        Ok(UserAccount {
            id: result.last_insert_rowid(),
            name: account.name.clone(),
            login: account.login.clone(),
            password_hash: account.password_hash.clone(),
            photo: account.photo.clone(),
        })
    }

    /// Overwrites name, login, hash and photo of an existing account.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no account with that id
    /// * `Err(DbError::UniqueViolation)` - login taken by another account
    pub async fn update(&self, account: &UserAccount) -> DbResult<()> {
        debug!(id = account.id, "Updating user");

        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = ?2,
                login = ?3,
                password_hash = ?4,
                photo = ?5
            WHERE id = ?1
            "#,
        )
        .bind(account.id)
        .bind(&account.name)
        .bind(&account.login)
        .bind(&account.password_hash)
        .bind(&account.photo)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&account.login))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", account.id));
        }

        Ok(())
    }

    /// Number of stored accounts with the given login (0 or 1).
    pub async fn count_by_login(&self, login: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE login = ?1")
            .bind(login)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn new_account(login: &str) -> NewUserAccount {
        NewUserAccount {
            name: "Antonio Bandeira".to_string(),
            login: login.to_string(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdHNhbHQ$aGFzaA".to_string(),
            photo: None,
        }
    }

    async fn repo() -> UserRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().users()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let users = repo().await;

        let stored = users.insert(&new_account("a@x.com")).await.unwrap();
        assert!(stored.id > 0);

        let by_login = users.find_by_login("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_login, stored);

        let by_id = users.find_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(by_id.login, "a@x.com");

        assert!(users.find_by_login("b@x.com").await.unwrap().is_none());
        assert!(users.find_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_lookup_is_case_sensitive() {
        let users = repo().await;
        users.insert(&new_account("a@x.com")).await.unwrap();

        assert!(users.find_by_login("A@X.COM").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_login_rejected_by_index() {
        let users = repo().await;
        users.insert(&new_account("a@x.com")).await.unwrap();

        let err = users.insert(&new_account("a@x.com")).await.unwrap_err();
        assert!(err.is_unique_violation_on(LOGIN_COLUMN), "got {err:?}");
        assert!(matches!(
            err,
            DbError::UniqueViolation { ref value, .. } if value == "a@x.com"
        ));

        assert_eq!(users.count_by_login("a@x.com").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update() {
        let users = repo().await;
        let mut account = users.insert(&new_account("a@x.com")).await.unwrap();

        account.name = "Antonio B.".to_string();
        account.photo = Some("https://x.com/a.png".to_string());
        users.update(&account).await.unwrap();

        let reloaded = users.find_by_id(account.id).await.unwrap().unwrap();
        assert_eq!(reloaded, account);
    }

    #[tokio::test]
    async fn test_update_to_taken_login() {
        let users = repo().await;
        users.insert(&new_account("a@x.com")).await.unwrap();
        let mut other = users.insert(&new_account("b@x.com")).await.unwrap();

        other.login = "a@x.com".to_string();
        let err = users.update(&other).await.unwrap_err();
        assert!(err.is_unique_violation_on(LOGIN_COLUMN));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let users = repo().await;
        let ghost = UserAccount {
            id: 42,
            name: "Ghost".to_string(),
            login: "g@x.com".to_string(),
            password_hash: "x".to_string(),
            photo: None,
        };

        assert!(matches!(
            users.update(&ghost).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_all_ordered() {
        let users = repo().await;
        users.insert(&new_account("a@x.com")).await.unwrap();
        users.insert(&new_account("b@x.com")).await.unwrap();

        let all = users.list_all().await.unwrap();
        let logins: Vec<_> = all.iter().map(|u| u.login.as_str()).collect();
        assert_eq!(logins, ["a@x.com", "b@x.com"]);
    }
}
