//! Credential store port.
//!
//! [`AuthService`](crate::services::AuthService) talks to user persistence
//! only through [`UserStore`], so tests can swap in a double (for example one
//! that counts calls) without touching SQLite.

use async_trait::async_trait;

use farmacia_core::{EntityId, NewUserAccount, UserAccount};
use farmacia_db::{DbResult, UserRepository};

/// Persistence of user accounts.
///
/// Implementations must enforce login uniqueness themselves and report a
/// violation as `DbError::UniqueViolation` on `users.login`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_login(&self, login: &str) -> DbResult<Option<UserAccount>>;

    async fn find_by_id(&self, id: EntityId) -> DbResult<Option<UserAccount>>;

    async fn insert(&self, account: &NewUserAccount) -> DbResult<UserAccount>;

    async fn update(&self, account: &UserAccount) -> DbResult<()>;

    async fn list_all(&self) -> DbResult<Vec<UserAccount>>;
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_login(&self, login: &str) -> DbResult<Option<UserAccount>> {
        UserRepository::find_by_login(self, login).await
    }

    async fn find_by_id(&self, id: EntityId) -> DbResult<Option<UserAccount>> {
        UserRepository::find_by_id(self, id).await
    }

    async fn insert(&self, account: &NewUserAccount) -> DbResult<UserAccount> {
        UserRepository::insert(self, account).await
    }

    async fn update(&self, account: &UserAccount) -> DbResult<()> {
        UserRepository::update(self, account).await
    }

    async fn list_all(&self) -> DbResult<Vec<UserAccount>> {
        UserRepository::list_all(self).await
    }
}
