//! # Authentication Service
//!
//! Registration, login and profile updates over the credential store.
//!
//! ## Login Flow
//! ```text
//! authenticate(login, password)
//!      │
//!      ▼
//! store.find_by_login ── None ──► verify(password, decoy) ──► AuthenticationFailed
//!      │ Some(account)
//!      ▼
//! verify(password, account.password_hash) ── false ──► AuthenticationFailed
//!      │ true
//!      ▼
//! AuthenticatedSession { user, token: "Basic base64(login:password)" }
//! ```
//!
//! Both failure branches produce the same error and pay the same Argon2 cost,
//! so neither the body nor the response time tells an unknown login from a
//! wrong password. The service holds no session state:
//! the returned token is re-checked on every protected request.
//!
//! Argon2 work runs on tokio's blocking pool.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::{ServiceError, ServiceResult};
use crate::auth::basic_token;
use crate::store::UserStore;
use farmacia_core::validation::{validate_registration, validate_user_update};
use farmacia_core::{
    CoreError, CredentialHasher, EntityId, NewUserAccount, User, UserInput, ValidationError,
};
use farmacia_db::{DbError, LOGIN_COLUMN};

/// Result of a successful login.
///
/// Serialized as the user's public fields plus `token`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedSession {
    #[serde(flatten)]
    pub user: User,

    /// Value to send as the `Authorization` header on later requests.
    pub token: String,
}

/// Password verified against [`AuthService`]'s decoy hash. Never stored.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-logins";

/// User registration, authentication and updates.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: CredentialHasher,
    /// Hash checked when a login is unknown, built with `hasher`'s cost.
    decoy_hash: Arc<str>,
}

impl AuthService {
    /// Creates the service over an injected store.
    ///
    /// Hashes the decoy password once, so construction pays one Argon2 run.
    pub fn new(store: Arc<dyn UserStore>, hasher: CredentialHasher) -> Self {
        let decoy_hash = hasher.hash(DECOY_PASSWORD).unwrap_or_else(|e| {
            error!(error = %e, "Failed to build decoy hash");
            String::new()
        });

        AuthService {
            store,
            hasher,
            decoy_hash: decoy_hash.into(),
        }
    }

    /// Registers a new user.
    ///
    /// ## Errors
    /// - `Validation` listing every failing field
    /// - `DuplicateLogin` if the login is taken, including when a concurrent
    ///   registration wins the race at insert time
    pub async fn register(&self, input: UserInput) -> ServiceResult<User> {
        let input = input.normalized();
        validate_registration(&input)?;

        if self.store.find_by_login(&input.login).await?.is_some() {
            warn!(login = %input.login, "Registration rejected: login taken");
            return Err(CoreError::DuplicateLogin(input.login).into());
        }

        let password = input.password.ok_or_else(|| {
            CoreError::from(ValidationError::Required {
                field: "password".to_string(),
            })
        })?;
        let password_hash = self.hash_password(password).await?;

        let account = self
            .store
            .insert(&NewUserAccount {
                name: input.name,
                login: input.login.clone(),
                password_hash,
                photo: input.photo,
            })
            .await
            .map_err(|e| login_conflict(e, &input.login))?;

        info!(id = account.id, login = %account.login, "User registered");
        Ok(account.into_user())
    }

    /// Checks a login/password pair.
    ///
    /// ## Errors
    /// - `AuthenticationFailed` for an unknown login or a wrong password
    pub async fn authenticate(
        &self,
        login: &str,
        password: &str,
    ) -> ServiceResult<AuthenticatedSession> {
        let login = login.trim();

        let Some(account) = self.store.find_by_login(login).await? else {
            self.verify_password(password.to_string(), self.decoy_hash.to_string())
                .await;
            debug!(login = %login, "Authentication failed");
            return Err(CoreError::AuthenticationFailed.into());
        };

        let matches = self
            .verify_password(password.to_string(), account.password_hash.clone())
            .await;
        if !matches {
            debug!(login = %login, "Authentication failed");
            return Err(CoreError::AuthenticationFailed.into());
        }

        Ok(AuthenticatedSession {
            token: basic_token(&account.login, password),
            user: account.into_user(),
        })
    }

    /// Updates name, login, photo and, if supplied, password.
    ///
    /// A supplied password that already matches the stored hash is not
    /// re-hashed.
    ///
    /// ## Errors
    /// - `NotFound` if no user has this id
    /// - `Validation` as in registration, password optional
    /// - `DuplicateLogin` if the new login belongs to another user
    pub async fn update(&self, id: EntityId, input: UserInput) -> ServiceResult<User> {
        let mut account = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found("User", id))?;

        let input = input.normalized();
        validate_user_update(&input)?;

        if input.login != account.login {
            if let Some(owner) = self.store.find_by_login(&input.login).await? {
                if owner.id != id {
                    return Err(CoreError::DuplicateLogin(input.login).into());
                }
            }
        }

        if let Some(password) = input.password {
            let unchanged = self
                .verify_password(password.clone(), account.password_hash.clone())
                .await;
            if !unchanged {
                account.password_hash = self.hash_password(password).await?;
                debug!(id, "Password changed");
            }
        }

        account.name = input.name;
        account.login = input.login;
        account.photo = input.photo;

        self.store
            .update(&account)
            .await
            .map_err(|e| login_conflict(e, &account.login))?;

        info!(id, "User updated");
        Ok(account.into_user())
    }

    /// Every user, in id order.
    pub async fn list_all(&self) -> ServiceResult<Vec<User>> {
        let accounts = self.store.list_all().await?;
        Ok(accounts.into_iter().map(|a| a.into_user()).collect())
    }

    /// ## Errors
    /// - `NotFound` if no user has this id
    pub async fn find_by_id(&self, id: EntityId) -> ServiceResult<User> {
        self.store
            .find_by_id(id)
            .await?
            .map(|a| a.into_user())
            .ok_or_else(|| CoreError::not_found("User", id).into())
    }

    async fn hash_password(&self, password: String) -> ServiceResult<String> {
        let hasher = self.hasher.clone();
        let hashed = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| CoreError::Hashing(e.to_string()))??;
        Ok(hashed)
    }

    async fn verify_password(&self, password: String, stored_hash: String) -> bool {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .unwrap_or(false)
    }
}

/// A UNIQUE violation on `users.login` is a duplicate login; anything else
/// stays a storage error.
fn login_conflict(err: DbError, login: &str) -> ServiceError {
    if err.is_unique_violation_on(LOGIN_COLUMN) {
        warn!(login = %login, "Login taken at write time");
        CoreError::DuplicateLogin(login.to_string()).into()
    } else {
        err.into()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
