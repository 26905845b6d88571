//! # Credential Hashing
//!
//! Salted one-way hashing of user passwords with Argon2id.
//!
//! The stored value is a PHC string (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`),
//! so the salt and work factors travel with the hash. Verifying never needs
//! to know which parameters were in force when the hash was created.
//!
//! Hashing is CPU-bound and deliberately slow. Async callers should run it on
//! the blocking pool (`tokio::task::spawn_blocking`).

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;

use crate::error::{CoreError, CoreResult};

/// Hashes and verifies user passwords.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl Default for CredentialHasher {
    /// Argon2id with the crate's recommended parameters.
    fn default() -> Self {
        CredentialHasher {
            argon2: Argon2::default(),
        }
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

impl CredentialHasher {
    /// Argon2id with explicit work factors.
    ///
    /// Cheap settings are for tests and seeding only.
    ///
    /// ## Errors
    /// `CoreError::Hashing` if Argon2 rejects the parameters
    /// (e.g. memory below 8 KiB per lane).
    pub fn with_cost(memory_kib: u32, iterations: u32) -> CoreResult<Self> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| CoreError::Hashing(e.to_string()))?;

        Ok(CredentialHasher {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// Two calls with the same password yield different strings.
    pub fn hash(&self, password: &str) -> CoreResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CoreError::Hashing(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Checks a password against a stored PHC string.
    ///
    /// Returns `false` on mismatch and on a malformed stored value.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
