use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::error::{AuthError, AuthResult};

const DUMMY_PASSWORD: &str = "not-a-real-password";

/// bcrypt hashing with a fixed work factor.
///
/// bcrypt is CPU-bound, so both operations run on the blocking pool.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    /// Hash compared against when no account matched, built at `cost` so
    /// unknown emails cost as much as wrong passwords
    dummy_hash: Arc<OnceCell<String>>,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub const DEFAULT_COST: u32 = 10;

    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Salted one-way hash of `plaintext`
    pub async fn hash(&self, plaintext: &str) -> AuthResult<String> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// `Ok(false)` on mismatch; `Err` only when the primitive itself fails
    /// (including a malformed stored hash).
    pub async fn verify(&self, plaintext: &str, hashed: &str) -> AuthResult<bool> {
        let plaintext = plaintext.to_owned();
        let hashed = hashed.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hashed))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Spend one verification's worth of work and discard the outcome
    pub async fn verify_dummy(&self, plaintext: &str) {
        let Ok(hashed) = self.dummy_hash().await else {
            return;
        };
        let plaintext = plaintext.to_owned();
        let _ = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hashed)).await;
    }

    /// Decoy hash at this hasher's cost, built on first use
    async fn dummy_hash(&self) -> AuthResult<String> {
        let cell = self.dummy_hash.clone();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || {
            cell.get_or_try_init(|| bcrypt::hash(DUMMY_PASSWORD, cost)).cloned()
        })
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
    }
}
