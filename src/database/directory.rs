use async_trait::async_trait;
use thiserror::Error;

use super::models::{NewUser, User};

/// Errors from a user directory backend
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The store rejected the insert because the email is already taken.
    #[error("Account already exists")]
    Conflict,

    #[error("Directory unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistent store of user accounts.
///
/// Implementations must enforce email uniqueness atomically in `create` and
/// report a violation as [`DirectoryError::Conflict`]. Emails are compared
/// exactly; callers normalize before calling in.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Vec<User>, DirectoryError>;

    async fn create(&self, user: NewUser) -> Result<User, DirectoryError>;

    /// Connectivity probe used by `/health`
    async fn health_check(&self) -> Result<(), DirectoryError> {
        Ok(())
    }
}
