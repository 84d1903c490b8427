//! Authentication error types.

use thiserror::Error;

use crate::database::DirectoryError;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// An account with that email already exists
    #[error("Account already exists")]
    DuplicateAccount,

    /// Unknown email, wrong password or ambiguous account. Deliberately not distinguished.
    #[error("Failed to authenticate")]
    AuthenticationFailed,

    /// Request failed input validation
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Password hashing or verification failed internally
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Token could not be signed
    #[error("Token signing failed: {0}")]
    Signing(String),

    /// User directory failure
    #[error("User directory error: {0}")]
    Directory(DirectoryError),
}

// A create-time uniqueness violation is the authoritative duplicate signal
impl From<DirectoryError> for AuthError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Conflict => AuthError::DuplicateAccount,
            other => AuthError::Directory(other),
        }
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
