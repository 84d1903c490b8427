use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cache::CachedUser;

/// Credentials body shared by `/v1/user/create` and `/v1/user/login`
#[derive(Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Plaintext passwords must never reach the logs
impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Registration result. Only the id is echoed back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedUser {
    pub id: Uuid,
}

/// Identity resolved from a bearer token, injected into request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

impl From<CachedUser> for AuthUser {
    fn from(cached: CachedUser) -> Self {
        Self {
            id: cached.id,
            email: cached.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_password() {
        let request = LoginRequest {
            email: "a@b.com".to_string(),
            password: "pw1".to_string(),
        };
        let rendered = format!("{:?}", request);
        assert!(rendered.contains("a@b.com"));
        assert!(!rendered.contains("pw1"));
    }

    #[test]
    fn created_user_serializes_only_id() {
        let created = CreatedUser { id: Uuid::new_v4() };
        let value = serde_json::to_value(&created).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 1);
        assert!(value.get("id").is_some());
    }
}
