use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::directory::{DirectoryError, UserDirectory};
use super::models::{NewUser, User};

/// In-process directory used when no database is configured, and in tests.
///
/// The duplicate check and the insert happen under one write lock, so
/// concurrent creates of the same email cannot both succeed.
#[derive(Default)]
pub struct MemoryUserDirectory {
    users: RwLock<Vec<User>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Vec<User>, DirectoryError> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| u.email == email).cloned().collect())
    }

    async fn create(&self, user: NewUser) -> Result<User, DirectoryError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(DirectoryError::Conflict);
        }

        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            password: user.password,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }
}
