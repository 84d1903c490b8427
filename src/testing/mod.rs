//! Test doubles and configuration shared by the unit test modules

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::{CacheError, CachedUser, SessionCache};
use crate::config::{AppConfig, Environment};
use crate::database::{DirectoryError, NewUser, User, UserDirectory};

/// Development profile with the cheapest bcrypt cost and a short session TTL
pub fn fast_config() -> AppConfig {
    let mut config = AppConfig::for_environment(Environment::Development);
    config.security.jwt_secret = "test-secret".to_string();
    config.security.bcrypt_cost = 4;
    config.session.ttl_ms = 100;
    config.session.timeout_ms = 50;
    config
}

/// Directory that returns a fixed result set for every lookup
pub struct FixedDirectory {
    users: Vec<User>,
    create_error: Mutex<Option<DirectoryError>>,
}

impl FixedDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users,
            create_error: Mutex::new(None),
        }
    }

    pub fn with_accounts(accounts: &[(&str, &str)]) -> Self {
        let users = accounts
            .iter()
            .map(|(email, hash)| User {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password: hash.to_string(),
                created_at: Utc::now(),
            })
            .collect();
        Self::new(users)
    }

    /// Fail the next `create` with `err`
    pub fn with_create_error(self, err: DirectoryError) -> Self {
        *self.create_error.lock().unwrap() = Some(err);
        self
    }
}

#[async_trait]
impl UserDirectory for FixedDirectory {
    async fn find_by_email(&self, _email: &str) -> Result<Vec<User>, DirectoryError> {
        Ok(self.users.clone())
    }

    async fn create(&self, user: NewUser) -> Result<User, DirectoryError> {
        if let Some(err) = self.create_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(User {
            id: Uuid::new_v4(),
            email: user.email,
            password: user.password,
            created_at: Utc::now(),
        })
    }
}

/// Cache whose every operation fails
pub struct FailingCache;

#[async_trait]
impl SessionCache for FailingCache {
    async fn set(&self, _key: Uuid, _value: CachedUser, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn get(&self, _key: Uuid) -> Result<Option<CachedUser>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

/// Cache that never answers within any reasonable timeout
pub struct SlowCache;

#[async_trait]
impl SessionCache for SlowCache {
    async fn set(&self, _key: Uuid, _value: CachedUser, _ttl: Duration) -> Result<(), CacheError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }

    async fn get(&self, _key: Uuid) -> Result<Option<CachedUser>, CacheError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }
}
