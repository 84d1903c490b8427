//! Account workflow: register, login and identity resolution.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::error::{AuthError, AuthResult};
use super::models::{AuthUser, CreatedUser, LoginRequest, LoginResponse};
use super::password::PasswordHasher;
use super::token::TokenIssuer;
use super::validation::validate_registration;
use crate::cache::{CacheError, CachedUser, SessionCache};
use crate::config::AppConfig;
use crate::database::{normalize_email, NewUser, UserDirectory};

/// Orchestrates the directory, hasher, token issuer and session cache.
///
/// Each operation is a single linear chain of awaits; nothing is shared
/// between requests except the collaborators themselves.
pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
    cache: Arc<dyn SessionCache>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    session_ttl: Duration,
    cache_timeout: Duration,
}

impl AuthService {
    pub fn new(directory: Arc<dyn UserDirectory>, cache: Arc<dyn SessionCache>, config: &AppConfig) -> Self {
        Self {
            directory,
            cache,
            hasher: PasswordHasher::new(config.security.bcrypt_cost),
            tokens: TokenIssuer::new(&config.security),
            session_ttl: config.session.ttl(),
            cache_timeout: config.session.timeout(),
        }
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// * `AuthError::Validation` - Malformed email or empty password
    /// * `AuthError::DuplicateAccount` - Email already registered, either at
    ///   the pre-check or at insert time
    /// * `AuthError::Hashing` - bcrypt failure; no record is created
    pub async fn register(&self, request: &LoginRequest) -> AuthResult<CreatedUser> {
        let email = normalize_email(&request.email);
        validate_registration(&email, request)?;

        if !self.directory.find_by_email(&email).await?.is_empty() {
            info!("Registration rejected: account already exists");
            return Err(AuthError::DuplicateAccount);
        }

        let password = self.hasher.hash(&request.password).await?;

        // The directory enforces uniqueness atomically; a conflict here is a lost race
        let user = self.directory.create(NewUser { email, password }).await?;

        info!("Created account {}", user.id);
        Ok(CreatedUser { id: user.id })
    }

    /// Exchange credentials for a signed token.
    ///
    /// Zero matches, several matches and a wrong password all fail the same
    /// way. A session cache failure is logged and does not fail the login.
    pub async fn login(&self, request: &LoginRequest) -> AuthResult<LoginResponse> {
        let email = normalize_email(&request.email);
        let mut matches = self.directory.find_by_email(&email).await?;

        if matches.len() != 1 {
            info!("Login rejected: {} accounts matched", matches.len());
            self.hasher.verify_dummy(&request.password).await;
            return Err(AuthError::AuthenticationFailed);
        }
        let user = matches.remove(0);

        if !self.hasher.verify(&request.password, &user.password).await? {
            info!("Login rejected for account {}: password mismatch", user.id);
            return Err(AuthError::AuthenticationFailed);
        }

        let token = self.tokens.sign(&self.tokens.claims_for(&user)?)?;

        self.cache_session(CachedUser::from(&user)).await;

        info!("Account {} logged in", user.id);
        Ok(LoginResponse { token })
    }

    /// Email of an identity already resolved by the auth middleware
    pub fn whoami(&self, user: &AuthUser) -> String {
        user.email.clone()
    }

    /// Resolve a bearer token to the user it was issued for.
    ///
    /// The session cache is consulted first; on a miss the directory must
    /// still hold exactly one account with the token's subject and email.
    pub async fn resolve_identity(&self, token: &str) -> AuthResult<AuthUser> {
        let claims = self.tokens.verify(token)?;

        match self.cache_get(claims.sub).await {
            Ok(Some(cached)) => {
                debug!("Session cache hit for account {}", claims.sub);
                return Ok(cached.into());
            }
            Ok(None) => debug!("Session cache miss for account {}", claims.sub),
            Err(e) => warn!("Session cache read failed for account {}: {}", claims.sub, e),
        }

        let matches = self.directory.find_by_email(&claims.email).await?;
        let user = match matches.as_slice() {
            [user] if user.id == claims.sub => user,
            _ => {
                info!("Token subject {} no longer matches an account", claims.sub);
                return Err(AuthError::AuthenticationFailed);
            }
        };

        let projection = CachedUser::from(user);
        self.cache_session(projection.clone()).await;
        Ok(projection.into())
    }

    async fn cache_session(&self, projection: CachedUser) {
        let id = projection.id;
        let result = tokio::time::timeout(self.cache_timeout, self.cache.set(id, projection, self.session_ttl))
            .await
            .unwrap_or(Err(CacheError::Timeout));

        if let Err(e) = result {
            warn!("Failed to cache session for account {}: {}", id, e);
        }
    }

    async fn cache_get(&self, id: uuid::Uuid) -> Result<Option<CachedUser>, CacheError> {
        tokio::time::timeout(self.cache_timeout, self.cache.get(id))
            .await
            .unwrap_or(Err(CacheError::Timeout))
    }
}
