use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{AuthError, AuthResult};
use crate::config::SecurityConfig;
use crate::database::User;

/// Token payload. Only non-secret fields of the account are signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Fails with `Signing` when `now + expiry` is not a representable instant
    pub fn new(user: &User, expiry: Duration) -> AuthResult<Self> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(expiry)
            .ok_or_else(|| AuthError::Signing("token expiry out of range".to_string()))?;

        Ok(Self {
            sub: user.id,
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// HS256 signer/verifier. The secret is injected at construction.
pub struct TokenIssuer {
    keys: Option<Keys>,
    /// `None` when the configured hours overflow a `Duration`
    expiry: Option<Duration>,
}

impl TokenIssuer {
    /// An empty `jwt_secret` yields an issuer whose `sign` always fails
    pub fn new(config: &SecurityConfig) -> Self {
        let keys = (!config.jwt_secret.is_empty()).then(|| Keys {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        });

        Self {
            keys,
            expiry: i64::try_from(config.jwt_expiry_hours).ok().and_then(Duration::try_hours),
        }
    }

    pub fn claims_for(&self, user: &User) -> AuthResult<Claims> {
        let expiry = self
            .expiry
            .ok_or_else(|| AuthError::Signing("token expiry out of range".to_string()))?;
        Claims::new(user, expiry)
    }

    pub fn sign(&self, claims: &Claims) -> AuthResult<String> {
        let keys = self
            .keys
            .as_ref()
            .ok_or_else(|| AuthError::Signing("JWT secret not configured".to_string()))?;

        encode(&Header::default(), claims, &keys.encoding).map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Check signature and expiry. Every failure is `AuthenticationFailed`.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        let keys = self.keys.as_ref().ok_or(AuthError::AuthenticationFailed)?;

        decode::<Claims>(token, &keys.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected bearer token: {}", e);
                AuthError::AuthenticationFailed
            })
    }
}
