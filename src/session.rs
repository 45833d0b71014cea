//! Session credential mint/verify.
//!
//! A session credential is an HS256 JWT minted at OAuth callback time. It
//! embeds a snapshot of the user's profile plus the GitLab access token, so
//! every later request is self-contained: no server-side session store, no
//! revocation. The browser keeps the token in local storage and sends it as
//! `Authorization: Bearer <jwt>`.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::gitlab::UserProfile;

/// Fixed credential lifetime. After this the user logs in again.
pub const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// GitLab username, for log correlation.
    pub sub: String,
    pub user: UserProfile,
    /// Upstream access token, reused for every aggregation fetch.
    pub gitlab_token: String,
    pub iat: i64,
    pub exp: i64,
}

/// Holds the derived signing/verification keys. Built once at startup from
/// the configured secret and shared via `AppState`.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn mint(&self, user: &UserProfile, gitlab_token: &str) -> Result<String, AppError> {
        self.mint_with_ttl(user, gitlab_token, Duration::hours(SESSION_TTL_HOURS))
    }

    pub fn mint_with_ttl(
        &self,
        user: &UserProfile,
        gitlab_token: &str,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user.username.clone(),
            user: user.clone(),
            gitlab_token: gitlab_token.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to sign session: {}", e)))
    }

    /// All-or-nothing verification: signature AND expiry must both hold.
    /// Synchronous and side-effect-free; any failure collapses to
    /// `Unauthorized` so callers cannot distinguish tampering from expiry.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}
