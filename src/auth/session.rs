use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::errors::auth_error::{AuthError, AuthResult};
use crate::store::UserIdentity;
use crate::utils::clock::Clock;

/// Default cookie carrying the session token
pub const SESSION_COOKIE: &str = "voicelab_session";

/// Claims embedded in every session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

impl SessionClaims {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.sub.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }

    pub fn expires_at(&self) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(self.exp).unwrap_or(OffsetDateTime::UNIX_EPOCH)
    }
}

/// A freshly signed token and when it stops being valid
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

/// Issues and verifies HS256 session tokens
///
/// Expiry is checked against the injected clock instead of jsonwebtoken's
/// built-in wall-clock check, with no leeway.
#[derive(Clone)]
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, identity: &UserIdentity) -> AuthResult<IssuedSession> {
        let now = self.clock.now();
        let expires_at = now
            .checked_add(self.ttl)
            .ok_or_else(|| AuthError::TokenIssue("session lifetime out of range".to_string()))?;
        let claims = SessionClaims {
            sub: identity.id.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))?;

        Ok(IssuedSession { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> AuthResult<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                AuthError::InvalidToken
            })?
            .claims;

        if claims.exp <= self.clock.now().unix_timestamp() {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}
