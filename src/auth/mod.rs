//! Credentials-based authentication.
//!
//! - `password` - argon2 hashing on the blocking pool
//! - `session` - signed session tokens with a fixed validity window
//! - `service` - signup and login against the credential store
//!
//! Handlers behind the auth middleware read the caller from the [`Auth`]
//! request extension.

pub mod password;
pub mod service;
pub mod session;

use serde::Serialize;
use time::OffsetDateTime;

pub use service::{AuthService, Credentials, MIN_PASSWORD_LENGTH, SignupRequest};
pub use session::{IssuedSession, SESSION_COOKIE, SessionClaims, SessionManager};

use crate::store::UserIdentity;

/// Authenticated caller attached to the request by the auth middleware
#[derive(Debug, Clone, Serialize)]
pub struct Auth {
    pub user: UserIdentity,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl Auth {
    pub fn from_claims(claims: &SessionClaims) -> Self {
        Self {
            user: claims.identity(),
            expires_at: claims.expires_at(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}
