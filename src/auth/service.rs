use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::password;
use super::session::{IssuedSession, SessionManager};
use crate::errors::app_error::{AppError, AppResult};
use crate::store::{CredentialStore, UserIdentity, UserRecord, normalize_email};

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Body of `POST /api/auth/signup`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /api/auth/login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    /// Both fields, or `None` when either is missing or blank
    fn present(&self) -> Option<(&str, &str)> {
        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((email, password))
    }
}

/// Signup and login on top of the credential store
#[derive(Debug, Clone)]
pub struct AuthService {
    store: Arc<CredentialStore>,
    sessions: SessionManager,
}

impl AuthService {
    pub fn new(store: Arc<CredentialStore>, sessions: SessionManager) -> Self {
        Self { store, sessions }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Create an account if the email is not registered yet
    pub async fn signup(&self, request: SignupRequest) -> AppResult<UserIdentity> {
        let credentials = Credentials {
            email: request.email,
            password: request.password,
        };
        let (email, password) = credentials
            .present()
            .ok_or_else(|| AppError::validation("Missing email or password"))?;

        let email = normalize_email(email);
        validate_email(&email)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        if self.store.find_by_email(&email).await?.is_some() {
            info!("Signup rejected: email already registered");
            return Err(AppError::UserAlreadyExists);
        }

        let password_hash = password::hash_password(password.to_string()).await?;
        let name = request
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            name,
        };
        let identity = record.identity();

        // The store re-checks uniqueness under its write lock
        self.store.insert(record).await?;
        info!(user_id = %identity.id, "User created");

        Ok(identity)
    }

    /// Check an email/password pair; `None` for every kind of mismatch
    pub async fn verify_credentials(
        &self,
        credentials: &Credentials,
    ) -> AppResult<Option<UserIdentity>> {
        let Some((email, password)) = credentials.present() else {
            return Ok(None);
        };

        let Some(user) = self.store.find_by_email(email).await? else {
            debug!("Login attempt for unknown email");
            password::verify_dummy(password.to_string()).await;
            return Ok(None);
        };

        if password::verify_password(password.to_string(), user.password_hash.clone()).await? {
            Ok(Some(user.identity()))
        } else {
            debug!(user_id = %user.id, "Password mismatch");
            Ok(None)
        }
    }

    /// Verify credentials and issue a session
    pub async fn login(
        &self,
        credentials: &Credentials,
    ) -> AppResult<(UserIdentity, IssuedSession)> {
        if credentials.present().is_none() {
            return Err(AppError::validation("Missing email or password"));
        }

        let Some(identity) = self.verify_credentials(credentials).await? else {
            warn!("Login failed: invalid credentials");
            return Err(AppError::InvalidCredentials);
        };

        let session = self.sessions.issue(&identity)?;
        info!(user_id = %identity.id, "Login successful");
        Ok((identity, session))
    }
}

fn validate_email(email: &str) -> AppResult<()> {
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(())
        }
        _ => Err(AppError::validation("Invalid email address")),
    }
}
