use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::user::{UserRecord, normalize_email};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Credential file I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Credential file {path} is not a valid user list: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("User already exists")]
    DuplicateEmail,
}

/// Flat-file user store
///
/// The whole user list lives in one JSON array and every mutation rewrites the
/// file. Writers are serialized through `write_lock`, and the file is replaced
/// with a rename, so readers always see a complete list and two signups for the
/// same email cannot both pass the uniqueness check within one process.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every record, creating an empty file on first use
    pub async fn load(&self) -> StoreResult<Vec<UserRecord>> {
        if let Some(users) = self.read().await? {
            return Ok(users);
        }

        // An inserter holding the lock writes the file itself
        if let Ok(_guard) = self.write_lock.try_lock()
            && self.read().await?.is_none()
        {
            info!(
                path = %self.path.display(),
                "Credential file missing, initializing empty user list"
            );
            self.persist(&[]).await?;
        }
        Ok(Vec::new())
    }

    /// Parsed file contents, `None` when the file does not exist
    async fn read(&self) -> StoreResult<Option<Vec<UserRecord>>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|source| StoreError::Serialization {
                path: self.path.clone(),
                source,
            })
    }

    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let email = normalize_email(email);
        let users = self.load().await?;
        Ok(users
            .into_iter()
            .find(|u| normalize_email(&u.email) == email))
    }

    /// Append a record if its email is not taken yet
    pub async fn insert(&self, record: UserRecord) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut users = self.read().await?.unwrap_or_default();
        let email = normalize_email(&record.email);
        if users.iter().any(|u| normalize_email(&u.email) == email) {
            debug!("Rejecting insert for an email that is already registered");
            return Err(StoreError::DuplicateEmail);
        }

        users.push(record);
        self.persist(&users).await?;
        debug!(count = users.len(), "Credential file updated");
        Ok(())
    }

    /// Rewrite the full user list
    pub async fn persist(&self, users: &[UserRecord]) -> StoreResult<()> {
        let data =
            serde_json::to_vec_pretty(users).map_err(|source| StoreError::Serialization {
                path: self.path.clone(),
                source,
            })?;

        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, &data)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "users.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
