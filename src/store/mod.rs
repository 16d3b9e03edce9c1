//! Credential storage backed by a single JSON file

mod credentials;
mod user;

pub use credentials::{CredentialStore, StoreError, StoreResult};
pub use user::{UserIdentity, UserRecord, normalize_email};
