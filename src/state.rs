use std::sync::Arc;

use argon2::password_hash::rand_core::{OsRng, RngCore};
use tracing::{info, warn};

use crate::auth::{AuthService, SessionManager};
use crate::clients::{TtsClient, VoiceConversionClient};
use crate::config::ServerConfig;
use crate::errors::app_error::{AppError, AppResult};
use crate::storage::{AudioStorage, S3AudioStorage};
use crate::store::CredentialStore;
use crate::utils::clock::{Clock, SystemClock};

/// Shared application state handed to every handler
pub struct AppState {
    pub config: ServerConfig,
    pub auth: AuthService,
    /// Upload storage; `None` when no storage credentials are configured
    pub storage: Option<Arc<dyn AudioStorage>>,
    pub tts_client: Option<TtsClient>,
    pub voice_conversion_client: Option<VoiceConversionClient>,
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("auth", &self.auth)
            .field("storage", &self.storage.is_some())
            .field("tts_client", &self.tts_client)
            .field("voice_conversion_client", &self.voice_conversion_client)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build the production state: wall clock and S3 storage when configured
    pub async fn new(config: ServerConfig) -> AppResult<Arc<Self>> {
        let storage: Option<Arc<dyn AudioStorage>> = match config.storage_settings() {
            Ok(settings) => {
                let storage = S3AudioStorage::new(&settings).map_err(|e| {
                    AppError::configuration(format!("Failed to configure upload storage: {e}"))
                })?;
                Some(Arc::new(storage))
            }
            Err(reason) => {
                warn!(reason = %reason, "Upload storage disabled");
                None
            }
        };

        Self::with_parts(config, Arc::new(SystemClock), storage)
    }

    /// Build state from explicit parts; tests use this to inject a manual clock
    /// and in-memory storage
    pub fn with_parts(
        config: ServerConfig,
        clock: Arc<dyn Clock>,
        storage: Option<Arc<dyn AudioStorage>>,
    ) -> AppResult<Arc<Self>> {
        let secret = session_secret(&config);
        let sessions = SessionManager::new(&secret, config.session_ttl(), clock.clone());
        let store = Arc::new(CredentialStore::new(config.users_file.clone()));
        info!(path = %config.users_file.display(), "Using credential store");

        let tts_client = match &config.tts_api_base {
            Some(base) => {
                let client = TtsClient::new(base, config.tts_auth.as_deref().unwrap_or_default())?;
                info!(base_url = %client.service().base_url(), "TTS service configured");
                Some(client)
            }
            None => {
                warn!("TTS_API_BASE not set; TTS proxy routes will fail");
                None
            }
        };

        let voice_conversion_client = match &config.seedvc_api_base {
            Some(base) => {
                let client = VoiceConversionClient::new(
                    base,
                    config.seedvc_auth.as_deref().unwrap_or_default(),
                )?;
                info!(
                    base_url = %client.service().base_url(),
                    "Voice conversion service configured"
                );
                Some(client)
            }
            None => {
                warn!("SEEDVC_API_BASE not set; voice conversion proxy routes will fail");
                None
            }
        };

        Ok(Arc::new(Self {
            config,
            auth: AuthService::new(store, sessions),
            storage,
            tts_client,
            voice_conversion_client,
            clock,
        }))
    }
}

/// Configured secret bytes, or a random per-process secret
fn session_secret(config: &ServerConfig) -> Vec<u8> {
    match &config.session_secret {
        Some(secret) => secret.as_bytes().to_vec(),
        None => {
            warn!("SESSION_SECRET not set; generated a random secret, sessions end on restart");
            let mut bytes = [0u8; 32];
            OsRng.fill_bytes(&mut bytes);
            hex::encode(bytes).into_bytes()
        }
    }
}
