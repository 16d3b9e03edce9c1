//! Configuration module for the Voice Lab gateway
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use voicelab_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

mod env;
mod merge;
mod utils;
pub mod validation;
mod yaml;

pub use yaml::YamlConfig;

use crate::storage::S3Settings;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_USERS_FILE: &str = "users.json";
/// 24 hours
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 86_400;
pub const DEFAULT_SIGN_IN_PATH: &str = "/auth";
pub const DEFAULT_AWS_REGION: &str = "us-east-1";
pub const DEFAULT_UPLOAD_URL_EXPIRY_SECONDS: u64 = 3_600;
pub const DEFAULT_RATE_LIMIT_RPS: u32 = 60;
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 10;

/// TLS configuration for HTTPS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Contains all configuration needed to run the gateway:
/// - Server settings (host, port, TLS)
/// - User store and session settings
/// - Upload storage (S3) credentials and key layout
/// - Remote TTS and voice conversion service endpoints
/// - Security settings (CORS, rate limiting)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    // Users and sessions
    /// JSON file holding the user records
    pub users_file: PathBuf,
    /// HS256 signing secret for session tokens.
    /// When unset a random per-process secret is generated, so sessions do not
    /// survive a restart.
    pub session_secret: Option<String>,
    pub session_ttl_seconds: u64,
    /// Set the `Secure` attribute on the session cookie
    pub session_cookie_secure: bool,
    /// Sign-in page that 401 responses point browsers at
    pub sign_in_path: String,

    // Upload storage
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub aws_region: String,
    pub s3_bucket: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...)
    pub s3_endpoint: Option<String>,
    /// Key prefix: `{prefix}/{unix_millis}-{name}`
    pub upload_prefix: String,
    pub upload_url_expiry_seconds: u64,
    /// Optional request body ceiling for uploads. None means unlimited.
    pub upload_max_bytes: Option<usize>,

    // Remote services
    pub tts_api_base: Option<String>,
    /// Credential for the TTS service. A bare token is sent as `Bearer <token>`.
    pub tts_auth: Option<String>,
    pub seedvc_api_base: Option<String>,
    pub seedvc_auth: Option<String>,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,

    // Rate limiting configuration
    /// Maximum requests per second per IP address
    /// Default: 60
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    /// Default: 10
    pub rate_limit_burst_size: u32,
}

/// Implement Drop to zeroize all secret fields when ServerConfig is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut secret) = self.session_secret {
            secret.zeroize();
        }
        if let Some(ref mut key) = self.aws_access_key_id {
            key.zeroize();
        }
        if let Some(ref mut secret) = self.aws_secret_access_key {
            secret.zeroize();
        }
        if let Some(ref mut auth) = self.tts_auth {
            auth.zeroize();
        }
        if let Some(ref mut auth) = self.seedvc_auth {
            auth.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and defaults
    ///
    /// The .env file is loaded in `main.rs` before this is called, so its values
    /// show up here as ordinary environment variables.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    pub fn session_ttl(&self) -> time::Duration {
        time::Duration::seconds(i64::try_from(self.session_ttl_seconds).unwrap_or(i64::MAX))
    }

    pub fn upload_url_expiry(&self) -> Duration {
        Duration::from_secs(self.upload_url_expiry_seconds)
    }

    /// S3 settings for the upload relay
    ///
    /// Returns an error message when the access key, secret key or bucket is
    /// missing. The region falls back to `us-east-1`.
    pub fn storage_settings(&self) -> Result<S3Settings, String> {
        match (
            &self.aws_access_key_id,
            &self.aws_secret_access_key,
            &self.s3_bucket,
        ) {
            (Some(access_key_id), Some(secret_access_key), Some(bucket)) => Ok(S3Settings {
                bucket: bucket.clone(),
                region: self.aws_region.clone(),
                access_key_id: access_key_id.clone(),
                secret_access_key: secret_access_key.clone(),
                endpoint: self.s3_endpoint.clone(),
            }),
            _ => Err("AWS credentials not configured".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    /// Helper function to create a test ServerConfig with defaults
    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "localhost".to_string(),
            port: 3001,
            tls: None,
            users_file: PathBuf::from("users.json"),
            session_secret: None,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            session_cookie_secure: false,
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
            aws_access_key_id: None,
            aws_secret_access_key: None,
            aws_region: DEFAULT_AWS_REGION.to_string(),
            s3_bucket: None,
            s3_endpoint: None,
            upload_prefix: "seedvc-audio-uploads".to_string(),
            upload_url_expiry_seconds: DEFAULT_UPLOAD_URL_EXPIRY_SECONDS,
            upload_max_bytes: None,
            tts_api_base: None,
            tts_auth: None,
            seedvc_api_base: None,
            seedvc_auth: None,
            cors_allowed_origins: None,
            rate_limit_requests_per_second: 60,
            rate_limit_burst_size: 10,
        }
    }

    #[test]
    fn test_address() {
        let config = test_config();
        assert_eq!(config.address(), "localhost:3001");
        assert!(!config.is_tls_enabled());
    }

    #[test]
    fn test_storage_settings_complete() {
        let mut config = test_config();
        config.aws_access_key_id = Some("AKIA".to_string());
        config.aws_secret_access_key = Some("secret".to_string());
        config.s3_bucket = Some("voices".to_string());

        let settings = config.storage_settings().unwrap();
        assert_eq!(settings.bucket, "voices");
        assert_eq!(settings.region, "us-east-1");
        assert!(settings.endpoint.is_none());
    }

    #[test]
    fn test_storage_settings_missing_secret() {
        let mut config = test_config();
        config.aws_access_key_id = Some("AKIA".to_string());
        config.s3_bucket = Some("voices".to_string());

        assert_eq!(
            config.storage_settings().unwrap_err(),
            "AWS credentials not configured"
        );
    }

    #[test]
    fn test_durations() {
        let mut config = test_config();
        config.session_ttl_seconds = 90;
        config.upload_url_expiry_seconds = 120;
        assert_eq!(config.session_ttl(), time::Duration::seconds(90));
        assert_eq!(config.upload_url_expiry(), Duration::from_secs(120));
    }

    // Helper to clean up environment variables
    fn cleanup_env_vars() {
        unsafe {
            env::remove_var("HOST");
            env::remove_var("PORT");
            env::remove_var("TLS_ENABLED");
            env::remove_var("TLS_CERT_PATH");
            env::remove_var("TLS_KEY_PATH");
            env::remove_var("USERS_FILE");
            env::remove_var("SESSION_SECRET");
            env::remove_var("SESSION_TTL_SECONDS");
            env::remove_var("SESSION_COOKIE_SECURE");
            env::remove_var("AWS_ACCESS_KEY_ID");
            env::remove_var("AWS_SECRET_ACCESS_KEY");
            env::remove_var("AWS_REGION");
            env::remove_var("S3_BUCKET");
            env::remove_var("UPLOAD_PREFIX");
            env::remove_var("UPLOAD_URL_EXPIRY_SECONDS");
            env::remove_var("TTS_API_BASE");
            env::remove_var("TTS_AUTH");
            env::remove_var("SEEDVC_API_BASE");
            env::remove_var("SEEDVC_AUTH");
            env::remove_var("SIGN_IN_PATH");
            env::remove_var("S3_ENDPOINT");
            env::remove_var("UPLOAD_MAX_BYTES");
            env::remove_var("CORS_ALLOWED_ORIGINS");
            env::remove_var("RATE_LIMIT_REQUESTS_PER_SECOND");
            env::remove_var("RATE_LIMIT_BURST_SIZE");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        cleanup_env_vars();

        let config = ServerConfig::from_env().unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
        assert_eq!(config.users_file, PathBuf::from("users.json"));
        assert_eq!(config.session_ttl_seconds, 86_400);
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.upload_prefix, "seedvc-audio-uploads");
        assert_eq!(config.upload_url_expiry_seconds, 3_600);
        assert!(config.session_secret.is_none());
        assert!(config.tts_api_base.is_none());

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_reads_service_settings() {
        cleanup_env_vars();

        unsafe {
            env::set_var("PORT", "8088");
            env::set_var("TTS_API_BASE", "https://tts.example.com");
            env::set_var("TTS_AUTH", "tts-token");
            env::set_var("SEEDVC_API_BASE", "https://seedvc.example.com");
            env::set_var("SESSION_COOKIE_SECURE", "true");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.port, 8088);
        assert_eq!(
            config.tts_api_base.as_deref(),
            Some("https://tts.example.com")
        );
        assert_eq!(config.tts_auth.as_deref(), Some("tts-token"));
        assert_eq!(
            config.seedvc_api_base.as_deref(),
            Some("https://seedvc.example.com")
        );
        assert!(config.session_cookie_secure);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_port() {
        cleanup_env_vars();

        unsafe {
            env::set_var("PORT", "not-a-port");
        }
        let result = ServerConfig::from_env();
        assert!(result.unwrap_err().to_string().contains("PORT"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_short_secret() {
        cleanup_env_vars();

        unsafe {
            env::set_var("SESSION_SECRET", "too-short");
        }
        let result = ServerConfig::from_env();
        assert!(result.unwrap_err().to_string().contains("SESSION_SECRET"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_empty_prefix_segment() {
        cleanup_env_vars();

        unsafe {
            env::set_var("UPLOAD_PREFIX", "voicelab//uploads");
        }
        let result = ServerConfig::from_env();
        assert!(result.unwrap_err().to_string().contains("UPLOAD_PREFIX"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_overrides_env() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let yaml_content = r#"
server:
  host: "127.0.0.1"
  port: 8080

storage:
  bucket: "yaml-bucket"

services:
  tts:
    base_url: "https://yaml-tts.example.com"
"#;

        fs::write(&config_path, yaml_content).unwrap();

        unsafe {
            env::set_var("HOST", "0.0.0.0");
            env::set_var("S3_BUCKET", "env-bucket");
            env::set_var("TTS_API_BASE", "https://env-tts.example.com");
            env::set_var("TTS_AUTH", "env-token");
        }

        let config = ServerConfig::from_file(&config_path).unwrap();

        // YAML overrides ENV
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.s3_bucket.as_deref(), Some("yaml-bucket"));
        assert_eq!(
            config.tts_api_base.as_deref(),
            Some("https://yaml-tts.example.com")
        );
        // ENV fills what YAML leaves out
        assert_eq!(config.tts_auth.as_deref(), Some("env-token"));
        assert_eq!(config.port, 8080);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_missing_file() {
        cleanup_env_vars();

        let config_path = PathBuf::from("/nonexistent/config.yaml");
        let result = ServerConfig::from_file(&config_path);

        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_invalid_service_url() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(
            &config_path,
            "services:\n  seedvc:\n    base_url: \"seedvc.internal\"\n",
        )
        .unwrap();

        let result = ServerConfig::from_file(&config_path);
        assert!(result.unwrap_err().to_string().contains("SEEDVC_API_BASE"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_tls_requires_paths() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(&config_path, "server:\n  tls:\n    enabled: true\n").unwrap();

        let result = ServerConfig::from_file(&config_path);
        assert!(result.unwrap_err().to_string().contains("TLS_CERT_PATH"));

        cleanup_env_vars();
    }
}
