use serde::Deserialize;
use std::path::PathBuf;

/// Complete YAML configuration structure
///
/// All fields are optional so a file can carry only the values it wants to
/// pin. Anything set here wins over environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 3001
///   tls:
///     enabled: true
///     cert_path: "/etc/voicelab/cert.pem"
///     key_path: "/etc/voicelab/key.pem"
///
/// auth:
///   users_file: "/var/lib/voicelab/users.json"
///   session_secret: "at-least-32-bytes-of-secret-material"
///   session_ttl_seconds: 86400
///   cookie_secure: true
///   sign_in_path: "/auth"
///
/// storage:
///   access_key_id: "AKIA..."
///   secret_access_key: "..."
///   region: "us-east-1"
///   bucket: "voicelab-uploads"
///   endpoint: "http://localhost:9000"
///   upload_prefix: "seedvc-audio-uploads"
///   url_expiry_seconds: 3600
///   max_upload_bytes: 10485760
///
/// services:
///   tts:
///     base_url: "https://tts.example.com"
///     auth: "tts-token"
///   seedvc:
///     base_url: "https://seedvc.example.com"
///     auth: "Bearer seedvc-token"
///
/// security:
///   cors_allowed_origins: "https://voicelab.example.com"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub auth: Option<AuthYaml>,
    pub storage: Option<StorageYaml>,
    pub services: Option<ServicesYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub enabled: Option<bool>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

/// Session and user-store settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuthYaml {
    pub users_file: Option<String>,
    pub session_secret: Option<String>,
    pub session_ttl_seconds: Option<u64>,
    pub cookie_secure: Option<bool>,
    /// Where unauthenticated browsers are sent to sign in
    pub sign_in_path: Option<String>,
}

/// Upload storage settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageYaml {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: Option<String>,
    pub bucket: Option<String>,
    /// Custom endpoint for S3-compatible services
    pub endpoint: Option<String>,
    pub upload_prefix: Option<String>,
    pub url_expiry_seconds: Option<u64>,
    pub max_upload_bytes: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServicesYaml {
    pub tts: Option<RemoteServiceYaml>,
    pub seedvc: Option<RemoteServiceYaml>,
}

/// One remote speech service: base URL plus static credential
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RemoteServiceYaml {
    pub base_url: Option<String>,
    pub auth: Option<String>,
}

/// Security configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed.
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
