use super::{ServerConfig, TlsConfig};
use crate::storage::{build_upload_key, object_path};
use crate::utils::url_validation::validate_service_url;

/// Minimum length of a configured session signing secret
pub const MIN_SESSION_SECRET_BYTES: usize = 32;

/// TLS files must exist when TLS is enabled
pub(crate) fn validate_tls(tls: &Option<TlsConfig>) -> Result<(), String> {
    if let Some(tls) = tls {
        if !tls.cert_path.exists() {
            return Err(format!(
                "TLS certificate file not found: {}",
                tls.cert_path.display()
            ));
        }
        if !tls.key_path.exists() {
            return Err(format!(
                "TLS private key file not found: {}",
                tls.key_path.display()
            ));
        }
    }
    Ok(())
}

pub(crate) fn validate_session_secret(secret: &Option<String>) -> Result<(), String> {
    match secret {
        Some(secret) if secret.len() < MIN_SESSION_SECRET_BYTES => Err(format!(
            "SESSION_SECRET must be at least {MIN_SESSION_SECRET_BYTES} bytes, got {}",
            secret.len()
        )),
        _ => Ok(()),
    }
}

pub(crate) fn validate_positive(name: &str, value: u64) -> Result<(), String> {
    if value == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(())
}

/// Base URLs, when configured, must be http(s) URLs with a host
pub(crate) fn validate_service_base(name: &str, base: &Option<String>) -> Result<(), String> {
    if let Some(base) = base {
        validate_service_url(base).map_err(|e| format!("{name} is not a valid base URL: {e}"))?;
    }
    Ok(())
}

pub(crate) fn validate_sign_in_path(path: &str) -> Result<(), String> {
    if !path.starts_with('/') {
        return Err(format!("SIGN_IN_PATH must start with '/', got '{path}'"));
    }
    Ok(())
}

/// Upload keys built from the prefix must be valid object paths
pub(crate) fn validate_upload_prefix(prefix: &str) -> Result<(), String> {
    let sample = build_upload_key(prefix, 0, "audio.wav");
    object_path(&sample)
        .map(|_| ())
        .map_err(|e| format!("UPLOAD_PREFIX '{prefix}' cannot be used in object keys: {e}"))
}

/// Run every check against a merged configuration
pub(crate) fn validate_config(config: &ServerConfig) -> Result<(), String> {
    validate_tls(&config.tls)?;
    validate_session_secret(&config.session_secret)?;
    validate_positive("SESSION_TTL_SECONDS", config.session_ttl_seconds)?;
    validate_positive(
        "UPLOAD_URL_EXPIRY_SECONDS",
        config.upload_url_expiry_seconds,
    )?;
    validate_sign_in_path(&config.sign_in_path)?;
    validate_upload_prefix(&config.upload_prefix)?;
    validate_service_base("TTS_API_BASE", &config.tts_api_base)?;
    validate_service_base("SEEDVC_API_BASE", &config.seedvc_api_base)?;
    Ok(())
}
