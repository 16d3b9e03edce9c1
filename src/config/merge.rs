use std::path::PathBuf;

use super::env::EnvConfig;
use super::yaml::YamlConfig;
use super::{
    DEFAULT_AWS_REGION, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RATE_LIMIT_BURST,
    DEFAULT_RATE_LIMIT_RPS, DEFAULT_SESSION_TTL_SECONDS, DEFAULT_SIGN_IN_PATH,
    DEFAULT_UPLOAD_URL_EXPIRY_SECONDS, DEFAULT_USERS_FILE, ServerConfig, TlsConfig,
};
use crate::storage::DEFAULT_UPLOAD_PREFIX;

/// Build the final configuration: defaults < environment < YAML
pub(crate) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let env = EnvConfig::load()?;
    let yaml = yaml.unwrap_or_default();

    let server = yaml.server.unwrap_or_default();
    let tls_yaml = server.tls.unwrap_or_default();
    let auth = yaml.auth.unwrap_or_default();
    let storage = yaml.storage.unwrap_or_default();
    let services = yaml.services.unwrap_or_default();
    let tts = services.tts.unwrap_or_default();
    let seedvc = services.seedvc.unwrap_or_default();
    let security = yaml.security.unwrap_or_default();

    let tls_enabled = tls_yaml.enabled.or(env.tls_enabled).unwrap_or(false);
    let tls = if tls_enabled {
        let cert_path = tls_yaml
            .cert_path
            .or(env.tls_cert_path)
            .ok_or("TLS is enabled but TLS_CERT_PATH is not set")?;
        let key_path = tls_yaml
            .key_path
            .or(env.tls_key_path)
            .ok_or("TLS is enabled but TLS_KEY_PATH is not set")?;
        Some(TlsConfig {
            cert_path: PathBuf::from(cert_path),
            key_path: PathBuf::from(key_path),
        })
    } else {
        None
    };

    Ok(ServerConfig {
        host: server
            .host
            .or(env.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: server.port.or(env.port).unwrap_or(DEFAULT_PORT),
        tls,

        users_file: PathBuf::from(
            auth.users_file
                .or(env.users_file)
                .unwrap_or_else(|| DEFAULT_USERS_FILE.to_string()),
        ),
        session_secret: auth.session_secret.or(env.session_secret),
        session_ttl_seconds: auth
            .session_ttl_seconds
            .or(env.session_ttl_seconds)
            .unwrap_or(DEFAULT_SESSION_TTL_SECONDS),
        session_cookie_secure: auth
            .cookie_secure
            .or(env.session_cookie_secure)
            .unwrap_or(false),
        sign_in_path: auth
            .sign_in_path
            .or(env.sign_in_path)
            .unwrap_or_else(|| DEFAULT_SIGN_IN_PATH.to_string()),

        aws_access_key_id: storage.access_key_id.or(env.aws_access_key_id),
        aws_secret_access_key: storage.secret_access_key.or(env.aws_secret_access_key),
        aws_region: storage
            .region
            .or(env.aws_region)
            .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
        s3_bucket: storage.bucket.or(env.s3_bucket),
        s3_endpoint: storage.endpoint.or(env.s3_endpoint),
        upload_prefix: storage
            .upload_prefix
            .or(env.upload_prefix)
            .unwrap_or_else(|| DEFAULT_UPLOAD_PREFIX.to_string()),
        upload_url_expiry_seconds: storage
            .url_expiry_seconds
            .or(env.upload_url_expiry_seconds)
            .unwrap_or(DEFAULT_UPLOAD_URL_EXPIRY_SECONDS),
        upload_max_bytes: storage.max_upload_bytes.or(env.upload_max_bytes),

        tts_api_base: tts.base_url.or(env.tts_api_base),
        tts_auth: tts.auth.or(env.tts_auth),
        seedvc_api_base: seedvc.base_url.or(env.seedvc_api_base),
        seedvc_auth: seedvc.auth.or(env.seedvc_auth),

        cors_allowed_origins: security.cors_allowed_origins.or(env.cors_allowed_origins),
        rate_limit_requests_per_second: security
            .rate_limit_requests_per_second
            .or(env.rate_limit_requests_per_second)
            .unwrap_or(DEFAULT_RATE_LIMIT_RPS),
        rate_limit_burst_size: security
            .rate_limit_burst_size
            .or(env.rate_limit_burst_size)
            .unwrap_or(DEFAULT_RATE_LIMIT_BURST),
    })
}
