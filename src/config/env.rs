use super::utils::{env_bool, env_number, env_var};

/// Raw values read from the process environment
///
/// Every field is optional; defaults are applied in `merge`.
#[derive(Debug, Default)]
pub(crate) struct EnvConfig {
    pub host: Option<String>,
    pub port: Option<u16>,

    pub tls_enabled: Option<bool>,
    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,

    pub users_file: Option<String>,
    pub session_secret: Option<String>,
    pub session_ttl_seconds: Option<u64>,
    pub session_cookie_secure: Option<bool>,
    pub sign_in_path: Option<String>,

    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub aws_region: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_endpoint: Option<String>,
    pub upload_prefix: Option<String>,
    pub upload_url_expiry_seconds: Option<u64>,
    pub upload_max_bytes: Option<usize>,

    pub tts_api_base: Option<String>,
    pub tts_auth: Option<String>,
    pub seedvc_api_base: Option<String>,
    pub seedvc_auth: Option<String>,

    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

impl EnvConfig {
    pub(crate) fn load() -> Result<Self, String> {
        Ok(Self {
            host: env_var("HOST"),
            port: env_number("PORT")?,

            tls_enabled: env_bool("TLS_ENABLED")?,
            tls_cert_path: env_var("TLS_CERT_PATH"),
            tls_key_path: env_var("TLS_KEY_PATH"),

            users_file: env_var("USERS_FILE"),
            session_secret: env_var("SESSION_SECRET"),
            session_ttl_seconds: env_number("SESSION_TTL_SECONDS")?,
            session_cookie_secure: env_bool("SESSION_COOKIE_SECURE")?,
            sign_in_path: env_var("SIGN_IN_PATH"),

            aws_access_key_id: env_var("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: env_var("AWS_SECRET_ACCESS_KEY"),
            aws_region: env_var("AWS_REGION"),
            s3_bucket: env_var("S3_BUCKET"),
            s3_endpoint: env_var("S3_ENDPOINT"),
            upload_prefix: env_var("UPLOAD_PREFIX"),
            upload_url_expiry_seconds: env_number("UPLOAD_URL_EXPIRY_SECONDS")?,
            upload_max_bytes: env_number("UPLOAD_MAX_BYTES")?,

            tts_api_base: env_var("TTS_API_BASE"),
            tts_auth: env_var("TTS_AUTH"),
            seedvc_api_base: env_var("SEEDVC_API_BASE"),
            seedvc_auth: env_var("SEEDVC_AUTH"),

            cors_allowed_origins: env_var("CORS_ALLOWED_ORIGINS"),
            rate_limit_requests_per_second: env_number("RATE_LIMIT_REQUESTS_PER_SECOND")?,
            rate_limit_burst_size: env_number("RATE_LIMIT_BURST_SIZE")?,
        })
    }
}
