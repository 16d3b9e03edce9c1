//! Validation for the base URLs of the remote speech services.
//!
//! Base URLs come from operator configuration, so the checks are about shape
//! rather than SSRF: the URL must parse, use `http` or `https`, and name a
//! host. Plain `http` to a non-loopback host is accepted with a warning.

use thiserror::Error;
use tracing::warn;
use url::Url;

#[derive(Debug, Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("URL scheme must be http or https, got: {0}")]
    UnsupportedScheme(String),

    #[error("URL must have a host")]
    MissingHost,

    #[error("Base URL must not carry a query string or fragment")]
    UnexpectedQuery,
}

/// Whether the URL points at this machine
pub fn is_loopback_host(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Parse and validate a remote service base URL.
///
/// The returned URL always ends with `/` so that relative endpoint paths
/// (`voices`, `generate`, ...) join onto it instead of replacing its last
/// segment.
///
/// ```rust,ignore
/// use voicelab_gateway::utils::url_validation::validate_service_url;
///
/// let base = validate_service_url("https://tts.example.com/api").unwrap();
/// assert_eq!(base.join("voices").unwrap().as_str(), "https://tts.example.com/api/voices");
///
/// assert!(validate_service_url("ftp://tts.example.com").is_err());
/// ```
pub fn validate_service_url(url: &str) -> Result<Url, UrlValidationError> {
    let mut parsed = Url::parse(url.trim())?;

    let scheme = parsed.scheme();
    if scheme != "https" && scheme != "http" {
        return Err(UrlValidationError::UnsupportedScheme(scheme.to_string()));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(UrlValidationError::UnexpectedQuery);
    }

    if scheme == "http" && !is_loopback_host(&parsed) {
        warn!(url = %parsed, "Service base URL uses plain http");
    }

    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https_base() {
        let url = validate_service_url("https://tts.example.com").unwrap();
        assert_eq!(url.as_str(), "https://tts.example.com/");
    }

    #[test]
    fn test_path_gets_trailing_slash() {
        let url = validate_service_url("https://api.example.com/seedvc").unwrap();
        assert_eq!(
            url.join("convert").unwrap().as_str(),
            "https://api.example.com/seedvc/convert"
        );
    }

    #[test]
    fn test_accepts_http_localhost() {
        let url = validate_service_url("http://127.0.0.1:9000").unwrap();
        assert!(is_loopback_host(&url));
        assert!(validate_service_url("http://localhost:8000").is_ok());
    }

    #[test]
    fn test_invalid_format() {
        assert!(matches!(
            validate_service_url("not-a-url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            validate_service_url("ftp://files.example.com"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            validate_service_url("file:///tmp/voices"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_rejects_query_string() {
        assert!(matches!(
            validate_service_url("https://tts.example.com/?key=1"),
            Err(UrlValidationError::UnexpectedQuery)
        ));
    }
}
