/// Default key prefix for relayed uploads
pub const DEFAULT_UPLOAD_PREFIX: &str = "seedvc-audio-uploads";

/// Replace everything outside `[A-Za-z0-9.-]` with `_`
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "audio".to_string()
    } else {
        sanitized
    }
}

/// Build the storage key for an upload.
///
/// Format: `{prefix}/{timestamp_ms}-{sanitized_name}`, or
/// `{timestamp_ms}-{sanitized_name}` when the prefix is empty.
pub fn build_upload_key(prefix: &str, timestamp_ms: i128, original_name: &str) -> String {
    let name = sanitize_filename(original_name);
    let prefix = prefix.trim().trim_matches('/');

    if prefix.is_empty() {
        format!("{timestamp_ms}-{name}")
    } else {
        format!("{prefix}/{timestamp_ms}-{name}")
    }
}

/// Whether a declared media type is an audio type (`audio/*`)
pub fn is_audio_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("audio/")
}
