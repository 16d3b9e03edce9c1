use std::env;
use std::str::FromStr;

/// Read an environment variable, treating blank values as unset
pub(crate) fn env_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a boolean flag (`true/false`, `1/0`, `yes/no`, `on/off`)
pub(crate) fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(format!("Invalid boolean for {key}: '{other}'")),
    }
}

pub(crate) fn parse_number<T>(key: &str, value: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| format!("Invalid value for {key}: '{value}' ({e})"))
}

/// Read and parse a numeric environment variable
pub(crate) fn env_number<T>(key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key).map(|v| parse_number(key, &v)).transpose()
}

/// Read and parse a boolean environment variable
pub(crate) fn env_bool(key: &str) -> Result<Option<bool>, String> {
    env_var(key).map(|v| parse_bool(key, &v)).transpose()
}
