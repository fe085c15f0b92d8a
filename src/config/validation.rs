//! Configuration value validation.
//!
//! # Responsibilities
//! - Parse raw environment strings into typed values
//! - Reject zero, negative and non-numeric counts
//! - Name the offending variable in every error
//!
//! Blank handling happens in the loader; these helpers only ever see a
//! non-empty, trimmed value.

use thiserror::Error;

/// Error raised while resolving configuration. Always fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a positive integer")]
    NotPositiveInteger { var: &'static str, value: String },

    #[error("{var}={value:?} is not a boolean (expected true/false, 1/0, yes/no, on/off)")]
    NotBoolean { var: &'static str, value: String },

    #[error("{var} is set but is not valid UTF-8")]
    NotUnicode { var: &'static str },
}

/// Parse a strictly positive `u32`.
pub fn parse_positive_u32(var: &'static str, value: &str) -> Result<u32, ConfigError> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::NotPositiveInteger {
            var,
            value: value.to_string(),
        }),
    }
}

/// Parse a strictly positive `u64`.
pub fn parse_positive_u64(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::NotPositiveInteger {
            var,
            value: value.to_string(),
        }),
    }
}

/// Parse a boolean flag.
pub fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::NotBoolean {
            var,
            value: value.to_string(),
        }),
    }
}
