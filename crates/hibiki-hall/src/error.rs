//! Error types for strict conversions and configuration.
//!
//! The real-time surface never returns these: out-of-range host input is
//! clamped or ignored. Errors only come from callers that asked for strict
//! validation (configuration files, `Step::try_from`).

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the hall outside the audio path.
#[derive(Debug, Error)]
pub enum HallError {
    /// A value fell outside the range a strict conversion accepts.
    #[error("invalid argument for {what}: {value} (expected {expected})")]
    InvalidArgument {
        /// What was being converted (e.g. `"size"`).
        what: &'static str,
        /// Offending value, formatted.
        value: String,
        /// Accepted range, for the message.
        expected: &'static str,
    },

    /// A parameter symbol did not match any descriptor.
    #[error("unknown parameter symbol '{0}'")]
    UnknownSymbol(String),

    /// A configuration file could not be read.
    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file was not valid TOML for [`HallConfig`](crate::HallConfig).
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl HallError {
    /// Create an invalid-argument error.
    pub fn invalid(what: &'static str, value: impl ToString, expected: &'static str) -> Self {
        HallError::InvalidArgument {
            what,
            value: value.to_string(),
            expected,
        }
    }

    /// Create a config read error.
    pub fn config_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HallError::ConfigRead {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for hall operations.
pub type Result<T> = std::result::Result<T, HallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = HallError::invalid("size", 7, "0..=4");
        assert_eq!(err.to_string(), "invalid argument for size: 7 (expected 0..=4)");

        let err = HallError::UnknownSymbol("e_sise".into());
        assert!(err.to_string().contains("e_sise"));
    }

    #[test]
    fn read_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = HallError::config_read("/tmp/hall.toml", io);
        assert!(err.to_string().contains("/tmp/hall.toml"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
