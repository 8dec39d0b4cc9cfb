//! Error types for LexHarvest.
//!
//! Library crates use [`LexHarvestError`] via `thiserror`.
//! The CLI app wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all LexHarvest operations.
#[derive(Debug, thiserror::Error)]
pub enum LexHarvestError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The bulk identifier endpoint was unreachable or its response
    /// could not be parsed. The engine treats this as "no work this run".
    #[error("discovery error: {0}")]
    Discovery(String),

    /// Network/HTTP error for a single document fetch.
    #[error("network error: {0}")]
    Network(String),

    /// HTML parsing or content extraction error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LexHarvestError>;

impl LexHarvestError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = LexHarvestError::config("unknown language code: xx");
        assert_eq!(err.to_string(), "config error: unknown language code: xx");

        let err = LexHarvestError::Discovery("endpoint not responsive".into());
        assert!(err.to_string().contains("endpoint not responsive"));
    }
}
