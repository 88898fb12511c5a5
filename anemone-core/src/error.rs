use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for results produced by the simulation core.
pub type Result<T> = std::result::Result<T, FeederError>;

/// Errors raised while building or advancing the simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeederError {
    /// A constructor or motion operator received an unusable argument.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl FeederError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Name of the offending argument.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidParameter { name, .. } => name,
        }
    }
}

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
