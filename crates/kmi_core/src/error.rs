//! Error types for configuration loading.

use thiserror::Error;

/// Errors raised while loading the configuration file.
///
/// Every variant is fatal at startup; the server refuses to run with an
/// unreadable or incomplete configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("missing required key '{key}' in section [{section}]")]
    MissingKey {
        section: &'static str,
        key: &'static str,
    },

    #[error("invalid value '{value}' for '{key}' in section [{section}]: expected {expected}")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}
