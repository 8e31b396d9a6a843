//! Configuration loading from the sectioned key-value config file.
//!
//! The format: `[Section]` headers, `key = value` pairs, `;`-prefixed
//! comment lines. Blank lines are skipped and whitespace is trimmed around
//! section names, keys, and values.

use crate::constants::DEFAULT_SWEEP_INTERVAL_SECS;
use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const WEB_SERVER_SECTION: &str = "KMI.WebServer";
const SETTINGS_SECTION: &str = "KMI.Settings";

/// Raw section/key/value view of a parsed config file.
#[derive(Debug, Default)]
pub struct RawConfig {
    sections: HashMap<String, HashMap<String, String>>,
}

impl RawConfig {
    /// Parse configuration text.
    ///
    /// Lines that are neither a section header nor contain `=` are ignored.
    pub fn parse(input: &str) -> Self {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current = String::new();

        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
                current = name.trim().to_string();
                sections.entry(current.clone()).or_default();
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                sections
                    .entry(current.clone())
                    .or_default()
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        Self { sections }
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Look up a value by section and key.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key).map(String::as_str)
    }
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub host: String,
    /// Port the HTTP listener binds to.
    pub port: u16,
    /// Time-to-live applied to every stored paste.
    pub ttl: Duration,
    /// Cadence of the background expiry sweep.
    pub sweep_interval: Duration,
    /// Bounded id-regeneration attempts when a generated id is already
    /// taken. Zero keeps overwrite-on-collision behavior.
    pub collision_retries: u32,
}

impl Config {
    /// Load and resolve configuration from the file at `path`.
    ///
    /// # Errors
    /// Fails when the file is unreadable, a required key is absent, or a
    /// numeric field does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_raw(&RawConfig::load(path.as_ref())?)
    }

    /// Resolve typed settings from a parsed [`RawConfig`].
    ///
    /// # Errors
    /// Fails when a required key is absent or a numeric field does not parse.
    pub fn from_raw(raw: &RawConfig) -> Result<Self, ConfigError> {
        let host = require(raw, WEB_SERVER_SECTION, "Host")?.to_string();
        let port = parse_required(raw, WEB_SERVER_SECTION, "Port", "a port number")?;
        let ttl_secs: u64 = parse_required(
            raw,
            SETTINGS_SECTION,
            "TimeToExpired",
            "a number of seconds",
        )?;
        let sweep_secs: u64 = parse_optional(
            raw,
            SETTINGS_SECTION,
            "SweepInterval",
            "a number of seconds",
            DEFAULT_SWEEP_INTERVAL_SECS,
        )?;
        let collision_retries = parse_optional(
            raw,
            SETTINGS_SECTION,
            "CollisionRetries",
            "a retry count",
            0,
        )?;

        Ok(Self {
            host,
            port,
            ttl: Duration::from_secs(ttl_secs),
            sweep_interval: Duration::from_secs(sweep_secs),
            collision_retries,
        })
    }
}

fn require<'a>(
    raw: &'a RawConfig,
    section: &'static str,
    key: &'static str,
) -> Result<&'a str, ConfigError> {
    raw.get(section, key)
        .ok_or(ConfigError::MissingKey { section, key })
}

fn parse_required<T: FromStr>(
    raw: &RawConfig,
    section: &'static str,
    key: &'static str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    parse_value(require(raw, section, key)?, section, key, expected)
}

fn parse_optional<T: FromStr>(
    raw: &RawConfig,
    section: &'static str,
    key: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw.get(section, key) {
        None => Ok(default),
        Some(value) => parse_value(value, section, key, expected),
    }
}

fn parse_value<T: FromStr>(
    value: &str,
    section: &'static str,
    key: &'static str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        section,
        key,
        value: value.to_string(),
        expected,
    })
}
