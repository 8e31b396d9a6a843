//! Core domain library for KMI (config, identifiers, storage, sweeper).

/// Configuration file loading and typed resolution.
pub mod config;
/// Shared constants.
pub mod constants;
/// Configuration error types.
pub mod error;
/// Paste identifier generation.
pub mod ident;
/// Concurrent TTL storage.
pub mod store;
/// Background expiry reclamation.
pub mod sweeper;

pub use config::Config;
pub use error::ConfigError;
pub use store::ExpiringStore;
pub use sweeper::SweeperHandle;
