//! Shared constants used across KMI crates.

/// Configuration file read when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "kmi.config";

/// Default cadence of the expiry sweep, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Maximum paste size accepted by the HTTP layer. The store itself does
/// not bound payload sizes; this cap is enforced at the transport.
pub const MAX_PASTE_BYTES: usize = 512 * 1024;
