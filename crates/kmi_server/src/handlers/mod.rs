//! HTTP request handlers.

/// Paste create/fetch endpoints.
pub mod paste;
/// Ancillary endpoints: help page, IP echo, latency echo.
pub mod util;
