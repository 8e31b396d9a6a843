//! Ancillary endpoints: help page, client IP echo, latency echo.

use axum::extract::ConnectInfo;
use axum::response::Html;
use hyper::HeaderMap;
use std::net::SocketAddr;

/// Serve the static help page.
pub async fn help_page() -> Html<&'static str> {
    Html(include_str!("../help.html"))
}

/// Echo the caller's IP address.
///
/// `X-Forwarded-For` wins when present so deployments behind a proxy
/// report the real client; otherwise the connection's peer address is
/// used. The connect-info extension is absent under some test harnesses,
/// hence the final fallback.
pub async fn client_ip(
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return forwarded.to_string();
    }

    connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Latency echo.
pub async fn ping() -> &'static str {
    "pong"
}
