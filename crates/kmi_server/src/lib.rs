//! HTTP server wiring for KMI (router, handlers, and shared state).

/// HTTP error mapping for handlers.
pub mod error;
/// HTTP handlers for paste and utility endpoints.
pub mod handlers;

pub use kmi_core::{config, constants, ident, store, sweeper, Config, ExpiringStore};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use kmi_core::constants::MAX_PASTE_BYTES;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ExpiringStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Construct shared application state around an existing store.
    ///
    /// The store is injected rather than owned so the reclamation task and
    /// tests can hold the same handle.
    pub fn new(config: Config, store: Arc<ExpiringStore>) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::util::help_page).post(handlers::paste::create_paste),
        )
        .route("/ip", get(handlers::util::client_ip))
        .route("/ping", get(handlers::util::ping))
        .route("/:id", get(handlers::paste::fetch_paste))
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                // The store does not bound payload sizes; the transport does.
                .layer(DefaultBodyLimit::max(MAX_PASTE_BYTES))
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        )
}

/// Run the Axum server with graceful shutdown support.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let app = create_app(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await
}
