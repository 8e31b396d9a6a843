//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use kmi_server::{create_app, AppState, Config, ExpiringStore};
use std::sync::Arc;
use std::time::Duration;

pub(crate) fn test_config(ttl: Duration) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        ttl,
        sweep_interval: Duration::from_secs(60),
        collision_retries: 0,
    }
}

pub(crate) fn setup_test_server(ttl: Duration) -> (TestServer, Arc<ExpiringStore>) {
    let store = Arc::new(ExpiringStore::new());
    let state = AppState::new(test_config(ttl), Arc::clone(&store));
    let server = TestServer::new(create_app(state)).expect("server");
    (server, store)
}
