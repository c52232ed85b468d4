//! Common test utilities and helpers
//!
//! Shared by the integration tests:
//! - Application state with short work durations
//! - In-process `TestServer` and real TCP server helpers
//! - Token helpers backed by the development keys in `keys/`

#![allow(dead_code)]

use axum_test::TestServer;
use std::net::SocketAddr;
use std::time::Duration;
use taskbeat::backend::auth::sessions::JwtKeys;
use taskbeat::backend::server::init::create_app_with_state;
use taskbeat::backend::server::state::AppState;
use taskbeat::shared::{AppConfig, AppConfigBuilder, TaskStatus};

pub const PRIVATE_PEM: &[u8] = include_bytes!("../../keys/private.pem");
pub const PUBLIC_PEM: &[u8] = include_bytes!("../../keys/public.pem");
pub const FOREIGN_PRIVATE_PEM: &[u8] = include_bytes!("../fixtures/foreign_private.pem");

/// Configuration with work units short enough for tests
pub fn test_config() -> AppConfigBuilder {
    AppConfig::builder().work_durations(Duration::from_millis(100), Duration::from_millis(100))
}

pub fn keys(ttl: Duration) -> JwtKeys {
    JwtKeys::from_pem(PRIVATE_PEM, PUBLIC_PEM, ttl).expect("development keys should parse")
}

pub fn foreign_keys() -> JwtKeys {
    JwtKeys::from_pem(FOREIGN_PRIVATE_PEM, PUBLIC_PEM, Duration::from_secs(1800))
        .expect("foreign key should parse")
}

pub fn test_state(config: AppConfig) -> AppState {
    let jwt = keys(config.jwt.token_ttl);
    AppState::new(config, jwt)
}

/// In-process server over axum-test's mock transport
pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(create_app_with_state(state)).expect("test server should start")
}

/// Real server on an ephemeral port, for WebSocket clients
pub async fn spawn_server(state: AppState) -> SocketAddr {
    let app = create_app_with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server should run");
    });
    addr
}

/// Wait, without consuming it, until a task reaches a terminal status
pub async fn wait_for_terminal(state: &AppState, task_id: &str) -> TaskStatus {
    let registry = state.dispatcher.registry();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match registry.peek(task_id) {
                Some(status) if status.is_terminal() => return status,
                _ => tokio::time::sleep(Duration::from_millis(10)).await,
            }
        }
    })
    .await
    .expect("task should finish within 5s")
}
