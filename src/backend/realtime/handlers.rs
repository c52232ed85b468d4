/**
 * WebSocket Upgrade Handler
 *
 * GET /v1/websocket/ws?token=<jwt> upgrades to a WebSocket and hands the
 * socket to the keepalive loop. The token is verified before the upgrade
 * completes; the verdict travels with the socket so a rejected client still
 * receives a proper 1008 close frame with the reason.
 *
 * # Example
 *
 * ```text
 * > ping
 * < pong
 * > hello
 * < echo: hello
 * ... 60 s without a ping ...
 * < close 1000 "Timeout due to inactivity"
 * ```
 */

use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::StreamExt;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::auth::error::AuthError;
use crate::backend::auth::sessions::JwtKeys;
use crate::backend::realtime::keepalive::serve_connection;
use crate::backend::realtime::session::SessionSupervisor;
use crate::shared::AppConfig;

/// Query string of the upgrade request
#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(jwt): State<Arc<JwtKeys>>,
    State(supervisor): State<SessionSupervisor>,
    State(config): State<Arc<AppConfig>>,
) -> Response {
    let verdict = match params.token.as_deref() {
        Some(token) => jwt.verify(token).map(|claims| claims.user_id),
        None => Err(AuthError::Invalid),
    };
    let poll_interval = config.keepalive.poll_interval;

    ws.on_upgrade(move |socket| handle_socket(socket, verdict, supervisor, poll_interval))
}

async fn handle_socket(
    socket: WebSocket,
    verdict: Result<String, AuthError>,
    supervisor: SessionSupervisor,
    poll_interval: Duration,
) {
    let (outbound, inbound) = socket.split();
    serve_connection(inbound, outbound, verdict, &supervisor, poll_interval).await;
}
