/**
 * Session Keepalive Loop
 *
 * One loop runs per WebSocket connection. It alternates between two things:
 *
 * 1. Check the session's heartbeat window and close with 1000 / "Timeout due
 *    to inactivity" once it has lapsed.
 * 2. Wait up to `poll_interval` for an inbound frame and answer it through
 *    the supervisor (`pong` for heartbeats, `echo: ...` otherwise).
 *
 * Clients that fail token verification are closed with 1008 and the
 * verification reason before any session is registered.
 *
 * The loop is generic over the inbound stream and outbound sink so it can be
 * driven by an axum socket or by in-memory channels in tests.
 */

use axum::extract::ws::{CloseFrame, Message};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use std::fmt::Display;
use std::time::Duration;
use tokio::time::Instant;

use crate::backend::auth::error::AuthError;
use crate::backend::realtime::frames::{WsCloseCode, TIMEOUT_REASON};
use crate::backend::realtime::session::{ConnectionId, Liveness, SessionSupervisor};

/// How a connection ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Token verification failed; no session was created
    Rejected,
    /// The heartbeat window lapsed
    TimedOut,
    /// The client closed the socket or the stream ended
    ClientClosed,
    /// Reading or writing the socket failed
    TransportError,
    /// The session was removed by someone else
    Evicted,
}

pub fn close_message(code: WsCloseCode, reason: impl Into<String>) -> Message {
    let reason: String = reason.into();
    Message::Close(Some(CloseFrame {
        code: code.code(),
        reason: reason.into(),
    }))
}

/// Send a close frame, returning whether it reached the transport
///
/// The connection is over either way; an undelivered close is only logged.
pub async fn send_close<K>(outbound: &mut K, code: WsCloseCode, reason: &str) -> bool
where
    K: Sink<Message> + Unpin,
{
    match outbound.send(close_message(code, reason)).await {
        Ok(()) => true,
        Err(_) => {
            tracing::debug!("[WebSocket] Close {} ({:?}) was not delivered", code.code(), reason);
            false
        }
    }
}

/// Gate a connection on its token verdict, then supervise it until it ends
pub async fn serve_connection<S, K, E>(
    inbound: S,
    mut outbound: K,
    verdict: Result<String, AuthError>,
    supervisor: &SessionSupervisor,
    poll_interval: Duration,
) -> SessionEnd
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    K: Sink<Message> + Unpin,
    E: Display,
{
    let user_id = match verdict {
        Ok(user_id) => user_id,
        Err(err) => {
            tracing::warn!("[WebSocket] Connection rejected: {}", err);
            send_close(&mut outbound, WsCloseCode::PolicyViolation, &err.to_string()).await;
            return SessionEnd::Rejected;
        }
    };

    let id = supervisor.connect(user_id.clone());
    tracing::info!("[WebSocket] Session {} opened for {}", id, user_id);

    let end = run_session(id, inbound, outbound, supervisor, poll_interval).await;

    supervisor.disconnect(id);
    tracing::info!("[WebSocket] Session {} for {} ended: {:?}", id, user_id, end);
    end
}

/// Supervise an already registered session
pub async fn run_session<S, K, E>(
    id: ConnectionId,
    mut inbound: S,
    mut outbound: K,
    supervisor: &SessionSupervisor,
    poll_interval: Duration,
) -> SessionEnd
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    K: Sink<Message> + Unpin,
    E: Display,
{
    loop {
        match supervisor.evict_if_expired(id, Instant::now()) {
            Liveness::Alive { .. } => {}
            Liveness::Expired => {
                tracing::info!("[WebSocket] Session {} missed its heartbeat window", id);
                send_close(&mut outbound, WsCloseCode::Normal, TIMEOUT_REASON).await;
                return SessionEnd::TimedOut;
            }
            Liveness::Gone => return SessionEnd::Evicted,
        }

        let frame = match tokio::time::timeout(poll_interval, inbound.next()).await {
            Err(_) => continue,
            Ok(None) => return SessionEnd::ClientClosed,
            Ok(Some(Err(e))) => {
                tracing::warn!("[WebSocket] Session {} transport error: {}", id, e);
                return SessionEnd::TransportError;
            }
            Ok(Some(Ok(frame))) => frame,
        };

        let reply = match frame {
            Message::Text(text) => supervisor.on_message(id, text.as_str()),
            Message::Binary(data) => match std::str::from_utf8(&data) {
                Ok(text) => supervisor.on_message(id, text),
                Err(_) => {
                    tracing::debug!("[WebSocket] Session {} sent {} non-UTF-8 bytes", id, data.len());
                    continue;
                }
            },
            Message::Close(_) => return SessionEnd::ClientClosed,
            Message::Ping(_) | Message::Pong(_) => continue,
        };

        if outbound.send(Message::Text(reply.into())).await.is_err() {
            return SessionEnd::TransportError;
        }
    }
}
