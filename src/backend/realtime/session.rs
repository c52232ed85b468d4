/**
 * Session Supervisor
 *
 * Owns the table of live WebSocket sessions and the sliding heartbeat
 * window each one lives under. A session is created only after its token
 * has been verified, refreshed by every heartbeat, and removed on timeout or
 * disconnect.
 *
 * # Atomicity
 *
 * Heartbeat refreshes and the timeout check run under the same lock. An
 * eviction therefore always sees the latest heartbeat, and a heartbeat for a
 * session that was just evicted is a no-op.
 *
 * # Connection Ids
 *
 * Ids are random UUIDv4 values and are never handed out twice.
 */

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

use crate::backend::realtime::frames::{classify, echo, InboundFrame, HEARTBEAT_ACK};

pub type ConnectionId = Uuid;

#[derive(Debug, Clone)]
struct SessionEntry {
    user_id: String,
    connected_at: Instant,
    last_heartbeat: Instant,
}

/// Result of a liveness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// Still within the window; expires at `deadline` unless refreshed
    Alive { deadline: Instant },
    /// The window lapsed and the session has just been removed
    Expired,
    /// No such session (already disconnected or evicted)
    Gone,
}

/// Live session table with heartbeat bookkeeping
#[derive(Clone, Debug)]
pub struct SessionSupervisor {
    sessions: Arc<Mutex<HashMap<ConnectionId, SessionEntry>>>,
    timeout: Duration,
    opened: Arc<AtomicU64>,
}

impl SessionSupervisor {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            timeout,
            opened: Arc::new(AtomicU64::new(0)),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<ConnectionId, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Register a verified client; its heartbeat window starts now
    pub fn connect(&self, user_id: impl Into<String>) -> ConnectionId {
        let now = Instant::now();
        let entry = SessionEntry {
            user_id: user_id.into(),
            connected_at: now,
            last_heartbeat: now,
        };

        let mut sessions = self.sessions();
        let mut id = Uuid::new_v4();
        while sessions.contains_key(&id) {
            id = Uuid::new_v4();
        }
        sessions.insert(id, entry);
        drop(sessions);

        self.opened.fetch_add(1, Ordering::Relaxed);
        id
    }

    /// Remove a session; returns whether it was still present
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        match self.sessions().remove(&id) {
            Some(entry) => {
                tracing::debug!(
                    "[WebSocket] Session {} for {} closed after {:?}",
                    id,
                    entry.user_id,
                    entry.connected_at.elapsed()
                );
                true
            }
            None => false,
        }
    }

    /// Refresh the heartbeat window and return the acknowledgement
    pub fn on_heartbeat(&self, id: ConnectionId) -> &'static str {
        let now = Instant::now();
        if let Some(entry) = self.sessions().get_mut(&id) {
            entry.last_heartbeat = entry.last_heartbeat.max(now);
        }
        HEARTBEAT_ACK
    }

    /// Answer an inbound text frame: heartbeats get `pong`, anything else is
    /// echoed without touching the window
    pub fn on_message(&self, id: ConnectionId, data: &str) -> String {
        match classify(data) {
            InboundFrame::Heartbeat => self.on_heartbeat(id).to_string(),
            InboundFrame::Data(text) => echo(text),
        }
    }

    /// Check the window at `now`, removing the session if it lapsed
    pub fn evict_if_expired(&self, id: ConnectionId, now: Instant) -> Liveness {
        let mut sessions = self.sessions();
        let Some(entry) = sessions.get(&id) else {
            return Liveness::Gone;
        };

        let deadline = entry.last_heartbeat + self.timeout;
        if now >= deadline {
            sessions.remove(&id);
            Liveness::Expired
        } else {
            Liveness::Alive { deadline }
        }
    }

    pub fn user_id(&self, id: ConnectionId) -> Option<String> {
        self.sessions().get(&id).map(|entry| entry.user_id.clone())
    }

    pub fn last_heartbeat(&self, id: ConnectionId) -> Option<Instant> {
        self.sessions().get(&id).map(|entry| entry.last_heartbeat)
    }

    pub fn active_count(&self) -> usize {
        self.sessions().len()
    }

    /// Sessions ever opened by this supervisor
    pub fn opened_total(&self) -> u64 {
        self.opened.load(Ordering::Relaxed)
    }
}
