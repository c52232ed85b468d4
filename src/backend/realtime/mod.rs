//! Real-time Session Module
//!
//! Heartbeat-driven WebSocket sessions. Each verified client gets a session
//! whose lifetime is a sliding window: every `ping` pushes the deadline out
//! by the keepalive timeout (60 s by default), and a session that stays
//! silent past its deadline is closed with 1000 / "Timeout due to
//! inactivity".
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs        - Module exports and documentation
//! ├── frames.rs     - Heartbeat/echo vocabulary and close codes
//! ├── session.rs    - SessionSupervisor (live session table)
//! ├── keepalive.rs  - Per-connection supervisory loop
//! └── handlers.rs   - WebSocket upgrade handler
//! ```
//!
//! # Session Lifecycle
//!
//! ```text
//! CONNECTING --(token rejected, close 1008)--> CLOSED
//! CONNECTING --(token verified)--> OPEN --(ping)--> OPEN
//! OPEN --(timeout | client close | transport error)--> CLOSED
//! ```
//!
//! CLOSED is terminal; connection ids are never reused.

pub mod frames;

pub mod session;

pub mod keepalive;

pub mod handlers;

pub use frames::WsCloseCode;
pub use handlers::ws_handler;
pub use keepalive::{serve_connection, SessionEnd};
pub use session::{ConnectionId, Liveness, SessionSupervisor};
