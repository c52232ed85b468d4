/**
 * Application State Management
 *
 * `AppState` is the single state container handed to the router. It holds
 * explicitly owned services rather than globals:
 * - the task dispatcher (registry plus worker pool)
 * - the WebSocket session supervisor
 * - the JWT keys
 * - the immutable configuration
 *
 * # State Extraction
 *
 * The `FromRef` implementations let handlers extract only the part they use,
 * e.g. `State(dispatcher): State<Dispatcher>`.
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::sessions::JwtKeys;
use crate::backend::realtime::session::SessionSupervisor;
use crate::backend::tasks::dispatcher::Dispatcher;
use crate::shared::AppConfig;

/// Shared application state
///
/// Every field is cheap to clone and all clones share the same services.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Task submission and polling
    pub dispatcher: Dispatcher,

    /// Live WebSocket sessions
    pub sessions: SessionSupervisor,

    /// RS256 keys for issuing and verifying tokens
    pub jwt: Arc<JwtKeys>,

    /// Configuration the server was started with
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build the services described by `config` around already loaded keys
    pub fn new(config: AppConfig, jwt: JwtKeys) -> Self {
        Self {
            dispatcher: Dispatcher::from_settings(&config.tasks),
            sessions: SessionSupervisor::new(config.keepalive.timeout),
            jwt: Arc::new(jwt),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Dispatcher {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.dispatcher.clone()
    }
}

impl FromRef<AppState> for SessionSupervisor {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<JwtKeys> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.jwt.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
