/**
 * Server Initialization
 *
 * Builds the Axum application from an `AppConfig`, or straight from the
 * process environment for the server binary.
 *
 * # Initialization Process
 *
 * 1. Load the RS256 keys named in the configuration
 * 2. Create the dispatcher (registry + worker pool) and session supervisor
 * 3. Start the retention sweep for unread terminal task records
 * 4. Create the router with all routes and layers
 *
 * A key that cannot be loaded stops startup; there is no degraded mode
 * without token verification.
 */

use axum::Router;
use std::net::SocketAddr;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::backend::auth::sessions::JwtKeys;
use crate::backend::error::BackendError;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_config_with;
use crate::backend::server::state::AppState;
use crate::backend::tasks::dispatcher::Dispatcher;
use crate::shared::config::TaskSettings;
use crate::shared::AppConfig;

/// Load configuration from the process environment and build the application
///
/// Returns the router and the address it should be served on.
pub async fn create_app_from_env() -> Result<(Router<()>, SocketAddr), BackendError> {
    create_app_from_lookup(|key| std::env::var(key).ok()).await
}

/// Like [`create_app_from_env`], reading variables through `lookup`
///
/// # Errors
///
/// `BackendError::ConfigError` for an invalid configuration, otherwise as
/// [`create_app`].
pub async fn create_app_from_lookup<F>(lookup: F) -> Result<(Router<()>, SocketAddr), BackendError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = load_config_with(lookup)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let app = create_app(config).await?;
    Ok((app, addr))
}

/// Create and configure the Axum application
///
/// # Errors
///
/// `BackendError::AuthError` if either key file cannot be read or parsed.
pub async fn create_app(config: AppConfig) -> Result<Router<()>, BackendError> {
    tracing::info!("[Startup] Initializing {} backend", config.app_name);

    let jwt = JwtKeys::load(&config.jwt)?;
    let app_state = AppState::new(config, jwt);

    Ok(create_app_with_state(app_state))
}

/// Build the application around an existing state
///
/// Must be called from within a tokio runtime: it spawns the retention sweep.
pub fn create_app_with_state(app_state: AppState) -> Router<()> {
    spawn_retention_sweep(app_state.dispatcher.clone(), &app_state.config.tasks);

    let app = create_router(app_state);
    tracing::info!("[Startup] Router configured with retention sweep");
    app
}

/// Periodically drop terminal records that were never polled
pub fn spawn_retention_sweep(dispatcher: Dispatcher, settings: &TaskSettings) -> JoinHandle<()> {
    let retention = settings.terminal_retention;
    let period = settings.retention_sweep_interval;

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            let removed = dispatcher.registry().purge_stale_terminal(retention, Instant::now());
            if removed > 0 {
                tracing::info!("[Tasks] Retention sweep removed {} unread terminal records", removed);
            } else {
                tracing::debug!("[Tasks] Retention sweep found nothing to remove");
            }
        }
    })
}
