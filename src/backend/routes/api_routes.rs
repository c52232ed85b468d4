/**
 * API Route Handlers
 *
 * Route groups mounted under `/v1`:
 *
 * ## Async tasks (`/v1/async`)
 * - `POST /v1/async/io-bound` - submit I/O-bound work
 * - `POST /v1/async/cpu-bound` - submit CPU-bound work
 * - `GET /v1/async/result/{task_id}` - poll a task
 *
 * ## JWT (`/v1/jwt`)
 * - `POST /v1/jwt/generate-token` - issue a token
 * - `POST /v1/jwt/verify-token` - verify a token
 * - `GET /v1/jwt/protected` - requires `Authorization: Bearer <token>`
 *
 * ## WebSocket (`/v1/websocket`)
 * - `GET /v1/websocket/ws?token=<jwt>` - heartbeat session
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::auth::handlers::{generate_token, protected, verify_token};
use crate::backend::middleware::auth_middleware;
use crate::backend::realtime::handlers::ws_handler;
use crate::backend::server::state::AppState;
use crate::backend::tasks::handlers::{get_task_result, submit_cpu_bound, submit_io_bound};

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    router
        .nest("/v1/async", async_routes())
        .nest("/v1/jwt", jwt_routes(app_state))
        .nest("/v1/websocket", websocket_routes())
}

fn async_routes() -> Router<AppState> {
    Router::new()
        .route("/io-bound", post(submit_io_bound))
        .route("/cpu-bound", post(submit_cpu_bound))
        .route("/result/{task_id}", get(get_task_result))
}

fn jwt_routes(app_state: &AppState) -> Router<AppState> {
    // Only the protected route sits behind the middleware
    let protected_routes = Router::new()
        .route("/protected", get(protected))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware));

    Router::new()
        .route("/generate-token", post(generate_token))
        .route("/verify-token", post(verify_token))
        .merge(protected_routes)
}

fn websocket_routes() -> Router<AppState> {
    Router::new().route("/ws", get(ws_handler))
}
