/**
 * Router Configuration
 *
 * Combines all route groups into a single Axum router.
 *
 * # Layers
 *
 * - `TraceLayer` - one tracing span per request
 * - `CorsLayer` - built from `AppConfig::allowed_origins`; `*` allows any
 *   origin (without credentials), an explicit list allows credentials
 *
 * # Fallback
 *
 * Unknown routes get a JSON 404.
 */

use axum::{
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Health check response
#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: u16,
    pub message: &'static str,
}

/// GET /health_check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: StatusCode::OK.as_u16(),
        message: "healthy",
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health_check", get(health_check));

    let router = configure_api_routes(router, &app_state);

    let router = router.fallback(|| async { BackendError::handler(StatusCode::NOT_FOUND, "Not Found") });

    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&app_state.config.allowed_origins));

    router.layer(layers).with_state(app_state)
}

/// Build the CORS layer for the configured origins
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("[Startup] Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
