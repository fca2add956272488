//! Axum router construction for the dashboard API.
//!
//! Assembles all routes into a single [`Router`] with request tracing and
//! CORS middleware for the React dashboard.

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the dashboard API.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /api/dashboard/summary` -- dashboard aggregates
/// - `GET /api/pokemon` -- species table
/// - `GET /api/pokemon/{number}` -- single species
///
/// `cors_origins` lists the dashboard origins allowed to call the API. An
/// empty list allows any origin.
pub fn build_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // REST API
        .route("/api/dashboard/summary", get(handlers::dashboard_summary))
        .route("/api/pokemon", get(handlers::list_pokemon))
        .route("/api/pokemon/{number}", get(handlers::get_pokemon))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins)),
        )
        .with_state(state)
}

/// CORS policy for the given origins. Any method and header is allowed.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(allowed))
}
