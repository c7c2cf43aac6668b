/**
 * Router Configuration
 *
 * Combines all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Collaboration routes (websocket upgrade)
 * 2. Fallback handler (404)
 *
 * Every request is traced through `tower_http::trace::TraceLayer`.
 */

use axum::{response::IntoResponse, Router};
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::routes::collab_routes::configure_collab_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state shared by every handler
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_collab_routes(Router::new());

    let router = router.fallback(|| async {
        BackendError::not_found("No such route").into_response()
    });

    router
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
