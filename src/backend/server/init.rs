/**
 * Server Initialization
 *
 * Builds the application state from configuration and wires it into the
 * router.
 *
 * # Initialization Process
 *
 * 1. Pick the project store (PostgreSQL or in-memory)
 * 2. Create the collaboration state and share token keys
 * 3. Create and configure the router
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_project_store, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// A missing or unreachable database is not fatal; the server runs on the
/// in-memory store instead.
pub async fn create_app(config: &ServerConfig) -> Router<()> {
    tracing::info!("Initializing XFCanvas backend server");

    let store = load_project_store(config).await;
    let app_state = AppState::new(config, store);

    tracing::info!(
        "Collaboration state initialized (peer queue capacity {})",
        config.peer_queue_capacity
    );

    create_router(app_state)
}
