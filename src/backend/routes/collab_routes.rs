/**
 * Collaboration Routes
 *
 * - `GET /api/v1/projects/{target}/content` - websocket collaboration
 *   channel; `target` is a project id or a share token
 */

use axum::{routing::get, Router};

use crate::backend::collab::handle_collab_socket;
use crate::backend::server::state::AppState;

/// Configure collaboration routes
pub fn configure_collab_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/api/v1/projects/{target}/content", get(handle_collab_socket))
}
