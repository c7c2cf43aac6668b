/**
 * Collaboration Handlers
 *
 * `GET /api/v1/projects/{target}/content` - websocket upgrade into a
 * collaboration session.
 *
 * Access is resolved and the project looked up before the upgrade is
 * accepted; a bad token or an unknown project is answered with a plain
 * HTTP error and leaves no trace in the registry.
 */

use axum::{
    extract::{Path, State, WebSocketUpgrade},
    response::Response,
};

use crate::backend::auth::resolve_access;
use crate::backend::collab::session::run_session;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Handle a collaboration connection request
pub async fn handle_collab_socket(
    State(app_state): State<AppState>,
    Path(target): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<Response, BackendError> {
    let grant = resolve_access(&target, &app_state.share_keys)?;

    if app_state.store.find_project(grant.project_id).await?.is_none() {
        tracing::info!("[Collab] Connection refused, project {} not found", grant.project_id);
        return Err(BackendError::not_found(format!(
            "Project {} not found",
            grant.project_id
        )));
    }

    tracing::info!(
        "[Collab] Upgrading connection for project {} ({:?})",
        grant.project_id,
        grant.capability
    );

    let collab = app_state.collab.clone();
    Ok(ws.on_upgrade(move |socket| run_session(socket, collab, grant)))
}
