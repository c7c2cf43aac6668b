/**
 * Error Conversion
 *
 * All backend errors implement `IntoResponse` from Axum, so the collaboration
 * upgrade handler can reject a connection by returning one directly.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "share token has expired",
 *   "status": 401
 * }
 * ```
 */

use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("[Backend] {}", message);
        } else {
            tracing::debug!("[Backend] Rejecting request: {}", message);
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, [(header::CACHE_CONTROL, "no-store")], Json(body)).into_response()
    }
}
