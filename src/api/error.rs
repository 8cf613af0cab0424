use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::api::pages;
use crate::domain::KanbanError;

/// Renders store and auth failures as an HTML error page. Upstream and
/// internal details go to the log only.
impl IntoResponse for KanbanError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            KanbanError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            KanbanError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            KanbanError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            KanbanError::Remote { status, message } => {
                tracing::error!(status, "Remote backend error: {}", message);
                (StatusCode::BAD_GATEWAY, "Upstream service error".into())
            }
            KanbanError::Http(err) => {
                tracing::error!("HTTP error: {:?}", err);
                (StatusCode::BAD_GATEWAY, "Upstream service error".into())
            }
            KanbanError::Serialization(err) => {
                tracing::error!("Serialization error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        let body = pages::error_page(status, &message);

        (status, Html(body)).into_response()
    }
}
