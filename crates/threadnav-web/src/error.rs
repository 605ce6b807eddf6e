use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use threadnav_core::{NavError, RepositoryError};

#[expect(
    clippy::needless_pass_by_value,
    reason = "handlers naturally own error values from `Result` and pass them through"
)]
pub fn nav_error_response(err: NavError, operation: &str, chat_id: Option<String>) -> Response {
    let status = status_for_nav_error(&err);
    if status.is_server_error() {
        tracing::error!(operation, code = err.code(), error = %err, "request failed");
    } else {
        tracing::debug!(operation, code = err.code(), error = %err, "request rejected");
    }
    let payload = err.to_payload(operation, chat_id);
    (status, Json(payload)).into_response()
}

fn status_for_nav_error(err: &NavError) -> StatusCode {
    match err {
        NavError::Validation(_) => StatusCode::BAD_REQUEST,
        NavError::NotFound(_) | NavError::Repository(RepositoryError::MissingNavigator(_)) => {
            StatusCode::NOT_FOUND
        }
        NavError::Conflict(_) | NavError::Repository(RepositoryError::Conflict(_)) => {
            StatusCode::CONFLICT
        }
        NavError::ExtractionEmpty { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        NavError::Repository(_)
        | NavError::Io(_)
        | NavError::Json(_)
        | NavError::Config(_)
        | NavError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
