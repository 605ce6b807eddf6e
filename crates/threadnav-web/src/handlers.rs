use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::WebState;
use crate::dto::{
    AddEntryRequest, CreateNavigatorRequest, HealthResponse, PreviewOutlineRequest,
    PreviewOutlineResponse,
};
use crate::error::nav_error_response;

const PREVIEW_MESSAGE_ID: &str = "preview";

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn create_navigator(
    State(state): State<WebState>,
    Json(request): Json<CreateNavigatorRequest>,
) -> Response {
    match state
        .service
        .create_navigator(&request.chat_id, &request.chat_title)
    {
        Ok(navigator) => (StatusCode::CREATED, Json(navigator)).into_response(),
        Err(err) => nav_error_response(err, "navigator.create", Some(request.chat_id)),
    }
}

pub async fn get_navigator(
    State(state): State<WebState>,
    Path(chat_id): Path<String>,
) -> Response {
    match state.service.get_navigator(&chat_id) {
        Ok(tree) => (StatusCode::OK, Json(tree)).into_response(),
        Err(err) => nav_error_response(err, "navigator.get", Some(chat_id)),
    }
}

pub async fn add_entry(
    State(state): State<WebState>,
    Path(chat_id): Path<String>,
    Json(request): Json<AddEntryRequest>,
) -> Response {
    match state.service.add_entry_for_chat(
        &chat_id,
        &request.assistant_message_id,
        &request.user_message_id,
        &request.assistant_message,
    ) {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(err) => nav_error_response(err, "entry.add", Some(chat_id)),
    }
}

pub async fn preview_outline(
    State(state): State<WebState>,
    Json(request): Json<PreviewOutlineRequest>,
) -> Response {
    let assistant_message_id = request
        .assistant_message_id
        .as_deref()
        .unwrap_or(PREVIEW_MESSAGE_ID);
    let outline = state
        .service
        .preview_outline(&request.assistant_message, assistant_message_id);
    (
        StatusCode::OK,
        Json(PreviewOutlineResponse {
            entry_label: outline.entry_label,
            sections: outline.sections,
        }),
    )
        .into_response()
}
