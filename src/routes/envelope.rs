use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

use crate::config::EnvelopeStyle;
use crate::error::AppError;

/// Success body for a stored submission. `file` is the blob name the record
/// landed under.
pub fn accepted(style: EnvelopeStyle, request_id: Uuid, blob_name: &str) -> Response {
    let body = match style {
        EnvelopeStyle::Classic => json!({ "ok": true, "file": blob_name }),
        EnvelopeStyle::Correlated => json!({
            "ok": true,
            "file": blob_name,
            "requestId": request_id,
        }),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Error responses share one status taxonomy; the classic style answers
/// plain text while the correlated style wraps the same message in JSON.
pub fn rejected(style: EnvelopeStyle, request_id: Uuid, err: &AppError) -> Response {
    let status = err.status();
    match style {
        EnvelopeStyle::Classic => (status, err.to_string()).into_response(),
        EnvelopeStyle::Correlated => (
            status,
            Json(json!({
                "ok": false,
                "requestId": request_id,
                "error": err.to_string(),
            })),
        )
            .into_response(),
    }
}
