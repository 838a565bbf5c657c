use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::pipeline;

use super::envelope;

pub async fn submit(State(state): State<SharedState>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();
    let style = state.config.envelope;

    let payload = match parse_payload(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!("Rejected submission {request_id}: {e}");
            return envelope::rejected(style, request_id, &e);
        }
    };

    match pipeline::run(&state, request_id, &payload).await {
        Ok(result) => envelope::accepted(style, request_id, &result.blob_name),
        Err(e) => {
            if e.status().is_server_error() {
                tracing::error!("Submission {request_id} failed: {e}");
            } else {
                tracing::debug!("Rejected submission {request_id}: {e}");
            }
            envelope::rejected(style, request_id, &e)
        }
    }
}

fn parse_payload(body: &Bytes) -> Result<Value, AppError> {
    if body.is_empty() {
        return Err(AppError::Validation("Missing request body".into()));
    }
    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid JSON: {e}")))?;
    // A literal `null` body counts as absent, same as no body at all.
    if payload.is_null() {
        return Err(AppError::Validation("Missing request body".into()));
    }
    Ok(payload)
}

/// Browsers preflight cross-origin JSON posts; answer before any body
/// handling happens.
pub async fn preflight(State(state): State<SharedState>) -> Response {
    (
        [
            (
                "Access-Control-Allow-Origin",
                state.config.cors_allow_origin.clone(),
            ),
            (
                "Access-Control-Allow-Methods",
                HeaderValue::from_static("POST, OPTIONS"),
            ),
            (
                "Access-Control-Allow-Headers",
                HeaderValue::from_static("Content-Type"),
            ),
            ("Access-Control-Max-Age", HeaderValue::from_static("86400")),
        ],
        StatusCode::OK,
    )
        .into_response()
}
