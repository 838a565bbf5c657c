use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::storage::StorageError;

use super::naming;
use super::validate;

pub struct PipelineResult {
    pub submission_id: Uuid,
    pub blob_name: String,
}

/// Validates the payload, stamps it with a fresh submission id and writes it
/// to the container as pretty-printed JSON. `request_id` only correlates log
/// lines; the stored record carries the submission id.
pub async fn run(
    state: &AppState,
    request_id: Uuid,
    payload: &Value,
) -> Result<PipelineResult, AppError> {
    let fields = validate::require_contact_fields(payload)?;

    let email = fields["email"].as_str().unwrap_or_default();
    tracing::info!("Submission request {request_id} received for {email}");

    let Some(store) = state.store.as_deref() else {
        return Err(AppError::Configuration(
            "missing storage connection string".into(),
        ));
    };

    let submission_id = Uuid::new_v4();
    let blob_name = naming::blob_name(Utc::now(), submission_id);

    // The record is the sender's payload plus the generated id. A caller
    // spoofing an `id` field loses it here.
    let mut record = fields.clone();
    record.insert(
        "id".to_string(),
        Value::String(submission_id.to_string()),
    );

    let body = serde_json::to_vec_pretty(&record)
        .map_err(|e| StorageError::from(format!("Could not encode record: {e}")))?;

    store.ensure_container().await?;
    store.put_object(&blob_name, body, "application/json").await?;

    tracing::info!("Submission {request_id} saved as {blob_name}");

    Ok(PipelineResult {
        submission_id,
        blob_name,
    })
}
