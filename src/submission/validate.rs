use serde_json::{Map, Value};

use crate::error::AppError;

const MISSING_FIELDS: &str = "Missing required fields: name and email";

/// A submission must be a JSON object carrying non-empty `name` and `email`
/// strings. Returns the object's fields so the caller keeps everything else
/// the sender included.
pub fn require_contact_fields(payload: &Value) -> Result<&Map<String, Value>, AppError> {
    let fields = payload
        .as_object()
        .ok_or_else(|| AppError::Validation(MISSING_FIELDS.into()))?;

    let filled = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.is_empty())
    };

    if filled("name") && filled("email") {
        Ok(fields)
    } else {
        Err(AppError::Validation(MISSING_FIELDS.into()))
    }
}
