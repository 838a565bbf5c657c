use axum::http::StatusCode;

use crate::storage::StorageError;

/// Everything that can go wrong while handling a submission. The Display
/// text is what the client sees; routes pick the response shape.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Configuration(String),
    Storage(StorageError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_) | AppError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "{msg}"),
            AppError::Configuration(msg) => write!(f, "Server misconfigured: {msg}"),
            AppError::Storage(err) => write!(f, "Failed to save submission: {err}"),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_class() {
        assert_eq!(
            AppError::Validation("nope".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Configuration("missing storage connection string".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Storage(StorageError::from("down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn display_text_is_client_facing() {
        let err = AppError::Validation("Missing required fields: name and email".into());
        assert_eq!(err.to_string(), "Missing required fields: name and email");

        let err = AppError::Configuration("missing storage connection string".into());
        assert_eq!(
            err.to_string(),
            "Server misconfigured: missing storage connection string"
        );

        let err = AppError::from(StorageError::from("upload rejected"));
        assert_eq!(err.to_string(), "Failed to save submission: upload rejected");
    }
}
