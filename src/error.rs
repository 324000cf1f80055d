//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::inference::classifier::InferenceError;
use crate::models::patient::ValidationError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    /// Artifacts never loaded; the service is not ready for inference
    ModelNotLoaded,

    /// Client sent a record that fails schema validation
    Validation(ValidationError),

    /// The loaded model failed on an otherwise valid request
    Inference(InferenceError),

    /// Generic errors
    Internal(String),
}

impl AppError {
    /// Status code and client-visible message for this error.
    ///
    /// Shared by the HTTP response path and the inline per-item descriptors
    /// in batch responses so both surfaces report identically.
    pub fn parts(&self) -> (StatusCode, String) {
        match self {
            AppError::ModelNotLoaded => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Model not loaded".to_string(),
            ),
            AppError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            AppError::Inference(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Prediction error: {}", e),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {}", msg),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.parts();

        if status.is_server_error() {
            tracing::error!("request failed: {}", error_message);
        }

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        AppError::Inference(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::ModelNotLoaded.parts().0,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Validation(ValidationError::MissingField("age".to_string()))
                .parts()
                .0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Inference(InferenceError::ModelFailure("boom".to_string()))
                .parts()
                .0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_message_names_field() {
        let (_, msg) =
            AppError::Validation(ValidationError::MissingField("age".to_string())).parts();
        assert!(msg.contains("age"));
    }
}
