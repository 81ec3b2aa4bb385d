use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use crate::classifier::ClassifierError;

use super::render;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Invalid(String),
    #[error("Model tidak tersedia: {0}")]
    ModelUnavailable(String),
    #[error("{0}")]
    Prediction(String),
}

impl From<ClassifierError> for AppError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::ValidationError(msg) => AppError::Invalid(msg),
            other => AppError::Prediction(other.to_string()),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Invalid(_) => StatusCode::BAD_REQUEST,
            AppError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            AppError::Prediction(msg) => log::error!("Prediction failed: {}", msg),
            other => log::warn!("Request rejected: {}", other),
        }
    }

    /// JSON body for the API routes
    pub fn into_json(self) -> (StatusCode, Json<serde_json::Value>) {
        self.log();
        (self.status(), Json(serde_json::json!({ "error": self.to_string() })))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();
        (status, Html(render::error_page(status, &self.to_string()))).into_response()
    }
}
