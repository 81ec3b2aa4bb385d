use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::{Form, Json};
use serde_json::json;

use crate::dataset::{self, PREVIEW_ROWS};
use crate::features::PredictionForm;
use crate::predictor::Prediction;

use super::error::AppError;
use super::render::{self, FormView};
use super::state::{AppState, ModelStatus};

/// Form page with default slider values
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render::form_page(&FormView {
        form: PredictionForm::default(),
        animation: state.animation.as_ref(),
        model_error: state.model.error(),
        prediction: None,
    }))
}

/// Handles a form submission.
///
/// Without a loaded model the form is shown again with the load error and the
/// model is never called.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PredictionForm>,
) -> Result<Html<String>, AppError> {
    let prediction = match state.model.predictor() {
        Some(predictor) => Some(predictor.predict(form.into_record()?)?),
        None => {
            log::warn!("Form submitted while the model is unavailable");
            None
        }
    };

    Ok(Html(render::form_page(&FormView {
        form,
        animation: state.animation.as_ref(),
        model_error: state.model.error(),
        prediction: prediction.as_ref(),
    })))
}

/// Explanation page; the dataset is read on every request so a file added later shows up.
pub async fn explain(State(state): State<Arc<AppState>>) -> Html<String> {
    let preview = dataset::load_preview(&state.dataset_path, PREVIEW_ROWS);
    if let Err(e) = &preview {
        log::warn!("Dataset preview unavailable: {}", e);
    }
    Html(render::explanation_page(&preview, &state.report))
}

/// JSON prediction. Malformed bodies get the same `{"error": ...}` shape as every other failure.
pub async fn api_predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictionForm>, JsonRejection>,
) -> Result<Json<Prediction>, (StatusCode, Json<serde_json::Value>)> {
    let Json(form) = payload.map_err(|rejection| AppError::Invalid(rejection.body_text()).into_json())?;

    let predictor = match state.model.predictor() {
        Some(predictor) => predictor,
        None => {
            let message = state.model.error().unwrap_or_default().to_string();
            return Err(AppError::ModelUnavailable(message).into_json());
        }
    };

    let record = form.into_record().map_err(|e| AppError::from(e).into_json())?;
    let prediction = predictor.predict(record).map_err(|e| AppError::from(e).into_json())?;
    Ok(Json(prediction))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(match &state.model {
        ModelStatus::Ready(predictor) => json!({
            "model_loaded": true,
            "classes": predictor.classes(),
        }),
        ModelStatus::Unavailable(message) => json!({
            "model_loaded": false,
            "error": message,
        }),
    })
}
