//! HTTP surface: the prediction form, the explanation page and a small JSON API.

mod error;
mod handlers;
pub mod render;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

pub use error::AppError;
pub use state::{AppState, ModelStatus};

/// Routes:
/// - `GET /` form, `POST /predict` form submission
/// - `GET /model` explanation page
/// - `POST /api/predict`, `GET /api/health` JSON API
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict))
        .route("/model", get(handlers::explain))
        .route("/api/predict", post(handlers::api_predict))
        .route("/api/health", get(handlers::health))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}
