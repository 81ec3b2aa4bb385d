mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use personality_predictor::animation::fetch_animation;
use personality_predictor::web::{router, AppState, ModelStatus};
use tower::ServiceExt;

fn animation_server() -> Router {
    Router::new()
        .route("/ok.json", get(|| async { Json(serde_json::json!({ "v": "5.7.4", "fr": 30, "layers": [] })) }))
        .route("/missing.json", get(|| async { (StatusCode::NOT_FOUND, "not found") }))
        .route("/error.json", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }))
        .route("/garbage.json", get(|| async { "this is not json" }))
}

#[tokio::test]
async fn test_animation_fetched() {
    common::init();
    let addr = common::spawn_server(animation_server()).await;
    let animation = fetch_animation(&format!("http://{}/ok.json", addr)).await;
    assert_eq!(animation.unwrap()["fr"], 30);
}

#[tokio::test]
async fn test_non_200_yields_no_animation() {
    common::init();
    let addr = common::spawn_server(animation_server()).await;
    assert!(fetch_animation(&format!("http://{}/missing.json", addr)).await.is_none());
    assert!(fetch_animation(&format!("http://{}/error.json", addr)).await.is_none());
}

#[tokio::test]
async fn test_invalid_json_yields_no_animation() {
    common::init();
    let addr = common::spawn_server(animation_server()).await;
    assert!(fetch_animation(&format!("http://{}/garbage.json", addr)).await.is_none());
}

#[tokio::test]
async fn test_page_renders_without_animation() {
    common::init();
    let addr = common::spawn_server(animation_server()).await;
    let animation = fetch_animation(&format!("http://{}/missing.json", addr)).await;

    let state = AppState::new(ModelStatus::Unavailable("no model".into()), "data/personality_datasert.csv")
        .with_animation(animation);
    let response = router(Arc::new(state))
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("personality_form"));
    assert!(!html.contains("lottie.loadAnimation"));
}
