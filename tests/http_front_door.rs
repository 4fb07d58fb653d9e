//! The axum front door, driven with `tower::ServiceExt::oneshot`.
#![cfg(feature = "server")]

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{Recorder, ScriptedOracle, decision_json, dispatcher};
use switchboard::http::{AppState, router};
use switchboard::prelude::*;
use tower::ServiceExt;

fn app(oracle_answer: &str, registry: CapabilityRegistry) -> axum::Router {
    router(AppState {
        dispatcher: Arc::new(dispatcher(ScriptedOracle::answering(oracle_answer), registry)),
        timeout: None,
    })
}

async fn json_body(res: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/gemini")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_index_lists_endpoints() {
    let app = app("{}", CapabilityRegistry::new());
    let req = Request::builder().uri("/").body(Body::empty()).unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/api/gemini"));
}

#[tokio::test]
async fn test_get_routes_the_prompt() {
    let text = Recorder::replying("Lima.");
    let app = app(
        &decision_json("textgen", "capital of Peru", &[]),
        CapabilityRegistry::new().with_textgen(text.clone()),
    );

    let req = Request::builder()
        .uri("/api/gemini?prompt=capital%20of%20Peru&uid=u1")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        json_body(res).await,
        serde_json::json!({ "success": true, "type": "text", "message": "Lima." })
    );
    assert_eq!(text.calls()[0].0, "u1");
}

#[tokio::test]
async fn test_get_without_uid_is_rejected() {
    let app = app("{}", CapabilityRegistry::new());
    let req = Request::builder()
        .uri("/api/gemini?prompt=hello")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(res).await,
        serde_json::json!({ "success": false, "message": "Both prompt and uid are required parameters" })
    );
}

#[tokio::test]
async fn test_post_image_generation() {
    let app = app(
        &decision_json("genimg", "a fox", &[]),
        CapabilityRegistry::new().with_image_generation(Recorder::replying("A fox.")),
    );

    let res = app
        .oneshot(post(serde_json::json!({ "prompt": "draw a fox", "uid": "u1" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["type"], "image");
    assert_eq!(body["imageUrl"], "https://files.example/generated.png");
    assert!(body.get("editedImageUrl").is_none());
}

#[tokio::test]
async fn test_post_missing_fields_and_bad_json() {
    let app = app("{}", CapabilityRegistry::new());
    let res = app
        .clone()
        .oneshot(post(serde_json::json!({ "prompt": "hi" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(res).await["message"],
        "Both prompt and uid are required in the request body"
    );

    let req = Request::builder()
        .method("POST")
        .uri("/api/gemini")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_failure_envelope_becomes_bad_request() {
    let app = app(
        &decision_json("audio2txt", "transcribe", &[]),
        CapabilityRegistry::new().with_audio(Recorder::replying("unused")),
    );
    let res = app
        .oneshot(post(serde_json::json!({ "prompt": "transcribe this", "uid": "u1" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(res).await,
        serde_json::json!({ "success": false, "message": "Audio URL is required for audio processing" })
    );
}

struct Stalled;

#[async_trait]
impl TextCapability for Stalled {
    async fn respond(&self, _user_id: &str, _prompt: &str) -> Result<String, CapabilityError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok("too late".to_string())
    }
}

#[tokio::test]
async fn test_slow_requests_time_out() {
    let registry = CapabilityRegistry::new().with_textgen(Arc::new(Stalled));
    let app = router(AppState {
        dispatcher: Arc::new(dispatcher(
            ScriptedOracle::answering(&decision_json("textgen", "hi", &[])),
            registry,
        )),
        timeout: Some(Duration::from_millis(50)),
    });

    let res = app
        .oneshot(post(serde_json::json!({ "prompt": "hi", "uid": "u1" })))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json_body(res).await["message"], "The request timed out");
}
