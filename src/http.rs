//! HTTP front door: `/` and `GET`/`POST /api/gemini`.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query as QueryParams, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::Instrument;
use uuid::Uuid;

use crate::core::dispatch::Dispatcher;
use crate::core::envelope::Envelope;

pub const MISSING_QUERY_PARAMS: &str = "Both prompt and uid are required parameters";
pub const MISSING_BODY_FIELDS: &str = "Both prompt and uid are required in the request body";
pub const TIMED_OUT: &str = "The request timed out";

const INDEX_HTML: &str = r#"<h1>Switchboard is Running</h1>
<p>Interact via the API:</p>
<ul>
  <li>GET: /api/gemini?prompt={your_prompt}&amp;uid={your_uid}</li>
  <li>POST: /api/gemini with JSON body { "prompt": "your_prompt", "uid": "your_uid" }</li>
</ul>
"#;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    /// Upper bound on one routing cycle. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeminiParams {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub uid: Option<String>,
}

impl GeminiParams {
    fn required(&self) -> Option<(&str, &str)> {
        let prompt = self.prompt.as_deref().filter(|p| !p.is_empty())?;
        let uid = self.uid.as_deref().filter(|u| !u.is_empty())?;
        Some((prompt, uid))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/gemini", get(gemini_get).post(gemini_post))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn gemini_get(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<GeminiParams>,
) -> Response {
    match params.required() {
        Some((prompt, uid)) => process(&state, prompt, uid).await,
        None => bad_request(MISSING_QUERY_PARAMS),
    }
}

async fn gemini_post(
    State(state): State<AppState>,
    body: Result<Json<GeminiParams>, JsonRejection>,
) -> Response {
    let params = match body {
        Ok(Json(params)) => params,
        Err(rejection) => {
            tracing::debug!("rejected body: {}", rejection);
            GeminiParams::default()
        }
    };
    match params.required() {
        Some((prompt, uid)) => process(&state, prompt, uid).await,
        None => bad_request(MISSING_BODY_FIELDS),
    }
}

async fn process(state: &AppState, prompt: &str, uid: &str) -> Response {
    let span = tracing::info_span!("request", id = %Uuid::new_v4(), uid = %uid);
    let routed = state.dispatcher.route(uid, prompt, &[]).instrument(span);

    let envelope = match state.timeout {
        Some(limit) => match tokio::time::timeout(limit, routed).await {
            Ok(envelope) => envelope,
            Err(_) => {
                tracing::warn!(uid, "request exceeded {:?}", limit);
                return failure(StatusCode::GATEWAY_TIMEOUT, TIMED_OUT);
            }
        },
        None => routed.await,
    };

    if envelope.success {
        (StatusCode::OK, Json(envelope)).into_response()
    } else {
        failure_from(&envelope)
    }
}

fn failure_from(envelope: &Envelope) -> Response {
    let message = if envelope.message.is_empty() {
        "Something went wrong"
    } else {
        envelope.message.as_str()
    };
    bad_request(message)
}

fn bad_request(message: &str) -> Response {
    failure(StatusCode::BAD_REQUEST, message)
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}
