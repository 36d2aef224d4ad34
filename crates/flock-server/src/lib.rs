//! HTTP front end for a Flock [`Registry`].
//!
//! Exposes an axum [`Router`] with a single command endpoint. Requests are
//! [`Command`]s, replies are [`Response`]s; an undecodable request gets a
//! failure reply rather than an HTTP error.

pub mod dispatch;

use std::sync::Arc;

use axum::{
  Json, Router,
  extract::State,
  routing::{get, post},
};
use flock_core::{
  Registry, Topic,
  command::{Command, Response, UNKNOWN_TAG},
};
use parking_lot::Mutex;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `flock.toml` and
/// `FLOCK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_port")]
  pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 7070 }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: default_host(),
      port: default_port(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
///
/// The registry sits behind one lock; each command runs with exclusive
/// access to every account.
#[derive(Clone)]
pub struct AppState {
  pub registry: Arc<Mutex<Registry>>,
  pub config:   Arc<ServerConfig>,
}

impl AppState {
  pub fn new(config: ServerConfig) -> Self {
    let mut registry = Registry::new();
    registry.on_register(|account| {
      let id = account.id().to_owned();
      account
        .following(Topic::PropertyChanged)
        .subscribe(move |sender, note| {
          tracing::info!(
            account = %id,
            from = sender.id(),
            title = note.title(),
            "{}",
            note.description()
          );
        });
    });

    Self {
      registry: Arc::new(Mutex::new(registry)),
      config:   Arc::new(config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/command", post(command_handler))
    .route("/health", get(health_handler))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// `POST /command` — body: a JSON [`Command`].
async fn command_handler(
  State(state): State<AppState>,
  Json(body): Json<serde_json::Value>,
) -> Json<Response> {
  let response = match serde_json::from_value::<Command>(body) {
    Ok(command) => {
      let mut registry = state.registry.lock();
      dispatch::dispatch(&mut registry, &state.config, command)
    }
    Err(e) => {
      tracing::warn!(error = %e, "unrecognised command");
      Response::failure(UNKNOWN_TAG, format!("unrecognised command: {e}"))
    }
  };
  Json(response)
}

/// `GET /health`
async fn health_handler() -> &'static str { "ok" }

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use flock_core::{
    command::{AccountSummary, ServerInfo},
    snapshot::AccountSnapshot,
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  fn make_state() -> AppState { AppState::new(ServerConfig::default()) }

  async fn send(state: &AppState, body: Value) -> Response {
    let req = Request::builder()
      .method("POST")
      .uri("/command")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    let resp = router(state.clone()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn register(state: &AppState, id: &str) -> Response {
    send(state, json!({ "tag": "register", "payload": { "id": id } })).await
  }

  #[tokio::test]
  async fn health_returns_ok() {
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = router(make_state()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn register_returns_snapshot() {
    let state = make_state();
    let resp = register(&state, "alice").await;
    assert!(resp.success);
    assert_eq!(resp.tag, "register");
    let snapshot: AccountSnapshot = resp.into_payload().unwrap();
    assert_eq!(snapshot.id, "alice");
    assert_eq!(snapshot.passport.name, "Null");
  }

  #[tokio::test]
  async fn duplicate_register_fails() {
    let state = make_state();
    register(&state, "alice").await;
    let resp = register(&state, "alice").await;
    assert!(!resp.success);
    assert!(resp.error_message().unwrap().contains("already taken"));
  }

  #[tokio::test]
  async fn unknown_tag_gets_structured_failure() {
    let state = make_state();
    let resp = send(&state, json!({ "tag": "self_destruct" })).await;
    assert!(!resp.success);
    assert_eq!(resp.tag, UNKNOWN_TAG);
    assert!(resp.error_message().is_some());
  }

  #[tokio::test]
  async fn info_counts_accounts() {
    let state = make_state();
    register(&state, "a").await;
    register(&state, "b").await;
    let info: ServerInfo = send(&state, json!({ "tag": "info" }))
      .await
      .into_payload()
      .unwrap();
    assert_eq!(info.accounts, 2);
    assert_eq!(info.port, 7070);
  }

  #[tokio::test]
  async fn update_is_forwarded_into_follower_journal() {
    let state = make_state();
    register(&state, "a").await;
    let b: AccountSnapshot = register(&state, "b").await.into_payload().unwrap();

    let resp = send(
      &state,
      json!({ "tag": "subscribe", "payload": { "follower": "a", "target": "b" } }),
    )
    .await;
    assert!(resp.success);

    let mut edited = b.clone();
    edited.passport.name = "Bob".into();
    let resp = send(&state, json!({ "tag": "update", "payload": edited })).await;
    assert!(resp.success, "{:?}", resp.error_message());

    let journal: Vec<flock_core::Note> =
      send(&state, json!({ "tag": "journal", "payload": { "id": "a" } }))
        .await
        .into_payload()
        .unwrap();
    assert_eq!(journal.len(), 1);
    assert_eq!(journal[0].description(), "Null Null changed their name to Bob.");

    let summary: AccountSummary =
      send(&state, json!({ "tag": "search", "payload": { "id": "b" } }))
        .await
        .into_payload()
        .unwrap();
    assert_eq!(summary.display_name, "Null Bob");
  }

  #[tokio::test]
  async fn duplicate_subscribe_fails() {
    let state = make_state();
    register(&state, "a").await;
    register(&state, "b").await;
    let body = json!({ "tag": "subscribe", "payload": { "follower": "a", "target": "b" } });
    assert!(send(&state, body.clone()).await.success);
    let resp = send(&state, body).await;
    assert!(!resp.success);
    assert_eq!(resp.tag, "subscribe");
  }

  #[tokio::test]
  async fn login_unknown_account_fails() {
    let state = make_state();
    let resp = send(&state, json!({ "tag": "login", "payload": { "id": "ghost" } })).await;
    assert!(!resp.success);
    assert_eq!(resp.tag, "login");
    assert_eq!(resp.error_message(), Some("account not found: ghost"));
  }
}
