//! Wire types exchanged between a client and the server.
//!
//! A request is a [`Command`], serialised as `{"tag": ..., "payload": ...}`.
//! Every reply is a [`Response`] with the same tag, a success flag and a JSON
//! payload. Failures carry `{"error": "<message>"}` as their payload.

use std::fmt;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;

use crate::{Result, note::Note, snapshot::AccountSnapshot};

/// Tag used when a request could not be decoded into a [`Command`].
pub const UNKNOWN_TAG: &str = "unknown";

// ─── Command ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "payload", rename_all = "snake_case")]
pub enum Command {
  /// Server status; replies with [`ServerInfo`].
  Info,
  /// Create an account; replies with its [`AccountSnapshot`].
  Register { id: String },
  /// Fetch an account; replies with its [`AccountSnapshot`].
  Login { id: String },
  /// Look an account up; replies with an [`AccountSummary`].
  Search { id: String },
  /// Overwrite an account's editable fields from a snapshot.
  Update(AccountSnapshot),
  Subscribe { follower: String, target: String },
  Unsubscribe { follower: String, target: String },
  /// Publish a news entry; replies with the stored [`Note`].
  Publish {
    id:          String,
    title:       String,
    description: String,
  },
  RemoveNews { id: String, note: Note },
  /// Replies with the account's journal.
  Journal { id: String },
}

impl Command {
  pub fn tag(&self) -> &'static str {
    match self {
      Command::Info => "info",
      Command::Register { .. } => "register",
      Command::Login { .. } => "login",
      Command::Search { .. } => "search",
      Command::Update(_) => "update",
      Command::Subscribe { .. } => "subscribe",
      Command::Unsubscribe { .. } => "unsubscribe",
      Command::Publish { .. } => "publish",
      Command::RemoveNews { .. } => "remove_news",
      Command::Journal { .. } => "journal",
    }
  }
}

// ─── Payloads ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
  pub accounts: usize,
  pub host:     String,
  pub port:     u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
  pub id:           String,
  pub display_name: String,
}

// ─── Response ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
  pub success: bool,
  pub tag:     String,
  #[serde(default)]
  pub payload: serde_json::Value,
}

impl Response {
  /// A successful reply carrying `payload`.
  pub fn ok(tag: impl Into<String>, payload: impl Serialize) -> Result<Self> {
    Ok(Self {
      success: true,
      tag:     tag.into(),
      payload: serde_json::to_value(payload)?,
    })
  }

  /// A failed reply whose payload is `{"error": message}`.
  pub fn failure(tag: impl Into<String>, message: impl fmt::Display) -> Self {
    Self {
      success: false,
      tag:     tag.into(),
      payload: json!({ "error": message.to_string() }),
    }
  }

  pub fn error_message(&self) -> Option<&str> {
    if self.success {
      return None;
    }
    self.payload.get("error").and_then(serde_json::Value::as_str)
  }

  /// Decode the payload of a successful reply.
  pub fn into_payload<T: DeserializeOwned>(self) -> Result<T> {
    Ok(serde_json::from_value(self.payload)?)
  }
}
