//! Async HTTP client for the flock command endpoint.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use flock_core::{
  Note,
  command::{AccountSummary, Command, Response, ServerInfo},
  snapshot::AccountSnapshot,
};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Connection settings for the flock server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `POST /command`, returning the raw reply.
  pub async fn send(&self, command: &Command) -> Result<Response> {
    let resp = self
      .client
      .post(self.url("/command"))
      .json(command)
      .send()
      .await
      .with_context(|| format!("POST /command ({}) failed", command.tag()))?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST /command → {}", resp.status()));
    }
    resp.json().await.context("deserialising response")
  }

  /// Send `command` and decode the payload of a successful reply.
  async fn call<T: DeserializeOwned>(&self, command: Command) -> Result<T> {
    let response = self.send(&command).await?;
    if !response.success {
      return Err(anyhow!(
        "{} failed: {}",
        response.tag,
        response.error_message().unwrap_or("no message")
      ));
    }
    response
      .into_payload()
      .with_context(|| format!("decoding {} payload", command.tag()))
  }

  pub async fn info(&self) -> Result<ServerInfo> { self.call(Command::Info).await }

  pub async fn register(&self, id: &str) -> Result<AccountSnapshot> {
    self.call(Command::Register { id: id.to_owned() }).await
  }

  pub async fn login(&self, id: &str) -> Result<AccountSnapshot> {
    self.call(Command::Login { id: id.to_owned() }).await
  }

  pub async fn search(&self, id: &str) -> Result<AccountSummary> {
    self.call(Command::Search { id: id.to_owned() }).await
  }

  pub async fn update(&self, snapshot: AccountSnapshot) -> Result<()> {
    self.call(Command::Update(snapshot)).await
  }

  pub async fn subscribe(&self, follower: &str, target: &str) -> Result<bool> {
    self
      .call(Command::Subscribe {
        follower: follower.to_owned(),
        target:   target.to_owned(),
      })
      .await
  }

  pub async fn unsubscribe(&self, follower: &str, target: &str) -> Result<bool> {
    self
      .call(Command::Unsubscribe {
        follower: follower.to_owned(),
        target:   target.to_owned(),
      })
      .await
  }

  pub async fn publish(&self, id: &str, title: &str, description: &str) -> Result<Note> {
    self
      .call(Command::Publish {
        id:          id.to_owned(),
        title:       title.to_owned(),
        description: description.to_owned(),
      })
      .await
  }

  pub async fn journal(&self, id: &str) -> Result<Vec<Note>> {
    self.call(Command::Journal { id: id.to_owned() }).await
  }
}
