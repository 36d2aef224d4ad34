//! `flock` — command-line client for a flock server.
//!
//! # Usage
//!
//! ```
//! flock --url http://localhost:7070 register alice
//! flock subscribe alice bob
//! flock set bob --name Bob --birthday 1990-04-01
//! flock journal alice
//! flock demo
//! ```

mod client;
mod demo;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use flock_core::{
  Photo,
  passport::{Gender, MaritalStatus},
  snapshot::AccountSnapshot,
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:7070";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "flock", about = "Client for the flock account server")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the flock server (default: http://localhost:7070).
  #[arg(long, env = "FLOCK_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
  /// Show server status.
  Info,
  /// Create an account.
  Register { id: String },
  /// Print an account's full state as JSON.
  Login { id: String },
  /// Look up an account's display name.
  Search { id: String },
  /// Start following `target`.
  Subscribe { follower: String, target: String },
  /// Stop following `target`.
  Unsubscribe { follower: String, target: String },
  /// Publish a news entry.
  Publish {
    id:          String,
    title:       String,
    description: String,
  },
  /// Print every notification an account has received.
  Journal { id: String },
  /// Edit an account's details.
  Set {
    id:   String,
    #[command(flatten)]
    edit: Edit,
  },
  /// Run a self-contained walkthrough without a server.
  Demo,
}

#[derive(clap::Args, Debug, Default)]
struct Edit {
  #[arg(long)]
  name:           Option<String>,
  #[arg(long)]
  middlename:     Option<String>,
  #[arg(long)]
  lastname:       Option<String>,
  /// Birthday as YYYY-MM-DD.
  #[arg(long, conflicts_with = "clear_birthday")]
  birthday:       Option<NaiveDate>,
  #[arg(long)]
  clear_birthday: bool,
  /// female | male
  #[arg(long)]
  gender:         Option<Gender>,
  /// actively-looking | in-love | its-complicated | married | meeting
  #[arg(long)]
  status:         Option<MaritalStatus>,
  #[arg(long)]
  school:         Option<String>,
  #[arg(long)]
  university:     Option<String>,
  /// Image file to use as the profile photo.
  #[arg(long, value_name = "FILE", conflicts_with = "remove_photo")]
  photo:          Option<PathBuf>,
  #[arg(long)]
  remove_photo:   bool,
}

impl Edit {
  fn apply(self, snapshot: &mut AccountSnapshot) -> Result<()> {
    let passport = &mut snapshot.passport;
    if let Some(name) = self.name {
      passport.name = name;
    }
    if let Some(middlename) = self.middlename {
      passport.middlename = middlename;
    }
    if let Some(lastname) = self.lastname {
      passport.lastname = lastname;
    }
    if self.clear_birthday {
      passport.birthday = None;
    } else if let Some(birthday) = self.birthday {
      passport.birthday = Some(birthday);
    }
    if let Some(gender) = self.gender {
      passport.gender = gender;
    }
    if let Some(status) = self.status {
      passport.status = status;
    }
    if let Some(school) = self.school {
      snapshot.education.school = school;
    }
    if let Some(university) = self.university {
      snapshot.education.university = university;
    }
    if self.remove_photo {
      snapshot.profile.photo = None;
    } else if let Some(path) = self.photo {
      let bytes = std::fs::read(&path)
        .with_context(|| format!("reading photo {}", path.display()))?;
      snapshot.profile.photo = Some(Photo::new(bytes));
    }
    Ok(())
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

/// CLI flag, then config file, then the default.
fn resolve_url(flag: Option<String>, file: &ConfigFile) -> String {
  flag
    .or_else(|| (!file.url.is_empty()).then(|| file.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let client = ApiClient::new(ApiConfig {
    base_url: resolve_url(args.url, &file_cfg),
  })?;

  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Cmd) -> Result<()> {
  match command {
    Cmd::Info => {
      let info = client.info().await?;
      println!("{} accounts on {}:{}", info.accounts, info.host, info.port);
    }
    Cmd::Register { id } => {
      let snapshot = client.register(&id).await?;
      println!("registered {}", snapshot.id);
    }
    Cmd::Login { id } => {
      let snapshot = client.login(&id).await?;
      println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Cmd::Search { id } => {
      let summary = client.search(&id).await?;
      println!("{}: {}", summary.id, summary.display_name);
    }
    Cmd::Subscribe { follower, target } => {
      client.subscribe(&follower, &target).await?;
      println!("{follower} now follows {target}");
    }
    Cmd::Unsubscribe { follower, target } => {
      if client.unsubscribe(&follower, &target).await? {
        println!("{follower} no longer follows {target}");
      } else {
        println!("{follower} was not following {target}");
      }
    }
    Cmd::Publish {
      id,
      title,
      description,
    } => {
      let note = client.publish(&id, &title, &description).await?;
      println!("published \"{}\" at {}", note.title(), note.time());
    }
    Cmd::Journal { id } => {
      let journal = client.journal(&id).await?;
      if journal.is_empty() {
        println!("(empty)");
      }
      for note in &journal {
        println!("{}", demo::render(&id, note));
      }
    }
    Cmd::Set { id, edit } => {
      let mut snapshot = client.login(&id).await?;
      edit.apply(&mut snapshot)?;
      client.update(snapshot).await?;
      println!("updated {id}");
    }
    Cmd::Demo => demo::run(&mut std::io::stdout().lock())?,
  }
  Ok(())
}
