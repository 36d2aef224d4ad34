//! Snapshots — detached, serialisable copies of an account.
//!
//! A snapshot is what crosses the wire: the server hands one out on login
//! and accepts one on update. Nothing in it refers back to live accounts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  note::{Note, Photo},
  passport::{Gender, MaritalStatus},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
  pub id:        String,
  pub passport:  PassportSnapshot,
  pub education: EducationSnapshot,
  pub profile:   ProfileSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassportSnapshot {
  pub name:       String,
  pub middlename: String,
  pub lastname:   String,
  pub birthday:   Option<NaiveDate>,
  pub gender:     Gender,
  pub status:     MaritalStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationSnapshot {
  pub school:     String,
  pub university: String,
}

/// Profile state. Only `photo` is applied back to an account; the lists are
/// carried for display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileSnapshot {
  #[serde(default)]
  pub photo:     Option<Photo>,
  #[serde(default)]
  pub followers: Vec<String>,
  #[serde(default)]
  pub following: Vec<String>,
  #[serde(default)]
  pub journal:   Vec<Note>,
  #[serde(default)]
  pub news:      Vec<Note>,
}

impl AccountSnapshot {
  pub fn display_name(&self) -> String {
    format!("{} {}", self.passport.middlename, self.passport.name)
  }
}
