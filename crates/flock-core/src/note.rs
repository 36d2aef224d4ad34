//! Notes — the immutable payload carried by every event.
//!
//! A note is built once by the entity that changed and never mutated
//! afterwards. A later change produces a new note; nothing edits an old one.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ─── Titles ──────────────────────────────────────────────────────────────────

/// Titles of the notes emitted by the core. Listeners match on these.
pub mod titles {
  pub const NAME_CHANGED: &str = "Name changed";
  pub const MIDDLENAME_CHANGED: &str = "Family name changed";
  pub const LASTNAME_CHANGED: &str = "Patronymic changed";
  pub const BIRTHDAY_CHANGED: &str = "Birthday changed";
  pub const BIRTHDAY_TODAY: &str = "Birthday today";
  pub const GENDER_CHANGED: &str = "Gender changed";
  pub const STATUS_CHANGED: &str = "Relationship status changed";
  pub const SCHOOL_CHANGED: &str = "School changed";
  pub const UNIVERSITY_CHANGED: &str = "University changed";
  pub const PHOTO_CHANGED: &str = "Photo changed";
  pub const PHOTO_REMOVED: &str = "Photo removed";
  pub const NEWS_PUBLISHED: &str = "News published";
  pub const NEWS_REMOVED: &str = "News removed";
  pub const NEW_FOLLOWER: &str = "New follower";
  pub const NEW_FOLLOWING: &str = "New following";
}

// ─── Photo ───────────────────────────────────────────────────────────────────

/// A 1×1 transparent PNG shown when an account has no photo.
const PLACEHOLDER_PNG: &[u8] = &[
  0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49,
  0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06,
  0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44,
  0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d,
  0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42,
  0x60, 0x82,
];

/// An opaque profile image. Cloning is cheap; the bytes are shared.
///
/// Serialised as a base64 string.
#[derive(Clone, PartialEq, Eq)]
pub struct Photo(Bytes);

impl Photo {
  pub fn new(bytes: impl Into<Bytes>) -> Self { Self(bytes.into()) }

  /// The image substituted for an unset profile photo.
  pub fn placeholder() -> Self { Self(Bytes::from_static(PLACEHOLDER_PNG)) }

  pub fn is_placeholder(&self) -> bool { self.0.as_ref() == PLACEHOLDER_PNG }

  pub fn as_bytes(&self) -> &[u8] { &self.0 }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl fmt::Debug for Photo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Photo({} bytes)", self.0.len())
  }
}

impl Serialize for Photo {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&B64.encode(&self.0))
  }
}

impl<'de> Deserialize<'de> for Photo {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    B64
      .decode(encoded)
      .map(|raw| Self(Bytes::from(raw)))
      .map_err(serde::de::Error::custom)
  }
}

// ─── Note ────────────────────────────────────────────────────────────────────

/// Auxiliary payload attached to a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum NoteData {
  /// The photo that was set, or the placeholder after a removal.
  Photo(Photo),
  /// A news entry that was published or removed.
  Note(Box<Note>),
  /// The other side of a follow edge.
  Account(String),
}

/// An immutable notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  owner_id:    String,
  title:       String,
  description: String,
  time:        DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  data:        Option<NoteData>,
}

impl Note {
  /// Build a note stamped with the current time and no auxiliary data.
  pub fn new(
    owner_id: impl Into<String>,
    title: impl Into<String>,
    description: impl Into<String>,
  ) -> Self {
    Self {
      owner_id:    owner_id.into(),
      title:       title.into(),
      description: description.into(),
      time:        Utc::now(),
      data:        None,
    }
  }

  pub fn with_data(mut self, data: NoteData) -> Self {
    self.data = Some(data);
    self
  }

  pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
    self.time = time;
    self
  }

  pub fn owner_id(&self) -> &str { &self.owner_id }

  pub fn title(&self) -> &str { &self.title }

  pub fn description(&self) -> &str { &self.description }

  pub fn time(&self) -> DateTime<Utc> { self.time }

  pub fn data(&self) -> Option<&NoteData> { self.data.as_ref() }

  /// The wrapped note, for "published" and "removed" news events.
  pub fn related_note(&self) -> Option<&Note> {
    match &self.data {
      Some(NoteData::Note(note)) => Some(note),
      _ => None,
    }
  }
}

// ─── Feedable ────────────────────────────────────────────────────────────────

/// The read-only view a feed or journal renders.
pub trait Feedable {
  fn owner_id(&self) -> &str;
  fn title(&self) -> &str;
  fn description(&self) -> &str;
  fn time(&self) -> DateTime<Utc>;
}

impl Feedable for Note {
  fn owner_id(&self) -> &str { &self.owner_id }

  fn title(&self) -> &str { &self.title }

  fn description(&self) -> &str { &self.description }

  fn time(&self) -> DateTime<Utc> { self.time }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn photo_serializes_as_base64() {
    let photo = Photo::new(vec![1u8, 2, 3]);
    let json = serde_json::to_string(&photo).unwrap();
    assert_eq!(json, "\"AQID\"");
    let back: Photo = serde_json::from_str(&json).unwrap();
    assert_eq!(back, photo);
  }

  #[test]
  fn photo_rejects_invalid_base64() {
    let result: Result<Photo, _> = serde_json::from_str("\"not base64!\"");
    assert!(result.is_err());
  }

  #[test]
  fn placeholder_is_recognised() {
    assert!(Photo::placeholder().is_placeholder());
    assert!(!Photo::new(vec![0u8; 4]).is_placeholder());
  }

  #[test]
  fn related_note_unwraps_note_data() {
    let inner = Note::new("a", "Hello", "world");
    let outer = Note::new("a", titles::NEWS_PUBLISHED, "published")
      .with_data(NoteData::Note(Box::new(inner.clone())));
    assert_eq!(outer.related_note(), Some(&inner));

    let plain = Note::new("a", "t", "d");
    assert!(plain.related_note().is_none());
  }

  #[test]
  fn note_json_omits_absent_data() {
    let note = Note::new("a", "t", "d");
    let value = serde_json::to_value(&note).unwrap();
    assert!(value.get("data").is_none());
    assert_eq!(value["owner_id"], "a");
  }
}
