//! Schooling of an account.

use std::sync::Weak;

use crate::{
  Result,
  account::{Account, AccountInner},
  channel::Channel,
  note::{Note, titles},
  snapshot::EducationSnapshot,
  tracked::{Tracked, validate_name},
};

/// Value of `school` and `university` until they are first set.
pub const DEFAULT_NAME: &str = "Null";

pub struct Education {
  owner:      Weak<AccountInner>,
  changed:    Channel,
  school:     Tracked<String>,
  university: Tracked<String>,
}

impl Education {
  pub(crate) fn new(owner: Weak<AccountInner>) -> Self {
    Self {
      owner,
      changed: Channel::new("education.property_changed"),
      school: Tracked::new(DEFAULT_NAME.to_owned()),
      university: Tracked::new(DEFAULT_NAME.to_owned()),
    }
  }

  pub fn property_changed(&self) -> &Channel { &self.changed }

  pub fn school(&self) -> String { self.school.get() }

  pub fn university(&self) -> String { self.university.get() }

  pub fn set_school(&self, value: impl Into<String>) -> Result<()> {
    let value = value.into();
    validate_name("school", &value)?;
    self.school.set(value, |new| {
      self.notify(titles::SCHOOL_CHANGED, |who| {
        format!("{who} changed their school to {new}.")
      });
    });
    Ok(())
  }

  pub fn set_university(&self, value: impl Into<String>) -> Result<()> {
    let value = value.into();
    validate_name("university", &value)?;
    self.university.set(value, |new| {
      self.notify(titles::UNIVERSITY_CHANGED, |who| {
        format!("{who} changed their university to {new}.")
      });
    });
    Ok(())
  }

  pub(crate) fn snapshot(&self) -> EducationSnapshot {
    EducationSnapshot {
      school:     self.school(),
      university: self.university(),
    }
  }

  pub(crate) fn validate(snapshot: &EducationSnapshot) -> Result<()> {
    validate_name("school", &snapshot.school)?;
    validate_name("university", &snapshot.university)
  }

  pub(crate) fn apply(&self, snapshot: &EducationSnapshot) -> Result<()> {
    self.set_school(snapshot.school.as_str())?;
    self.set_university(snapshot.university.as_str())
  }

  /// Emit a note whose description is built from the owner's display name.
  fn notify(&self, title: &str, describe: impl FnOnce(&str) -> String) {
    if let Some(owner) = Account::upgrade(&self.owner) {
      let description = describe(&owner.passport().display_name());
      self.changed.emit(&owner, &Note::new(owner.id(), title, description));
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use parking_lot::Mutex;

  use super::*;
  use crate::Error;

  fn record(account: &Account) -> Arc<Mutex<Vec<Note>>> {
    let notes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&notes);
    account
      .education()
      .property_changed()
      .subscribe(move |_, note| sink.lock().push(note.clone()));
    notes
  }

  #[test]
  fn changes_are_described_with_owner_display_name() {
    let account = Account::new("a").unwrap();
    account.passport().set_name("Ann").unwrap();
    account.passport().set_middlename("Smith").unwrap();
    let notes = record(&account);

    account.education().set_university("HSE Perm").unwrap();
    account.education().set_school("Lyceum 1").unwrap();

    let notes = notes.lock();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].title(), titles::UNIVERSITY_CHANGED);
    assert_eq!(
      notes[0].description(),
      "Smith Ann changed their university to HSE Perm."
    );
    assert_eq!(notes[1].title(), titles::SCHOOL_CHANGED);
    assert_eq!(account.education().school(), "Lyceum 1");
  }

  #[test]
  fn unchanged_values_are_silent() {
    let account = Account::new("a").unwrap();
    let notes = record(&account);

    account.education().set_school(DEFAULT_NAME).unwrap();
    account.education().set_university(DEFAULT_NAME).unwrap();

    assert!(notes.lock().is_empty());
  }

  #[test]
  fn blank_values_are_rejected() {
    let account = Account::new("a").unwrap();
    let notes = record(&account);

    assert!(matches!(
      account.education().set_school(" "),
      Err(Error::Validation { field: "school" })
    ));
    assert!(account.education().set_university("").is_err());
    assert_eq!(account.education().school(), DEFAULT_NAME);
    assert!(notes.lock().is_empty());
  }
}
