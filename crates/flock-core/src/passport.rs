//! Personal data of an account.
//!
//! `middlename` holds the family name and `lastname` the patronymic; the
//! display name is `"{middlename} {name}"`.

use std::sync::Weak;

use chrono::{Datelike as _, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
  Result,
  account::{Account, AccountInner},
  channel::Channel,
  note::{Note, titles},
  snapshot::PassportSnapshot,
  tracked::{Tracked, validate_name},
};

/// Value of every name field until it is first set.
pub const DEFAULT_NAME: &str = "Null";

// ─── Enums ───────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Gender {
  #[default]
  Female,
  Male,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum MaritalStatus {
  #[default]
  #[strum(serialize = "actively-looking", to_string = "actively looking")]
  ActivelyLooking,
  #[strum(serialize = "in-love", to_string = "in love")]
  InLove,
  #[strum(serialize = "its-complicated", to_string = "it's complicated")]
  ItsComplicated,
  #[strum(serialize = "married", to_string = "married")]
  Married,
  #[strum(serialize = "meeting", to_string = "meeting someone")]
  Meeting,
}

// ─── Passport ────────────────────────────────────────────────────────────────

pub struct Passport {
  owner:      Weak<AccountInner>,
  changed:    Channel,
  name:       Tracked<String>,
  middlename: Tracked<String>,
  lastname:   Tracked<String>,
  birthday:   Tracked<Option<NaiveDate>>,
  gender:     Tracked<Gender>,
  status:     Tracked<MaritalStatus>,
}

impl Passport {
  pub(crate) fn new(owner: Weak<AccountInner>) -> Self {
    Self {
      owner,
      changed: Channel::new("passport.property_changed"),
      name: Tracked::new(DEFAULT_NAME.to_owned()),
      middlename: Tracked::new(DEFAULT_NAME.to_owned()),
      lastname: Tracked::new(DEFAULT_NAME.to_owned()),
      birthday: Tracked::new(None),
      gender: Tracked::new(Gender::default()),
      status: Tracked::new(MaritalStatus::default()),
    }
  }

  /// Fires for every passport field change, and once more when a birthday
  /// set to today's date is committed.
  pub fn property_changed(&self) -> &Channel { &self.changed }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub fn name(&self) -> String { self.name.get() }

  pub fn middlename(&self) -> String { self.middlename.get() }

  pub fn lastname(&self) -> String { self.lastname.get() }

  pub fn birthday(&self) -> Option<NaiveDate> { self.birthday.get() }

  pub fn gender(&self) -> Gender { self.gender.get() }

  pub fn status(&self) -> MaritalStatus { self.status.get() }

  pub fn display_name(&self) -> String {
    let middlename = self.middlename.get();
    self.name.with(|name| format!("{middlename} {name}"))
  }

  /// Whether the birthday falls on today's month and day, in local time.
  pub fn is_birthday_today(&self) -> bool {
    self
      .birthday
      .get()
      .is_some_and(|date| same_day_of_year(date, Local::now().date_naive()))
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  pub fn set_name(&self, value: impl Into<String>) -> Result<()> {
    let value = value.into();
    validate_name("name", &value)?;
    self.name.set(value, |new| {
      self.notify(
        titles::NAME_CHANGED,
        format!("{} changed their name to {new}.", self.display_name()),
      );
    });
    Ok(())
  }

  pub fn set_middlename(&self, value: impl Into<String>) -> Result<()> {
    let value = value.into();
    validate_name("middlename", &value)?;
    self.middlename.set(value, |new| {
      self.notify(
        titles::MIDDLENAME_CHANGED,
        format!("{} changed their family name to {new}.", self.display_name()),
      );
    });
    Ok(())
  }

  pub fn set_lastname(&self, value: impl Into<String>) -> Result<()> {
    let value = value.into();
    validate_name("lastname", &value)?;
    self.lastname.set(value, |new| {
      self.notify(
        titles::LASTNAME_CHANGED,
        format!("{} changed their patronymic to {new}.", self.display_name()),
      );
    });
    Ok(())
  }

  pub fn set_birthday(&self, value: Option<NaiveDate>) {
    let changed = self.birthday.set(value, |new| {
      let description = match new {
        Some(date) => format!(
          "{} changed their birthday to {}.",
          self.display_name(),
          date.format("%d.%m.%Y")
        ),
        None => format!("{} removed their birthday.", self.display_name()),
      };
      self.notify(titles::BIRTHDAY_CHANGED, description);
    });

    if changed
      && self.is_birthday_today()
      && let Some(owner) = self.owner()
    {
      self.changed.emit(&owner, &self.birthday_note(&owner));
    }
  }

  pub fn set_gender(&self, value: Gender) {
    self.gender.set(value, |new| {
      self.notify(
        titles::GENDER_CHANGED,
        format!("{} changed their gender to {new}.", self.display_name()),
      );
    });
  }

  pub fn set_status(&self, value: MaritalStatus) {
    self.status.set(value, |new| {
      self.notify(
        titles::STATUS_CHANGED,
        format!(
          "{} changed their relationship status to {new}.",
          self.display_name()
        ),
      );
    });
  }

  // ── Snapshot ──────────────────────────────────────────────────────────────

  pub(crate) fn snapshot(&self) -> PassportSnapshot {
    PassportSnapshot {
      name:       self.name(),
      middlename: self.middlename(),
      lastname:   self.lastname(),
      birthday:   self.birthday(),
      gender:     self.gender(),
      status:     self.status(),
    }
  }

  /// Reject a snapshot that would fail any setter, before anything changes.
  pub(crate) fn validate(snapshot: &PassportSnapshot) -> Result<()> {
    validate_name("name", &snapshot.name)?;
    validate_name("middlename", &snapshot.middlename)?;
    validate_name("lastname", &snapshot.lastname)
  }

  pub(crate) fn apply(&self, snapshot: &PassportSnapshot) -> Result<()> {
    self.set_name(snapshot.name.as_str())?;
    self.set_middlename(snapshot.middlename.as_str())?;
    self.set_lastname(snapshot.lastname.as_str())?;
    self.set_birthday(snapshot.birthday);
    self.set_gender(snapshot.gender);
    self.set_status(snapshot.status);
    Ok(())
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  /// The "birthday today" note, built for `owner`.
  pub(crate) fn birthday_note(&self, owner: &Account) -> Note {
    Note::new(
      owner.id(),
      titles::BIRTHDAY_TODAY,
      format!("Today is {}'s birthday.", self.display_name()),
    )
  }

  fn owner(&self) -> Option<Account> { Account::upgrade(&self.owner) }

  fn notify(&self, title: &str, description: String) {
    if let Some(owner) = self.owner() {
      let note = Note::new(owner.id(), title, description);
      self.changed.emit(&owner, &note);
    }
  }
}

/// Birthdays repeat on month and day; the year is irrelevant. A 29 February
/// birthday only matches in leap years.
pub fn same_day_of_year(date: NaiveDate, today: NaiveDate) -> bool {
  date.month() == today.month() && date.day() == today.day()
}
