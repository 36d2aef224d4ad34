//! The change-tracked value shared by passport, education and profile fields.

use parking_lot::Mutex;

use crate::{Error, Result};

/// A value whose setter announces a change before committing it.
///
/// The lock is released while the announcement runs, so a listener that
/// re-reads the field during dispatch sees the previous value.
pub(crate) struct Tracked<T> {
  value: Mutex<T>,
}

impl<T: Clone + PartialEq> Tracked<T> {
  pub(crate) fn new(value: T) -> Self {
    Self {
      value: Mutex::new(value),
    }
  }

  pub(crate) fn get(&self) -> T { self.value.lock().clone() }

  pub(crate) fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R { f(&self.value.lock()) }

  /// Store `value` unless it equals the current one. `announce` runs between
  /// the comparison and the commit. Returns whether anything changed.
  pub(crate) fn set(&self, value: T, announce: impl FnOnce(&T)) -> bool {
    if *self.value.lock() == value {
      return false;
    }
    announce(&value);
    *self.value.lock() = value;
    true
  }
}

/// Name-like fields must contain something other than whitespace.
pub(crate) fn validate_name(field: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::Validation { field });
  }
  Ok(())
}
