//! The account registry.
//!
//! Ids are unique within a registry. The registry has no interior locking:
//! a shared registry belongs behind one lock, which gives every operation
//! exclusive access to the accounts it touches.

use std::{collections::BTreeMap, fmt};

use crate::{Error, Result, account::Account};

/// Called with every newly registered account.
pub type RegisterHook = Box<dyn Fn(&Account) + Send + Sync>;

#[derive(Default)]
pub struct Registry {
  accounts: BTreeMap<String, Account>,
  hooks:    Vec<RegisterHook>,
}

impl Registry {
  pub fn new() -> Self { Self::default() }

  /// Run `hook` for each account registered from now on.
  pub fn on_register<F>(&mut self, hook: F)
  where
    F: Fn(&Account) + Send + Sync + 'static,
  {
    self.hooks.push(Box::new(hook));
  }

  /// Create and store an account under `id`.
  ///
  /// Fails with [`Error::InvalidId`] for a blank id and
  /// [`Error::DuplicateId`] if the id is taken.
  pub fn register(&mut self, id: &str) -> Result<Account> {
    if self.accounts.contains_key(id) {
      return Err(Error::DuplicateId(id.to_owned()));
    }
    let account = Account::new(id)?;
    for hook in &self.hooks {
      hook(&account);
    }
    self.accounts.insert(id.to_owned(), account.clone());
    tracing::info!(account = id, total = self.accounts.len(), "registered");
    Ok(account)
  }

  pub fn get(&self, id: &str) -> Option<&Account> { self.accounts.get(id) }

  /// Like [`Registry::get`], but an unknown id is an error.
  pub fn require(&self, id: &str) -> Result<&Account> {
    self
      .accounts
      .get(id)
      .ok_or_else(|| Error::AccountNotFound(id.to_owned()))
  }

  pub fn len(&self) -> usize { self.accounts.len() }

  pub fn is_empty(&self) -> bool { self.accounts.is_empty() }

  /// Registered ids in ascending order.
  pub fn ids(&self) -> impl Iterator<Item = &str> { self.accounts.keys().map(String::as_str) }

  /// `follower_id` starts following `target_id`. See [`Account::subscribe`].
  pub fn subscribe(&self, follower_id: &str, target_id: &str) -> Result<bool> {
    let follower = self.require(follower_id)?;
    let target = self.require(target_id)?;
    follower.subscribe(target)
  }

  /// `follower_id` stops following `target_id`. See [`Account::unsubscribe`].
  pub fn unsubscribe(&self, follower_id: &str, target_id: &str) -> Result<bool> {
    let follower = self.require(follower_id)?;
    let target = self.require(target_id)?;
    follower.unsubscribe(target)
  }
}

impl fmt::Debug for Registry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Registry")
      .field("accounts", &self.accounts.keys().collect::<Vec<_>>())
      .field("hooks", &self.hooks.len())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  };

  use super::*;

  #[test]
  fn register_and_lookup() {
    let mut registry = Registry::new();
    let alice = registry.register("alice").unwrap();
    assert_eq!(registry.len(), 1);
    assert!(registry.get("alice").unwrap().ptr_eq(&alice));
    assert!(registry.get("bob").is_none());
  }

  #[test]
  fn duplicate_id_is_rejected() {
    let mut registry = Registry::new();
    registry.register("alice").unwrap();
    assert!(matches!(
      registry.register("alice"),
      Err(Error::DuplicateId(id)) if id == "alice"
    ));
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn blank_id_is_rejected() {
    let mut registry = Registry::new();
    assert!(matches!(registry.register(" "), Err(Error::InvalidId(_))));
    assert!(registry.is_empty());
  }

  #[test]
  fn unknown_ids_fail_subscription() {
    let mut registry = Registry::new();
    registry.register("alice").unwrap();
    assert!(matches!(
      registry.subscribe("alice", "ghost"),
      Err(Error::AccountNotFound(id)) if id == "ghost"
    ));
    assert!(matches!(
      registry.unsubscribe("ghost", "alice"),
      Err(Error::AccountNotFound(_))
    ));
  }

  #[test]
  fn hooks_run_for_each_registration() {
    let mut registry = Registry::new();
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    registry.on_register(move |_| {
      seen.fetch_add(1, Ordering::SeqCst);
    });

    registry.register("a").unwrap();
    registry.register("b").unwrap();
    let _ = registry.register("a");

    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["a", "b"]);
  }

  #[test]
  fn subscribe_by_id_links_accounts() {
    let mut registry = Registry::new();
    registry.register("a").unwrap();
    registry.register("b").unwrap();

    assert!(registry.subscribe("a", "b").unwrap());
    assert!(!registry.subscribe("a", "b").unwrap());
    assert!(registry.require("b").unwrap().profile().is_followed_by("a"));

    assert!(registry.unsubscribe("a", "b").unwrap());
    assert!(!registry.unsubscribe("a", "b").unwrap());
  }
}
