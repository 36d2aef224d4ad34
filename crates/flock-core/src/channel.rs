//! Observer registries.
//!
//! A [`Channel`] maps subscription tokens to handlers. `emit` calls every
//! handler synchronously, in registration order, before it returns. Removal
//! is by token, never by comparing closures.

use std::{
  fmt,
  sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
  },
};

use parking_lot::Mutex;

use crate::{account::Account, note::Note};

/// Handlers receive the account that emitted the note and the note itself.
pub type Handler = Arc<dyn Fn(&Account, &Note) + Send + Sync>;

/// Process-wide counter so a token is never valid on two channels.
static NEXT_SUBSCRIPTION: AtomicU64 = AtomicU64::new(1);

/// Token returned by [`Channel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
  fn next() -> Self { Self(NEXT_SUBSCRIPTION.fetch_add(1, Ordering::Relaxed)) }
}

impl fmt::Display for SubscriptionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "sub-{}", self.0)
  }
}

/// A named, ordered list of handlers.
pub struct Channel {
  name:     &'static str,
  handlers: Mutex<Vec<(SubscriptionId, Handler)>>,
}

impl Channel {
  pub fn new(name: &'static str) -> Self {
    Self {
      name,
      handlers: Mutex::new(Vec::new()),
    }
  }

  pub fn name(&self) -> &'static str { self.name }

  /// Register `handler` and return the token that removes it.
  pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
  where
    F: Fn(&Account, &Note) + Send + Sync + 'static,
  {
    let id = SubscriptionId::next();
    self.handlers.lock().push((id, Arc::new(handler)));
    id
  }

  /// Remove the handler registered under `id`. Returns `false` if the token
  /// is unknown to this channel.
  pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
    let mut handlers = self.handlers.lock();
    match handlers.iter().position(|(token, _)| *token == id) {
      Some(index) => {
        handlers.remove(index);
        true
      }
      None => false,
    }
  }

  pub fn contains(&self, id: SubscriptionId) -> bool {
    self.handlers.lock().iter().any(|(token, _)| *token == id)
  }

  pub fn len(&self) -> usize { self.handlers.lock().len() }

  pub fn is_empty(&self) -> bool { self.handlers.lock().is_empty() }

  /// Deliver `note` to every handler registered at the time of the call.
  ///
  /// The handler list is copied out before dispatch, so a handler may
  /// subscribe, unsubscribe or emit again without deadlocking. Changes it
  /// makes take effect from the next emit.
  pub fn emit(&self, sender: &Account, note: &Note) {
    let handlers: Vec<Handler> = self
      .handlers
      .lock()
      .iter()
      .map(|(_, handler)| Arc::clone(handler))
      .collect();

    tracing::debug!(
      channel = self.name,
      sender = sender.id(),
      title = note.title(),
      handlers = handlers.len(),
      "emit"
    );

    for handler in handlers {
      handler(sender, note);
    }
  }
}

impl fmt::Debug for Channel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Channel")
      .field("name", &self.name)
      .field("handlers", &self.len())
      .finish()
  }
}
