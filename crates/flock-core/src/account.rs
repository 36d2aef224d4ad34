//! Account — the aggregate root.
//!
//! An account owns its passport, education and profile. Each of them keeps a
//! [`Weak`] back-reference to the account for display-name lookups; the
//! account is never owned in return.
//!
//! Following another account registers forwarding handlers on the target's
//! channels. Each handler re-emits the target's note, unchanged, on one of
//! this account's [`Topic`] channels. The first handler on every topic
//! appends the note to this account's journal; anything registered later
//! (a server, a UI) runs after it.

use std::{
  collections::BTreeMap,
  fmt,
  sync::{Arc, Weak},
};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  channel::{Channel, SubscriptionId},
  education::Education,
  graph,
  passport::Passport,
  profile::Profile,
  snapshot::AccountSnapshot,
};

// ─── Topics ──────────────────────────────────────────────────────────────────

/// The account-level channels carrying notes forwarded from followed
/// accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
  /// Passport and education changes, plus "birthday today" notes.
  PropertyChanged,
  PhotoChanged,
  PhotoRemoved,
  GotFollower,
  GotFollowing,
  PublishedNews,
  NewsRemoved,
}

impl Topic {
  pub const ALL: [Topic; 7] = [
    Topic::PropertyChanged,
    Topic::PhotoChanged,
    Topic::PhotoRemoved,
    Topic::GotFollower,
    Topic::GotFollowing,
    Topic::PublishedNews,
    Topic::NewsRemoved,
  ];

  fn channel_name(self) -> &'static str {
    match self {
      Topic::PropertyChanged => "following.property_changed",
      Topic::PhotoChanged => "following.photo_changed",
      Topic::PhotoRemoved => "following.photo_removed",
      Topic::GotFollower => "following.got_follower",
      Topic::GotFollowing => "following.got_following",
      Topic::PublishedNews => "following.published_news",
      Topic::NewsRemoved => "following.news_removed",
    }
  }
}

struct Following {
  property_changed: Channel,
  photo_changed:    Channel,
  photo_removed:    Channel,
  got_follower:     Channel,
  got_following:    Channel,
  published_news:   Channel,
  news_removed:     Channel,
}

impl Following {
  fn new() -> Self {
    Self {
      property_changed: Channel::new(Topic::PropertyChanged.channel_name()),
      photo_changed:    Channel::new(Topic::PhotoChanged.channel_name()),
      photo_removed:    Channel::new(Topic::PhotoRemoved.channel_name()),
      got_follower:     Channel::new(Topic::GotFollower.channel_name()),
      got_following:    Channel::new(Topic::GotFollowing.channel_name()),
      published_news:   Channel::new(Topic::PublishedNews.channel_name()),
      news_removed:     Channel::new(Topic::NewsRemoved.channel_name()),
    }
  }

  fn get(&self, topic: Topic) -> &Channel {
    match topic {
      Topic::PropertyChanged => &self.property_changed,
      Topic::PhotoChanged => &self.photo_changed,
      Topic::PhotoRemoved => &self.photo_removed,
      Topic::GotFollower => &self.got_follower,
      Topic::GotFollowing => &self.got_following,
      Topic::PublishedNews => &self.published_news,
      Topic::NewsRemoved => &self.news_removed,
    }
  }
}

// ─── Account ─────────────────────────────────────────────────────────────────

pub(crate) struct AccountInner {
  id:            String,
  passport:      Passport,
  education:     Education,
  profile:       Profile,
  following:     Following,
  /// Forwarding tokens per followed account id, in the order of
  /// [`Account::sources`].
  subscriptions: Mutex<BTreeMap<String, Vec<SubscriptionId>>>,
}

/// A user of the network. Cloning yields another handle to the same account.
#[derive(Clone)]
pub struct Account {
  inner: Arc<AccountInner>,
}

impl Account {
  /// Create an account with default passport, education and profile.
  ///
  /// The id must contain something other than whitespace. Uniqueness is the
  /// [`Registry`](crate::Registry)'s concern.
  pub fn new(id: impl Into<String>) -> Result<Self> {
    let id = id.into();
    if id.trim().is_empty() {
      return Err(Error::InvalidId(id));
    }

    let inner = Arc::new_cyclic(|owner: &Weak<AccountInner>| AccountInner {
      id,
      passport: Passport::new(owner.clone()),
      education: Education::new(owner.clone()),
      profile: Profile::new(owner.clone()),
      following: Following::new(),
      subscriptions: Mutex::new(BTreeMap::new()),
    });

    let account = Self { inner };
    account.journal_forwarded_notes();
    Ok(account)
  }

  pub(crate) fn upgrade(owner: &Weak<AccountInner>) -> Option<Self> {
    owner.upgrade().map(|inner| Self { inner })
  }

  pub fn id(&self) -> &str { &self.inner.id }

  pub fn passport(&self) -> &Passport { &self.inner.passport }

  pub fn education(&self) -> &Education { &self.inner.education }

  pub fn profile(&self) -> &Profile { &self.inner.profile }

  /// The channel on which notes from followed accounts arrive for `topic`.
  pub fn following(&self, topic: Topic) -> &Channel { self.inner.following.get(topic) }

  /// Whether two handles refer to the same account.
  pub fn ptr_eq(&self, other: &Account) -> bool { Arc::ptr_eq(&self.inner, &other.inner) }

  /// Ids of accounts this one currently receives forwarded notes from.
  pub fn forwarding_from(&self) -> Vec<String> {
    self.inner.subscriptions.lock().keys().cloned().collect()
  }

  // ── Subscribe / unsubscribe ───────────────────────────────────────────────

  /// Follow `target` and start forwarding its notes.
  ///
  /// Returns `Ok(false)` if the follow edge already exists; no handlers are
  /// registered a second time. If the target's birthday is today, one
  /// "birthday today" note is delivered on [`Topic::PropertyChanged`] right
  /// after the wiring.
  pub fn subscribe(&self, target: &Account) -> Result<bool> {
    if !graph::bind(self, target)? {
      return Ok(false);
    }

    let weak = Arc::downgrade(&self.inner);
    let tokens: Vec<SubscriptionId> = target
      .sources()
      .into_iter()
      .map(|(topic, source)| {
        let weak = weak.clone();
        source.subscribe(move |sender, note| {
          if let Some(follower) = Account::upgrade(&weak) {
            follower.following(topic).emit(sender, note);
          }
        })
      })
      .collect();

    tracing::debug!(
      follower = self.id(),
      target = target.id(),
      handlers = tokens.len(),
      "subscribed"
    );
    self
      .inner
      .subscriptions
      .lock()
      .insert(target.id().to_owned(), tokens);

    if target.passport().is_birthday_today() {
      let note = target.passport().birthday_note(target);
      self.following(Topic::PropertyChanged).emit(target, &note);
    }

    Ok(true)
  }

  /// Stop following `target` and remove every forwarding handler that
  /// [`Account::subscribe`] registered for it.
  ///
  /// Returns whether a follow edge was removed.
  pub fn unsubscribe(&self, target: &Account) -> Result<bool> {
    if self.id() == target.id() {
      return Err(Error::SelfSubscription(self.id().to_owned()));
    }

    let removed = graph::untie(self, target);
    let tokens = self.inner.subscriptions.lock().remove(target.id());

    if let Some(tokens) = tokens {
      for ((_, source), token) in target.sources().into_iter().zip(tokens) {
        source.unsubscribe(token);
      }
      tracing::debug!(follower = self.id(), target = target.id(), "unsubscribed");
    }

    Ok(removed)
  }

  // ── Snapshot ──────────────────────────────────────────────────────────────

  /// A deep, self-contained copy of this account's state.
  pub fn snapshot(&self) -> AccountSnapshot {
    AccountSnapshot {
      id:        self.id().to_owned(),
      passport:  self.passport().snapshot(),
      education: self.education().snapshot(),
      profile:   self.profile().snapshot(),
    }
  }

  /// Overwrite the editable fields from `snapshot` through the regular
  /// setters, so every actual change is announced.
  ///
  /// The snapshot is validated in full first; on error nothing changes.
  /// Follow lists, journal and news in the snapshot are ignored.
  pub fn apply_snapshot(&self, snapshot: &AccountSnapshot) -> Result<()> {
    if snapshot.id != self.id() {
      return Err(Error::SnapshotMismatch {
        expected: self.id().to_owned(),
        found:    snapshot.id.clone(),
      });
    }
    Passport::validate(&snapshot.passport)?;
    Education::validate(&snapshot.education)?;

    self.passport().apply(&snapshot.passport)?;
    self.education().apply(&snapshot.education)?;
    self.profile().apply(&snapshot.profile);

    tracing::debug!(account = self.id(), "snapshot applied");
    Ok(())
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  /// The channels a follower listens on, paired with the topic each one
  /// feeds. The order is fixed; stored tokens rely on it.
  fn sources(&self) -> [(Topic, &Channel); 8] {
    let passport = self.passport();
    let education = self.education();
    let profile = self.profile();
    [
      (Topic::PropertyChanged, passport.property_changed()),
      (Topic::PropertyChanged, education.property_changed()),
      (Topic::PhotoChanged, profile.photo_changed()),
      (Topic::PhotoRemoved, profile.photo_removed()),
      (Topic::PublishedNews, profile.published_news()),
      (Topic::NewsRemoved, profile.news_removed()),
      (Topic::GotFollower, profile.got_follower()),
      (Topic::GotFollowing, profile.got_following()),
    ]
  }

  /// Register the journal writer as the first handler on every topic.
  fn journal_forwarded_notes(&self) {
    for topic in Topic::ALL {
      let weak = Arc::downgrade(&self.inner);
      self.following(topic).subscribe(move |_, note| {
        if let Some(me) = Account::upgrade(&weak) {
          me.profile().append_journal(note.clone());
        }
      });
    }
  }
}

impl fmt::Debug for Account {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Account").field("id", &self.inner.id).finish()
  }
}

impl fmt::Display for Account {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.inner.id) }
}
