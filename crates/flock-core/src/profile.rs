//! Profile — photo, follow lists, journal and news of an account.
//!
//! The follow lists are only changed by [`crate::graph`], which keeps both
//! sides of an edge in step. News is only changed through
//! [`Profile::add_news`] and [`Profile::remove_news`], so every change is
//! announced.

use std::sync::Weak;

use parking_lot::Mutex;

use crate::{
  account::{Account, AccountInner},
  channel::Channel,
  note::{Note, NoteData, Photo, titles},
  snapshot::ProfileSnapshot,
  tracked::Tracked,
};

pub struct Profile {
  owner:          Weak<AccountInner>,
  photo_changed:  Channel,
  photo_removed:  Channel,
  got_follower:   Channel,
  got_following:  Channel,
  published_news: Channel,
  news_removed:   Channel,
  photo:          Tracked<Option<Photo>>,
  /// Ids of accounts following this one.
  pub(crate) followers: Mutex<Vec<String>>,
  /// Ids of accounts this one follows.
  pub(crate) following: Mutex<Vec<String>>,
  journal:        Mutex<Vec<Note>>,
  news:           Mutex<Vec<Note>>,
}

impl Profile {
  pub(crate) fn new(owner: Weak<AccountInner>) -> Self {
    Self {
      owner,
      photo_changed: Channel::new("profile.photo_changed"),
      photo_removed: Channel::new("profile.photo_removed"),
      got_follower: Channel::new("profile.got_follower"),
      got_following: Channel::new("profile.got_following"),
      published_news: Channel::new("profile.published_news"),
      news_removed: Channel::new("profile.news_removed"),
      photo: Tracked::new(None),
      followers: Mutex::new(Vec::new()),
      following: Mutex::new(Vec::new()),
      journal: Mutex::new(Vec::new()),
      news: Mutex::new(Vec::new()),
    }
  }

  // ── Channels ──────────────────────────────────────────────────────────────

  pub fn photo_changed(&self) -> &Channel { &self.photo_changed }

  pub fn photo_removed(&self) -> &Channel { &self.photo_removed }

  /// Fires on this profile when another account starts following it.
  pub fn got_follower(&self) -> &Channel { &self.got_follower }

  /// Fires on this profile when its account starts following another.
  pub fn got_following(&self) -> &Channel { &self.got_following }

  pub fn published_news(&self) -> &Channel { &self.published_news }

  pub fn news_removed(&self) -> &Channel { &self.news_removed }

  // ── Photo ─────────────────────────────────────────────────────────────────

  /// The stored photo, or [`Photo::placeholder`] when none is set.
  pub fn photo(&self) -> Photo {
    self.photo.get().unwrap_or_else(Photo::placeholder)
  }

  /// The stored photo without placeholder substitution.
  pub fn stored_photo(&self) -> Option<Photo> { self.photo.get() }

  /// Set or clear the photo.
  ///
  /// `Some` emits one "photo changed" note carrying the new photo; `None`
  /// emits one "photo removed" note carrying the placeholder. Assigning the
  /// stored value again emits nothing.
  pub fn set_photo(&self, photo: Option<Photo>) {
    self.photo.set(photo, |new| match new {
      Some(photo) => self.notify(
        &self.photo_changed,
        titles::PHOTO_CHANGED,
        |who| format!("{who} changed their profile photo."),
        Some(NoteData::Photo(photo.clone())),
      ),
      None => self.notify(
        &self.photo_removed,
        titles::PHOTO_REMOVED,
        |who| format!("{who} removed their profile photo."),
        Some(NoteData::Photo(Photo::placeholder())),
      ),
    });
  }

  // ── Follow lists ──────────────────────────────────────────────────────────

  pub fn followers(&self) -> Vec<String> { self.followers.lock().clone() }

  pub fn following(&self) -> Vec<String> { self.following.lock().clone() }

  pub fn is_following(&self, id: &str) -> bool {
    self.following.lock().iter().any(|f| f == id)
  }

  pub fn is_followed_by(&self, id: &str) -> bool {
    self.followers.lock().iter().any(|f| f == id)
  }

  // ── Journal ───────────────────────────────────────────────────────────────

  /// Notes received from followed accounts, oldest first.
  pub fn journal(&self) -> Vec<Note> { self.journal.lock().clone() }

  pub fn journal_len(&self) -> usize { self.journal.lock().len() }

  pub(crate) fn append_journal(&self, note: Note) { self.journal.lock().push(note); }

  // ── News ──────────────────────────────────────────────────────────────────

  pub fn news(&self) -> Vec<Note> { self.news.lock().clone() }

  /// Append `note` to the news list and announce it.
  pub fn add_news(&self, note: Note) {
    self.news.lock().push(note.clone());
    self.notify(
      &self.published_news,
      titles::NEWS_PUBLISHED,
      |who| format!("{who} published a new post."),
      Some(NoteData::Note(Box::new(note))),
    );
  }

  /// Remove the first entry equal to `note` and announce the removal.
  ///
  /// Returns `false`, without emitting, when no entry matched.
  pub fn remove_news(&self, note: &Note) -> bool {
    let removed = {
      let mut news = self.news.lock();
      news
        .iter()
        .position(|n| n == note)
        .map(|index| news.remove(index))
    };

    let Some(removed) = removed else {
      tracing::debug!(title = note.title(), "remove_news: no matching entry");
      return false;
    };

    self.notify(
      &self.news_removed,
      titles::NEWS_REMOVED,
      |who| format!("{who} removed a post."),
      Some(NoteData::Note(Box::new(removed))),
    );
    true
  }

  // ── Snapshot ──────────────────────────────────────────────────────────────

  pub(crate) fn snapshot(&self) -> ProfileSnapshot {
    ProfileSnapshot {
      photo:     self.stored_photo(),
      followers: self.followers(),
      following: self.following(),
      journal:   self.journal(),
      news:      self.news(),
    }
  }

  pub(crate) fn apply(&self, snapshot: &ProfileSnapshot) {
    self.set_photo(snapshot.photo.clone());
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  fn notify(
    &self,
    channel: &Channel,
    title: &str,
    describe: impl FnOnce(&str) -> String,
    data: Option<NoteData>,
  ) {
    let Some(owner) = Account::upgrade(&self.owner) else {
      return;
    };
    let description = describe(&owner.passport().display_name());
    let mut note = Note::new(owner.id(), title, description);
    if let Some(data) = data {
      note = note.with_data(data);
    }
    channel.emit(&owner, &note);
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use parking_lot::Mutex;

  use super::*;

  fn record(channel: &Channel) -> Arc<Mutex<Vec<Note>>> {
    let notes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&notes);
    channel.subscribe(move |_, note| sink.lock().push(note.clone()));
    notes
  }

  #[test]
  fn photo_defaults_to_placeholder_without_storing_it() {
    let account = Account::new("a").unwrap();
    assert!(account.profile().photo().is_placeholder());
    assert!(account.profile().stored_photo().is_none());
  }

  #[test]
  fn setting_photo_emits_changed_only() {
    let account = Account::new("a").unwrap();
    let changed = record(account.profile().photo_changed());
    let removed = record(account.profile().photo_removed());
    let photo = Photo::new(vec![7u8; 16]);

    account.profile().set_photo(Some(photo.clone()));

    assert!(removed.lock().is_empty());
    let changed = changed.lock();
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].title(), titles::PHOTO_CHANGED);
    assert_eq!(changed[0].data(), Some(&NoteData::Photo(photo.clone())));
    assert_eq!(account.profile().photo(), photo);
  }

  #[test]
  fn clearing_photo_emits_removed_with_placeholder() {
    let account = Account::new("a").unwrap();
    account.profile().set_photo(Some(Photo::new(vec![1u8, 2])));
    let changed = record(account.profile().photo_changed());
    let removed = record(account.profile().photo_removed());

    account.profile().set_photo(None);

    assert!(changed.lock().is_empty());
    let removed = removed.lock();
    assert_eq!(removed.len(), 1);
    assert_eq!(
      removed[0].data(),
      Some(&NoteData::Photo(Photo::placeholder()))
    );
    assert!(account.profile().stored_photo().is_none());
  }

  #[test]
  fn same_photo_twice_is_silent() {
    let account = Account::new("a").unwrap();
    let photo = Photo::new(vec![3u8; 3]);
    account.profile().set_photo(Some(photo.clone()));
    let changed = record(account.profile().photo_changed());
    let removed = record(account.profile().photo_removed());

    account.profile().set_photo(Some(photo));
    account.profile().set_photo(None);
    account.profile().set_photo(None);

    assert!(changed.lock().is_empty());
    assert_eq!(removed.lock().len(), 1);
  }

  #[test]
  fn news_lifecycle_fires_published_then_removed() {
    let account = Account::new("a").unwrap();
    let order = Arc::new(Mutex::new(Vec::new()));
    for channel in [
      account.profile().published_news(),
      account.profile().news_removed(),
    ] {
      let order = Arc::clone(&order);
      channel.subscribe(move |_, note| order.lock().push(note.clone()));
    }

    let post = Note::new("a", "Thought", "Have some more of these soft rolls.");
    account.profile().add_news(post.clone());
    assert_eq!(account.profile().news(), vec![post.clone()]);
    assert!(account.profile().remove_news(&post));

    assert!(account.profile().news().is_empty());
    let order = order.lock();
    assert_eq!(order.len(), 2);
    assert_eq!(order[0].title(), titles::NEWS_PUBLISHED);
    assert_eq!(order[0].related_note(), Some(&post));
    assert_eq!(order[1].title(), titles::NEWS_REMOVED);
    assert_eq!(order[1].related_note(), Some(&post));
  }

  #[test]
  fn removing_absent_news_is_silent() {
    let account = Account::new("a").unwrap();
    let removed = record(account.profile().news_removed());

    let stranger = Note::new("a", "Never posted", "");
    assert!(!account.profile().remove_news(&stranger));
    assert!(removed.lock().is_empty());
  }

  #[test]
  fn remove_news_takes_only_first_equal_entry() {
    let account = Account::new("a").unwrap();
    let post = Note::new("a", "Twice", "same");
    account.profile().add_news(post.clone());
    account.profile().add_news(post.clone());

    assert!(account.profile().remove_news(&post));
    assert_eq!(account.profile().news().len(), 1);
  }
}
