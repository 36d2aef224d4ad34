//! The follow graph.
//!
//! An edge `follower → following` is stored twice: in the follower's
//! `following` list and in the followee's `followers` list. [`bind`] and
//! [`untie`] change both lists while holding both locks, always taking the
//! follower's `following` lock first. No code path takes a `followers` lock
//! before a `following` lock, so concurrent edge changes cannot deadlock.

use crate::{
  Error, Result,
  account::Account,
  note::{Note, NoteData, titles},
};

/// Add the edge `follower → following`.
///
/// Returns `Ok(false)` without side effects when the edge is already present
/// in either list. On success the follower's profile emits "new following"
/// and the followee's profile emits "new follower".
pub fn bind(follower: &Account, following: &Account) -> Result<bool> {
  if follower.id() == following.id() {
    return Err(Error::SelfSubscription(follower.id().to_owned()));
  }

  {
    let mut outgoing = follower.profile().following.lock();
    let mut incoming = following.profile().followers.lock();

    let present = outgoing.iter().any(|id| id == following.id())
      || incoming.iter().any(|id| id == follower.id());
    if present {
      tracing::debug!(
        follower = follower.id(),
        following = following.id(),
        "bind: edge already present"
      );
      return Ok(false);
    }

    outgoing.push(following.id().to_owned());
    incoming.push(follower.id().to_owned());
  }

  let description = format!(
    "{} followed {}.",
    follower.passport().display_name(),
    following.passport().display_name()
  );

  let note = Note::new(follower.id(), titles::NEW_FOLLOWING, description.as_str())
    .with_data(NoteData::Account(following.id().to_owned()));
  follower.profile().got_following().emit(follower, &note);

  let note = Note::new(following.id(), titles::NEW_FOLLOWER, description)
    .with_data(NoteData::Account(follower.id().to_owned()));
  following.profile().got_follower().emit(following, &note);

  Ok(true)
}

/// Remove the edge `follower → following` from both lists.
///
/// Removing an edge that does not exist is a no-op. Returns whether either
/// list contained it.
pub fn untie(follower: &Account, following: &Account) -> bool {
  let mut outgoing = follower.profile().following.lock();
  let mut incoming = following.profile().followers.lock();

  let before = outgoing.len() + incoming.len();
  outgoing.retain(|id| id != following.id());
  incoming.retain(|id| id != follower.id());
  let removed = outgoing.len() + incoming.len() != before;

  tracing::debug!(
    follower = follower.id(),
    following = following.id(),
    removed,
    "untie"
  );
  removed
}
