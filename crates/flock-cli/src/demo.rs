//! In-process walkthrough of the follow graph.
//!
//! Three accounts follow each other, change their details and publish news.
//! After every step each account's newly journaled notes are printed.

use std::io::Write;

use anyhow::Result;
use chrono::Local;
use flock_core::{Account, Feedable, Note, Photo, Registry};

/// Tracks how much of an account's journal has been printed.
struct Reader {
  account: Account,
  seen:    usize,
}

impl Reader {
  fn new(account: Account) -> Self { Self { account, seen: 0 } }

  fn unread(&mut self) -> Vec<Note> {
    let journal = self.account.profile().journal();
    let fresh = journal[self.seen.min(journal.len())..].to_vec();
    self.seen = journal.len();
    fresh
  }
}

pub fn render(reader: &str, note: &dyn Feedable) -> String {
  let time = note.time().with_timezone(&Local).format("%H:%M:%S");
  format!(
    "  [{time}] {reader} <- {}  {}: {}",
    note.owner_id(),
    note.title(),
    note.description()
  )
}

fn step(out: &mut impl Write, readers: &mut [Reader], heading: &str) -> Result<()> {
  writeln!(out, "== {heading}")?;
  let mut quiet = true;
  for reader in readers.iter_mut() {
    let id = reader.account.id().to_owned();
    for note in reader.unread() {
      writeln!(out, "{}", render(&id, &note))?;
      quiet = false;
    }
  }
  if quiet {
    writeln!(out, "  (no notifications)")?;
  }
  Ok(())
}

pub fn run(out: &mut impl Write) -> Result<()> {
  let mut registry = Registry::new();
  let alice = registry.register("alice")?;
  let bob = registry.register("bob")?;
  let carol = registry.register("carol")?;
  let mut readers = [
    Reader::new(alice.clone()),
    Reader::new(bob.clone()),
    Reader::new(carol.clone()),
  ];

  registry.subscribe("alice", "bob")?;
  registry.subscribe("carol", "bob")?;
  registry.subscribe("bob", "carol")?;
  step(out, &mut readers, "alice and carol follow bob, bob follows carol")?;

  bob.passport().set_name("Bob")?;
  bob.passport().set_middlename("Stone")?;
  step(out, &mut readers, "bob fills in the passport")?;

  let news = Note::new(bob.id(), "Hello", "My first post.");
  bob.profile().add_news(news.clone());
  bob.profile().remove_news(&news);
  step(out, &mut readers, "bob publishes and retracts a post")?;

  bob.profile().set_photo(Some(Photo::new(vec![0x89, b'P', b'N', b'G'])));
  bob.profile().set_photo(None);
  step(out, &mut readers, "bob uploads and removes a photo")?;

  carol.passport().set_birthday(Some(Local::now().date_naive()));
  step(out, &mut readers, "carol sets a birthday of today")?;

  registry.unsubscribe("alice", "bob")?;
  step(out, &mut readers, "alice unfollows bob")?;

  bob.passport().set_name("Robert")?;
  step(out, &mut readers, "bob changes name again")?;

  for reader in &readers {
    let profile = reader.account.profile();
    writeln!(
      out,
      "{}: {} followers, {} following, {} journaled",
      reader.account,
      profile.followers().len(),
      profile.following().len(),
      profile.journal_len()
    )?;
  }
  Ok(())
}
