//! Core types for the Flock social graph.
//!
//! Accounts own three sub-entities (passport, education, profile) whose
//! fields report their own changes as [`Note`](note::Note)s. Following
//! another account wires forwarding handlers so that every note the followee
//! emits is re-broadcast on the follower's own channels.
//!
//! This crate has no HTTP or storage dependencies.

pub mod account;
pub mod channel;
pub mod command;
pub mod education;
pub mod error;
pub mod graph;
pub mod note;
pub mod passport;
pub mod profile;
pub mod registry;
pub mod snapshot;

mod tracked;

pub use account::{Account, Topic};
pub use error::{Error, Result};
pub use note::{Feedable, Note, NoteData, Photo};
pub use registry::Registry;
