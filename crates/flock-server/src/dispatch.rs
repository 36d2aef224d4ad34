//! Command dispatch.
//!
//! Maps each [`Command`] onto a registry operation and wraps the outcome in a
//! [`Response`] carrying the command's tag. Errors never escape: they become
//! failure replies.

use flock_core::{
  Note, Registry, Result,
  command::{AccountSummary, Command, Response, ServerInfo},
};

use crate::ServerConfig;

pub fn dispatch(registry: &mut Registry, config: &ServerConfig, command: Command) -> Response {
  let tag = command.tag();
  tracing::debug!(tag, "dispatching command");
  match run(registry, config, command) {
    Ok(response) => response,
    Err(e) => {
      tracing::warn!(tag, error = %e, "command failed");
      Response::failure(tag, e)
    }
  }
}

fn run(registry: &mut Registry, config: &ServerConfig, command: Command) -> Result<Response> {
  let tag = command.tag();
  match command {
    Command::Info => Response::ok(tag, ServerInfo {
      accounts: registry.len(),
      host:     config.host.clone(),
      port:     config.port,
    }),

    Command::Register { id } => {
      let account = registry.register(&id)?;
      Response::ok(tag, account.snapshot())
    }

    Command::Login { id } => Response::ok(tag, registry.require(&id)?.snapshot()),

    Command::Search { id } => {
      let account = registry.require(&id)?;
      Response::ok(tag, AccountSummary {
        id:           account.id().to_owned(),
        display_name: account.passport().display_name(),
      })
    }

    Command::Update(snapshot) => {
      registry.require(&snapshot.id)?.apply_snapshot(&snapshot)?;
      Response::ok(tag, ())
    }

    Command::Subscribe { follower, target } => {
      if registry.subscribe(&follower, &target)? {
        Response::ok(tag, true)
      } else {
        Ok(Response::failure(tag, format!("{follower} already follows {target}")))
      }
    }

    Command::Unsubscribe { follower, target } => {
      Response::ok(tag, registry.unsubscribe(&follower, &target)?)
    }

    Command::Publish {
      id,
      title,
      description,
    } => {
      let account = registry.require(&id)?;
      let note = Note::new(&id, title, description);
      account.profile().add_news(note.clone());
      Response::ok(tag, note)
    }

    Command::RemoveNews { id, note } => {
      Response::ok(tag, registry.require(&id)?.profile().remove_news(&note))
    }

    Command::Journal { id } => Response::ok(tag, registry.require(&id)?.profile().journal()),
  }
}
