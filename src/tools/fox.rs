//! `fox`: enter the context-keeping fox shell.

use std::rc::Rc;

use anyhow::Result;
use clap::Parser;

use crate::command::{Command, Flow, Session, parse_args};
use crate::foxes;
use crate::registry::Source;
use crate::shell::Shell;
use crate::streams::Streams;

pub fn source() -> Source {
    Source::new(file!(), units)
}

fn units() -> Result<Vec<Rc<dyn Command>>> {
    Ok(vec![Rc::new(Looper)])
}

/// Enter a command loop that keeps context and memory between commands.
#[derive(Parser, Debug)]
#[command(name = "fox")]
struct FoxArgs {}

pub struct Looper;

impl Looper {
    /// Run a shell over `sources` on the session's streams, handing them back afterwards.
    fn run_shell(session: &mut Session<'_>, sources: Vec<Source>) -> Result<i32> {
        let lent = std::mem::replace(session.streams, Streams::detached());
        let mut shell = Shell::unloaded(session.config.clone(), sources, lent);
        let outcome = shell
            .reload()
            .map_err(anyhow::Error::from)
            .and_then(|()| shell.run());
        *session.streams = shell.into_streams();
        outcome
    }
}

impl Command for Looper {
    fn name(&self) -> &str {
        "looper"
    }

    fn description(&self) -> &str {
        "Enter the fox shell, which keeps context between commands"
    }

    fn invoke(&self, args: &[String], session: &mut Session<'_>) -> Result<Flow> {
        if parse_args::<FoxArgs>("fox", args, session)?.is_none() {
            return Ok(Flow::Continue);
        }

        let code = Self::run_shell(session, foxes::sources())?;
        tracing::debug!(code, "Fox shell finished");
        Ok(Flow::Exit(code))
    }
}
