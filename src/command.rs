//! Command units, their invocation session, and command groups.

use std::rc::Rc;

use anyhow::Result;
use clap::Parser;

use crate::config::ShulkerConfig;
use crate::context::Context;
use crate::streams::Streams;
use crate::ui::table::Table;

/// What the caller should do after a command returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Stop the shell (or the process) with this exit code.
    Exit(i32),
}

/// How a command was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Run directly from the command line; argument errors exit the process.
    Standalone,
    /// Run inside the fox shell; argument errors are printed and control returns.
    Embedded,
}

/// Everything a command may touch while it runs.
pub struct Session<'a> {
    pub context: &'a mut Context,
    pub streams: &'a mut Streams,
    pub config: &'a ShulkerConfig,
    pub mode: Mode,
}

/// A single invocable unit.
pub trait Command {
    /// Declared name. The registry lists the command under its source stem instead.
    fn name(&self) -> &str;

    /// One-line description for listings.
    fn description(&self) -> &str;

    fn hidden(&self) -> bool {
        false
    }

    fn deprecated(&self) -> bool {
        false
    }

    /// Whether this unit is a group of other commands.
    fn is_group(&self) -> bool {
        false
    }

    fn invoke(&self, args: &[String], session: &mut Session<'_>) -> Result<Flow>;
}

/// Parse `args` with clap, honouring the session's mode.
///
/// Returns `Ok(None)` when parsing stopped early in embedded mode (a usage
/// error or a `--help` request); the message has already been printed.
/// In standalone mode clap prints the message and exits the process.
pub fn parse_args<P: Parser>(
    name: &str,
    args: &[String],
    session: &mut Session<'_>,
) -> Result<Option<P>> {
    let argv = std::iter::once(name.to_string()).chain(args.iter().cloned());
    match P::try_parse_from(argv) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => match session.mode {
            Mode::Standalone => e.exit(),
            Mode::Embedded => {
                let rendered = e.render().to_string();
                let rendered = rendered.trim_end();
                if e.use_stderr() {
                    session.streams.error_line(rendered)?;
                } else {
                    session.streams.output(rendered)?;
                }
                Ok(None)
            }
        },
    }
}

/// A command made of named member commands, like `adc list` / `adc load`.
pub struct Group {
    name: String,
    description: String,
    about: String,
    members: Vec<Rc<dyn Command>>,
}

impl Group {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            about: String::new(),
            members: Vec::new(),
        }
    }

    /// Longer text shown above the member table in the group's help.
    pub fn about(mut self, about: &str) -> Self {
        self.about = about.to_string();
        self
    }

    pub fn member(mut self, command: Rc<dyn Command>) -> Self {
        self.members.push(command);
        self
    }

    pub fn members(&self) -> &[Rc<dyn Command>] {
        &self.members
    }

    fn find(&self, name: &str) -> Option<&Rc<dyn Command>> {
        self.members.iter().find(|m| m.name() == name)
    }

    fn render_help(&self) -> String {
        let mut text = format!("Usage: {} <COMMAND> [ARGS]...\n", self.name);
        let about = if self.about.is_empty() {
            &self.description
        } else {
            &self.about
        };
        if !about.is_empty() {
            text.push('\n');
            text.push_str(about.trim());
            text.push('\n');
        }

        let mut table = Table::new(["Command", "Description"]);
        for member in self.members.iter().filter(|m| !m.hidden()) {
            table.add_row([member.name().to_string(), member.description().to_string()]);
        }
        text.push('\n');
        text.push_str(&table.render());
        text
    }
}

impl Command for Group {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn is_group(&self) -> bool {
        true
    }

    fn invoke(&self, args: &[String], session: &mut Session<'_>) -> Result<Flow> {
        let Some((first, rest)) = args.split_first() else {
            session.streams.output(self.render_help())?;
            return Ok(Flow::Continue);
        };

        if first == "-h" || first == "--help" {
            session.streams.output(self.render_help())?;
            return Ok(Flow::Continue);
        }

        match self.find(first) {
            Some(member) => {
                tracing::debug!(group = %self.name, member = %first, "Dispatching to group member");
                member.invoke(rest, session)
            }
            None => {
                session
                    .streams
                    .warning(format!("No such command '{}'.", first))?;
                Ok(match session.mode {
                    Mode::Standalone => Flow::Exit(2),
                    Mode::Embedded => Flow::Continue,
                })
            }
        }
    }
}
