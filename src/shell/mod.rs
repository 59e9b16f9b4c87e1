//! The fox shell: a read → parse → dispatch loop over a command registry.
//!
//! # Lifecycle
//!
//! - `reload()` runs once on construction and may be called again:
//!   - `preload()` empties the registry
//!   - `load()` registers the built-ins, then every discovered command
//!   - `postload()` sorts by name and adds the `?` alias for `help`
//! - `run()` drives the loop:
//!   - `preloop()` prints the intro
//!   - `run_loop()` reads and dispatches until an exit code is recorded
//!   - `postloop()` hands the exit code back to the caller
//!
//! The [`Context`] lives as long as the shell and is handed to every
//! command, so commands can keep state between turns.

pub mod builtins;
pub mod parser;

use anyhow::Result;
use console::style;

use crate::command::{Flow, Mode, Session};
use crate::config::{DiscoveryPolicy, ShulkerConfig};
use crate::context::Context;
use crate::errors::DiscoveryError;
use crate::registry::{CommandEntry, Handler, Registry, Source, discover};
use crate::streams::{ReadOutcome, Streams};

pub use builtins::Builtin;
pub use parser::parse;

/// Alias registered for `help`.
pub const HELP_ALIAS: &str = "?";

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Idle,
    Reading,
    Dispatching,
    Terminating,
}

/// What `address` found for a command name.
#[derive(Debug, Clone)]
pub enum Target {
    Builtin(Builtin),
    Entry(CommandEntry<Builtin>),
}

pub struct Shell {
    config: ShulkerConfig,
    sources: Vec<Source>,
    policy: DiscoveryPolicy,
    registry: Registry<Builtin>,
    context: Context,
    streams: Streams,
    line: String,
    exit_code: Option<i32>,
    state: ShellState,
}

impl Shell {
    /// Build a shell over `sources` and load its registry.
    pub fn new(
        config: ShulkerConfig,
        sources: Vec<Source>,
        streams: Streams,
    ) -> Result<Self, DiscoveryError> {
        let mut shell = Self::unloaded(config, sources, streams);
        shell.reload()?;
        Ok(shell)
    }

    /// A shell with an empty registry; call [`Shell::reload`] before running it.
    pub fn unloaded(config: ShulkerConfig, sources: Vec<Source>, streams: Streams) -> Self {
        let policy = config.discovery_policy();
        Self {
            config,
            sources,
            policy,
            registry: Registry::new(),
            context: Context::new(),
            streams,
            line: String::new(),
            exit_code: None,
            state: ShellState::Idle,
        }
    }

    /// Override the discovery policy taken from the configuration.
    pub fn with_policy(mut self, policy: DiscoveryPolicy) -> Result<Self, DiscoveryError> {
        self.policy = policy;
        self.reload()?;
        Ok(self)
    }

    pub fn registry(&self) -> &Registry<Builtin> {
        &self.registry
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Give the streams back to whoever lent them.
    pub fn into_streams(self) -> Streams {
        self.streams
    }

    pub fn reload(&mut self) -> Result<(), DiscoveryError> {
        self.preload();
        self.load()?;
        self.postload();
        Ok(())
    }

    fn preload(&mut self) {
        self.registry.clear();
    }

    fn load(&mut self) -> Result<(), DiscoveryError> {
        for builtin in Builtin::ALL {
            self.registry.register(CommandEntry::builtin(
                builtin.name(),
                builtin,
                builtin.description(),
            ));
        }

        let found = discover::<Builtin>(&self.sources, self.policy)?;
        for err in &found.skipped {
            if let Err(e) = self.streams.warning(err) {
                tracing::warn!(error = %e, skipped = %err, "Failed to report skipped command source");
            }
        }
        for entry in found.entries {
            self.registry.register(entry);
        }
        Ok(())
    }

    fn postload(&mut self) {
        self.registry.sort();
        self.registry.register(CommandEntry::builtin(
            HELP_ALIAS,
            Builtin::Help,
            Builtin::Help.description(),
        ));
    }

    /// Run the loop until a command asks to exit or input ends. Returns the exit code.
    pub fn run(&mut self) -> Result<i32> {
        self.preloop()?;
        self.run_loop()?;
        Ok(self.postloop())
    }

    fn preloop(&mut self) -> Result<()> {
        let intro = self.config.intro().to_string();
        if !intro.is_empty() {
            self.streams.output(intro)?;
        }
        Ok(())
    }

    fn postloop(&mut self) -> i32 {
        self.state = ShellState::Terminating;
        self.exit_code.unwrap_or(0)
    }

    fn run_loop(&mut self) -> Result<()> {
        while self.exit_code.is_none() {
            self.state = ShellState::Reading;
            let prompt = style(self.config.prompt()).cyan().to_string();
            self.streams.write(&prompt)?;

            match self.streams.read_line()? {
                ReadOutcome::Interrupted | ReadOutcome::Eof => {
                    self.exit_code = Some(0);
                    self.streams.warning("")?;
                    continue;
                }
                ReadOutcome::Line(line) => {
                    self.line = line.trim_end_matches(['\r', '\n']).to_string();
                }
            }

            if self.line.trim().is_empty() {
                self.state = ShellState::Idle;
                continue;
            }
            self.dispatch()?;
        }
        self.state = ShellState::Terminating;
        Ok(())
    }

    /// Run one line as if it had been typed at the prompt.
    pub fn onecmd(&mut self, line: &str) -> Result<Flow> {
        self.line = line.to_string();
        if self.line.trim().is_empty() {
            return Ok(Flow::Continue);
        }
        self.dispatch()
    }

    /// Built-ins first, then the registry.
    pub fn address(&self, command: &str) -> Option<Target> {
        if let Some(builtin) = Builtin::from_name(command) {
            return Some(Target::Builtin(builtin));
        }
        self.registry
            .resolve(command)
            .map(|entry| Target::Entry(entry.clone()))
    }

    fn dispatch(&mut self) -> Result<Flow> {
        self.state = ShellState::Dispatching;
        let (command, args) = parse(&self.line);

        let flow = match self.address(&command) {
            Some(Target::Builtin(builtin)) => self.run_builtin(builtin)?,
            Some(Target::Entry(entry)) => match entry.handler {
                Handler::Builtin(builtin) => self.run_builtin(builtin)?,
                Handler::Command(cmd) => {
                    tracing::debug!(command = %entry.name, args = ?args, "Dispatching");
                    let mut session = Session {
                        context: &mut self.context,
                        streams: &mut self.streams,
                        config: &self.config,
                        mode: Mode::Embedded,
                    };
                    cmd.invoke(&args, &mut session)?
                }
            },
            None => self.default()?,
        };

        match flow {
            Flow::Exit(code) => {
                self.exit_code = Some(code);
                self.state = ShellState::Terminating;
            }
            Flow::Continue => self.state = ShellState::Idle,
        }
        Ok(flow)
    }

    fn run_builtin(&mut self, builtin: Builtin) -> Result<Flow> {
        match builtin {
            Builtin::Exit => Ok(Flow::Exit(0)),
            Builtin::Help => {
                let table = builtins::render_help(&self.registry);
                self.streams.write(&table)?;
                Ok(Flow::Continue)
            }
            Builtin::Cls => {
                self.streams.clear()?;
                Ok(Flow::Continue)
            }
        }
    }

    fn default(&mut self) -> Result<Flow> {
        self.streams
            .warning(format!("Command not found: {}", self.line.trim()))?;
        Ok(Flow::Continue)
    }
}
