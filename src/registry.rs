//! Command registry and static command discovery.
//!
//! Commands are not found by scanning the filesystem at runtime. Each
//! command module declares a [`Source`] from its own compile-time file
//! location and a loader function, and a manifest lists the sources:
//!
//! ```text
//! src/foxes/
//! ├── mod.rs    # pub fn sources() -> Vec<Source> { vec![adc::source()] }
//! └── adc.rs    # Source::new(file!(), units)  → registered as "adc"
//! ```
//!
//! Discovery keeps two conventions:
//! - the entry name is always the stem of the source location;
//! - when a source yields any group units, only the groups are kept, so
//!   a group's members are not listed a second time at the top level.

use std::path::Path;
use std::rc::Rc;

use anyhow::Result;

use crate::command::Command;
use crate::config::DiscoveryPolicy;
use crate::errors::DiscoveryError;

/// Loads the command units a source provides.
pub type Loader = fn() -> Result<Vec<Rc<dyn Command>>>;

/// A compile-time known command module.
#[derive(Clone, Copy)]
pub struct Source {
    location: &'static str,
    loader: Loader,
}

impl Source {
    /// `location` is normally `file!()` of the declaring module.
    pub const fn new(location: &'static str, loader: Loader) -> Self {
        Self { location, loader }
    }

    pub fn location(&self) -> &'static str {
        self.location
    }

    /// File name of the location with every suffix removed (`foxes/adc.rs` → `adc`).
    pub fn stem(&self) -> &'static str {
        let file_name = Path::new(self.location)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(self.location);
        match file_name.find('.') {
            Some(0) | None => file_name,
            Some(i) => &file_name[..i],
        }
    }

    pub fn load(&self) -> Result<Vec<Rc<dyn Command>>> {
        (self.loader)()
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("location", &self.location)
            .finish()
    }
}

/// Something the shell can run under a registry name.
#[derive(Clone)]
pub enum Handler<B> {
    /// A command implemented by the host itself (e.g. the shell's `help`).
    Builtin(B),
    Command(Rc<dyn Command>),
}

impl<B: std::fmt::Debug> std::fmt::Debug for Handler<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handler::Builtin(b) => f.debug_tuple("Builtin").field(b).finish(),
            Handler::Command(c) => f.debug_tuple("Command").field(&c.name()).finish(),
        }
    }
}

/// A named, listed command.
#[derive(Debug, Clone)]
pub struct CommandEntry<B = NoBuiltin> {
    pub name: String,
    pub handler: Handler<B>,
    pub hidden: bool,
    pub deprecated: bool,
    pub description: String,
}

impl<B> CommandEntry<B> {
    /// Entry for a discovered command, named after its source.
    pub fn from_command(name: &str, command: Rc<dyn Command>) -> Self {
        Self {
            name: name.to_string(),
            hidden: command.hidden(),
            deprecated: command.deprecated(),
            description: command.description().to_string(),
            handler: Handler::Command(command),
        }
    }

    pub fn builtin(name: &str, builtin: B, description: &str) -> Self {
        Self {
            name: name.to_string(),
            handler: Handler::Builtin(builtin),
            hidden: false,
            deprecated: false,
            description: description.to_string(),
        }
    }
}

/// Builtin type for registries whose host has no built-in commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoBuiltin {}

/// Ordered name → entry mapping.
#[derive(Debug, Clone)]
pub struct Registry<B = NoBuiltin> {
    entries: Vec<CommandEntry<B>>,
}

impl<B> Default for Registry<B> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<B> Registry<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. An existing entry with the same name is replaced in place.
    pub fn register(&mut self, entry: CommandEntry<B>) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn resolve(&self, name: &str) -> Option<&CommandEntry<B>> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Entries in registry order, hidden ones only when asked for.
    pub fn list(&self, include_hidden: bool) -> impl Iterator<Item = &CommandEntry<B>> + '_ {
        self.entries
            .iter()
            .filter(move |e| include_hidden || !e.hidden)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Stable sort by name.
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of a discovery pass.
pub struct Discovery<B = NoBuiltin> {
    pub entries: Vec<CommandEntry<B>>,
    /// Sources that failed under [`DiscoveryPolicy::Skip`].
    pub skipped: Vec<DiscoveryError>,
}

/// Load every source and turn its units into entries.
pub fn discover<B>(
    sources: &[Source],
    policy: DiscoveryPolicy,
) -> Result<Discovery<B>, DiscoveryError> {
    let mut entries = Vec::new();
    let mut skipped = Vec::new();

    for source in sources {
        let stem = source.stem();
        let units = match source.load() {
            Ok(units) => units,
            Err(cause) => {
                let err = DiscoveryError::SourceFailed {
                    source_name: stem.to_string(),
                    cause,
                };
                match policy {
                    DiscoveryPolicy::Fail => return Err(err),
                    DiscoveryPolicy::Skip => {
                        tracing::warn!(source = stem, "Skipping command source: {}", err);
                        skipped.push(err);
                        continue;
                    }
                }
            }
        };

        let has_groups = units.iter().any(|u| u.is_group());
        let kept: Vec<Rc<dyn Command>> = units
            .into_iter()
            .filter(|u| !has_groups || u.is_group())
            .collect();
        tracing::debug!(
            source = source.location(),
            units = kept.len(),
            groups = has_groups,
            "Loaded command source"
        );

        for unit in kept {
            entries.push(CommandEntry::from_command(stem, unit));
        }
    }

    Ok(Discovery { entries, skipped })
}

/// Registry of every command the given sources provide, sorted by name.
pub fn load_registry(
    sources: &[Source],
    policy: DiscoveryPolicy,
) -> Result<(Registry, Vec<DiscoveryError>), DiscoveryError> {
    let discovery = discover::<NoBuiltin>(sources, policy)?;
    let mut registry = Registry::new();
    for entry in discovery.entries {
        registry.register(entry);
    }
    registry.sort();
    Ok((registry, discovery.skipped))
}
