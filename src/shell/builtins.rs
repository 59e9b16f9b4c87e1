//! Commands implemented by the shell itself.

use console::style;

use crate::registry::Registry;
use crate::ui::Table;

/// A built-in command. Built-ins win over registry entries of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cls,
    Exit,
    Help,
}

impl Builtin {
    pub const ALL: [Builtin; 3] = [Builtin::Cls, Builtin::Exit, Builtin::Help];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Cls => "cls",
            Builtin::Exit => "exit",
            Builtin::Help => "help",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Builtin::Cls => "Clear the screen",
            Builtin::Exit => "Leave the shell",
            Builtin::Help => "List every command with its description",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }
}

/// The `help` table: one row per visible entry, deprecated names in yellow.
pub fn render_help(registry: &Registry<Builtin>) -> String {
    let mut table = Table::headless(2);
    for entry in registry.list(false) {
        let name = if entry.deprecated {
            style(&entry.name).yellow().to_string()
        } else {
            entry.name.clone()
        };
        table.add_row([name, entry.description.clone()]);
    }
    table.render()
}
