//! Tool listing and forwarding: `shulker list` and `shulker <tool> ...`.

use anyhow::Result;
use console::style;

use shulker::command::{Flow, Mode, Session};
use shulker::config::ShulkerConfig;
use shulker::context::Context;
use shulker::registry::{Handler, load_registry};
use shulker::streams::Streams;
use shulker::tools;
use shulker::ui::Table;

pub fn cmd_list(config: &ShulkerConfig) -> Result<()> {
    let (registry, skipped) = load_registry(&tools::sources(), config.discovery_policy())?;
    for err in &skipped {
        eprintln!("{}", style(err).yellow().for_stderr());
    }

    let mut table = Table::headless(2);
    for entry in registry.list(false) {
        let name = if entry.deprecated {
            style(&entry.name).yellow().to_string()
        } else {
            entry.name.clone()
        };
        table.add_row([name, entry.description.clone()]);
    }

    if table.is_empty() {
        println!("No commands found.");
        return Ok(());
    }

    println!("Usage: shulker <COMMAND> [ARGS]...");
    println!();
    print!("{}", table.render());
    Ok(())
}

/// Run a discovered tool with the remaining arguments. Returns the exit code.
pub fn cmd_forward(config: &ShulkerConfig, args: &[String]) -> Result<i32> {
    let Some((name, rest)) = args.split_first() else {
        anyhow::bail!("No command given. Run 'shulker list' to see the available commands.");
    };

    let (registry, _) = load_registry(&tools::sources(), config.discovery_policy())?;
    let Some(entry) = registry.resolve(name) else {
        anyhow::bail!(
            "No such command '{}'. Run 'shulker list' to see the available commands.",
            name
        );
    };
    let Handler::Command(command) = &entry.handler else {
        anyhow::bail!("'{}' cannot be run from the command line", name);
    };

    tracing::debug!(command = %name, args = ?rest, "Forwarding to tool");
    let mut context = Context::new();
    let mut streams = Streams::stdio();
    let mut session = Session {
        context: &mut context,
        streams: &mut streams,
        config,
        mode: Mode::Standalone,
    };
    Ok(match command.invoke(rest, &mut session)? {
        Flow::Continue => 0,
        Flow::Exit(code) => code,
    })
}
