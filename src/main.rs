use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use shulker::config::ShulkerConfig;

mod cmd;

#[derive(Parser)]
#[command(name = "shulker")]
#[command(version, about = "A shulker box of small command-line tools")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to shulker.toml. Defaults to $SHULKER_CONFIG, then the platform config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the available tools (the default)
    List,
    /// Show version, paths, and effective settings
    Status,
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Run a tool: shulker <TOOL> [ARGS]...
    #[command(external_subcommand)]
    External(Vec<String>),
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default shulker.toml file
    Init,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match &cli.command {
        None | Some(Commands::List) => {
            let config = ShulkerConfig::load(cli.config.as_deref(), cli.verbose)?;
            cmd::cmd_list(&config)?;
            0
        }
        Some(Commands::Status) => {
            let config = ShulkerConfig::load(cli.config.as_deref(), cli.verbose)?;
            cmd::cmd_status(&config)?;
            0
        }
        Some(Commands::Config { command }) => {
            cmd::cmd_config(cli.config.as_deref(), command.clone())?;
            0
        }
        Some(Commands::External(args)) => {
            let config = ShulkerConfig::load(cli.config.as_deref(), cli.verbose)?;
            cmd::cmd_forward(&config, args)?
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
