//! Configuration view and validation commands: `shulker config`.

use std::path::Path;

use anyhow::Result;

use super::super::ConfigCommands;

pub fn cmd_config(explicit: Option<&Path>, command: Option<ConfigCommands>) -> Result<()> {
    use shulker::config::{ShulkerConfig, ShulkerToml, resolve_path};
    use shulker::ui::icons::{CHECK, WARN};

    let (config_path, _) = resolve_path(explicit);
    let Some(config_path) = config_path else {
        anyhow::bail!(
            "No configuration directory on this platform. Pass --config <path> or set SHULKER_CONFIG."
        );
    };

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Shulker Configuration");
            println!("=====================");
            println!();

            let toml = if config_path.exists() {
                println!("Config file: {}", config_path.display());
                println!();
                ShulkerToml::load(&config_path)?
            } else {
                println!("No shulker.toml found at {}", config_path.display());
                println!();
                println!("Using default configuration:");
                ShulkerToml::default()
            };

            println!("[shell]");
            println!("  prompt = {:?}", toml.shell.prompt);
            println!("  intro = {:?}", toml.shell.intro);
            println!();
            println!("[discovery]");
            println!("  on_error = \"{}\"", toml.discovery.on_error);
            println!();
            println!("[adc]");
            match &toml.adc.datapack {
                Some(datapack) => println!("  datapack = {:?}", datapack.display().to_string()),
                None => println!("  # datapack not set"),
            }
            println!();

            if config_path.exists() {
                println!("Effective values (with env/CLI overrides):");
                let config = ShulkerConfig::load(Some(&config_path), false)?;
                println!("  discovery.on_error = \"{}\"", config.discovery_policy());
                println!("  adc.datapack = {:?}", config.datapack().display().to_string());
                println!();
            } else {
                println!("Run 'shulker config init' to create a shulker.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No shulker.toml found. Using defaults (valid).");
                return Ok(());
            }

            let toml = ShulkerToml::load(&config_path)?;
            let warnings = toml.validate();

            if warnings.is_empty() {
                println!("{}Configuration is valid.", CHECK);
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  {}{}", WARN, warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("shulker.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            ShulkerToml::default().save(&config_path)?;

            println!("Created shulker.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [shell] prompt, intro");
            println!("  - [discovery] on_error (\"fail\" or \"skip\")");
            println!("  - [adc] datapack");
            println!();
        }
    }

    Ok(())
}
