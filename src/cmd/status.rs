//! Environment overview: `shulker status`.

use anyhow::Result;

use shulker::config::{ShulkerConfig, data_dir};
use shulker::ui::icons::{CHECK, CROSS};

pub fn cmd_status(config: &ShulkerConfig) -> Result<()> {
    println!();
    println!("Shulker Status");
    println!("==============");
    println!();

    let exe = std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "(unknown)".to_string());
    println!("Version:    {}", env!("CARGO_PKG_VERSION"));
    println!("Executable: {}", exe);

    match config.path() {
        Some(path) if config.is_loaded() => println!("Config:     {}", path.display()),
        Some(path) => println!("Config:     {} (not found, using defaults)", path.display()),
        None => println!("Config:     (none, using defaults)"),
    }
    println!("Data dir:   {}", data_dir().display());

    let datapack = config.datapack();
    let icon = if datapack.is_dir() { CHECK } else { CROSS };
    println!("Datapack:   {}{}", icon, datapack.display());
    println!("Discovery:  {}", config.discovery_policy());
    println!();
    Ok(())
}
