//! Layered configuration for shulker.
//!
//! Settings are read from `shulker.toml`, then overridden by environment
//! variables, then by command-line flags.
//!
//! # Configuration File Format
//!
//! ```toml
//! [shell]
//! prompt = "fox> "
//! intro = "Welcome to shulker fox shell."
//!
//! [discovery]
//! on_error = "fail"   # or "skip"
//!
//! [adc]
//! datapack = "/home/me/dataset/codes"
//! ```
//!
//! # Lookup order
//!
//! 1. `--config <path>`
//! 2. `$SHULKER_CONFIG`
//! 3. `<config_dir>/shulker/shulker.toml`
//!
//! A missing file is not an error; defaults are used instead.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "shulker.toml";

/// Environment variable naming an explicit configuration file.
pub const ENV_CONFIG: &str = "SHULKER_CONFIG";

/// Environment variable overriding `discovery.on_error`.
pub const ENV_DISCOVERY: &str = "SHULKER_DISCOVERY";

/// Environment variable overriding `adc.datapack`.
pub const ENV_DATAPACK: &str = "SHULKER_DATAPACK";

/// What discovery does when a command source fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryPolicy {
    /// Abort the whole discovery pass.
    #[default]
    Fail,
    /// Warn about the broken source and keep going.
    Skip,
}

impl std::fmt::Display for DiscoveryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryPolicy::Fail => write!(f, "fail"),
            DiscoveryPolicy::Skip => write!(f, "skip"),
        }
    }
}

impl std::str::FromStr for DiscoveryPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(DiscoveryPolicy::Fail),
            "skip" => Ok(DiscoveryPolicy::Skip),
            _ => anyhow::bail!("Invalid discovery policy '{}'. Valid values: fail, skip", s),
        }
    }
}

/// `[shell]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellSection {
    /// Prompt printed before every line
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Banner printed when the shell starts
    #[serde(default = "default_intro")]
    pub intro: String,
}

fn default_prompt() -> String {
    "fox> ".to_string()
}

fn default_intro() -> String {
    "Welcome to shulker fox shell.".to_string()
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            intro: default_intro(),
        }
    }
}

/// `[discovery]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoverySection {
    #[serde(default)]
    pub on_error: DiscoveryPolicy,
}

/// `[adc]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdcSection {
    /// Directory holding `*.json` division-code datasets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datapack: Option<PathBuf>,
}

/// The on-disk shape of `shulker.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShulkerToml {
    #[serde(default)]
    pub shell: ShellSection,
    #[serde(default)]
    pub discovery: DiscoverySection,
    #[serde(default)]
    pub adc: AdcSection,
}

impl ShulkerToml {
    /// Load from a file. Fails if the file is missing or malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write to a file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, content).map_err(write_err)
    }

    /// Human-readable warnings about suspicious settings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.shell.prompt.trim().is_empty() {
            warnings.push("shell.prompt is empty; the shell will show no prompt".to_string());
        }
        if let Some(datapack) = &self.adc.datapack
            && !datapack.is_dir()
        {
            warnings.push(format!(
                "adc.datapack '{}' is not a directory",
                datapack.display()
            ));
        }
        warnings
    }
}

/// Resolved runtime configuration: file values with env and CLI overrides applied.
#[derive(Debug, Clone)]
pub struct ShulkerConfig {
    /// Where the file was (or would be) read from
    path: Option<PathBuf>,
    /// Whether `path` existed and was loaded
    loaded: bool,
    toml: ShulkerToml,
    verbose: bool,
}

impl Default for ShulkerConfig {
    fn default() -> Self {
        Self::from_toml(ShulkerToml::default())
    }
}

impl ShulkerConfig {
    /// Resolve the configuration for this process.
    ///
    /// `explicit` is the `--config` flag; it must point at an existing file.
    pub fn load(explicit: Option<&Path>, verbose: bool) -> Result<Self, ConfigError> {
        let (path, required) = resolve_path(explicit);

        let (toml, loaded) = match &path {
            Some(p) if required || p.exists() => (ShulkerToml::load(p)?, true),
            _ => (ShulkerToml::default(), false),
        };

        Ok(Self {
            path,
            loaded,
            toml,
            verbose,
        })
    }

    /// Build a configuration from in-memory values, ignoring the environment file lookup.
    pub fn from_toml(toml: ShulkerToml) -> Self {
        Self {
            path: None,
            loaded: false,
            toml,
            verbose: false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn toml(&self) -> &ShulkerToml {
        &self.toml
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn prompt(&self) -> &str {
        &self.toml.shell.prompt
    }

    pub fn intro(&self) -> &str {
        &self.toml.shell.intro
    }

    /// Discovery policy; `$SHULKER_DISCOVERY` wins over the file.
    pub fn discovery_policy(&self) -> DiscoveryPolicy {
        match std::env::var(ENV_DISCOVERY) {
            Ok(v) => match v.parse() {
                Ok(policy) => policy,
                Err(e) => {
                    tracing::warn!("Ignoring {}: {}", ENV_DISCOVERY, e);
                    self.toml.discovery.on_error
                }
            },
            Err(_) => self.toml.discovery.on_error,
        }
    }

    /// Dataset directory for `adc`; `$SHULKER_DATAPACK` wins over the file.
    pub fn datapack(&self) -> PathBuf {
        if let Some(p) = std::env::var_os(ENV_DATAPACK) {
            return PathBuf::from(p);
        }
        if let Some(p) = &self.toml.adc.datapack {
            return p.clone();
        }
        data_dir().join("dataset").join("codes")
    }
}

/// Where the configuration file lives and whether it must exist.
///
/// `--config` wins over `$SHULKER_CONFIG`, which wins over the platform
/// default. Only the platform default may be missing.
pub fn resolve_path(explicit: Option<&Path>) -> (Option<PathBuf>, bool) {
    match explicit {
        Some(p) => (Some(p.to_path_buf()), true),
        None => match std::env::var_os(ENV_CONFIG) {
            Some(p) => (Some(PathBuf::from(p)), true),
            None => (default_config_path(), false),
        },
    }
}

/// `<config_dir>/shulker/shulker.toml`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("shulker").join(CONFIG_FILE))
}

/// `<data_dir>/shulker`, falling back to `./.shulker`.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("shulker"))
        .unwrap_or_else(|| PathBuf::from(".shulker"))
}
