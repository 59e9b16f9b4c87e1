//! Typed error hierarchy for shulker.
//!
//! Four enums cover the subsystems that fail in ways callers match on:
//! - `DiscoveryError`: a command source failed to load
//! - `ConfigError`: reading or writing `shulker.toml`
//! - `AdcError`: administrative-code datasets and codes
//! - `WpError`: Windows/WSL path conversion

use std::path::PathBuf;

use thiserror::Error;

/// Errors from command discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Failed to load command source '{source_name}': {cause}")]
    SourceFailed {
        source_name: String,
        #[source]
        cause: anyhow::Error,
    },
}

/// Errors from loading or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config file at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the administrative division code tools.
#[derive(Debug, Error)]
pub enum AdcError {
    #[error("Code '{0}' must contain digits only")]
    InvalidCode(String),

    #[error("{file} should be a JSON object")]
    NotAnObject { file: String },

    #[error("{file} should also contain: {}", fields.join(", "))]
    MissingFields { file: String, fields: Vec<String> },

    #[error("Failed to read dataset at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dataset at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from converting between Windows and WSL mount paths.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WpError {
    #[error("'{0}' is not a Windows mount path in WSL")]
    NotMountPath(String),

    #[error("'{0}' is not an absolute path")]
    NotAbsolute(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_error_names_the_source() {
        let err = DiscoveryError::SourceFailed {
            source_name: "adc".to_string(),
            cause: anyhow::anyhow!("dataset index corrupt"),
        };
        let msg = err.to_string();
        assert!(msg.contains("'adc'"));
        assert!(msg.contains("dataset index corrupt"));
    }

    #[test]
    fn config_read_error_carries_path() {
        let path = PathBuf::from("/etc/shulker/shulker.toml");
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = ConfigError::Read {
            path: path.clone(),
            source: io_err,
        };
        match &err {
            ConfigError::Read { path: p, source: s } => {
                assert_eq!(p, &path);
                assert_eq!(s.kind(), std::io::ErrorKind::PermissionDenied);
            }
            _ => panic!("Expected Read"),
        }
    }

    #[test]
    fn adc_missing_fields_lists_every_field() {
        let err = AdcError::MissingFields {
            file: "2023.json".to_string(),
            fields: vec!["title".to_string(), "year".to_string()],
        };
        assert_eq!(err.to_string(), "2023.json should also contain: title, year");
    }

    #[test]
    fn wp_errors_are_comparable() {
        assert_eq!(
            WpError::NotMountPath("/home".into()),
            WpError::NotMountPath("/home".into())
        );
        assert_ne!(
            WpError::NotMountPath("x".into()),
            WpError::NotAbsolute("x".into())
        );
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&DiscoveryError::SourceFailed {
            source_name: "x".into(),
            cause: anyhow::anyhow!("y"),
        });
        assert_std_error(&AdcError::InvalidCode("a1".into()));
        assert_std_error(&WpError::NotAbsolute("x".into()));
    }
}
