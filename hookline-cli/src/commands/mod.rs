//! Command handlers -- one module per subcommand

use std::path::{Path, PathBuf};

use hookline_core::config::HooklineConfig;

use crate::cli::DEFAULT_CONFIG_PATH;
use crate::error::CliError;

pub mod command;
pub mod config;
pub mod verify;

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from this file.
    File(PathBuf),
    /// No file; built-in defaults plus environment overrides.
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("(defaults)"),
        }
    }
}

/// Resolve which configuration source applies.
///
/// An explicit path always wins. Otherwise `./hookline.toml` is used when it exists.
pub fn resolve_source(explicit: Option<&Path>) -> ConfigSource {
    match explicit {
        Some(path) => ConfigSource::File(path.to_path_buf()),
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if default.is_file() {
                ConfigSource::File(default.to_path_buf())
            } else {
                ConfigSource::Defaults
            }
        }
    }
}

/// Load the effective configuration (file or defaults, then env overrides, then validation).
pub async fn load_config(source: &ConfigSource) -> Result<HooklineConfig, CliError> {
    match source {
        ConfigSource::File(path) => Ok(HooklineConfig::load(path).await?),
        ConfigSource::Defaults => {
            let mut config = HooklineConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }
}
