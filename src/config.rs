//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cattree/cattree.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `CATTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Unified configuration for cattree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Name of the implicit root category scripts operate under
    pub root_name: String,
    /// Echo every script command before its output
    pub echo: bool,
    /// Print the resulting tree after a script finished
    pub show_tree: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_name: "root".into(),
            echo: false,
            show_tree: true,
        }
    }
}

/// Get the XDG config directory for cattree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cattree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cattree.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file, must exist if given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(global_config_path().as_deref(), config_file)
    }

    /// Same as [`Settings::load`] with the global config location made explicit.
    pub fn load_from(global: Option<&Path>, config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("root_name", defaults.root_name)?
            .set_default("echo", defaults.echo)?
            .set_default("show_tree", defaults.show_tree)?;

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(path) = config_file {
            debug!("explicit config: {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(Environment::with_prefix("CATTREE").try_parsing(true));

        let settings: Self = builder.build()?.try_deserialize()?;
        debug!("settings: {:?}", settings);
        Ok(settings)
    }

    /// Render settings as TOML for `cattree config`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.root_name, "root");
        assert!(!settings.echo);
        assert!(settings.show_tree);
    }

    #[test]
    fn test_to_toml_round_trips() {
        let settings = Settings {
            root_name: "food".into(),
            echo: true,
            show_tree: false,
        };
        let rendered = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, settings);
    }
}
