//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/simpletree/simpletree.toml`
//! 3. Local config: `<dir>/.simpletree.toml`
//! 4. Environment variables: `SIMPLETREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::outline::DEFAULT_INDENT;
use crate::render::DEFAULT_WIDTH;

/// Error while loading or writing settings.
#[derive(Error, Debug)]
#[error("config error: {message}")]
pub struct SettingsError {
    pub message: String,
}

/// Display style for rendered trees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Box-drawing lines with configurable width
    Box,
    /// Plain termtree layout
    Termtree,
}

/// Unified configuration for simpletree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Horizontal characters between a branch hook and the label
    pub width: usize,
    /// Label key: display, position, level or a field name
    pub key: String,
    /// Rendering style
    pub style: Style,
    /// Spaces per level in outline files
    pub indent: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            key: "display".into(),
            style: Style::Box,
            indent: DEFAULT_INDENT,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub width: Option<usize>,
    pub key: Option<String>,
    pub style: Option<Style>,
    pub indent: Option<usize>,
}

/// Get the XDG config directory for simpletree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "simpletree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("simpletree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".simpletree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|e| SettingsError {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| SettingsError {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins for every value it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            width: overlay.width.unwrap_or(self.width),
            key: overlay.key.clone().unwrap_or_else(|| self.key.clone()),
            style: overlay.style.unwrap_or(self.style),
            indent: overlay.indent.unwrap_or(self.indent),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.simpletree.toml`
    #[instrument(level = "debug")]
    pub fn load(local_dir: Option<&Path>) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!(path = %local_path.display(), "loading local config");
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply SIMPLETREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, SettingsError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("SIMPLETREE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<usize>("width") {
            settings.width = val;
        }
        if let Ok(val) = config.get_string("key") {
            settings.key = val;
        }
        if let Ok(val) = config.get::<Style>("style") {
            settings.style = val;
        }
        if let Ok(val) = config.get::<usize>("indent") {
            settings.indent = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.width == 0 {
            return Err(SettingsError {
                message: "width must be greater than 0".into(),
            });
        }
        if self.indent == 0 {
            return Err(SettingsError {
                message: "indent must be greater than 0".into(),
            });
        }
        Ok(())
    }

    /// Serialize settings to TOML string.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError {
            message: format!("serialize: {e}"),
        })
    }

    /// Commented template for a new config file.
    pub fn template() -> String {
        format!(
            r#"# simpletree configuration
#
# Global: $XDG_CONFIG_HOME/simpletree/simpletree.toml
# Local:  ./.simpletree.toml
# Env:    SIMPLETREE_WIDTH, SIMPLETREE_KEY, SIMPLETREE_STYLE, SIMPLETREE_INDENT

# Horizontal characters between a branch hook and the label
width = {DEFAULT_WIDTH}

# Label key: display, position, level, or a node field (name, line)
key = "display"

# Rendering style: box or termtree
style = "box"

# Spaces per level in outline files (a tab is always one level)
indent = {DEFAULT_INDENT}
"#
        )
    }
}

fn config_err(e: ConfigError) -> SettingsError {
    SettingsError {
        message: e.to_string(),
    }
}
