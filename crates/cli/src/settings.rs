// User settings for the CLI: `<config dir>/stax/settings.toml`.
//
// Every field is optional; a missing file means defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::output::ConsoleConfig;

/// Path to the settings file, e.g. `~/.config/stax/settings.toml` on Linux.
pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stax").join("settings.toml"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Author recorded by `stax init` when `--author` is not given.
    pub author: Option<String>,
    pub console: ConsoleSettings,
}

/// Console defaults. Command-line flags can only switch these off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleSettings {
    pub warnings: bool,
    pub logging: bool,
    pub formatted: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self { warnings: true, logging: true, formatted: true }
    }
}

impl Settings {
    /// Load the user's settings file, or defaults if there is none.
    pub fn load() -> anyhow::Result<Self> {
        match settings_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings `{}`", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse settings `{}`", path.display()))
    }

    /// Console switches after applying the command-line overrides.
    pub fn console_config(&self, quiet: bool, no_warnings: bool, unformatted: bool) -> ConsoleConfig {
        ConsoleConfig {
            logging: self.console.logging && !quiet,
            warnings: self.console.warnings && !no_warnings,
            formatted: self.console.formatted && !unformatted,
        }
    }
}
