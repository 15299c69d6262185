//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! We look for a nestlist.toml (or the file given with `--config`), and if present load
//! settings from there. Command-line flags override whatever the file says.

use facet::Facet;
use std::fs;
use std::path::Path;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "nestlist.toml";

#[derive(Facet, Clone, Debug)]
/// User preferences loaded from nestlist.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "./lol.txt".to_string())]
    /// Outline file used for saving and loading.
    pub file: String,
    #[facet(default = "~".to_string())]
    /// Suffix appended to the outline path for backups; empty turns backups off.
    pub backup_suffix: String,
    #[facet(default = 60)]
    /// Widest the list pane grows in the side-by-side layout.
    pub main_pane_max_width: u16,
    #[facet(default = 200)]
    /// Messages kept in the message pane history.
    pub message_history: usize,
    #[facet(default = "info".to_string())]
    /// Minimum level of messages shown in the message pane.
    pub log_level: String,
}

impl Default for Config {
    /// The values given by the `#[facet(default)]` attributes.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    fn default() -> Self {
        facet_toml::from_str::<Self>("").unwrap()
    }
}

impl Config {
    #[must_use]
    /// Load configuration from `path`, or from nestlist.toml when `path` is `None`.
    ///
    /// A missing or unparsable file yields the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        fs::read_to_string(path)
            .ok()
            .and_then(|contents| Self::parse(&contents))
            .unwrap_or_default()
    }

    #[must_use]
    /// Parses TOML text, filling unset keys with their defaults.
    pub fn parse(contents: &str) -> Option<Self> {
        facet_toml::from_str::<Self>(contents).ok()
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
