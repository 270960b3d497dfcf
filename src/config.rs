//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! Specifically, we try to find a sectionspy.toml, and if present we load settings from there.
//! Navigation behaviour lives under a `[nav]` table; everything left out falls back to the
//! defaults below.

use crate::error::ConfigError;
use facet::Facet;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

/// File looked up in the working directory by [`Config::load`].
pub const CONFIG_FILE: &str = "sectionspy.toml";

#[derive(Facet, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
/// When child entries of the navigation panel are shown.
pub enum ExpandBehaviour {
    /// Every level is always listed.
    #[default]
    Always,
    /// Children are listed only along the path to the active section.
    WhenActive,
    /// Only root sections are listed.
    Never,
}

#[derive(Facet, Clone, Debug, PartialEq)]
/// Options recognised by the navigation panel and its scroll spy.
pub struct NavConfig {
    #[facet(default = "Contents".to_string())]
    /// Title shown above the navigation entries.
    pub headline: String,
    #[facet(default = String::new())]
    /// Selector handed to the tracking service; empty means observation never starts.
    pub section_selector: String,
    #[facet(default = HashMap::new())]
    /// Maps heading markers such as `h2` to hierarchy depths.
    pub hierarchy_mapper: HashMap<String, usize>,
    #[facet(default)]
    /// Which navigation entries are listed.
    pub expand_behaviour: ExpandBehaviour,
    #[facet(default = false)]
    /// Activate the first registered section when nothing else is centred.
    pub activate_first_as_default: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            headline: "Contents".to_string(),
            section_selector: String::new(),
            hierarchy_mapper: HashMap::new(),
            expand_behaviour: ExpandBehaviour::Always,
            activate_first_as_default: false,
        }
    }
}

impl NavConfig {
    #[must_use]
    /// Hierarchy depth for a heading marker, if the mapper names it.
    pub fn depth_for(&self, marker: &str) -> Option<usize> {
        self.hierarchy_mapper.get(marker).copied()
    }
}

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from sectionspy.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 3)]
    /// Lines moved per scroll keypress.
    pub scroll_step: usize,
    #[facet(default)]
    /// Navigation panel and scroll spy options.
    pub nav: NavConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scroll_step: 3,
            nav: NavConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from sectionspy.toml in the working directory if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from `path`, using defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                facet_toml::from_str::<Self>(&contents).map_err(|e| ConfigError::Parse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
