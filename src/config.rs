//! Configuration loaded from `~/.config/readably/config.toml`.
//!
//! ```toml
//! [exclusions]
//! # Replace the built-in list entirely (optional)
//! replace = ["H1", "H2", "NAV"]
//! add = ["ASIDE"]
//! remove = ["SPAN"]
//!
//! [hover]
//! leave = "clear"   # or "sticky" (default)
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::classify::ExclusionList;
use crate::error::{ReadablyError, Result};
use crate::hover::LeaveBehavior;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub exclusions: ExclusionConfig,
    #[serde(default)]
    pub hover: HoverConfig,
}

/// Overrides applied to the built-in exclusion list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExclusionConfig {
    /// Starting list instead of the defaults.
    pub replace: Option<Vec<String>>,
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub remove: Vec<String>,
}

impl ExclusionConfig {
    /// Build the effective list: `replace` (or the defaults), then `add`,
    /// then `remove`.
    pub fn build(&self) -> ExclusionList {
        let mut list = match &self.replace {
            Some(tags) => ExclusionList::from_tags(tags),
            None => ExclusionList::default(),
        };
        for tag in &self.add {
            list.insert(tag);
        }
        for tag in &self.remove {
            list.remove(tag);
        }
        list
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HoverConfig {
    #[serde(default)]
    pub leave: LeaveBehavior,
}

impl Config {
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| ReadablyError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }
}

/// Load the configuration from the default location.
///
/// Returns defaults if the file doesn't exist (configuration is optional).
pub fn load_config() -> Result<Config> {
    load_config_from(&config_path())
}

/// Load the configuration from `path`, or defaults if it doesn't exist.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = Config::from_toml(&content, path)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Return the path to the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("readably")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Config {
        Config::from_toml(toml_str, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn parse_empty_config() {
        let config = parse("");
        assert_eq!(config.exclusions.build(), ExclusionList::default());
        assert_eq!(config.hover.leave, LeaveBehavior::Sticky);
    }

    #[test]
    fn parse_add_and_remove() {
        let config = parse(
            r#"
[exclusions]
add = ["nav", "ASIDE"]
remove = ["span"]
"#,
        );
        let list = config.exclusions.build();
        assert!(list.contains("NAV"));
        assert!(list.contains("aside"));
        assert!(!list.contains("SPAN"));
        assert!(list.contains("H1"));
    }

    #[test]
    fn parse_replace() {
        let config = parse(
            r#"
[exclusions]
replace = ["footer"]
add = ["nav"]
"#,
        );
        let list = config.exclusions.build();
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["FOOTER", "NAV"]);
    }

    #[test]
    fn parse_leave_behavior() {
        let config = parse("[hover]\nleave = \"clear\"\n");
        assert_eq!(config.hover.leave, LeaveBehavior::Clear);
    }

    #[test]
    fn invalid_config_reports_path() {
        let err = Config::from_toml("[hover]\nleave = \"maybe\"\n", Path::new("/tmp/cfg.toml")).unwrap_err();
        assert!(matches!(err, ReadablyError::Config { .. }));
        assert!(err.to_string().contains("/tmp/cfg.toml"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml("[exclusion]\nadd = []\n", Path::new("x.toml")).is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = load_config_from(Path::new("/definitely/not/here/config.toml")).unwrap();
        assert!(config.exclusions.replace.is_none());
    }
}
