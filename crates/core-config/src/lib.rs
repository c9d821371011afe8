//! Configuration loading and parsing.
//!
//! Settings come from `vix.toml`, looked up in the current directory first
//! and then under the platform config directory (`<config>/vix/vix.toml`).
//! A missing file yields the defaults; a malformed file is an error so typos
//! are not silently swallowed. Unknown fields are ignored to allow forward
//! evolution without warnings.

use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "vix.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditingConfig {
    /// Soft-tab width: columns per indent unit for Tab, indent-aware motion,
    /// and shift commands.
    #[serde(default = "EditingConfig::default_tab_stop")]
    pub tab_stop: usize,
}

impl EditingConfig {
    fn default_tab_stop() -> usize {
        4
    }
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            tab_stop: Self::default_tab_stop(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Path of the trace log file. Logging is off unless `VIX_LOG` is set;
    /// this only controls where the output lands when it is on.
    #[serde(default = "LogConfig::default_file")]
    pub file: PathBuf,
}

impl LogConfig {
    fn default_file() -> PathBuf {
        PathBuf::from("vix.log")
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: Self::default_file(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub editing: EditingConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Loads from an explicit path, or discovers one when `path` is `None`.
    /// No file found anywhere means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => discover(),
        };
        match path {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        info!(path = %path.display(), tab_stop = config.editing.tab_stop, "config loaded");
        Ok(config)
    }
}

/// Current directory first, then the platform config directory.
fn discover() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        let local = cwd.join(CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(local);
        }
    }
    let global = dirs::config_dir()?.join("vix").join(CONFIG_FILE_NAME);
    global.is_file().then_some(global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_missing_path_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/vix.toml"))).is_err());
    }

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.editing.tab_stop, 4);
        assert_eq!(config.log.file, PathBuf::from("vix.log"));
    }

    #[test]
    fn parses_tab_stop() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[editing]\ntab_stop = 8").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.editing.tab_stop, 8);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn missing_sections_take_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[log]\nfile = \"/tmp/trace.log\"").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.editing.tab_stop, 4);
        assert_eq!(config.log.file, PathBuf::from("/tmp/trace.log"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[future]\nshiny = true\n[editing]\ntab_stop = 2").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.editing.tab_stop, 2);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[editing\ntab_stop = ").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }
}
