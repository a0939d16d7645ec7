// Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub usb: UsbConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directories scanned when no paths are given on the command line.
    /// Unset means `SANE_DESC_PATH`, then the built-in directories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_dirs: Option<Vec<PathBuf>>,

    /// Extension of description files
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Number of files parsed concurrently ("auto" or a number)
    #[serde(default = "default_jobs")]
    pub jobs: String,

    /// Skip files that fail to parse instead of aborting
    #[serde(default)]
    pub keep_going: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            description_dirs: None,
            extension: default_extension(),
            jobs: default_jobs(),
            keep_going: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UsbConfig {
    /// Backends always reported by usb-backends
    #[serde(default)]
    pub include: Vec<String>,

    /// Backends never reported by usb-backends
    #[serde(default)]
    pub exclude: Vec<String>,
}

// Default values
pub const ENV_SANE_DESC_PATH: &str = "SANE_DESC_PATH";

pub const CONFIG_FILE_NAME: &str = ".sanedescrc.toml";

pub fn default_description_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("doc/descriptions"),
        PathBuf::from("doc/descriptions-external"),
    ]
}

fn default_extension() -> String {
    String::from(crate::utils::DESC_EXTENSION)
}

pub fn default_jobs() -> String {
    String::from("auto")
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // Check locations in order:
        // 1. .sanedescrc.toml (current directory)
        // 2. ~/.sanedescrc.toml (home directory)
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(CONFIG_FILE_NAME));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(CONFIG_FILE_NAME));
        }

        paths
            .iter()
            .find(|path| path.exists())
            .and_then(|path| Self::load_from_file(path))
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Configuration written by `--init-config`, with every setting spelled out
    pub fn template() -> Self {
        let mut config = Self::default();
        config.general.description_dirs = Some(default_description_dirs());
        config
    }

    /// Generate configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }

    /// Description directories: config file, then `SANE_DESC_PATH`, then defaults
    pub fn description_dirs(file_config: Option<&Config>) -> Vec<PathBuf> {
        let env_value = std::env::var(ENV_SANE_DESC_PATH).ok();
        Self::resolve_description_dirs(file_config, env_value.as_deref())
    }

    /// Same as [`Config::description_dirs`] with the environment value passed in
    pub fn resolve_description_dirs(
        file_config: Option<&Config>,
        env_value: Option<&str>,
    ) -> Vec<PathBuf> {
        if let Some(dirs) = file_config.and_then(|cfg| cfg.general.description_dirs.as_ref()) {
            return dirs.clone();
        }
        match env_value {
            Some(value) if !value.trim().is_empty() => Self::split_path_list(value),
            _ => default_description_dirs(),
        }
    }

    /// Split a colon separated directory list
    pub fn split_path_list(value: &str) -> Vec<PathBuf> {
        value
            .split(':')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect()
    }
}

/// Resolve a "jobs" setting to a worker count
pub fn resolve_jobs(jobs: &str) -> usize {
    if jobs == "auto" {
        std::thread::available_parallelism()
            .ok()
            .map(|n| n.get())
            .unwrap_or(4)
    } else {
        jobs.parse().unwrap_or(1).max(1)
    }
}
