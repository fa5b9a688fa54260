use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Optional on-disk settings (~/.mac-cleanup/config.toml)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Filesystem whose free space is reported before and after the sweep
    #[serde(default = "default_filesystem_root")]
    pub filesystem_root: PathBuf,

    /// Seconds between privilege renewals
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
}

fn default_filesystem_root() -> PathBuf {
    PathBuf::from("/")
}
fn default_keepalive_secs() -> u64 {
    crate::privilege::session::DEFAULT_RENEWAL_INTERVAL.as_secs()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            filesystem_root: default_filesystem_root(),
            keepalive_secs: default_keepalive_secs(),
        }
    }
}

impl Settings {
    /// Get the data directory (~/.mac-cleanup)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".mac-cleanup")
    }

    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Load settings from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`, or defaults if the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        if settings.keepalive_secs == 0 {
            anyhow::bail!(
                "Invalid config {}: keepalive_secs must be at least 1",
                path.display()
            );
        }
        Ok(settings)
    }
}

/// Everything a run needs, decided once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub verbose: bool,
    pub color: bool,
    pub update: bool,
    pub home: PathBuf,
    pub filesystem_root: PathBuf,
    pub keepalive_interval: Duration,
}

impl RunConfig {
    pub fn new(
        verbose: bool,
        color: bool,
        update: bool,
        home: PathBuf,
        settings: &Settings,
    ) -> Self {
        Self {
            verbose,
            color,
            update,
            home,
            filesystem_root: settings.filesystem_root.clone(),
            keepalive_interval: Duration::from_secs(settings.keepalive_secs.max(1)),
        }
    }
}

/// Decide whether diagnostics may be colored.
///
/// Off when asked, when stderr is not a terminal, when `NO_COLOR` is set to
/// anything non-empty, or when the terminal reports itself as `dumb`.
pub fn color_enabled(
    no_color_flag: bool,
    stderr_is_terminal: bool,
    no_color_env: Option<&str>,
    term: Option<&str>,
) -> bool {
    if no_color_flag || !stderr_is_terminal {
        return false;
    }
    if no_color_env.is_some_and(|v| !v.is_empty()) {
        return false;
    }
    !matches!(term, Some("dumb"))
}
