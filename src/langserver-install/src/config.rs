//! Installer configuration and deployment mode.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::DEFAULT_RELEASE_BASE_URL;

/// Overrides the `~/.langserver` home directory.
pub const ENV_HOME: &str = "LANGSERVER_HOME";
/// Overrides [`InstallerConfig::enterprise_mode`].
pub const ENV_ENTERPRISE_MODE: &str = "LANGSERVER_ENTERPRISE_MODE";
/// Overrides [`InstallerConfig::portal_url`].
pub const ENV_PORTAL_URL: &str = "LANGSERVER_PORTAL_URL";
/// Overrides [`InstallerConfig::enterprise_version`].
pub const ENV_ENTERPRISE_VERSION: &str = "LANGSERVER_ENTERPRISE_VERSION";
/// Overrides [`InstallerConfig::install_dir`].
pub const ENV_INSTALL_DIR: &str = "LANGSERVER_INSTALL_DIR";

const CONFIG_FILE_NAME: &str = "config.json";

/// The three values that select between community and enterprise mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeConfig {
    /// Enterprise flag
    pub enterprise_mode: bool,
    /// Enterprise portal base URL
    pub portal_url: String,
    /// Language server version pinned by the enterprise portal
    pub enterprise_version: String,
}

impl ModeConfig {
    /// Community settings: no enterprise values at all.
    pub fn community() -> Self {
        Self::default()
    }

    /// Enterprise settings with the flag turned on.
    pub fn enterprise(portal_url: impl Into<String>, enterprise_version: impl Into<String>) -> Self {
        Self {
            enterprise_mode: true,
            portal_url: portal_url.into(),
            enterprise_version: enterprise_version.into(),
        }
    }

    /// Enterprise mode is active only when the flag is set and both the portal
    /// URL and the version are non-empty. Anything else is community mode.
    pub fn is_enterprise(&self) -> bool {
        self.enterprise_mode
            && !self.portal_url.trim().is_empty()
            && !self.enterprise_version.trim().is_empty()
    }
}

/// Read-only source of the deployment mode, polled once per operation.
pub trait ConfigSource: Send + Sync {
    /// Current mode values.
    fn mode_config(&self) -> ModeConfig;
}

impl ConfigSource for ModeConfig {
    fn mode_config(&self) -> ModeConfig {
        self.clone()
    }
}

impl<F> ConfigSource for F
where
    F: Fn() -> ModeConfig + Send + Sync,
{
    fn mode_config(&self) -> ModeConfig {
        self()
    }
}

/// User configuration for the installer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Enterprise flag
    #[serde(default)]
    pub enterprise_mode: bool,

    /// Enterprise portal base URL
    #[serde(default)]
    pub portal_url: String,

    /// Enterprise language server version
    #[serde(default)]
    pub enterprise_version: String,

    /// Install directory (default: ~/.langserver/bin)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,

    /// Host serving community releases
    #[serde(default = "default_release_base_url")]
    pub release_base_url: String,

    /// Timeout for the archive download in seconds (default: 300)
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

fn default_release_base_url() -> String {
    DEFAULT_RELEASE_BASE_URL.to_string()
}

fn default_download_timeout_secs() -> u64 {
    300
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            enterprise_mode: false,
            portal_url: String::new(),
            enterprise_version: String::new(),
            install_dir: None,
            release_base_url: default_release_base_url(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

impl InstallerConfig {
    /// Home directory for the installer: `$LANGSERVER_HOME` or `~/.langserver`.
    pub fn home_dir() -> Option<PathBuf> {
        match std::env::var_os(ENV_HOME) {
            Some(home) if !home.is_empty() => Some(PathBuf::from(home)),
            _ => dirs::home_dir().map(|h| h.join(".langserver")),
        }
    }

    /// Path of the config file inside [`Self::home_dir`].
    pub fn config_path() -> Option<PathBuf> {
        Self::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
    }

    /// Load config from the standard location, then apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Load config from a file. A missing or unreadable file yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!("Failed to read config {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let path = Self::config_path().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "No home directory")
        })?;
        self.save_to(&path)
    }

    /// Save config to a specific file, creating its parent directory.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
    }

    /// Apply `LANGSERVER_*` overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ENTERPRISE_MODE) {
            self.enterprise_mode = parse_flag(&value);
        }
        if let Some(value) = lookup(ENV_PORTAL_URL) {
            self.portal_url = value;
        }
        if let Some(value) = lookup(ENV_ENTERPRISE_VERSION) {
            self.enterprise_version = value;
        }
        if let Some(value) = lookup(ENV_INSTALL_DIR).filter(|v| !v.is_empty()) {
            self.install_dir = Some(PathBuf::from(value));
        }
    }

    /// Mode values carried by this config.
    pub fn mode(&self) -> ModeConfig {
        ModeConfig {
            enterprise_mode: self.enterprise_mode,
            portal_url: self.portal_url.clone(),
            enterprise_version: self.enterprise_version.clone(),
        }
    }

    /// Download timeout as a [`Duration`].
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl ConfigSource for InstallerConfig {
    fn mode_config(&self) -> ModeConfig {
        self.mode()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
