//! Installation status checks.

use serde::Serialize;

use crate::config::ModeConfig;
use crate::layout::{DirectoryProvider, InstallLayout};
use crate::release::target_version;
use crate::version::{VersionComparison, compare_versions};

/// Reported as the current version when the marker file cannot be read.
pub const UNKNOWN_VERSION: &str = "Unknown";

/// State of the language server installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstallationStatus {
    /// No executable in the install directory
    NotInstalled,
    /// Installed at the target version
    Installed { version: String },
    /// Installed version is older than the target, or unknown
    Outdated { current: String, latest: String },
    /// Installed version is newer than this build supports
    Unsupported { current: String, latest: String },
}

impl InstallationStatus {
    /// Whether running the install pipeline would bring the installation up to date.
    pub fn needs_install(&self) -> bool {
        matches!(self, Self::NotInstalled | Self::Outdated { .. })
    }

    /// Version recorded on disk, when one is known.
    pub fn installed_version(&self) -> Option<&str> {
        match self {
            Self::NotInstalled => None,
            Self::Installed { version } => Some(version.as_str()),
            Self::Outdated { current, .. } | Self::Unsupported { current, .. } => {
                (current != UNKNOWN_VERSION).then_some(current.as_str())
            }
        }
    }
}

impl std::fmt::Display for InstallationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInstalled => f.write_str("not installed"),
            Self::Installed { version } => write!(f, "installed (v{})", version),
            Self::Outdated { current, latest } => {
                write!(f, "outdated ({} -> {})", current, latest)
            }
            Self::Unsupported { current, latest } => {
                write!(f, "unsupported ({} is newer than {})", current, latest)
            }
        }
    }
}

/// Inspect the install directory. Never fails: filesystem problems degrade to
/// `NotInstalled` or `Outdated { current: "Unknown", .. }`.
pub(crate) async fn check_installation(
    directories: &dyn DirectoryProvider,
    mode: &ModeConfig,
) -> InstallationStatus {
    let dir = match directories.resolve() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!("Failed to resolve install directory: {}", e);
            return InstallationStatus::NotInstalled;
        }
    };
    let layout = InstallLayout::new(dir);

    let executable_present = tokio::fs::metadata(layout.executable())
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !executable_present {
        return InstallationStatus::NotInstalled;
    }

    let latest = target_version(mode);

    match tokio::fs::read_to_string(layout.version_file()).await {
        Ok(stored) if !stored.trim().is_empty() => classify(stored.trim(), latest),
        Ok(_) => unknown(latest),
        Err(e) => {
            tracing::debug!("Version marker unreadable: {}", e);
            unknown(latest)
        }
    }
}

fn classify(current: &str, latest: String) -> InstallationStatus {
    match compare_versions(current, &latest) {
        VersionComparison::Older => InstallationStatus::Outdated {
            current: current.to_string(),
            latest,
        },
        VersionComparison::Same => InstallationStatus::Installed {
            version: current.to_string(),
        },
        VersionComparison::Newer => InstallationStatus::Unsupported {
            current: current.to_string(),
            latest,
        },
    }
}

fn unknown(latest: String) -> InstallationStatus {
    InstallationStatus::Outdated {
        current: UNKNOWN_VERSION.to_string(),
        latest,
    }
}
