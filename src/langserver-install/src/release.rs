//! Release resolution: which version to expect and where to download it.

use url::Url;

use crate::LATEST_SUPPORTED_VERSION;
use crate::config::ModeConfig;
use crate::error::{InstallError, InstallResult};

/// CPU architecture family used in release asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    /// Apple silicon and other aarch64 targets
    Arm64,
    /// Everything else
    X64,
}

impl Arch {
    /// Architecture of the running build.
    pub fn current() -> Self {
        if cfg!(target_arch = "aarch64") {
            Self::Arm64
        } else {
            Self::X64
        }
    }

    /// Name used in release asset file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arm64 => "arm",
            Self::X64 => "x64",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment mode in effect for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    /// Fixed version from the public release host
    Community,
    /// Version and origin supplied by the enterprise portal
    Enterprise,
}

impl InstallMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Community => "community",
            Self::Enterprise => "enterprise",
        }
    }
}

impl std::fmt::Display for InstallMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version the installation should be at for the given mode.
pub fn target_version(mode: &ModeConfig) -> String {
    if mode.is_enterprise() {
        mode.enterprise_version.trim().to_string()
    } else {
        LATEST_SUPPORTED_VERSION.to_string()
    }
}

/// Target version and download origin for one install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTarget {
    pub mode: InstallMode,
    pub version: String,
    base_url: String,
}

impl ReleaseTarget {
    /// Resolve the target from the mode values. `release_base_url` is only
    /// used in community mode.
    pub fn resolve(mode: &ModeConfig, release_base_url: &str) -> Self {
        if mode.is_enterprise() {
            Self {
                mode: InstallMode::Enterprise,
                version: target_version(mode),
                base_url: mode.portal_url.trim().to_string(),
            }
        } else {
            Self {
                mode: InstallMode::Community,
                version: target_version(mode),
                base_url: release_base_url.trim().to_string(),
            }
        }
    }

    /// Release asset file name for an architecture.
    pub fn asset_name(arch: Arch) -> String {
        format!("language_server_macos_{}.gz", arch)
    }

    /// Build the archive URL.
    ///
    /// Fails with [`InstallError::DownloadFailed`] when the base URL does not
    /// form a valid http(s) URL.
    pub fn download_url(&self, arch: Arch) -> InstallResult<Url> {
        let raw = format!(
            "{}/language-server-v{}/{}",
            self.base_url.trim_end_matches('/'),
            self.version,
            Self::asset_name(arch)
        );

        let url = Url::parse(&raw)
            .map_err(|e| InstallError::download(&raw, format!("invalid download URL: {}", e)))?;

        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(InstallError::download(
                &raw,
                format!("unsupported download URL scheme: {}", url.scheme()),
            ));
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_RELEASE_BASE_URL;

    #[test]
    fn test_arch_names() {
        assert_eq!(Arch::Arm64.to_string(), "arm");
        assert_eq!(Arch::X64.to_string(), "x64");

        #[cfg(target_arch = "aarch64")]
        assert_eq!(Arch::current(), Arch::Arm64);

        #[cfg(target_arch = "x86_64")]
        assert_eq!(Arch::current(), Arch::X64);
    }

    #[test]
    fn test_target_version() {
        assert_eq!(target_version(&ModeConfig::community()), LATEST_SUPPORTED_VERSION);
        assert_eq!(
            target_version(&ModeConfig::enterprise("https://portal.example.com", " 1.9.2 ")),
            "1.9.2"
        );
        // Flag set without a version falls back to community
        assert_eq!(
            target_version(&ModeConfig::enterprise("https://portal.example.com", "")),
            LATEST_SUPPORTED_VERSION
        );
    }

    #[test]
    fn test_community_download_url() {
        let target = ReleaseTarget::resolve(&ModeConfig::community(), DEFAULT_RELEASE_BASE_URL);
        assert_eq!(target.mode, InstallMode::Community);

        let url = target.download_url(Arch::Arm64).unwrap();
        assert_eq!(
            url.as_str(),
            format!(
                "https://github.com/Exafunction/codeium/releases/download/language-server-v{}/language_server_macos_arm.gz",
                LATEST_SUPPORTED_VERSION
            )
        );
    }

    #[test]
    fn test_enterprise_download_url() {
        let mode = ModeConfig::enterprise("https://portal.example.com/releases/", "1.9.2");
        let target = ReleaseTarget::resolve(&mode, DEFAULT_RELEASE_BASE_URL);
        assert_eq!(target.mode, InstallMode::Enterprise);
        assert_eq!(target.version, "1.9.2");

        let url = target.download_url(Arch::X64).unwrap();
        assert_eq!(
            url.as_str(),
            "https://portal.example.com/releases/language-server-v1.9.2/language_server_macos_x64.gz"
        );
    }

    #[test]
    fn test_malformed_portal_url_is_download_failure() {
        let mode = ModeConfig::enterprise("not a url", "1.9.2");
        let target = ReleaseTarget::resolve(&mode, DEFAULT_RELEASE_BASE_URL);

        let err = target.download_url(Arch::X64).unwrap_err();
        assert!(matches!(err, InstallError::DownloadFailed { .. }));
    }

    #[test]
    fn test_non_http_scheme_is_rejected() {
        let mode = ModeConfig::enterprise("file:///srv/releases", "1.9.2");
        let target = ReleaseTarget::resolve(&mode, DEFAULT_RELEASE_BASE_URL);

        assert!(matches!(
            target.download_url(Arch::X64),
            Err(InstallError::DownloadFailed { .. })
        ));
    }
}
