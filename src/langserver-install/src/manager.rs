//! Language server manager - main API for status, install and uninstall.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{ConfigSource, InstallerConfig, ModeConfig};
use crate::download::Downloader;
use crate::error::InstallResult;
use crate::install::{self, InstallStream, Pipeline};
use crate::layout::{DirectoryProvider, FixedDirectory, HomeDirectories};
use crate::probe::{InstallationStatus, check_installation};
use crate::process::{ProcessRunner, TokioProcessRunner};
use crate::release::{Arch, ReleaseTarget};
use crate::uninstall;

/// Manager for the language server installation.
///
/// Each manager owns its own single-flight flag: two installs through the
/// same manager never overlap, while separate managers are independent.
pub struct LanguageServerManager {
    directories: Arc<dyn DirectoryProvider>,
    runner: Arc<dyn ProcessRunner>,
    config: Arc<dyn ConfigSource>,
    downloader: Downloader,
    release_base_url: String,
    arch: Arch,
    installing: Arc<AtomicBool>,
}

impl LanguageServerManager {
    /// Create a manager from installer config.
    ///
    /// The config doubles as the mode source; use [`Self::with_config_source`]
    /// to read the enterprise settings from somewhere live instead.
    pub fn new(config: InstallerConfig) -> Self {
        let directories: Arc<dyn DirectoryProvider> = match &config.install_dir {
            Some(dir) => Arc::new(FixedDirectory::new(dir)),
            None => Arc::new(HomeDirectories),
        };

        Self {
            directories,
            runner: Arc::new(TokioProcessRunner),
            downloader: Downloader::new(config.download_timeout()),
            release_base_url: config.release_base_url.clone(),
            arch: Arch::current(),
            config: Arc::new(config),
            installing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Use a different install directory provider.
    pub fn with_directories(mut self, directories: impl DirectoryProvider + 'static) -> Self {
        self.directories = Arc::new(directories);
        self
    }

    /// Use a different process runner for decompression.
    pub fn with_process_runner(mut self, runner: impl ProcessRunner + 'static) -> Self {
        self.runner = Arc::new(runner);
        self
    }

    /// Use a different source for the enterprise settings.
    pub fn with_config_source(mut self, config: impl ConfigSource + 'static) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Override the detected architecture.
    pub fn with_arch(mut self, arch: Arch) -> Self {
        self.arch = arch;
        self
    }

    /// Current mode values.
    pub fn mode_config(&self) -> ModeConfig {
        self.config.mode_config()
    }

    /// Whether enterprise mode is active right now.
    pub fn is_enterprise(&self) -> bool {
        self.mode_config().is_enterprise()
    }

    /// Whether an install started by this manager is still running.
    pub fn is_installing(&self) -> bool {
        self.installing.load(Ordering::SeqCst)
    }

    /// Version and origin an install would use right now.
    pub fn release_target(&self) -> ReleaseTarget {
        ReleaseTarget::resolve(&self.mode_config(), &self.release_base_url)
    }

    /// Check the installation. Never fails.
    pub async fn check(&self) -> InstallationStatus {
        check_installation(self.directories.as_ref(), &self.mode_config()).await
    }

    /// Remove the executable and version marker.
    ///
    /// Not guarded against a concurrent [`Self::install`]; callers must not
    /// overlap the two.
    pub async fn uninstall(&self) -> InstallResult<()> {
        uninstall::uninstall(self.directories.as_ref()).await
    }

    /// Start an install and return its progress events.
    ///
    /// If an install is already running the stream yields a single
    /// `Err(AlreadyInstalling)`. Dropping the stream does not cancel the
    /// install. Must be called from within a Tokio runtime.
    pub fn install(&self) -> InstallStream {
        let pipeline = Pipeline {
            directories: self.directories.clone(),
            runner: self.runner.clone(),
            downloader: self.downloader.clone(),
            mode: self.mode_config(),
            release_base_url: self.release_base_url.clone(),
            arch: self.arch,
        };

        install::start(pipeline, &self.installing)
    }
}

impl Default for LanguageServerManager {
    fn default() -> Self {
        Self::new(InstallerConfig::load())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LATEST_SUPPORTED_VERSION;
    use crate::release::InstallMode;
    use std::sync::Mutex;

    #[test]
    fn test_mode_is_polled_per_call() {
        let mode = Arc::new(Mutex::new(ModeConfig::community()));
        let source = {
            let mode = mode.clone();
            move || mode.lock().unwrap().clone()
        };
        let manager =
            LanguageServerManager::new(InstallerConfig::default()).with_config_source(source);

        assert!(!manager.is_enterprise());
        assert_eq!(manager.release_target().version, LATEST_SUPPORTED_VERSION);

        *mode.lock().unwrap() = ModeConfig::enterprise("https://portal.example.com", "1.9.2");
        assert!(manager.is_enterprise());
        let target = manager.release_target();
        assert_eq!(target.mode, InstallMode::Enterprise);
        assert_eq!(target.version, "1.9.2");
    }

    #[test]
    fn test_config_mode_is_used_by_default() {
        let config = InstallerConfig {
            enterprise_mode: true,
            portal_url: "https://portal.example.com".to_string(),
            enterprise_version: "2.0.0".to_string(),
            ..InstallerConfig::default()
        };
        let manager = LanguageServerManager::new(config);

        assert!(manager.is_enterprise());
        assert!(!manager.is_installing());
    }
}
