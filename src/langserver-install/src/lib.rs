//! Langserver Install - detection and installation of the language server binary.
//!
//! Provides:
//! - Installation status checks against the version marker on disk
//! - Numeric version comparison
//! - Community and enterprise release resolution
//! - A single-flight download, replace and decompress pipeline with progress events
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use langserver_install::{InstallerConfig, InstallationStatus, LanguageServerManager};
//!
//! let manager = LanguageServerManager::new(InstallerConfig::load());
//!
//! if manager.check().await.needs_install() {
//!     let mut steps = manager.install();
//!     while let Some(step) = steps.next().await {
//!         println!("{}", step?);
//!     }
//! }
//! ```

mod config;
mod download;
mod error;
mod install;
mod layout;
mod manager;
mod probe;
mod process;
mod release;
mod uninstall;
mod version;

pub use config::{ConfigSource, InstallerConfig, ModeConfig};
pub use download::{Downloader, USER_AGENT};
pub use error::{InstallError, InstallResult};
pub use install::{InstallStream, InstallationStep};
pub use layout::{DirectoryProvider, FixedDirectory, HomeDirectories, InstallLayout};
pub use manager::LanguageServerManager;
pub use probe::{InstallationStatus, UNKNOWN_VERSION};
pub use process::{ProcessRunner, ProcessStatus, TokioProcessRunner};
pub use release::{Arch, InstallMode, ReleaseTarget, target_version};
pub use version::{VersionComparison, compare_versions};

/// Newest language server version this build knows how to drive.
pub const LATEST_SUPPORTED_VERSION: &str = "1.8.5";

/// Default host for community release downloads.
pub const DEFAULT_RELEASE_BASE_URL: &str =
    "https://github.com/Exafunction/codeium/releases/download";

/// File name of the installed executable.
pub const EXECUTABLE_NAME: &str = "language_server";

/// File name of the version marker.
pub const VERSION_FILE_NAME: &str = "version";

/// File name of the archive while an install is running.
pub const ARCHIVE_FILE_NAME: &str = "language_server.gz";
