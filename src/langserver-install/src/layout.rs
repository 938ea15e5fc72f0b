//! Install directory provisioning and on-disk layout.

use std::path::{Path, PathBuf};

use crate::config::InstallerConfig;
use crate::{ARCHIVE_FILE_NAME, EXECUTABLE_NAME, VERSION_FILE_NAME};

/// Resolves the directory the language server is installed into.
///
/// Implementations must be idempotent; creating the directory is fine.
pub trait DirectoryProvider: Send + Sync {
    fn resolve(&self) -> std::io::Result<PathBuf>;
}

/// `$LANGSERVER_HOME/bin`, or `~/.langserver/bin`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeDirectories;

impl DirectoryProvider for HomeDirectories {
    fn resolve(&self) -> std::io::Result<PathBuf> {
        let home = InstallerConfig::home_dir().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine home directory",
            )
        })?;
        let dir = home.join("bin");
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

/// An explicit install directory.
#[derive(Debug, Clone)]
pub struct FixedDirectory {
    dir: PathBuf,
}

impl FixedDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DirectoryProvider for FixedDirectory {
    fn resolve(&self) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(self.dir.clone())
    }
}

/// Files owned by the installer inside the install directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    dir: PathBuf,
}

impl InstallLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/language_server`
    pub fn executable(&self) -> PathBuf {
        self.dir.join(EXECUTABLE_NAME)
    }

    /// `<dir>/version`
    pub fn version_file(&self) -> PathBuf {
        self.dir.join(VERSION_FILE_NAME)
    }

    /// `<dir>/language_server.gz`, present only while installing.
    pub fn archive(&self) -> PathBuf {
        self.dir.join(ARCHIVE_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let layout = InstallLayout::new("/opt/ls");
        assert_eq!(layout.dir(), Path::new("/opt/ls"));
        assert_eq!(layout.executable(), PathBuf::from("/opt/ls/language_server"));
        assert_eq!(layout.version_file(), PathBuf::from("/opt/ls/version"));
        assert_eq!(layout.archive(), PathBuf::from("/opt/ls/language_server.gz"));
    }

    #[test]
    fn test_fixed_directory_is_created_and_idempotent() {
        let temp = TempDir::new().unwrap();
        let provider = FixedDirectory::new(temp.path().join("a").join("b"));

        let first = provider.resolve().unwrap();
        assert!(first.is_dir());
        assert_eq!(provider.resolve().unwrap(), first);
    }

    #[test]
    fn test_fixed_directory_fails_under_a_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        std::fs::write(&file, b"x").unwrap();

        assert!(FixedDirectory::new(file.join("bin")).resolve().is_err());
    }
}
