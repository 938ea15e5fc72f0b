//! Removal of an existing installation.

use std::path::Path;

use crate::error::{InstallError, InstallResult};
use crate::layout::{DirectoryProvider, InstallLayout};

/// Remove the executable and version marker. Missing directories are a no-op.
///
/// Not guarded by the install flag: do not call this while an install is running.
pub(crate) async fn uninstall(directories: &dyn DirectoryProvider) -> InstallResult<()> {
    let dir = match directories.resolve() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!("Skipping uninstall, install directory unavailable: {}", e);
            return Ok(());
        }
    };

    remove_installation(&InstallLayout::new(dir)).await
}

/// Remove the executable, then the marker. Either may already be gone.
pub(crate) async fn remove_installation(layout: &InstallLayout) -> InstallResult<()> {
    remove_if_present(&layout.executable()).await?;
    remove_if_present(&layout.version_file()).await
}

async fn remove_if_present(path: &Path) -> InstallResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            tracing::debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(InstallError::RemovalFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FixedDirectory;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct MissingHome;

    impl DirectoryProvider for MissingHome {
        fn resolve(&self) -> std::io::Result<PathBuf> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no home"))
        }
    }

    #[tokio::test]
    async fn test_uninstall_removes_both_files() {
        let temp = TempDir::new().unwrap();
        let layout = InstallLayout::new(temp.path());
        std::fs::write(layout.executable(), b"bin").unwrap();
        std::fs::write(layout.version_file(), b"1.8.5").unwrap();

        uninstall(&FixedDirectory::new(temp.path())).await.unwrap();

        assert!(!layout.executable().exists());
        assert!(!layout.version_file().exists());
    }

    #[tokio::test]
    async fn test_uninstall_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let layout = InstallLayout::new(temp.path());
        std::fs::write(layout.version_file(), b"1.8.5").unwrap();

        let directories = FixedDirectory::new(temp.path());
        uninstall(&directories).await.unwrap();
        uninstall(&directories).await.unwrap();

        assert!(!layout.version_file().exists());
    }

    #[tokio::test]
    async fn test_unresolvable_directory_is_noop() {
        uninstall(&MissingHome).await.unwrap();
    }

    #[tokio::test]
    async fn test_removal_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        let layout = InstallLayout::new(temp.path());
        // A directory where the executable should be cannot be removed as a file
        std::fs::create_dir(layout.executable()).unwrap();

        let err = remove_installation(&layout).await.unwrap_err();
        assert!(matches!(err, InstallError::RemovalFailed { path, .. } if path == layout.executable()));
    }
}
