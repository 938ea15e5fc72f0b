//! The install pipeline: download, uninstall, decompress, chmod, write marker.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::config::ModeConfig;
use crate::download::Downloader;
use crate::error::{InstallError, InstallResult};
use crate::layout::{DirectoryProvider, InstallLayout};
use crate::process::ProcessRunner;
use crate::release::{Arch, ReleaseTarget};
use crate::uninstall::remove_installation;

/// Program used to decompress the downloaded archive.
const DECOMPRESS_PROGRAM: &str = "gunzip";

/// Room for every step plus a trailing error, so the task never waits on a slow consumer.
const STEP_CHANNEL_CAPACITY: usize = 8;

/// Progress of a running install, in the order it is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallationStep {
    Downloading,
    Uninstalling,
    Decompressing,
    Done,
}

impl std::fmt::Display for InstallationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Downloading => "Downloading",
            Self::Uninstalling => "Uninstalling",
            Self::Decompressing => "Decompressing",
            Self::Done => "Done",
        })
    }
}

/// Progress events of one install. Ends after `Done`, or after a single `Err`.
pub type InstallStream = ReceiverStream<InstallResult<InstallationStep>>;

/// Holds the single-flight flag; clears it when dropped.
pub(crate) struct InstallGuard {
    flag: Arc<AtomicBool>,
}

impl InstallGuard {
    /// Take the flag, or `None` if another install holds it.
    pub(crate) fn try_acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self { flag: flag.clone() })
    }
}

impl Drop for InstallGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Deletes a file when dropped. Failures are only logged.
struct RemoveOnDrop(PathBuf);

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.0) {
            Ok(()) => tracing::debug!("Removed {}", self.0.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", self.0.display(), e),
        }
    }
}

/// Everything one install run needs, captured when the install starts.
pub(crate) struct Pipeline {
    pub(crate) directories: Arc<dyn DirectoryProvider>,
    pub(crate) runner: Arc<dyn ProcessRunner>,
    pub(crate) downloader: Downloader,
    pub(crate) mode: ModeConfig,
    pub(crate) release_base_url: String,
    pub(crate) arch: Arch,
}

/// Start an install unless one is already running on `flag`.
///
/// Must be called from within a Tokio runtime.
pub(crate) fn start(pipeline: Pipeline, flag: &Arc<AtomicBool>) -> InstallStream {
    let (tx, rx) = mpsc::channel(STEP_CHANNEL_CAPACITY);

    let Some(guard) = InstallGuard::try_acquire(flag) else {
        tracing::warn!("Language server installation already in progress");
        let _ = tx.try_send(Err(InstallError::AlreadyInstalling));
        return ReceiverStream::new(rx);
    };

    tokio::spawn(async move {
        let outcome = pipeline.execute(&tx).await;
        // Release before the terminal event so a consumer that saw it can
        // start another install right away.
        drop(guard);

        match outcome {
            Ok(()) => {
                tracing::info!("Language server installation finished");
                emit(&tx, InstallationStep::Done).await;
            }
            Err(e) => {
                tracing::warn!("Language server installation failed: {}", e);
                let _ = tx.send(Err(e)).await;
            }
        }
    });

    ReceiverStream::new(rx)
}

impl Pipeline {
    /// Run every step up to and including the marker write. `Done` is left
    /// to the caller, which must release the install flag first.
    async fn execute(&self, tx: &mpsc::Sender<InstallResult<InstallationStep>>) -> InstallResult<()> {
        let target = ReleaseTarget::resolve(&self.mode, &self.release_base_url);

        emit(tx, InstallationStep::Downloading).await;
        let url = target.download_url(self.arch)?;
        let dir = self
            .directories
            .resolve()
            .map_err(InstallError::DirectoryUnavailable)?;
        let layout = InstallLayout::new(dir);

        tracing::info!(
            "Downloading language server v{} ({} mode) from {}",
            target.version,
            target.mode,
            url
        );
        let download = self.downloader.fetch(&url).await?;

        let archive = layout.archive();
        tokio::fs::copy(download.path(), &archive)
            .await
            .map_err(|source| InstallError::CopyFailed {
                path: archive.clone(),
                source,
            })?;
        drop(download);
        let _archive_cleanup = RemoveOnDrop(archive.clone());

        emit(tx, InstallationStep::Uninstalling).await;
        remove_installation(&layout).await?;

        emit(tx, InstallationStep::Decompressing).await;
        self.decompress(&archive).await?;

        let executable = layout.executable();
        set_executable(&executable).await?;

        let version_file = layout.version_file();
        tokio::fs::write(&version_file, target.version.as_bytes())
            .await
            .map_err(|source| InstallError::PersistFailed {
                path: version_file,
                source,
            })?;

        tracing::info!(
            "Installed language server v{} at {}",
            target.version,
            executable.display()
        );
        Ok(())
    }

    async fn decompress(&self, archive: &Path) -> InstallResult<()> {
        let args = vec!["-f".to_string(), archive.display().to_string()];

        let status = self
            .runner
            .run(DECOMPRESS_PROGRAM, &args, &[])
            .await
            .map_err(|e| InstallError::DecompressionFailed {
                message: format!("Failed to run {}: {}", DECOMPRESS_PROGRAM, e),
            })?;

        if !status.success() {
            return Err(InstallError::DecompressionFailed {
                message: format!(
                    "{} {} exited with code {:?}",
                    DECOMPRESS_PROGRAM,
                    args.join(" "),
                    status.code
                ),
            });
        }

        Ok(())
    }
}

/// Send a step; a consumer that stopped listening does not stop the install.
async fn emit(tx: &mpsc::Sender<InstallResult<InstallationStep>>, step: InstallationStep) {
    tracing::debug!("Install step: {}", step);
    let _ = tx.send(Ok(step)).await;
}

/// Mode 0755 on Unix.
async fn set_executable(path: &Path) -> InstallResult<()> {
    let permission_error = |source: std::io::Error| InstallError::PermissionFailed {
        path: path.to_path_buf(),
        source,
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = tokio::fs::metadata(path)
            .await
            .map_err(permission_error)?
            .permissions();
        perms.set_mode(0o755);
        tokio::fs::set_permissions(path, perms)
            .await
            .map_err(permission_error)?;
    }

    #[cfg(not(unix))]
    {
        tokio::fs::metadata(path).await.map_err(permission_error)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_guard_is_exclusive_and_released_on_drop() {
        let flag = Arc::new(AtomicBool::new(false));

        let guard = InstallGuard::try_acquire(&flag).unwrap();
        assert!(flag.load(Ordering::SeqCst));
        assert!(InstallGuard::try_acquire(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::SeqCst));
        assert!(InstallGuard::try_acquire(&flag).is_some());
    }

    #[test]
    fn test_remove_on_drop() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("language_server.gz");
        std::fs::write(&path, b"gz").unwrap();

        drop(RemoveOnDrop(path.clone()));
        assert!(!path.exists());

        // Already gone is fine
        drop(RemoveOnDrop(path));
    }

    #[test]
    fn test_step_display() {
        let steps = [
            InstallationStep::Downloading,
            InstallationStep::Uninstalling,
            InstallationStep::Decompressing,
            InstallationStep::Done,
        ];
        let names: Vec<String> = steps.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["Downloading", "Uninstalling", "Decompressing", "Done"]);
    }

    #[tokio::test]
    async fn test_set_executable_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = set_executable(&temp.path().join("language_server"))
            .await
            .unwrap_err();
        assert!(matches!(err, InstallError::PermissionFailed { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_set_executable_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("language_server");
        std::fs::write(&path, b"bin").unwrap();

        set_executable(&path).await.unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
