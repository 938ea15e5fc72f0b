//! Error types for langserver-install.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for install operations.
pub type InstallResult<T> = std::result::Result<T, InstallError>;

/// Errors raised by the mutating operations (install and uninstall).
///
/// Read-only queries never produce these; they fall back to a conservative
/// [`InstallationStatus`](crate::InstallationStatus) instead.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Language server installation already in progress")]
    AlreadyInstalling,

    #[error("Failed to resolve install directory: {0}")]
    DirectoryUnavailable(#[source] std::io::Error),

    // Download errors
    #[error("Download from {url} failed: {message}")]
    DownloadFailed { url: String, message: String },

    #[error("Failed to copy archive to {path}: {source}")]
    CopyFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    // Installation errors
    #[error("Decompression failed: {message}")]
    DecompressionFailed { message: String },

    #[error("Failed to make {path} executable: {source}")]
    PermissionFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write version marker {path}: {source}")]
    PersistFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    // Uninstall errors
    #[error("Failed to remove {path}: {source}")]
    RemovalFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl InstallError {
    /// Check if a later attempt could succeed without any local change.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::DownloadFailed { .. })
    }

    pub(crate) fn download(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::DownloadFailed {
            url: url.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_download_errors_are_retriable() {
        assert!(InstallError::download("https://example.com/a.gz", "timed out").is_retriable());
        assert!(!InstallError::AlreadyInstalling.is_retriable());
        assert!(
            !InstallError::DecompressionFailed {
                message: "exit code 1".to_string()
            }
            .is_retriable()
        );
    }

    #[test]
    fn test_display_includes_url() {
        let err = InstallError::download("https://example.com/a.gz", "status 404");
        assert_eq!(
            err.to_string(),
            "Download from https://example.com/a.gz failed: status 404"
        );
    }
}
