//! Uninstall command - remove the language server executable and version marker.

use anyhow::{Context, Result};
use clap::Parser;

use langserver_install::{InstallationStatus, LanguageServerManager};

use crate::styled_output::{print_info, print_success};

/// Uninstall CLI command.
#[derive(Debug, Parser)]
pub struct UninstallCli {}

impl UninstallCli {
    /// Run the uninstall command.
    pub async fn run(self, manager: &LanguageServerManager) -> Result<()> {
        let was_installed = manager.check().await != InstallationStatus::NotInstalled;

        // Always run: a stray version marker is removed as well
        manager
            .uninstall()
            .await
            .context("Failed to remove the language server")?;

        if was_installed {
            print_success("Language server removed");
        } else {
            print_info("Language server is not installed");
        }
        Ok(())
    }
}
