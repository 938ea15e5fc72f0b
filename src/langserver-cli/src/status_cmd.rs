//! Status command - report the installation state.

use anyhow::Result;
use clap::Parser;

use langserver_install::{InstallationStatus, LanguageServerManager, ReleaseTarget};

/// Status CLI command.
#[derive(Debug, Parser)]
pub struct StatusCli {
    /// Print the status as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusCli {
    /// Run the status command.
    pub async fn run(self, manager: &LanguageServerManager) -> Result<()> {
        let status = manager.check().await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&status)?);
        } else {
            println!("{}", describe(&status, &manager.release_target()));
        }
        Ok(())
    }
}

/// Human readable status line.
fn describe(status: &InstallationStatus, target: &ReleaseTarget) -> String {
    let hint = match status {
        InstallationStatus::NotInstalled | InstallationStatus::Outdated { .. } => {
            "; run `langserver install`"
        }
        InstallationStatus::Installed { .. } => "",
        InstallationStatus::Unsupported { .. } => "; run `langserver install --force` to downgrade",
    };
    format!(
        "Language server {} [{} mode, target v{}]{}",
        status, target.mode, target.version, hint
    )
}
