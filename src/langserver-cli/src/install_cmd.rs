//! Install command - download and install the language server.

use anyhow::{Result, bail};
use clap::Parser;
use futures::{Stream, StreamExt};

use langserver_install::{
    InstallResult, InstallationStatus, InstallationStep, LanguageServerManager,
};

use crate::styled_output::{print_info, print_success, print_warning};

/// Install CLI command.
#[derive(Debug, Parser)]
pub struct InstallCli {
    /// Reinstall even when the installed version is current or newer
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// What to do for a probed status.
#[derive(Debug, PartialEq, Eq)]
enum Decision {
    Install,
    UpToDate,
    Refuse,
}

fn decide(status: &InstallationStatus, force: bool) -> Decision {
    if force || status.needs_install() {
        return Decision::Install;
    }
    match status {
        InstallationStatus::Unsupported { .. } => Decision::Refuse,
        _ => Decision::UpToDate,
    }
}

impl InstallCli {
    /// Run the install command.
    pub async fn run(self, manager: &LanguageServerManager) -> Result<()> {
        let status = manager.check().await;

        match decide(&status, self.force) {
            Decision::UpToDate => {
                print_info(&format!("Language server is {}", status));
                return Ok(());
            }
            Decision::Refuse => {
                print_warning(&format!(
                    "Language server is {}; use --force to install the supported version",
                    status
                ));
                return Ok(());
            }
            Decision::Install => {}
        }

        let target = manager.release_target();
        print_info(&format!(
            "Installing language server v{} ({} mode)",
            target.version, target.mode
        ));

        follow_steps(manager.install()).await?;
        print_success(&format!("Language server v{} installed", target.version));
        Ok(())
    }
}

/// Print progress until `Done`. Anything else ending the stream is a failure.
async fn follow_steps<S>(mut steps: S) -> Result<()>
where
    S: Stream<Item = InstallResult<InstallationStep>> + Unpin,
{
    while let Some(event) = steps.next().await {
        match event {
            Ok(InstallationStep::Done) => return Ok(()),
            Ok(step) => println!("  {}...", step),
            Err(e) => bail!("Installation failed: {}", e),
        }
    }

    bail!("Installation ended before completing")
}
