//! Command dispatch.

use anyhow::Result;

use langserver_install::{InstallerConfig, LanguageServerManager};

use super::args::{Cli, Commands};

/// Effective config: file, then environment, then command line flags.
pub fn effective_config(cli: &Cli) -> InstallerConfig {
    let mut config = InstallerConfig::load();
    if let Some(dir) = &cli.install_dir {
        config.install_dir = Some(dir.clone());
    }
    config
}

/// Dispatch the parsed command line to its handler.
pub async fn dispatch_command(cli: Cli) -> Result<()> {
    let config = effective_config(&cli);
    tracing::debug!("Effective config: {:?}", config);

    match cli.command {
        Commands::Config(config_cli) => config_cli.run(&config),
        Commands::Status(status_cli) => {
            status_cli.run(&LanguageServerManager::new(config)).await
        }
        Commands::Install(install_cli) => {
            install_cli.run(&LanguageServerManager::new(config)).await
        }
        Commands::Uninstall(uninstall_cli) => {
            uninstall_cli.run(&LanguageServerManager::new(config)).await
        }
    }
}
