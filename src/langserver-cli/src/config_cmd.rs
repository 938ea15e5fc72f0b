//! Config command - show the effective installer configuration.

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use langserver_install::{Arch, InstallerConfig, ReleaseTarget};

/// Config CLI command.
#[derive(Debug, Parser)]
pub struct ConfigCli {}

/// Config plus the values derived from it.
#[derive(Debug, Serialize)]
struct EffectiveConfig<'a> {
    config_file: Option<PathBuf>,
    install_dir: Option<PathBuf>,
    mode: &'static str,
    target_version: String,
    download_url: Option<String>,
    settings: &'a InstallerConfig,
}

impl<'a> EffectiveConfig<'a> {
    fn new(config: &'a InstallerConfig, arch: Arch) -> Self {
        let target = ReleaseTarget::resolve(&config.mode(), &config.release_base_url);
        let download_url = match target.download_url(arch) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        };

        Self {
            config_file: InstallerConfig::config_path(),
            install_dir: config
                .install_dir
                .clone()
                .or_else(|| InstallerConfig::home_dir().map(|h| h.join("bin"))),
            mode: target.mode.as_str(),
            target_version: target.version,
            download_url,
            settings: config,
        }
    }
}

impl ConfigCli {
    /// Run the config command.
    pub fn run(self, config: &InstallerConfig) -> Result<()> {
        let effective = EffectiveConfig::new(config, Arch::current());
        println!("{}", serde_json::to_string_pretty(&effective)?);
        Ok(())
    }
}
