//! CLI argument structures and parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config_cmd::ConfigCli;
use crate::install_cmd::InstallCli;
use crate::status_cmd::StatusCli;
use crate::uninstall_cmd::UninstallCli;

/// Log level for tracing output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only show errors
    Error,
    /// Show warnings and errors (default)
    #[default]
    Warn,
    /// Show informational messages, warnings, and errors
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace-level details
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<LogLevel> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Manage the local language server installation.
#[derive(Debug, Parser)]
#[command(name = "langserver")]
#[command(author, version)]
#[command(about = "Install, inspect and remove the language server binary", long_about = None)]
pub struct Cli {
    /// Enable verbose output (debug level logging)
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    /// Enable trace level logging
    #[arg(long = "trace", global = true)]
    pub trace: bool,

    /// Install directory, overriding the config file and environment
    #[arg(long = "install-dir", value_name = "PATH", global = true)]
    pub install_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Level picked from the flags, then `LANGSERVER_LOG_LEVEL`.
    ///
    /// `None` means no explicit choice was made and `RUST_LOG` may decide.
    pub fn log_level(&self, env_level: Option<&str>) -> Option<LogLevel> {
        if self.trace {
            Some(LogLevel::Trace)
        } else if self.verbose {
            Some(LogLevel::Debug)
        } else {
            env_level.and_then(LogLevel::from_str_loose)
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the installation status
    #[command(display_order = 1)]
    Status(StatusCli),

    /// Download and install the language server
    #[command(display_order = 2)]
    Install(InstallCli),

    /// Remove the installed language server
    #[command(display_order = 3)]
    Uninstall(UninstallCli),

    /// Show the effective configuration
    #[command(display_order = 4)]
    Config(ConfigCli),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("langserver").chain(args.iter().copied())).unwrap()
    }

    // ==========================================================================
    // LogLevel tests
    // ==========================================================================

    #[test]
    fn test_log_level_default() {
        assert_eq!(LogLevel::default(), LogLevel::Warn);
    }

    #[test]
    fn test_log_level_from_str_loose() {
        assert_eq!(LogLevel::from_str_loose("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_str_loose("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str_loose(" Info "), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_str_loose("TrAcE"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_str_loose("verbose"), None);
        assert_eq!(LogLevel::from_str_loose(""), None);
    }

    #[test]
    fn test_log_level_precedence() {
        let cli = parse(&["--trace", "--verbose", "status"]);
        assert_eq!(cli.log_level(Some("error")), Some(LogLevel::Trace));

        let cli = parse(&["status", "-v"]);
        assert_eq!(cli.log_level(Some("error")), Some(LogLevel::Debug));

        let cli = parse(&["status"]);
        assert_eq!(cli.log_level(Some("info")), Some(LogLevel::Info));
        assert_eq!(cli.log_level(Some("nonsense")), None);
        assert_eq!(cli.log_level(None), None);
    }

    // ==========================================================================
    // Command parsing tests
    // ==========================================================================

    #[test]
    fn test_parse_status() {
        let cli = parse(&["status", "--json"]);
        match cli.command {
            Commands::Status(status) => assert!(status.json),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_install_force() {
        let cli = parse(&["install", "--force"]);
        assert!(matches!(cli.command, Commands::Install(InstallCli { force: true })));

        let cli = parse(&["install"]);
        assert!(matches!(cli.command, Commands::Install(InstallCli { force: false })));
    }

    #[test]
    fn test_global_install_dir() {
        let cli = parse(&["uninstall", "--install-dir", "/opt/langserver"]);
        assert_eq!(cli.install_dir, Some(PathBuf::from("/opt/langserver")));
        assert!(matches!(cli.command, Commands::Uninstall(_)));

        let cli = parse(&["--install-dir", "/tmp/ls", "config"]);
        assert_eq!(cli.install_dir, Some(PathBuf::from("/tmp/ls")));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["langserver"]).is_err());
        assert!(Cli::try_parse_from(["langserver", "upgrade"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
