//! Langserver CLI library module.
//!
//! - `cli/` - CLI argument parsing and command dispatch
//! - Command modules - Individual CLI commands (`*_cmd.rs`)
//! - `styled_output` - Colored terminal messages

pub mod cli;
pub mod styled_output;

pub mod config_cmd;
pub mod install_cmd;
pub mod status_cmd;
pub mod uninstall_cmd;
