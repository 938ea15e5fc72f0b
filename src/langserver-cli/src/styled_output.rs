//! Colored status messages that respect `NO_COLOR` and non-terminal output.

use std::io::IsTerminal;

const SUCCESS: &str = "\x1b[38;2;0;245;212m";
const WARNING: &str = "\x1b[38;2;255;200;87m";
const INFO: &str = "\x1b[38;2;72;202;228m";
const RESET: &str = "\x1b[0m";

/// Type of message, which selects the color and label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Warning,
    Info,
}

impl MessageType {
    fn color(self) -> &'static str {
        match self {
            MessageType::Success => SUCCESS,
            MessageType::Warning => WARNING,
            MessageType::Info => INFO,
        }
    }

    fn label(self) -> &'static str {
        match self {
            MessageType::Success => "done",
            MessageType::Warning => "warning",
            MessageType::Info => "info",
        }
    }
}

/// Check if colors should be disabled based on NO_COLOR env var.
fn colors_disabled() -> bool {
    std::env::var("NO_COLOR")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false)
}

/// `label: message`, colored when `colored` is set.
pub fn format_message(msg_type: MessageType, message: &str, colored: bool) -> String {
    if colored {
        format!("{}{}:{} {}", msg_type.color(), msg_type.label(), RESET, message)
    } else {
        format!("{}: {}", msg_type.label(), message)
    }
}

fn print_to_stdout(msg_type: MessageType, message: &str) {
    let colored = !colors_disabled() && std::io::stdout().is_terminal();
    println!("{}", format_message(msg_type, message, colored));
}

pub fn print_success(message: &str) {
    print_to_stdout(MessageType::Success, message);
}

pub fn print_info(message: &str) {
    print_to_stdout(MessageType::Info, message);
}

pub fn print_warning(message: &str) {
    print_to_stdout(MessageType::Warning, message);
}
