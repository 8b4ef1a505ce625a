//! Colored status messages on stderr.
//!
//! Colors follow `--color`. In `auto` mode they are used only when stderr is
//! a terminal and `NO_COLOR` is not set.

use std::io::IsTerminal;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::cli::ColorMode;

static COLOR_MODE: AtomicU8 = AtomicU8::new(0);

/// Set the process-wide color mode. Called once from `main`.
pub fn set_color_mode(mode: ColorMode) {
    let raw = match mode {
        ColorMode::Auto => 0,
        ColorMode::Always => 1,
        ColorMode::Never => 2,
    };
    COLOR_MODE.store(raw, Ordering::Relaxed);
}

/// Check if colors should be disabled based on NO_COLOR env var.
fn no_color_env() -> bool {
    std::env::var("NO_COLOR")
        .map(|v| !v.is_empty() && v != "0" && v.to_lowercase() != "false")
        .unwrap_or(false)
}

/// Whether messages on stderr should carry ANSI colors.
pub fn colors_enabled() -> bool {
    match COLOR_MODE.load(Ordering::Relaxed) {
        1 => true,
        2 => false,
        _ => !no_color_env() && std::io::stderr().is_terminal(),
    }
}

/// Message type for styled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Error,
    Warning,
    Info,
}

impl MessageType {
    fn icon(&self) -> &'static str {
        match self {
            MessageType::Error => "[ERROR]",
            MessageType::Warning => "[WARN]",
            MessageType::Info => "[INFO]",
        }
    }

    fn color(&self) -> &'static str {
        match self {
            MessageType::Error => "\x1b[38;2;255;107;107m", // #FF6B6B
            MessageType::Warning => "\x1b[38;2;255;200;87m", // #FFC857
            MessageType::Info => "\x1b[38;2;72;202;228m",   // #48CAE4
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Format one message, with or without color.
pub fn format_styled(msg_type: MessageType, message: &str, colored: bool) -> String {
    if colored {
        format!("{}{} {}{}", msg_type.color(), msg_type.icon(), message, RESET)
    } else {
        format!("{} {}", msg_type.icon(), message)
    }
}

fn print_styled(msg_type: MessageType, message: &str) {
    eprintln!("{}", format_styled(msg_type, message, colors_enabled()));
}

pub fn print_error(message: &str) {
    print_styled(MessageType::Error, message);
}

pub fn print_warning(message: &str) {
    print_styled(MessageType::Warning, message);
}

pub fn print_info(message: &str) {
    print_styled(MessageType::Info, message);
}
