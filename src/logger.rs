//! Tag-based console logging for rsiwatch
//!
//! Colored console output with a per-module tag. Errors and warnings are
//! always shown, info is the normal operating log, and debug lines are only
//! shown when the matching `--debug-<tag>` flag is present.

use crate::arguments::has_arg;
use chrono::Utc;
use colored::*;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    System,
    Monitor,
    Market,
    Indicator,
    Alert,
    Telegram,
}

impl LogTag {
    pub fn label(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Monitor => "MONITOR",
            LogTag::Market => "MARKET",
            LogTag::Indicator => "INDICATOR",
            LogTag::Alert => "ALERT",
            LogTag::Telegram => "TELEGRAM",
        }
    }

    /// Command-line flag that enables debug output for this tag
    pub fn debug_flag(&self) -> &'static str {
        match self {
            LogTag::System => "--debug-system",
            LogTag::Monitor => "--debug-monitor",
            LogTag::Market => "--debug-market",
            LogTag::Indicator => "--debug-indicator",
            LogTag::Alert => "--debug-alert",
            LogTag::Telegram => "--debug-telegram",
        }
    }
}

fn timestamp() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}

fn write_line(prefix: ColoredString, tag: LogTag, message: &str) {
    println!(
        "{} {} {} {}",
        prefix,
        tag.label().bold(),
        format!("[{}]", timestamp()).dimmed(),
        message
    );
    io::stdout().flush().ok();
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    write_line("ℹ".blue().bold(), tag, message);
}

/// Log at WARNING level (important but non-fatal issues)
pub fn warning(tag: LogTag, message: &str) {
    println!(
        "{} {} {} {}",
        "⚠".yellow().bold(),
        tag.label().bold(),
        format!("[{}]", timestamp()).dimmed(),
        message.yellow()
    );
    io::stdout().flush().ok();
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    println!(
        "{} {} {} {}",
        "❌".red().bold(),
        tag.label().bold(),
        format!("[{}]", timestamp()).dimmed(),
        message.red()
    );
    io::stdout().flush().ok();
}

/// Log at DEBUG level, shown only with the tag's `--debug-<tag>` flag
pub fn debug(tag: LogTag, message: &str) {
    if !has_arg(tag.debug_flag()) {
        return;
    }
    println!(
        "{} {} {} {}",
        "🐛".purple().bold(),
        tag.label().bold(),
        format!("[{}]", timestamp()).dimmed(),
        message.dimmed()
    );
    io::stdout().flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flags_match_labels() {
        let tags = [
            LogTag::System,
            LogTag::Monitor,
            LogTag::Market,
            LogTag::Indicator,
            LogTag::Alert,
            LogTag::Telegram,
        ];
        for tag in tags {
            let flag = tag.debug_flag();
            assert!(flag.starts_with("--debug-"));
            assert_eq!(
                flag.trim_start_matches("--debug-"),
                tag.label().to_lowercase()
            );
        }
    }
}
