#![deny(missing_docs)]
//! Shared logging utilities for the workshop workspace.
//!
//! This crate provides the `workshop_*` logging macros used across the
//! codebase, the logger setup for the front-end and a minimal test
//! initializer for the global logger.

use std::cell::RefCell;
use std::fs::File;
use std::path::PathBuf;

#[doc(hidden)]
pub use log;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./workshop.log";

thread_local! {
    /// Short tag of the workshop session handled by the current thread.
    static SESSION_TAG: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Sets the session tag that prefixes every log line emitted from this thread.
///
/// Only the first eight characters of the session id are kept.
pub fn set_session_tag(session_id: &str) {
    let short: String = session_id.chars().take(8).collect();
    SESSION_TAG.with(|tag| *tag.borrow_mut() = Some(short));
}

/// Clears the session tag of the current thread.
pub fn clear_session_tag() {
    SESSION_TAG.with(|tag| *tag.borrow_mut() = None);
}

/// Returns the session tag of the current thread, or `-` when none is set.
pub fn session_tag() -> String {
    SESSION_TAG.with(|tag| tag.borrow().clone().unwrap_or_else(|| "-".to_string()))
}

/// Logs a trace-level message tagged with the current session.
#[macro_export]
macro_rules! workshop_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current session.
#[macro_export]
macro_rules! workshop_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current session.
#[macro_export]
macro_rules! workshop_info {
    ($($arg:tt)*) => {{
        $crate::log::info!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current session.
#[macro_export]
macro_rules! workshop_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current session.
#[macro_export]
macro_rules! workshop_error {
    ($($arg:tt)*) => {{
        $crate::log::error!("[{}] {}", $crate::session_tag(), format_args!($($arg)*));
    }};
}

/// Destination for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogDestination {
    /// Write to `./workshop.log` in the current directory.
    #[default]
    File,
    /// Write to the terminal (stderr for warnings, stdout otherwise).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

impl LogDestination {
    /// Parses a destination name as used in configuration files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "file" => Some(Self::File),
            "terminal" => Some(Self::Terminal),
            "both" => Some(Self::Both),
            _ => None,
        }
    }
}

/// Initializes the global logger with the given destination and level.
///
/// A file destination that cannot be created falls back to no file output.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = build_config();

    let loggers: Vec<Box<dyn SharedLogger>> = match destination {
        LogDestination::File => create_file_logger(level, config).into_iter().collect(),
        LogDestination::Terminal => vec![TermLogger::new(
            level,
            config,
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )],
        LogDestination::Both => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
                level,
                config.clone(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            )];
            if let Some(file_logger) = create_file_logger(level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    if loggers.is_empty() {
        return;
    }
    let _ = CombinedLogger::init(loggers);
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<dyn SharedLogger>> {
    let log_path = PathBuf::from(LOG_FILE);
    match File::create(&log_path) {
        Ok(file) => {
            let logger: Box<dyn SharedLogger> = WriteLogger::new(level, config, file);
            Some(logger)
        }
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_tag_is_shortened_and_cleared() {
        set_session_tag("0123456789abcdef");
        assert_eq!(session_tag(), "01234567");
        clear_session_tag();
        assert_eq!(session_tag(), "-");
    }

    #[test]
    fn destination_names_parse_case_insensitively() {
        assert_eq!(LogDestination::from_name("Both"), Some(LogDestination::Both));
        assert_eq!(LogDestination::from_name(" terminal "), Some(LogDestination::Terminal));
        assert_eq!(LogDestination::from_name("syslog"), None);
    }

    #[test]
    fn macros_expand_without_a_logger() {
        workshop_info!("value={}", 3);
        workshop_debug!("plain");
    }
}
