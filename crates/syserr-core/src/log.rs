//! Leveled stderr logging
//!
//! A library-sized take on kernel `printk`: one atomic level, one stderr
//! lock per line, optional flush after every write. Quiet by default
//! (`Warn`), since the code using it sits on error paths of other programs.
//!
//! # Environment Variables
//!
//! - `SYSERR_LOG_LEVEL=<level>` - `off|error|warn|info|debug|trace` or `0..5`
//! - `SYSERR_FLUSH_EPRINT=1` - Flush stderr after each line
//!
//! # Usage
//!
//! ```ignore
//! use syserr_core::{log_debug, log_warn};
//!
//! log_debug!("registry slot {} -> {}", index, name);
//! log_warn!("registry {} of {} slots used", used, capacity);
//! ```

use std::io::Write;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Once;

use crate::env::{env_get, env_get_bool};

/// Environment variable holding the log level.
pub const ENV_LOG_LEVEL: &str = "SYSERR_LOG_LEVEL";

/// Environment variable enabling flush-after-write.
pub const ENV_FLUSH: &str = "SYSERR_FLUSH_EPRINT";

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub const fn from_u8(v: u8) -> Self {
        match v {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            LogLevel::Off => "",
            LogLevel::Error => "[syserr ERROR]",
            LogLevel::Warn => "[syserr WARN] ",
            LogLevel::Info => "[syserr INFO] ",
            LogLevel::Debug => "[syserr DEBUG]",
            LogLevel::Trace => "[syserr TRACE]",
        }
    }
}

/// Error type for an unrecognized level string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(pub String);

impl std::fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized log level: {:?}", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "0" => Ok(LogLevel::Off),
            "error" | "1" => Ok(LogLevel::Error),
            "warn" | "2" => Ok(LogLevel::Warn),
            "info" | "3" => Ok(LogLevel::Info),
            "debug" | "4" => Ok(LogLevel::Debug),
            "trace" | "5" => Ok(LogLevel::Trace),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

static LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Warn as u8);
static FLUSH: AtomicBool = AtomicBool::new(false);
static ENV_READ: Once = Once::new();

/// Read `SYSERR_LOG_LEVEL` / `SYSERR_FLUSH_EPRINT` once.
///
/// Runs implicitly before the first level check. Settings made through
/// [`set_log_level`] or [`set_flush_enabled`] after that win.
pub fn init_from_env() {
    ENV_READ.call_once(|| {
        let level: LogLevel = env_get(ENV_LOG_LEVEL, LogLevel::Warn);
        LEVEL.store(level as u8, Ordering::Relaxed);
        FLUSH.store(env_get_bool(ENV_FLUSH, false), Ordering::Relaxed);
    });
}

#[inline]
pub fn log_level() -> LogLevel {
    init_from_env();
    LogLevel::from_u8(LEVEL.load(Ordering::Relaxed))
}

pub fn set_log_level(level: LogLevel) {
    init_from_env();
    LEVEL.store(level as u8, Ordering::Relaxed);
}

#[inline]
pub fn flush_enabled() -> bool {
    init_from_env();
    FLUSH.load(Ordering::Relaxed)
}

pub fn set_flush_enabled(enabled: bool) {
    init_from_env();
    FLUSH.store(enabled, Ordering::Relaxed);
}

#[inline]
pub fn level_enabled(level: LogLevel) -> bool {
    level != LogLevel::Off && level <= log_level()
}

#[doc(hidden)]
pub fn _log_impl(level: LogLevel, args: std::fmt::Arguments<'_>) {
    if !level_enabled(level) {
        return;
    }
    let stderr = std::io::stderr();
    let mut out = stderr.lock();
    let _ = writeln!(out, "{} {}", level.tag(), args);
    if flush_enabled() {
        let _ = out.flush();
    }
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::log::_log_impl($crate::log::LogLevel::Error, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::log::_log_impl($crate::log::LogLevel::Warn, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::log::_log_impl($crate::log::LogLevel::Info, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::log::_log_impl($crate::log::LogLevel::Debug, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        $crate::log::_log_impl($crate::log::LogLevel::Trace, format_args!($($arg)*))
    };
}
