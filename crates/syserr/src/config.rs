//! Runtime configuration
//!
//! Compile-time defaults, overridable from the environment:
//!
//! | Variable                  | Default | Meaning                              |
//! |---------------------------|---------|--------------------------------------|
//! | `SYSERR_LOG_LEVEL`        | `warn`  | `off`, `error`, `warn`, `info`, ...  |
//! | `SYSERR_FLUSH_EPRINT`     | `0`     | flush stderr after every log line    |
//! | `SYSERR_REGISTRY_WARN_AT` | `48`    | registry occupancy that logs a warn  |

use std::sync::OnceLock;

use syserr_core::env::{env_get, env_get_bool};
use syserr_core::log::{self, LogLevel, ENV_FLUSH, ENV_LOG_LEVEL};

use crate::registry::REGISTRY_CAPACITY;

pub const ENV_REGISTRY_WARN_AT: &str = "SYSERR_REGISTRY_WARN_AT";

/// Default occupancy at which the registry starts warning (3/4 full).
pub const DEFAULT_REGISTRY_WARN_AT: usize = REGISTRY_CAPACITY * 3 / 4;

/// Library configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyserrConfig {
    /// Diagnostic verbosity
    pub log_level: LogLevel,

    /// Flush stderr after each diagnostic line
    pub flush_log: bool,

    /// Slot count at which creating another adapter logs a warning
    pub registry_warn_at: usize,
}

impl Default for SyserrConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Warn,
            flush_log: false,
            registry_warn_at: DEFAULT_REGISTRY_WARN_AT,
        }
    }
}

impl SyserrConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by whatever the environment sets.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            log_level: env_get(ENV_LOG_LEVEL, d.log_level),
            flush_log: env_get_bool(ENV_FLUSH, d.flush_log),
            registry_warn_at: env_get(ENV_REGISTRY_WARN_AT, d.registry_warn_at),
        }
    }

    /// Process-wide configuration, read from the environment on first use.
    pub fn global() -> &'static SyserrConfig {
        static GLOBAL: OnceLock<SyserrConfig> = OnceLock::new();
        GLOBAL.get_or_init(SyserrConfig::from_env)
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn flush_log(mut self, enable: bool) -> Self {
        self.flush_log = enable;
        self
    }

    /// Set the warning threshold; `0` disables the warning.
    pub fn registry_warn_at(mut self, slots: usize) -> Self {
        self.registry_warn_at = slots;
        self
    }

    /// Push the logging settings into the process-wide logger.
    pub fn apply(&self) {
        log::set_log_level(self.log_level);
        log::set_flush_enabled(self.flush_log);
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.registry_warn_at > REGISTRY_CAPACITY {
            return Err("registry_warn_at exceeds registry capacity");
        }
        Ok(())
    }
}
