//! # syserr-core
//!
//! Platform-agnostic primitives shared by the `syserr` crates.
//!
//! Nothing in here knows about error domains. It exists so that the
//! domain model can take a short spinlock, emit a leveled log line, or
//! read a tunable from the environment without pulling in a dependency.
//!
//! ## Modules
//!
//! - `spin` - Spinlock for short, bounded critical sections
//! - `log` - Leveled stderr logging macros
//! - `env` - Environment variable utilities

pub mod spin;
pub mod log;
pub mod env;

// Re-exports for convenience
pub use spin::{SpinLock, SpinLockGuard};
pub use log::LogLevel;
pub use env::{env_get, env_get_bool, env_get_opt};
