//! Environment variable utilities
//!
//! Typed lookups with a fallback, used to build configuration from
//! compile-time defaults plus runtime overrides.
//!
//! ```ignore
//! use syserr_core::env::{env_get, env_get_bool};
//!
//! let warn_at: usize = env_get("SYSERR_REGISTRY_WARN_AT", 48);
//! let flush = env_get_bool("SYSERR_FLUSH_EPRINT", false);
//! ```

use std::str::FromStr;

/// Parse `key` as `T`, returning `default` when unset or unparsable.
#[inline]
pub fn env_get<T: FromStr>(key: &str, default: T) -> T {
    env_get_opt(key).unwrap_or(default)
}

/// Parse `key` as `T`, or `None` when unset or unparsable.
#[inline]
pub fn env_get_opt<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// `true` for `1|true|yes|on` (any case), `false` for any other value,
/// `default` when unset.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => parse_bool(&val),
        Err(_) => default,
    }
}

fn parse_bool(val: &str) -> bool {
    matches!(
        val.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
