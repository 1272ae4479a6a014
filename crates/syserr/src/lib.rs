//! # syserr
//!
//! Portable status codes that bridge independently designed error systems.
//!
//! A [`StatusCode`] is a domain reference plus a raw `i32`. The domain, a
//! [`StatusCodeDomain`] trait object, is the only thing that knows what
//! the value means: whether it is a failure, how to describe it, which
//! generic [`Errc`] it corresponds to, and whether it denotes the same
//! condition as a code from some other domain.
//!
//! Foreign `(value, category)` error codes enter through
//! [`StatusCode::from_foreign`], which wraps them under a
//! [`ForeignCodeDomain`] taken from the process-wide [`DomainRegistry`].
//!
//! ```
//! use syserr::{Errc, ErrorCode, StatusCode, system_category};
//!
//! let wrapped = StatusCode::from_foreign(ErrorCode::new(libc::ENOENT, system_category()))?;
//! assert!(wrapped.is_failure());
//! assert_eq!(wrapped, Errc::NoSuchFileOrDirectory);
//! assert_eq!(wrapped, StatusCode::posix(libc::ENOENT));
//! # Ok::<(), syserr::RegistryError>(())
//! ```
//!
//! ## Modules
//!
//! - `string_ref` - Literal / refcounted / hooked message strings
//! - `domain` - The domain trait and its identity
//! - `status` - The status code container
//! - `errc` - Generic error classification
//! - `generic` - Domain of `Errc` values
//! - `posix` - Domain of raw `errno` values
//! - `category` - The foreign error-code/category system
//! - `foreign` - Adapter domain over a foreign category
//! - `registry` - Deduplicating store of adapter domains
//! - `convert` - `std::io::Error` conversions
//! - `config` - Environment-driven configuration
//! - `error` - Error types

pub mod string_ref;
pub mod domain;
pub mod status;
pub mod errc;
pub mod generic;
pub mod posix;
pub mod category;
pub mod foreign;
pub mod registry;
pub mod convert;
pub mod config;
pub mod error;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use string_ref::{RawStringParts, StringRef, StringThunk, ThunkOp, ALLOC_FAILED_MESSAGE};
pub use domain::{DomainId, PayloadInfo, RaisedError, StatusCodeDomain};
pub use status::StatusCode;
pub use errc::Errc;
pub use generic::{GenericDomain, GENERIC_DOMAIN, GENERIC_DOMAIN_ID};
pub use posix::{PosixDomain, POSIX_DOMAIN, POSIX_DOMAIN_ID};
pub use category::{
    generic_category, same_category, system_category, ErrorCategory, ErrorCode, ErrorCondition,
    SystemError,
};
pub use foreign::ForeignCodeDomain;
pub use registry::{DomainRegistry, REGISTRY_CAPACITY};
pub use convert::{errc_for_kind, kind_for_errc};
pub use config::SyserrConfig;
pub use error::RegistryError;
