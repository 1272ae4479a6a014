//! The status value: a domain reference plus a raw value.

use core::fmt;

use crate::category::ErrorCode;
use crate::domain::{RaisedError, StatusCodeDomain};
use crate::errc::Errc;
use crate::error::RegistryError;
use crate::generic::GENERIC_DOMAIN;
use crate::posix::POSIX_DOMAIN;
use crate::registry::DomainRegistry;
use crate::string_ref::StringRef;

/// A portable error-or-success outcome.
///
/// The raw `value` means nothing without its domain; every accessor below
/// defers to [`StatusCode::domain`].
///
/// # Comparison
///
/// `==` is *semantic*: two codes from different domains compare equal when
/// they denote the same condition. That relation is not transitive, so
/// `StatusCode` implements neither `Eq`, `Hash` nor `Ord`. Use
/// [`StatusCode::same_domain`] and [`StatusCode::value`] for exact matches.
#[derive(Clone, Copy)]
pub struct StatusCode {
    domain: &'static dyn StatusCodeDomain,
    value: i32,
}

// ── Construction ──────────────────────────────────────────────────

impl StatusCode {
    /// Tag `value` with `domain`. The domain must accept `value`'s meaning.
    #[inline]
    pub const fn new(domain: &'static dyn StatusCodeDomain, value: i32) -> Self {
        StatusCode { domain, value }
    }

    /// A code in the generic classification domain.
    #[inline]
    pub fn generic(errc: Errc) -> Self {
        StatusCode::new(&GENERIC_DOMAIN, errc.as_raw())
    }

    /// A raw errno in the POSIX domain.
    #[inline]
    pub fn posix(errno: i32) -> Self {
        StatusCode::new(&POSIX_DOMAIN, errno)
    }

    /// The calling thread's current `errno`.
    pub fn last_os_error() -> Self {
        StatusCode::posix(std::io::Error::last_os_error().raw_os_error().unwrap_or(0))
    }

    /// Wrap a foreign error code, creating its adapter domain in the
    /// process-wide registry on first use.
    pub fn from_foreign(code: ErrorCode) -> Result<Self, RegistryError> {
        DomainRegistry::global().wrap(code)
    }

    /// Wrap an `io::Error` through its foreign error code.
    pub fn from_io(err: &std::io::Error) -> Result<Self, RegistryError> {
        StatusCode::from_foreign(ErrorCode::from(err))
    }
}

impl From<Errc> for StatusCode {
    fn from(errc: Errc) -> Self {
        StatusCode::generic(errc)
    }
}

impl TryFrom<ErrorCode> for StatusCode {
    type Error = RegistryError;

    fn try_from(code: ErrorCode) -> Result<Self, Self::Error> {
        StatusCode::from_foreign(code)
    }
}

// ── Accessors ─────────────────────────────────────────────────────

impl StatusCode {
    #[inline]
    pub fn domain(&self) -> &'static dyn StatusCodeDomain {
        self.domain
    }

    #[inline]
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Domain identity comparison. The only correct "same origin" test.
    #[inline]
    pub fn same_domain(&self, other: &StatusCode) -> bool {
        self.domain.id() == other.domain.id()
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        self.domain.is_failure(self)
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        !self.is_failure()
    }

    #[inline]
    pub fn classify(&self) -> Errc {
        self.domain.classify(self)
    }

    #[inline]
    pub fn message(&self) -> StringRef {
        self.domain.message(self)
    }

    /// Convert into the origin system's own error type.
    #[inline]
    pub fn raise(&self) -> RaisedError {
        self.domain.raise(self)
    }

    /// `Ok(())` on success, the raised error on failure.
    pub fn ok_or_raise(&self) -> Result<(), RaisedError> {
        if self.is_failure() {
            Err(self.raise())
        } else {
            Ok(())
        }
    }

    /// Semantic equivalence, symmetric by construction.
    ///
    /// Each domain is asked directly first. Failing that, each side is
    /// compared against the other's generic classification, skipping
    /// classifications that came out `Unknown`.
    pub fn equivalent(&self, other: &StatusCode) -> bool {
        if self.domain.is_equivalent(self, other) || other.domain.is_equivalent(other, self) {
            return true;
        }
        let theirs = other.classify();
        if theirs != Errc::Unknown
            && self.domain.is_equivalent(self, &StatusCode::generic(theirs))
        {
            return true;
        }
        let ours = self.classify();
        ours != Errc::Unknown && other.domain.is_equivalent(other, &StatusCode::generic(ours))
    }
}

impl PartialEq for StatusCode {
    fn eq(&self, other: &Self) -> bool {
        self.equivalent(other)
    }
}

impl PartialEq<Errc> for StatusCode {
    fn eq(&self, other: &Errc) -> bool {
        self.equivalent(&StatusCode::generic(*other))
    }
}

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusCode")
            .field("domain", &self.domain.name().as_str())
            .field("value", &self.value)
            .finish()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.domain.name(), self.message())
    }
}

impl std::error::Error for StatusCode {}
