//! The abstract status-code domain.
//!
//! A domain owns the meaning of the raw values tagged with it. Nothing else
//! may interpret those bits: every question about a [`StatusCode`] (is it a
//! failure, what does it mean, is it the same condition as that other code)
//! is forwarded to the domain the code points at.

use core::any::Any;
use core::fmt;

use crate::errc::Errc;
use crate::status::StatusCode;
use crate::string_ref::StringRef;

/// What [`StatusCodeDomain::raise`] produces.
pub type RaisedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 64-bit domain identity.
///
/// Chosen by the domain author to be statistically unique. Two domain
/// objects are the same domain iff their ids are equal, even when they are
/// distinct objects (e.g. one copy per shared library).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct DomainId(pub u64);

impl fmt::Debug for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DomainId({:#018x})", self.0)
    }
}

/// Layout a domain declares for its payload, so containers can size
/// themselves without knowing the concrete domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadInfo {
    /// Size of the raw value.
    pub payload_size: usize,
    /// Domain reference plus raw value.
    pub total_size: usize,
    /// Alignment required by the pair.
    pub total_alignment: usize,
}

impl PayloadInfo {
    /// Layout of a value of type `T` stored next to a domain reference.
    pub const fn of<T>() -> Self {
        let domain_size = core::mem::size_of::<&'static dyn StatusCodeDomain>();
        let domain_align = core::mem::align_of::<&'static dyn StatusCodeDomain>();
        let value_align = core::mem::align_of::<T>();
        PayloadInfo {
            payload_size: core::mem::size_of::<T>(),
            total_size: domain_size + core::mem::size_of::<T>(),
            total_alignment: if value_align > domain_align { value_align } else { domain_align },
        }
    }
}

/// A family of status values and the operations that interpret them.
///
/// Implementations are expected to be process-lifetime objects: either
/// `static` singletons or slots of a [`DomainRegistry`](crate::DomainRegistry).
///
/// Every operation taking a `code` requires `code.domain() == self`;
/// this is checked in debug builds only.
pub trait StatusCodeDomain: Send + Sync + 'static {
    fn id(&self) -> DomainId;

    fn name(&self) -> StringRef;

    fn payload_info(&self) -> PayloadInfo;

    /// True if `code` represents a failure by this domain's convention.
    fn is_failure(&self, code: &StatusCode) -> bool;

    /// True if `code1` (of this domain) and `code2` (of any domain) denote
    /// the same condition, as far as this domain can tell.
    ///
    /// Need not be transitive across three or more domains. Callers should
    /// use [`StatusCode::equivalent`], which asks both domains.
    fn is_equivalent(&self, code1: &StatusCode, code2: &StatusCode) -> bool;

    /// The closest generic condition, or [`Errc::Unknown`].
    fn classify(&self, code: &StatusCode) -> Errc;

    /// Human-readable text. Must not fail; degrade to a literal instead.
    fn message(&self, code: &StatusCode) -> StringRef;

    /// Convert `code` into the error type native to this domain's origin.
    fn raise(&self, code: &StatusCode) -> RaisedError;

    /// Downcast hook for domains that need to inspect their peers.
    fn as_any(&self) -> &dyn Any;
}

impl PartialEq for dyn StatusCodeDomain {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for dyn StatusCodeDomain {}

impl fmt::Debug for dyn StatusCodeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusCodeDomain")
            .field("id", &self.id())
            .field("name", &self.name().as_str())
            .finish()
    }
}
