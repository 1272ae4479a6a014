//! The generic classification domain.
//!
//! Values are [`Errc`] conditions. Every other domain classifies into this
//! one, which makes it the common denominator for cross-domain comparison.

use core::any::Any;

use crate::domain::{DomainId, PayloadInfo, RaisedError, StatusCodeDomain};
use crate::errc::Errc;
use crate::status::StatusCode;
use crate::string_ref::StringRef;

/// Identity of [`GENERIC_DOMAIN`].
pub const GENERIC_DOMAIN_ID: DomainId = DomainId(0x746d_6354_ae4a_3bd3);

/// Domain of generic `Errc` conditions.
#[derive(Debug)]
pub struct GenericDomain {
    _private: (),
}

/// The well-known generic domain singleton.
pub static GENERIC_DOMAIN: GenericDomain = GenericDomain { _private: () };

impl GenericDomain {
    #[inline]
    fn errc(&self, code: &StatusCode) -> Errc {
        debug_assert!(code.domain().id() == GENERIC_DOMAIN_ID, "code is not generic");
        Errc::from_raw(code.value())
    }
}

impl StatusCodeDomain for GenericDomain {
    fn id(&self) -> DomainId {
        GENERIC_DOMAIN_ID
    }

    fn name(&self) -> StringRef {
        StringRef::from_static_nul("generic domain\0")
    }

    fn payload_info(&self) -> PayloadInfo {
        PayloadInfo::of::<i32>()
    }

    fn is_failure(&self, code: &StatusCode) -> bool {
        debug_assert!(code.domain().id() == GENERIC_DOMAIN_ID);
        code.value() != 0
    }

    // Only ever claims equivalence with another generic code; other domains
    // compare themselves against us.
    fn is_equivalent(&self, code1: &StatusCode, code2: &StatusCode) -> bool {
        debug_assert!(code1.domain().id() == GENERIC_DOMAIN_ID);
        code2.domain().id() == GENERIC_DOMAIN_ID && code1.value() == code2.value()
    }

    fn classify(&self, code: &StatusCode) -> Errc {
        self.errc(code)
    }

    fn message(&self, code: &StatusCode) -> StringRef {
        self.errc(code).message()
    }

    fn raise(&self, code: &StatusCode) -> RaisedError {
        Box::new(*code)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singleton_identity() {
        let a = StatusCode::generic(Errc::Interrupted);
        let b = StatusCode::generic(Errc::TimedOut);
        assert!(a.same_domain(&b));
        let singleton: &dyn StatusCodeDomain = &GENERIC_DOMAIN;
        assert!(*a.domain() == *singleton);
    }

    #[test]
    fn failure_and_classification() {
        let ok = StatusCode::generic(Errc::Success);
        assert!(!ok.is_failure());
        let busy = StatusCode::generic(Errc::DeviceOrResourceBusy);
        assert!(busy.is_failure());
        assert_eq!(busy.classify(), Errc::DeviceOrResourceBusy);
    }

    #[test]
    fn message_is_literal() {
        let m = StatusCode::generic(Errc::BrokenPipe).message();
        assert!(!m.is_empty());
        assert!(!m.is_refcounted());
        assert_eq!(StatusCode::generic(Errc::Unknown).message(), "unknown error");
    }

    #[test]
    fn name_and_message_have_c_views() {
        let code = StatusCode::generic(Errc::Success);
        let name = code.domain().name();
        assert_eq!(name.as_c_str().unwrap().to_bytes(), b"generic domain");
        assert_eq!(code.message().as_c_str().unwrap().to_bytes(), b"success");
    }

    #[test]
    fn raise_returns_the_status_code() {
        let err = StatusCode::generic(Errc::NotSupported).raise();
        let back = err.downcast_ref::<StatusCode>().unwrap();
        assert_eq!(back.value(), Errc::NotSupported.as_raw());
    }

    #[test]
    fn equivalent_only_to_same_value() {
        let a = StatusCode::generic(Errc::NoSpaceOnDevice);
        assert!(GENERIC_DOMAIN.is_equivalent(&a, &a));
        assert!(!GENERIC_DOMAIN.is_equivalent(&a, &StatusCode::generic(Errc::IoError)));
    }
}
