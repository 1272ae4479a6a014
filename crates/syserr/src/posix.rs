//! POSIX `errno` domain, the platform-native adapter on unix targets.

use core::any::Any;

use crate::domain::{DomainId, PayloadInfo, RaisedError, StatusCodeDomain};
use crate::errc::{self, Errc};
use crate::generic::GENERIC_DOMAIN_ID;
use crate::status::StatusCode;
use crate::string_ref::StringRef;

/// Identity of [`POSIX_DOMAIN`].
pub const POSIX_DOMAIN_ID: DomainId = DomainId(0xa59a_5629_ef43_ed8b);

/// Domain of raw `errno` values.
#[derive(Debug)]
pub struct PosixDomain {
    _private: (),
}

/// The well-known POSIX domain singleton.
pub static POSIX_DOMAIN: PosixDomain = PosixDomain { _private: () };

impl StatusCodeDomain for PosixDomain {
    fn id(&self) -> DomainId {
        POSIX_DOMAIN_ID
    }

    fn name(&self) -> StringRef {
        StringRef::from_static_nul("posix domain\0")
    }

    fn payload_info(&self) -> PayloadInfo {
        PayloadInfo::of::<i32>()
    }

    fn is_failure(&self, code: &StatusCode) -> bool {
        debug_assert!(code.domain().id() == POSIX_DOMAIN_ID);
        code.value() != 0
    }

    fn is_equivalent(&self, code1: &StatusCode, code2: &StatusCode) -> bool {
        debug_assert!(code1.domain().id() == POSIX_DOMAIN_ID);
        let other = code2.domain().id();
        // errno and generic share numbering
        (other == POSIX_DOMAIN_ID || other == GENERIC_DOMAIN_ID) && code1.value() == code2.value()
    }

    fn classify(&self, code: &StatusCode) -> Errc {
        debug_assert!(code.domain().id() == POSIX_DOMAIN_ID);
        Errc::from_raw(code.value())
    }

    fn message(&self, code: &StatusCode) -> StringRef {
        debug_assert!(code.domain().id() == POSIX_DOMAIN_ID);
        match Errc::from_raw(code.value()) {
            // Not in the table: copy the platform text so it gets a terminator
            Errc::Unknown => StringRef::refcounted(errc::strerror(code.value())),
            known => known.message(),
        }
    }

    fn raise(&self, code: &StatusCode) -> RaisedError {
        Box::new(std::io::Error::from_raw_os_error(code.value()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
