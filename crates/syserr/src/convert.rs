//! Conversions between `std::io::Error` and the error-code types.

use std::io;

use crate::category::{generic_category, same_category, system_category, ErrorCode, SystemError};
use crate::errc::Errc;
use crate::status::StatusCode;

/// `io::ErrorKind` to generic condition. Each condition appears once, so
/// the table reads both ways.
const KIND_TABLE: &[(io::ErrorKind, Errc)] = &[
    (io::ErrorKind::NotFound, Errc::NoSuchFileOrDirectory),
    (io::ErrorKind::PermissionDenied, Errc::PermissionDenied),
    (io::ErrorKind::ConnectionRefused, Errc::ConnectionRefused),
    (io::ErrorKind::ConnectionReset, Errc::ConnectionReset),
    (io::ErrorKind::ConnectionAborted, Errc::ConnectionAborted),
    (io::ErrorKind::NotConnected, Errc::NotConnected),
    (io::ErrorKind::AddrInUse, Errc::AddressInUse),
    (io::ErrorKind::AddrNotAvailable, Errc::AddressNotAvailable),
    (io::ErrorKind::BrokenPipe, Errc::BrokenPipe),
    (io::ErrorKind::AlreadyExists, Errc::FileExists),
    (io::ErrorKind::WouldBlock, Errc::ResourceUnavailableTryAgain),
    (io::ErrorKind::InvalidInput, Errc::InvalidArgument),
    (io::ErrorKind::TimedOut, Errc::TimedOut),
    (io::ErrorKind::Interrupted, Errc::Interrupted),
    (io::ErrorKind::Unsupported, Errc::NotSupported),
    (io::ErrorKind::OutOfMemory, Errc::NotEnoughMemory),
];

/// Generic condition for an `io::ErrorKind`; unlisted kinds are `IoError`.
pub fn errc_for_kind(kind: io::ErrorKind) -> Errc {
    KIND_TABLE
        .iter()
        .find(|(k, _)| *k == kind)
        .map_or(Errc::IoError, |&(_, errc)| errc)
}

/// `io::ErrorKind` for a generic condition; unlisted ones are `Other`.
pub fn kind_for_errc(errc: Errc) -> io::ErrorKind {
    KIND_TABLE
        .iter()
        .find(|(_, e)| *e == errc)
        .map_or(io::ErrorKind::Other, |&(kind, _)| kind)
}

// ── io::Error → ErrorCode ─────────────────────────────────────────

impl From<&io::Error> for ErrorCode {
    /// Raw OS errors keep their value in the system category. Custom
    /// errors only have a kind, which maps to a generic condition.
    fn from(err: &io::Error) -> Self {
        match err.raw_os_error() {
            Some(raw) => ErrorCode::new(raw, system_category()),
            None => ErrorCode::new(errc_for_kind(err.kind()).as_raw(), generic_category()),
        }
    }
}

impl From<io::Error> for ErrorCode {
    fn from(err: io::Error) -> Self {
        ErrorCode::from(&err)
    }
}

// ── back into io::Error ───────────────────────────────────────────

impl From<SystemError> for io::Error {
    fn from(err: SystemError) -> Self {
        let code = err.code();
        if same_category(code.category(), system_category()) {
            return io::Error::from_raw_os_error(code.value());
        }
        let cond = code.default_error_condition();
        let kind = if same_category(cond.category(), generic_category()) {
            kind_for_errc(Errc::from_raw(cond.value()))
        } else {
            io::ErrorKind::Other
        };
        io::Error::new(kind, err)
    }
}

impl From<StatusCode> for io::Error {
    /// Kind from the generic classification, the status code as payload.
    fn from(code: StatusCode) -> Self {
        io::Error::new(kind_for_errc(code.classify()), code)
    }
}
