//! The foreign error-code/category system.
//!
//! This is the pre-existing, independently designed error system that
//! [`ForeignCodeDomain`](crate::ForeignCodeDomain) bridges: an integer value
//! paired with a category singleton that knows how to name, describe and
//! classify it. Libraries define their own categories by implementing
//! [`ErrorCategory`] on a `static`.
//!
//! ```
//! use syserr::{ErrorCategory, ErrorCode, ErrorCondition, generic_category};
//!
//! struct HttpCategory;
//! static HTTP: HttpCategory = HttpCategory;
//!
//! impl ErrorCategory for HttpCategory {
//!     fn id(&self) -> u64 { 0x6f3c_19e2_d4a7_0b55 }
//!     fn name(&self) -> &str { "http" }
//!     fn message(&self, value: i32) -> String { format!("http status {value}") }
//!     fn default_error_condition(&self, value: i32) -> ErrorCondition {
//!         match value {
//!             403 => ErrorCondition::new(libc::EACCES, generic_category()),
//!             _ => ErrorCondition::new(value, &HTTP),
//!         }
//!     }
//!     fn failed(&self, value: i32) -> bool { value >= 400 }
//! }
//!
//! let code = ErrorCode::new(403, &HTTP);
//! assert!(code.failed());
//! ```

use core::fmt;

use crate::errc::Errc;

/// Identity of the built-in generic category.
pub const GENERIC_CATEGORY_ID: u64 = 0xb2ab_117a_3d9f_6c05;

/// Identity of the built-in system category.
pub const SYSTEM_CATEGORY_ID: u64 = 0x8fe4_61c0_52d7_a913;

/// A family of integer error values in the foreign system.
pub trait ErrorCategory: Send + Sync + 'static {
    /// Stable identity, or `0` to be identified by object address.
    ///
    /// Give categories that may be instantiated more than once (one copy
    /// per dynamically loaded module, say) a fixed non-zero id.
    fn id(&self) -> u64 {
        0
    }

    fn name(&self) -> &str;

    /// Render `value` to text.
    fn message(&self, value: i32) -> String;

    /// Map `value` to a condition, ideally in [`generic_category`].
    fn default_error_condition(&self, value: i32) -> ErrorCondition;

    /// Whether `value` is a failure. Zero is success unless overridden.
    fn failed(&self, value: i32) -> bool {
        value != 0
    }
}

/// Identity comparison of two categories.
///
/// Uses the explicit ids when both have one, object addresses otherwise.
/// Names are never compared; they need not be unique.
pub fn same_category(a: &dyn ErrorCategory, b: &dyn ErrorCategory) -> bool {
    match (a.id(), b.id()) {
        (0, _) | (_, 0) => category_address(a) == category_address(b),
        (x, y) => x == y,
    }
}

/// 64-bit key identifying `cat`: its id, or its address when it has none.
pub fn category_key(cat: &dyn ErrorCategory) -> u64 {
    match cat.id() {
        0 => category_address(cat) as u64,
        id => id,
    }
}

#[inline]
fn category_address(cat: &dyn ErrorCategory) -> usize {
    cat as *const dyn ErrorCategory as *const () as usize
}

// ── Code and condition ────────────────────────────────────────────

/// A value in a specific category, as produced by the origin system.
#[derive(Clone, Copy)]
pub struct ErrorCode {
    value: i32,
    category: &'static dyn ErrorCategory,
}

impl ErrorCode {
    #[inline]
    pub const fn new(value: i32, category: &'static dyn ErrorCategory) -> Self {
        ErrorCode { value, category }
    }

    #[inline]
    pub fn value(&self) -> i32 {
        self.value
    }

    #[inline]
    pub fn category(&self) -> &'static dyn ErrorCategory {
        self.category
    }

    pub fn message(&self) -> String {
        self.category.message(self.value)
    }

    pub fn default_error_condition(&self) -> ErrorCondition {
        self.category.default_error_condition(self.value)
    }

    pub fn failed(&self) -> bool {
        self.category.failed(self.value)
    }
}

impl PartialEq for ErrorCode {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && same_category(self.category, other.category)
    }
}

impl Eq for ErrorCode {}

impl fmt::Debug for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorCode({}:{})", self.category.name(), self.value)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category.name(), self.value)
    }
}

/// A portable condition a code maps onto.
#[derive(Clone, Copy)]
pub struct ErrorCondition {
    value: i32,
    category: &'static dyn ErrorCategory,
}

impl ErrorCondition {
    #[inline]
    pub const fn new(value: i32, category: &'static dyn ErrorCategory) -> Self {
        ErrorCondition { value, category }
    }

    #[inline]
    pub fn value(&self) -> i32 {
        self.value
    }

    #[inline]
    pub fn category(&self) -> &'static dyn ErrorCategory {
        self.category
    }
}

impl PartialEq for ErrorCondition {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && same_category(self.category, other.category)
    }
}

impl Eq for ErrorCondition {}

impl fmt::Debug for ErrorCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorCondition({}:{})", self.category.name(), self.value)
    }
}

/// The foreign system's own error type, carrying the full code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemError {
    code: ErrorCode,
}

impl SystemError {
    pub fn new(code: ErrorCode) -> Self {
        SystemError { code }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code.message(), self.code)
    }
}

impl std::error::Error for SystemError {}

// ── Built-in categories ───────────────────────────────────────────

/// POSIX `errno` conditions.
struct GenericCategory;

impl ErrorCategory for GenericCategory {
    fn id(&self) -> u64 {
        GENERIC_CATEGORY_ID
    }

    fn name(&self) -> &str {
        "generic"
    }

    fn message(&self, value: i32) -> String {
        match Errc::from_raw(value) {
            Errc::Unknown => format!("unknown generic error {}", value),
            errc => errc.description().to_string(),
        }
    }

    fn default_error_condition(&self, value: i32) -> ErrorCondition {
        ErrorCondition::new(value, &GENERIC)
    }
}

/// Codes reported by the operating system.
struct SystemCategory;

impl ErrorCategory for SystemCategory {
    fn id(&self) -> u64 {
        SYSTEM_CATEGORY_ID
    }

    fn name(&self) -> &str {
        "system"
    }

    fn message(&self, value: i32) -> String {
        system_message(value)
    }

    fn default_error_condition(&self, value: i32) -> ErrorCondition {
        system_condition(value)
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        fn system_message(value: i32) -> String {
            crate::errc::strerror(value).to_string()
        }

        // OS codes are errnos: known ones are generic conditions as-is
        fn system_condition(value: i32) -> ErrorCondition {
            match Errc::from_raw(value) {
                Errc::Unknown => ErrorCondition::new(value, &SYSTEM),
                _ => ErrorCondition::new(value, &GENERIC),
            }
        }
    } else {
        fn system_message(value: i32) -> String {
            std::io::Error::from_raw_os_error(value).to_string()
        }

        fn system_condition(value: i32) -> ErrorCondition {
            ErrorCondition::new(value, &SYSTEM)
        }
    }
}

static GENERIC: GenericCategory = GenericCategory;
static SYSTEM: SystemCategory = SystemCategory;

/// The generic (POSIX `errno`) category singleton.
pub fn generic_category() -> &'static dyn ErrorCategory {
    &GENERIC
}

/// The operating-system category singleton.
pub fn system_category() -> &'static dyn ErrorCategory {
    &SYSTEM
}
