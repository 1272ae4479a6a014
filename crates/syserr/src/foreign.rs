//! Adapter domain for the foreign error-code/category system.
//!
//! One [`ForeignCodeDomain`] exists per wrapped [`ErrorCategory`]. Its id is
//! derived from the category's identity, so wrapping the same category
//! twice yields the same domain and wrapping two categories yields two.
//! Instances normally come from a [`DomainRegistry`], which guarantees one
//! pointer-stable object per category.

use core::any::Any;
use core::fmt;

use crate::category::{
    category_key, generic_category, same_category, system_category, ErrorCategory, ErrorCode,
    SystemError,
};
use crate::domain::{DomainId, PayloadInfo, RaisedError, StatusCodeDomain};
use crate::errc::Errc;
use crate::error::RegistryError;
use crate::generic::GENERIC_DOMAIN;
use crate::registry::DomainRegistry;
use crate::status::StatusCode;
use crate::string_ref::StringRef;

use syserr_core::log_warn;

/// Mixed into the category key so adapter ids don't collide with ids
/// other domains picked by hand.
pub const FOREIGN_DOMAIN_SCRAMBLE: u64 = 0x5c1e_93d7_a04b_2f61;

/// Name used when the descriptive one cannot be allocated.
const FALLBACK_NAME: StringRef = StringRef::from_static_nul("foreign_code_domain\0");

/// Whether the system category's values are errnos on this target.
const SYSTEM_CODES_ARE_ERRNO: bool = cfg!(unix);

/// Domain wrapping one foreign category.
pub struct ForeignCodeDomain {
    id: DomainId,
    category: &'static dyn ErrorCategory,
    name: StringRef,
}

impl ForeignCodeDomain {
    /// Build the adapter for `category`.
    ///
    /// Prefer [`ForeignCodeDomain::get`]; two objects built here for the
    /// same category are the same domain but not the same object.
    ///
    /// Never aborts on allocation failure: the name degrades to
    /// `"foreign_code_domain"` instead.
    pub fn new(category: &'static dyn ErrorCategory) -> Self {
        let cat_name = category.name();
        let name = StringRef::try_refcounted(&["foreign_code_domain(", cat_name, ")"])
            .unwrap_or_else(|| {
                log_warn!("no memory for domain name of category '{}'", cat_name);
                FALLBACK_NAME
            });
        ForeignCodeDomain {
            id: Self::id_for(category),
            category,
            name,
        }
    }

    /// The id an adapter for `category` carries.
    #[inline]
    pub fn id_for(category: &dyn ErrorCategory) -> DomainId {
        DomainId(FOREIGN_DOMAIN_SCRAMBLE ^ category_key(category))
    }

    /// The process-wide adapter for `code`'s category.
    pub fn get(code: ErrorCode) -> Result<&'static ForeignCodeDomain, RegistryError> {
        DomainRegistry::global().get_or_create(code.category())
    }

    #[inline]
    pub fn category(&self) -> &'static dyn ErrorCategory {
        self.category
    }

    /// Rebuild the foreign code a status value of this domain carries.
    pub fn error_code(&self, code: &StatusCode) -> ErrorCode {
        self.check(code);
        ErrorCode::new(code.value(), self.category)
    }

    /// Whether this adapter wraps `category`.
    #[inline]
    pub fn wraps(&self, category: &dyn ErrorCategory) -> bool {
        same_category(self.category, category)
    }

    #[inline]
    fn check(&self, code: &StatusCode) {
        debug_assert!(
            code.domain().id() == self.id,
            "status code of {:?} handed to {}",
            code.domain().id(),
            self.name
        );
    }

    fn category_of(code: &StatusCode) -> Option<&'static dyn ErrorCategory> {
        code.domain()
            .as_any()
            .downcast_ref::<ForeignCodeDomain>()
            .map(|d| d.category)
    }
}

impl StatusCodeDomain for ForeignCodeDomain {
    fn id(&self) -> DomainId {
        self.id
    }

    fn name(&self) -> StringRef {
        self.name.clone()
    }

    fn payload_info(&self) -> PayloadInfo {
        PayloadInfo::of::<i32>()
    }

    fn is_failure(&self, code: &StatusCode) -> bool {
        self.check(code);
        self.category.failed(code.value())
    }

    fn is_equivalent(&self, code1: &StatusCode, code2: &StatusCode) -> bool {
        self.check(code1);

        // Literal comparison must win over classification, which is lossy
        if code2.domain().id() == self.id {
            return match Self::category_of(code2) {
                Some(other) if same_category(self.category, other) => {
                    code1.value() == code2.value()
                }
                // Left to the container's classification fallback
                _ => false,
            };
        }

        if same_category(self.category, generic_category()) {
            return StatusCode::new(&GENERIC_DOMAIN, code1.value()).equivalent(code2);
        }

        if SYSTEM_CODES_ARE_ERRNO && same_category(self.category, system_category()) {
            return StatusCode::posix(code1.value()).equivalent(code2);
        }

        false
    }

    fn classify(&self, code: &StatusCode) -> Errc {
        self.check(code);
        let cond = self.category.default_error_condition(code.value());
        if same_category(cond.category(), generic_category())
            || (SYSTEM_CODES_ARE_ERRNO && same_category(cond.category(), system_category()))
        {
            return Errc::from_raw(cond.value());
        }
        Errc::Unknown
    }

    fn message(&self, code: &StatusCode) -> StringRef {
        self.check(code);
        StringRef::refcounted(&self.category.message(code.value()))
    }

    fn raise(&self, code: &StatusCode) -> RaisedError {
        Box::new(SystemError::new(self.error_code(code)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for ForeignCodeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignCodeDomain")
            .field("id", &self.id)
            .field("name", &self.name.as_str())
            .finish()
    }
}
