//! Domain registry
//!
//! Deduplicates [`ForeignCodeDomain`] instances by wrapped category. A
//! fixed array of slots is filled append-only under a [`SpinLock`]; a slot,
//! once constructed, is never moved or dropped before the registry itself,
//! so the references handed out stay valid for the registry's lifetime and
//! may be cached.
//!
//! The process-wide instance lives in a `static` and is never torn down.
//! Owned registries tear down their slots on `Drop`.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;

use syserr_core::{log_debug, log_error, log_warn, SpinLock};

use crate::category::{ErrorCategory, ErrorCode};
use crate::config::SyserrConfig;
use crate::error::RegistryError;
use crate::foreign::ForeignCodeDomain;
use crate::status::StatusCode;

/// Slot count of the process-wide registry.
pub const REGISTRY_CAPACITY: usize = 64;

type Slot = UnsafeCell<MaybeUninit<ForeignCodeDomain>>;

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: Slot = UnsafeCell::new(MaybeUninit::uninit());

/// Bounded, thread-safe set of adapter domains.
pub struct DomainRegistry<const N: usize = REGISTRY_CAPACITY> {
    /// Constructed slot count; slots `[0, len)` are initialized.
    len: SpinLock<usize>,
    slots: [Slot; N],
}

// Safety: slots are written only under `len`'s lock and only past the
// current length; initialized slots are never written again until drop.
unsafe impl<const N: usize> Sync for DomainRegistry<N> {}
unsafe impl<const N: usize> Send for DomainRegistry<N> {}

static GLOBAL: DomainRegistry = DomainRegistry::new();

impl DomainRegistry<REGISTRY_CAPACITY> {
    /// The process-wide registry.
    #[inline]
    pub fn global() -> &'static DomainRegistry {
        &GLOBAL
    }
}

impl<const N: usize> DomainRegistry<N> {
    pub const fn new() -> Self {
        DomainRegistry {
            len: SpinLock::new(0),
            slots: [EMPTY_SLOT; N],
        }
    }

    /// The adapter for `category`, constructing it on first use.
    ///
    /// Concurrent calls for the same category all return the same object.
    /// `category.name()` is called under the registry lock when an entry is
    /// created and must not wrap codes itself.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Full`] when `category` is new and every slot is
    /// taken. Entries already handed out are unaffected.
    pub fn get_or_create(
        &self,
        category: &'static dyn ErrorCategory,
    ) -> Result<&ForeignCodeDomain, RegistryError> {
        let mut len = self.len.lock();

        if let Some(found) = self.scan(*len, category) {
            return Ok(found);
        }

        let index = *len;
        if index == N {
            log_error!(
                "domain registry full: cannot wrap category '{}' ({} slots)",
                category.name(),
                N
            );
            return Err(RegistryError::Full { capacity: N });
        }

        // Safety: `index` is past every initialized slot and we hold the lock
        let domain: &ForeignCodeDomain =
            unsafe { (*self.slots[index].get()).write(ForeignCodeDomain::new(category)) };
        *len = index + 1;
        drop(len);

        log_debug!("registry slot {} -> {:?}", index, domain);
        let warn_at = SyserrConfig::global().registry_warn_at;
        if warn_at != 0 && index + 1 == warn_at {
            log_warn!("domain registry at {} of {} slots", index + 1, N);
        }
        Ok(domain)
    }

    /// The adapter for `category`, if one was already created.
    pub fn find(&self, category: &dyn ErrorCategory) -> Option<&ForeignCodeDomain> {
        let len = self.len.lock();
        self.scan(*len, category)
    }

    /// Wrap `code` under its category's adapter.
    pub fn wrap(&'static self, code: ErrorCode) -> Result<StatusCode, RegistryError> {
        let domain = self.get_or_create(code.category())?;
        Ok(StatusCode::new(domain, code.value()))
    }

    /// Number of adapters created so far.
    pub fn len(&self) -> usize {
        *self.len.lock()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Adapters in creation order, as of the call.
    pub fn domains(&self) -> impl Iterator<Item = &ForeignCodeDomain> + '_ {
        let len = self.len();
        self.slots[..len].iter().map(|slot| {
            // Safety: below the length observed under the lock
            unsafe { (*slot.get()).assume_init_ref() }
        })
    }

    fn scan(&self, len: usize, category: &dyn ErrorCategory) -> Option<&ForeignCodeDomain> {
        self.slots[..len]
            .iter()
            // Safety: slots below `len` are initialized and never rewritten
            .map(|slot| unsafe { (*slot.get()).assume_init_ref() })
            .find(|domain| domain.wraps(category))
    }
}

impl<const N: usize> Default for DomainRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Drop for DomainRegistry<N> {
    fn drop(&mut self) {
        let len = core::mem::take(self.len.get_mut());
        for slot in &mut self.slots[..len] {
            // Safety: initialized, and `&mut self` rules out readers
            unsafe { slot.get_mut().assume_init_drop() };
        }
    }
}
