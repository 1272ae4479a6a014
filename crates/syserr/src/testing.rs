//! Test-only global allocator
//!
//! Wraps the system allocator to let tests:
//! - watch a block and count how often it is freed
//! - make the next counter-sized allocation on the calling thread fail
//! - read the calling thread's net allocated bytes

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};

struct TestAlloc;

#[global_allocator]
static GLOBAL: TestAlloc = TestAlloc;

const SLOTS: usize = 16;
const CLAIMED: usize = 1;

struct Slot {
    addr: AtomicUsize,
    frees: AtomicUsize,
}

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: Slot = Slot { addr: AtomicUsize::new(0), frees: AtomicUsize::new(0) };
static WATCHED: [Slot; SLOTS] = [EMPTY_SLOT; SLOTS];

thread_local! {
    static FAIL_WORD_ALLOC: Cell<bool> = const { Cell::new(false) };
    static LIVE_BYTES: Cell<isize> = const { Cell::new(0) };
}

fn account(delta: isize) {
    let _ = LIVE_BYTES.try_with(|live| live.set(live.get() + delta));
}

fn note_free(ptr: *mut u8) {
    let addr = ptr as usize;
    for slot in &WATCHED {
        // Clear on the first free so a later block at the same address
        // is not counted
        if slot
            .addr
            .compare_exchange(addr, CLAIMED, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            slot.frees.fetch_add(1, Ordering::SeqCst);
        }
    }
}

unsafe impl GlobalAlloc for TestAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if layout == Layout::new::<AtomicUsize>()
            && FAIL_WORD_ALLOC.try_with(|f| f.replace(false)).unwrap_or(false)
        {
            return core::ptr::null_mut();
        }
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            account(layout.size() as isize);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            account(layout.size() as isize);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        note_free(ptr);
        account(-(layout.size() as isize));
        System.dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new = System.realloc(ptr, layout, new_size);
        if !new.is_null() {
            if new != ptr {
                note_free(ptr);
            }
            account(new_size as isize - layout.size() as isize);
        }
        new
    }
}

/// A watched block; released when dropped.
pub(crate) struct Watch {
    slot: &'static Slot,
}

impl Watch {
    /// Start counting frees of the block at `ptr`.
    pub(crate) fn new(ptr: *const u8) -> Watch {
        loop {
            for slot in &WATCHED {
                if slot
                    .addr
                    .compare_exchange(0, CLAIMED, Ordering::AcqRel, Ordering::Relaxed)
                    .is_ok()
                {
                    slot.frees.store(0, Ordering::SeqCst);
                    slot.addr.store(ptr as usize, Ordering::Release);
                    return Watch { slot };
                }
            }
            std::thread::yield_now();
        }
    }

    /// Times the block has been freed since it was watched.
    pub(crate) fn frees(&self) -> usize {
        self.slot.frees.load(Ordering::SeqCst)
    }
}

impl Drop for Watch {
    fn drop(&mut self) {
        self.slot.addr.store(0, Ordering::Release);
    }
}

/// Fail the calling thread's next `AtomicUsize`-sized allocation.
pub(crate) fn fail_next_word_alloc() {
    FAIL_WORD_ALLOC.with(|f| f.set(true));
}

/// Whether an armed failure is still waiting to be consumed.
pub(crate) fn word_alloc_failure_pending() -> bool {
    FAIL_WORD_ALLOC.with(|f| f.get())
}

/// Net bytes the calling thread has allocated so far.
pub(crate) fn live_bytes() -> isize {
    LIVE_BYTES.with(|live| live.get())
}
