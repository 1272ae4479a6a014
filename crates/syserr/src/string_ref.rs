//! Message string references.
//!
//! A [`StringRef`] is what a domain hands back from `name()` and
//! `message()`. It is one of:
//!
//! - **Literal**: a `'static` view. No ownership, no teardown.
//! - **Refcounted**: a heap buffer shared through an atomic counter. Copies
//!   bump the counter; the copy that observes the 1 → 0 transition frees
//!   the buffer and the counter.
//! - **Hooked**: caller-managed text plus three words of inline state and a
//!   [`StringThunk`] that is invoked exactly once for every copy, move and
//!   destroy. This lets a domain attach arbitrary side state to its text
//!   without every domain agreeing on an owned string type.
//!
//! Rust moves are bitwise and run no code, so the "move" lifecycle event is
//! raised only by [`StringRef::take`], which transfers the text out and
//! destroys what is left behind.

use core::alloc::Layout;
use core::ffi::CStr;
use core::ptr::{self, NonNull};
use core::sync::atomic::{self, AtomicUsize, Ordering};
use std::alloc;

use syserr_core::log_warn;

macro_rules! alloc_failed_text {
    () => {
        "failed to get message from system"
    };
}

/// Returned in place of a message whose storage could not be allocated.
pub const ALLOC_FAILED_MESSAGE: &str = alloc_failed_text!();

const ALLOC_FAILED: StringRef = StringRef::from_static_nul(concat!(alloc_failed_text!(), "\0"));

/// The lifecycle event delivered to a [`StringThunk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThunkOp {
    Copy,
    Move,
    Destroy,
}

/// Raw view plus inline state of a hooked reference.
#[derive(Debug, Clone, Copy)]
pub struct RawStringParts {
    pub ptr: *const u8,
    pub len: usize,
    pub state: [*mut (); 3],
}

impl RawStringParts {
    const EMPTY: RawStringParts = RawStringParts {
        ptr: ptr::null(),
        len: 0,
        state: [ptr::null_mut(); 3],
    };
}

/// Lifecycle hook of a hooked reference.
///
/// On `Copy` and `Move`, `dest` has already been shallow-copied from `src`.
/// On `Destroy`, `src` is `None` and `dest` is the reference going away.
/// `Move` and `Destroy` must not panic.
pub type StringThunk = fn(op: ThunkOp, dest: &mut RawStringParts, src: Option<&RawStringParts>);

/// A literal or reference-counted view over UTF-8 message text.
pub struct StringRef {
    repr: Repr,
}

enum Repr {
    Literal { text: &'static [u8], nul_terminated: bool },
    Refcounted(SharedText),
    Hooked { parts: RawStringParts, thunk: StringThunk },
}

// Safety: literal text is immutable and 'static; refcounted text is
// immutable and its counter is atomic; hooked references inherit the
// thread-safety contract of `StringRef::from_raw_parts`.
unsafe impl Send for StringRef {}
unsafe impl Sync for StringRef {}

impl StringRef {
    /// The empty literal.
    pub const EMPTY: StringRef = StringRef::from_static_nul("\0");

    /// Wrap a `'static` string. Never allocates, never tears down.
    ///
    /// The result has no C view; prefer [`StringRef::from_static_nul`].
    pub const fn from_static(text: &'static str) -> Self {
        StringRef {
            repr: Repr::Literal { text: text.as_bytes(), nul_terminated: false },
        }
    }

    /// Wrap a `'static` string whose last byte is its NUL terminator, as
    /// written with `concat!(text, "\0")`. The terminator is not part of
    /// the text.
    ///
    /// # Panics
    ///
    /// If `text` does not end in NUL. In a `const` this fails the build.
    pub const fn from_static_nul(text: &'static str) -> Self {
        match text.as_bytes().split_last() {
            Some((&0, body)) => StringRef {
                repr: Repr::Literal { text: body, nul_terminated: true },
            },
            _ => panic!("literal is not NUL-terminated"),
        }
    }

    /// Wrap a `'static` NUL-terminated string, scanning for the terminator.
    pub fn from_static_cstr(text: &'static CStr) -> Result<Self, core::str::Utf8Error> {
        let bytes = text.to_bytes();
        core::str::from_utf8(bytes)?;
        Ok(StringRef {
            repr: Repr::Literal { text: bytes, nul_terminated: true },
        })
    }

    /// Copy `text` into a fresh NUL-terminated buffer shared by an atomic
    /// reference count.
    ///
    /// If either the buffer or its counter cannot be allocated, returns the
    /// [`ALLOC_FAILED_MESSAGE`] literal instead. Nothing leaks on that path.
    pub fn refcounted(text: &str) -> Self {
        match StringRef::try_refcounted(&[text]) {
            Some(s) => s,
            None => {
                log_warn!("message allocation of {} bytes failed, using fallback", text.len() + 1);
                ALLOC_FAILED
            }
        }
    }

    /// Concatenate `parts` into a fresh refcounted buffer, or `None` if
    /// either allocation fails. Nothing leaks on failure.
    pub fn try_refcounted(parts: &[&str]) -> Option<Self> {
        SharedText::allocate(parts).map(|shared| StringRef { repr: Repr::Refcounted(shared) })
    }

    /// Build a hooked reference from raw parts.
    ///
    /// # Safety
    ///
    /// - `ptr..ptr+len` must be valid UTF-8 followed by a NUL byte, all of
    ///   it readable until `thunk` receives the `Destroy` for the last
    ///   reference sharing it. The same holds for the parts a `Copy` or
    ///   `Move` leaves in `dest`.
    /// - `thunk` and the state it manages must tolerate being invoked from
    ///   any thread, concurrently for distinct references.
    /// - The caller has already accounted for this reference; `thunk` is
    ///   not called on construction.
    pub unsafe fn from_raw_parts(
        ptr: *const u8,
        len: usize,
        state: [*mut (); 3],
        thunk: StringThunk,
    ) -> Self {
        StringRef {
            repr: Repr::Hooked { parts: RawStringParts { ptr, len, state }, thunk },
        }
    }

    /// Number of bytes, excluding any terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match &self.repr {
            Repr::Literal { text, .. } => *text,
            Repr::Refcounted(shared) => shared.bytes(),
            Repr::Hooked { parts, .. } => {
                if parts.ptr.is_null() {
                    &[]
                } else {
                    // Safety: validity guaranteed by from_raw_parts' contract
                    unsafe { core::slice::from_raw_parts(parts.ptr, parts.len) }
                }
            }
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // Safety: every constructor requires or checks UTF-8
        unsafe { core::str::from_utf8_unchecked(self.as_bytes()) }
    }

    /// The text as a C string. Interior NULs end the C view early.
    ///
    /// `None` only for [`StringRef::from_static`] literals, whose storage
    /// has no known terminator.
    pub fn as_c_str(&self) -> Option<&CStr> {
        match &self.repr {
            Repr::Literal { text, nul_terminated: true } => {
                // Safety: the terminator follows `text` in the same literal
                let with_nul = unsafe { core::slice::from_raw_parts(text.as_ptr(), text.len() + 1) };
                CStr::from_bytes_until_nul(with_nul).ok()
            }
            Repr::Literal { nul_terminated: false, .. } => None,
            Repr::Refcounted(shared) => Some(shared.c_str()),
            Repr::Hooked { parts, .. } => {
                if parts.ptr.is_null() {
                    return None;
                }
                // Safety: from_raw_parts requires a NUL at `ptr + len`
                Some(unsafe { CStr::from_ptr(parts.ptr.cast()) })
            }
        }
    }

    /// Iterate over the raw bytes.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, u8> {
        self.as_bytes().iter()
    }

    /// Move the text into a new reference, leaving an empty literal behind.
    ///
    /// Hooked and refcounted references observe a `Move` on the result
    /// followed by a `Destroy` of the vacated original.
    pub fn take(&mut self) -> StringRef {
        let vacated = core::mem::replace(self, StringRef::EMPTY);
        let moved = vacated.duplicate(ThunkOp::Move);
        drop(vacated);
        moved
    }

    /// Current reference count of a refcounted string.
    pub fn ref_count(&self) -> Option<usize> {
        match &self.repr {
            Repr::Refcounted(shared) => Some(shared.count()),
            _ => None,
        }
    }

    pub fn is_refcounted(&self) -> bool {
        matches!(self.repr, Repr::Refcounted(_))
    }

    fn duplicate(&self, op: ThunkOp) -> StringRef {
        let repr = match &self.repr {
            Repr::Literal { text, nul_terminated } => {
                Repr::Literal { text: *text, nul_terminated: *nul_terminated }
            }
            Repr::Refcounted(shared) => Repr::Refcounted(shared.acquire()),
            Repr::Hooked { parts, thunk } => {
                let mut dest = *parts;
                (*thunk)(op, &mut dest, Some(parts));
                debug_assert!(dest.len == parts.len, "string thunk resized text on {:?}", op);
                Repr::Hooked { parts: dest, thunk: *thunk }
            }
        };
        StringRef { repr }
    }
}

impl Clone for StringRef {
    fn clone(&self) -> Self {
        self.duplicate(ThunkOp::Copy)
    }

    /// Destroy-then-reconstruct. `source` cannot alias `self`.
    fn clone_from(&mut self, source: &Self) {
        drop(core::mem::replace(self, StringRef::EMPTY));
        *self = source.duplicate(ThunkOp::Copy);
    }
}

impl Drop for StringRef {
    fn drop(&mut self) {
        match &mut self.repr {
            Repr::Literal { .. } => {}
            Repr::Refcounted(shared) => {
                // Safety: each StringRef holds exactly one count
                unsafe { shared.release() };
            }
            Repr::Hooked { parts, thunk } => {
                (*thunk)(ThunkOp::Destroy, parts, None);
                *parts = RawStringParts::EMPTY;
            }
        }
    }
}

impl Default for StringRef {
    fn default() -> Self {
        StringRef::EMPTY
    }
}

impl core::ops::Deref for StringRef {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for StringRef {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<'a> IntoIterator for &'a StringRef {
    type Item = &'a u8;
    type IntoIter = core::slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for StringRef {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<str> for StringRef {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for StringRef {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl core::fmt::Display for StringRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::fmt::Debug for StringRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let kind = match self.repr {
            Repr::Literal { .. } => "literal",
            Repr::Refcounted(_) => "refcounted",
            Repr::Hooked { .. } => "hooked",
        };
        f.debug_struct("StringRef")
            .field("kind", &kind)
            .field("text", &self.as_str())
            .finish()
    }
}

// ── Refcounted storage ────────────────────────────────────────────

/// One share of a NUL-terminated heap buffer.
///
/// Buffer and counter are separate allocations so that a failed counter
/// allocation can release the buffer on its own.
struct SharedText {
    buf: NonNull<u8>,
    /// Text length; the buffer holds `len + 1` bytes.
    len: usize,
    count: NonNull<AtomicUsize>,
}

impl SharedText {
    fn allocate(parts: &[&str]) -> Option<SharedText> {
        let len = parts.iter().map(|p| p.len()).sum::<usize>();
        let mut bytes: Vec<u8> = Vec::new();
        bytes.try_reserve_exact(len.checked_add(1)?).ok()?;
        for part in parts {
            bytes.extend_from_slice(part.as_bytes());
        }
        bytes.push(0);
        let bytes = bytes.into_boxed_slice();

        let layout = Layout::new::<AtomicUsize>();
        // Safety: layout has non-zero size
        let count = unsafe { alloc::alloc(layout) }.cast::<AtomicUsize>();
        let Some(count) = NonNull::new(count) else {
            drop(bytes);
            return None;
        };
        // Safety: freshly allocated with AtomicUsize's layout
        unsafe { count.as_ptr().write(AtomicUsize::new(1)) };

        let buf = NonNull::from(Box::leak(bytes)).cast::<u8>();
        Some(SharedText { buf, len, count })
    }

    #[inline]
    fn counter(&self) -> &AtomicUsize {
        // Safety: the counter outlives every share
        unsafe { self.count.as_ref() }
    }

    #[inline]
    fn bytes(&self) -> &[u8] {
        // Safety: buffer is live while this share exists
        unsafe { core::slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    #[inline]
    fn c_str(&self) -> &CStr {
        // Safety: allocate() terminated the buffer at index len. Interior
        // NULs end the C view early, as a C reader would see it.
        unsafe { CStr::from_ptr(self.buf.as_ptr().cast()) }
    }

    fn count(&self) -> usize {
        self.counter().load(Ordering::Acquire)
    }

    /// New share of the same buffer.
    fn acquire(&self) -> SharedText {
        let prev = self.counter().fetch_add(1, Ordering::Relaxed);
        debug_assert!(prev != 0, "acquire on a released message buffer");
        SharedText { buf: self.buf, len: self.len, count: self.count }
    }

    /// Drop this share, freeing buffer and counter if it was the last.
    ///
    /// # Safety
    ///
    /// Must be called exactly once per share, which is never used again.
    unsafe fn release(&mut self) {
        if self.counter().fetch_sub(1, Ordering::Release) != 1 {
            return;
        }
        atomic::fence(Ordering::Acquire);
        let buf = ptr::slice_from_raw_parts_mut(self.buf.as_ptr(), self.len + 1);
        drop(Box::from_raw(buf));
        ptr::drop_in_place(self.count.as_ptr());
        alloc::dealloc(self.count.as_ptr().cast(), Layout::new::<AtomicUsize>());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, Watch};
    use std::sync::{Arc, Barrier, Mutex};
    use std::thread;

    #[test]
    fn literal_basics() {
        let s = StringRef::from_static("no such file");
        assert_eq!(s.len(), 12);
        assert!(!s.is_empty());
        assert_eq!(s, "no such file");
        assert!(s.as_c_str().is_none());
        assert!(s.ref_count().is_none());
        assert_eq!(s.iter().count(), 12);
        assert!(StringRef::EMPTY.is_empty());
    }

    #[test]
    fn terminated_literals_have_c_views() {
        let s = StringRef::from_static_nul("file exists\0");
        assert_eq!(s, "file exists");
        assert_eq!(s.len(), 11);
        assert_eq!(s.as_c_str().unwrap().to_bytes(), b"file exists");
        assert_eq!(StringRef::EMPTY.as_c_str().unwrap().to_bytes(), b"");
        assert_eq!(ALLOC_FAILED.as_c_str().unwrap().to_str().unwrap(), ALLOC_FAILED_MESSAGE);
    }

    #[test]
    #[should_panic(expected = "not NUL-terminated")]
    fn unterminated_literal_is_rejected() {
        let _ = StringRef::from_static_nul("file exists");
    }

    #[test]
    fn cstr_literal_scans_terminator() {
        let s = StringRef::from_static_cstr(c"broken pipe").unwrap();
        assert_eq!(s.len(), 11);
        assert_eq!(s.as_c_str().unwrap().to_bytes(), b"broken pipe");
    }

    #[test]
    fn refcounted_is_nul_terminated_copy() {
        let source = String::from("connection reset by peer");
        let s = StringRef::refcounted(&source);
        drop(source);
        assert!(s.is_refcounted());
        assert_eq!(s, "connection reset by peer");
        assert_eq!(s.as_c_str().unwrap().to_str().unwrap(), "connection reset by peer");
        assert_eq!(s.ref_count(), Some(1));
    }

    #[test]
    fn clone_and_drop_track_count() {
        let s = StringRef::refcounted("timed out");
        let a = s.clone();
        let b = a.clone();
        assert_eq!(s.ref_count(), Some(3));
        drop(a);
        assert_eq!(s.ref_count(), Some(2));
        drop(b);
        assert_eq!(s.ref_count(), Some(1));
    }

    #[test]
    fn take_transfers_without_changing_count() {
        let keep = StringRef::refcounted("busy");
        let mut src = keep.clone();
        let moved = src.take();
        assert!(src.is_empty());
        assert!(!src.is_refcounted());
        assert_eq!(moved, "busy");
        assert_eq!(keep.ref_count(), Some(2));
    }

    #[test]
    fn clone_from_replaces_existing_share() {
        let a = StringRef::refcounted("first");
        let b = StringRef::refcounted("second");
        let mut slot = a.clone();
        slot.clone_from(&b);
        assert_eq!(slot, "second");
        assert_eq!(a.ref_count(), Some(1));
        assert_eq!(b.ref_count(), Some(2));
    }

    #[test]
    fn empty_text_is_refcounted_too() {
        let s = StringRef::refcounted("");
        assert!(s.is_empty());
        assert_eq!(s.as_c_str().unwrap().to_bytes(), b"");
    }

    #[test]
    fn concurrent_copies_leave_single_owner() {
        const THREADS: usize = 8;
        const COPIES: usize = 500;

        let witness = StringRef::refcounted("resource temporarily unavailable");
        let barrier = Arc::new(Barrier::new(THREADS));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let local = witness.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let mut copies: Vec<StringRef> = (0..COPIES).map(|_| local.clone()).collect();
                    // Interleave drops from both ends
                    while !copies.is_empty() {
                        let s = if copies.len() % 2 == 0 { copies.pop() } else { Some(copies.remove(0)) };
                        assert_eq!(s.as_deref(), Some("resource temporarily unavailable"));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(witness.ref_count(), Some(1));
    }

    fn watch_shared(s: &StringRef) -> (Watch, Watch) {
        match &s.repr {
            Repr::Refcounted(shared) => (
                Watch::new(shared.buf.as_ptr()),
                Watch::new(shared.count.as_ptr().cast::<u8>()),
            ),
            _ => panic!("not refcounted"),
        }
    }

    #[test]
    fn buffer_freed_once_by_last_share() {
        let s = StringRef::refcounted("no space left on device");
        let (buf, count) = watch_shared(&s);
        let copies: Vec<StringRef> = (0..16).map(|_| s.clone()).collect();
        drop(copies);
        assert_eq!((buf.frees(), count.frees()), (0, 0));
        drop(s);
        assert_eq!((buf.frees(), count.frees()), (1, 1));
    }

    #[test]
    fn buffer_freed_once_after_concurrent_drops() {
        const THREADS: usize = 8;
        const COPIES: usize = 250;

        let root = StringRef::refcounted("too many open files");
        let (buf, count) = watch_shared(&root);
        let barrier = Arc::new(Barrier::new(THREADS));
        // Every thread gets shares; the root goes to the last one so the
        // final release can happen on any thread
        let mut shares: Vec<StringRef> = (1..THREADS).map(|_| root.clone()).collect();
        shares.push(root);
        let handles: Vec<_> = shares
            .into_iter()
            .map(|local| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    let copies: Vec<StringRef> = (0..COPIES).map(|_| local.clone()).collect();
                    barrier.wait();
                    drop(local);
                    for c in &copies {
                        assert_eq!(c.as_str(), "too many open files");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!((buf.frees(), count.frees()), (1, 1));
    }

    #[test]
    fn counter_alloc_failure_leaks_nothing() {
        let before = testing::live_bytes();
        testing::fail_next_word_alloc();
        assert!(StringRef::try_refcounted(&["interrupted ", "system call"]).is_none());
        assert!(!testing::word_alloc_failure_pending());
        assert_eq!(testing::live_bytes(), before);
    }

    #[test]
    fn counter_alloc_failure_falls_back_to_literal() {
        testing::fail_next_word_alloc();
        let s = StringRef::refcounted("interrupted system call");
        assert!(!testing::word_alloc_failure_pending());
        assert_eq!(s, ALLOC_FAILED_MESSAGE);
        assert!(!s.is_refcounted());
        assert_eq!(s.as_c_str().unwrap().to_str().unwrap(), ALLOC_FAILED_MESSAGE);

        // Next allocation is unaffected
        assert!(StringRef::refcounted("interrupted system call").is_refcounted());
    }

    // A hooked reference that owns a leaked String and a shared counter, with
    // a second counter recording how many times the text was freed.
    struct HookState {
        refs: AtomicUsize,
        frees: Arc<AtomicUsize>,
        copies: AtomicUsize,
        moves: AtomicUsize,
        destroys: AtomicUsize,
        events: Arc<Mutex<Vec<ThunkOp>>>,
        text: Box<str>,
    }

    fn counting_thunk(op: ThunkOp, dest: &mut RawStringParts, src: Option<&RawStringParts>) {
        let state = unsafe { &*(dest.state[0] as *const HookState) };
        state.events.lock().unwrap().push(op);
        match op {
            ThunkOp::Copy | ThunkOp::Move => {
                let src = src.expect("copy/move carry a source");
                assert_eq!(src.state[0], dest.state[0]);
                if op == ThunkOp::Copy {
                    state.copies.fetch_add(1, Ordering::Relaxed);
                } else {
                    state.moves.fetch_add(1, Ordering::Relaxed);
                }
                state.refs.fetch_add(1, Ordering::Relaxed);
            }
            ThunkOp::Destroy => {
                assert!(src.is_none());
                state.destroys.fetch_add(1, Ordering::Relaxed);
                if state.refs.fetch_sub(1, Ordering::AcqRel) == 1 {
                    state.frees.fetch_add(1, Ordering::SeqCst);
                    drop(unsafe { Box::from_raw(dest.state[0] as *mut HookState) });
                }
            }
        }
    }

    fn hooked(text: &str, frees: &Arc<AtomicUsize>) -> StringRef {
        hooked_logged(text, frees, &Arc::default())
    }

    fn hooked_logged(
        text: &str,
        frees: &Arc<AtomicUsize>,
        events: &Arc<Mutex<Vec<ThunkOp>>>,
    ) -> StringRef {
        let state = Box::new(HookState {
            refs: AtomicUsize::new(1),
            frees: Arc::clone(frees),
            copies: AtomicUsize::new(0),
            moves: AtomicUsize::new(0),
            destroys: AtomicUsize::new(0),
            events: Arc::clone(events),
            text: format!("{text}\0").into_boxed_str(),
        });
        let (ptr, len) = (state.text.as_ptr(), text.len());
        let state = Box::into_raw(state) as *mut ();
        unsafe {
            StringRef::from_raw_parts(ptr, len, [state, ptr::null_mut(), ptr::null_mut()], counting_thunk)
        }
    }

    fn hook_state(s: &StringRef) -> &HookState {
        match &s.repr {
            Repr::Hooked { parts, .. } => unsafe { &*(parts.state[0] as *const HookState) },
            _ => panic!("not hooked"),
        }
    }

    #[test]
    fn hooked_routes_each_op_once() {
        let frees = Arc::new(AtomicUsize::new(0));
        let mut s = hooked("permission denied", &frees);
        let copy = s.clone();
        let moved = s.take();
        {
            let st = hook_state(&copy);
            assert_eq!(st.copies.load(Ordering::Relaxed), 1);
            assert_eq!(st.moves.load(Ordering::Relaxed), 1);
            // the vacated original was destroyed by take()
            assert_eq!(st.destroys.load(Ordering::Relaxed), 1);
        }
        assert_eq!(moved, "permission denied");
        assert_eq!(copy, "permission denied");
        drop(copy);
        assert_eq!(frees.load(Ordering::SeqCst), 0);
        drop(moved);
        assert_eq!(frees.load(Ordering::SeqCst), 1);
        drop(s);
        assert_eq!(frees.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn hooked_freed_once_after_concurrent_teardown() {
        const THREADS: usize = 6;
        const COPIES: usize = 200;

        let frees = Arc::new(AtomicUsize::new(0));
        let root = hooked("operation canceled", &frees);
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let local = root.clone();
                thread::spawn(move || {
                    let copies: Vec<StringRef> = (0..COPIES).map(|_| local.clone()).collect();
                    for c in &copies {
                        assert_eq!(c.as_str(), "operation canceled");
                    }
                    drop(copies);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(frees.load(Ordering::SeqCst), 0);
        drop(root);
        assert_eq!(frees.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn hooked_has_c_view() {
        let frees = Arc::new(AtomicUsize::new(0));
        let s = hooked("not a directory", &frees);
        assert_eq!(s.len(), 15);
        assert_eq!(s.as_c_str().unwrap().to_bytes(), b"not a directory");
        let copy = s.clone();
        assert_eq!(copy.as_c_str().unwrap().to_bytes(), b"not a directory");
    }

    #[test]
    fn clone_from_destroys_before_copying() {
        let frees = Arc::new(AtomicUsize::new(0));
        let events = Arc::new(Mutex::new(Vec::new()));
        let old = hooked_logged("old text", &frees, &events);
        let new = hooked_logged("new text", &frees, &events);
        let mut slot = old.clone();
        drop(old);
        events.lock().unwrap().clear();

        slot.clone_from(&new);
        assert_eq!(*events.lock().unwrap(), [ThunkOp::Destroy, ThunkOp::Copy]);
        // The old text was released before the new one was taken
        assert_eq!(frees.load(Ordering::SeqCst), 1);
        assert_eq!(slot, "new text");
    }
}
