use core::sync::atomic::AtomicUsize;
use core::sync::atomic::Ordering::{Acquire, Relaxed, Release};
use crate::block::{Block, Layout};
use crate::alloc::{Global, Heap, HeapError};

/// Sentinel fuse value for a `Metered` heap that never injects failures.
const UNFUSED: usize = usize::MAX;

/// `Heap` that accounts for the allocations of an underlying `Heap`.
///
/// A `Metered` heap tracks the number of live blocks and the number of bytes
/// they span. It can enforce a byte `limit`, failing any allocation that
/// would exceed it with `HeapError::OutOfMemory`, and it can be armed to fail
/// after a fixed number of further successful allocations, which makes
/// allocation failure paths reproducible.
pub struct Metered<H = Global> {
    /// Heap that performs the actual allocations.
    heap: H,
    /// Maximum number of bytes that may be live at once.
    limit: usize,
    /// Number of currently allocated memory blocks.
    live: AtomicUsize,
    /// Number of bytes spanned by currently allocated memory blocks.
    used: AtomicUsize,
    /// Total number of successful allocations.
    allocs: AtomicUsize,
    /// Number of allocations that may still succeed; `UNFUSED` if unarmed.
    fuse: AtomicUsize,
}

impl Metered<Global> {
    /// Returns a new `Metered` heap over the process allocator, with no limit.
    #[inline]
    pub fn global() -> Metered<Global> {
        Metered::new(Global)
    }
}

impl<H: Heap> Metered<H> {
    /// Returns a new `Metered` heap that accounts for allocations from `heap`.
    #[inline]
    pub fn new(heap: H) -> Metered<H> {
        Metered::with_limit(heap, usize::MAX)
    }

    /// Returns a new `Metered` heap that fails allocations from `heap` that
    /// would bring the number of live bytes above `limit`.
    #[inline]
    pub fn with_limit(heap: H, limit: usize) -> Metered<H> {
        Metered {
            heap: heap,
            limit: limit,
            live: AtomicUsize::new(0),
            used: AtomicUsize::new(0),
            allocs: AtomicUsize::new(0),
            fuse: AtomicUsize::new(UNFUSED),
        }
    }

    /// Returns the underlying heap.
    #[inline]
    pub fn inner(&self) -> &H {
        &self.heap
    }

    /// Returns the maximum number of bytes that may be live at once.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the number of currently allocated memory blocks.
    #[inline]
    pub fn live(&self) -> usize {
        self.live.load(Relaxed)
    }

    /// Returns the number of bytes spanned by currently allocated memory blocks.
    #[inline]
    pub fn used(&self) -> usize {
        self.used.load(Relaxed)
    }

    /// Returns the number of bytes that may still be allocated under the limit.
    #[inline]
    pub fn free(&self) -> usize {
        self.limit.saturating_sub(self.used())
    }

    /// Returns the total number of successful allocations.
    #[inline]
    pub fn allocs(&self) -> usize {
        self.allocs.load(Relaxed)
    }

    /// Arms this heap to let `count` more allocations succeed, and to fail
    /// every allocation after that with `HeapError::OutOfMemory`.
    #[inline]
    pub fn fail_after(&self, count: usize) {
        self.fuse.store(count, Release);
    }

    /// Disarms any failure injected by `fail_after`.
    #[inline]
    pub fn disarm(&self) {
        self.fuse.store(UNFUSED, Release);
    }

    /// Burns one unit of the allocation fuse; returns `false` if the fuse
    /// has already run out.
    fn burn_fuse(&self) -> bool {
        let mut fuse = self.fuse.load(Acquire);
        loop {
            if fuse == UNFUSED {
                return true;
            }
            if fuse == 0 {
                return false;
            }
            match self.fuse.compare_exchange_weak(fuse, fuse - 1, Release, Acquire) {
                Ok(_) => return true,
                Err(actual) => fuse = actual,
            }
        }
    }

    /// Returns a unit burned by an allocation that went on to fail.
    fn restore_fuse(&self) {
        let mut fuse = self.fuse.load(Acquire);
        while fuse != UNFUSED {
            match self.fuse.compare_exchange_weak(fuse, fuse + 1, Release, Acquire) {
                Ok(_) => return,
                Err(actual) => fuse = actual,
            }
        }
    }

    /// Reserves `size` bytes against the limit; returns `false` if the
    /// reservation would exceed it.
    fn reserve_bytes(&self, size: usize) -> bool {
        let mut used = self.used.load(Relaxed);
        loop {
            let new_used = match used.checked_add(size) {
                Some(new_used) if new_used <= self.limit => new_used,
                _ => return false,
            };
            match self.used.compare_exchange_weak(used, new_used, Relaxed, Relaxed) {
                Ok(_) => return true,
                Err(actual) => used = actual,
            }
        }
    }
}

unsafe impl<H: Heap> Heap for Metered<H> {
    unsafe fn alloc(&self, layout: Layout) -> Result<Block, HeapError> {
        let size = layout.size();
        if !self.reserve_bytes(size) {
            return Err(HeapError::OutOfMemory);
        }
        // Only allocations within the limit burn the fuse.
        if !self.burn_fuse() {
            self.used.fetch_sub(size, Relaxed);
            return Err(HeapError::OutOfMemory);
        }
        match self.heap.alloc(layout) {
            Ok(block) => {
                self.live.fetch_add(1, Relaxed);
                self.allocs.fetch_add(1, Relaxed);
                Ok(block)
            },
            Err(error) => {
                // Return the reserved bytes and the fuse unit.
                self.used.fetch_sub(size, Relaxed);
                self.restore_fuse();
                Err(error)
            },
        }
    }

    unsafe fn dealloc(&self, block: Block, layout: Layout) -> usize {
        let size = self.heap.dealloc(block, layout);
        self.used.fetch_sub(layout.size(), Relaxed);
        self.live.fetch_sub(1, Relaxed);
        size
    }
}
