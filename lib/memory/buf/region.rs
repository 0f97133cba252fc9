use core::marker::PhantomData;
use core::mem;
use core::ptr::{self, NonNull};
use core::slice;
use crate::block::{Block, Layout};
use crate::alloc::{Heap, HeapError};
use crate::buf::GrowthPolicy;

/// End of a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Front,
    Back,
}

impl Side {
    #[inline]
    fn opposite(self) -> Side {
        match self {
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        }
    }
}

/// Heap-allocated array of `cap` uninitialized slots. Releases its memory
/// block on drop, but never drops any values stored in its slots.
struct Slots<T, H: Heap> {
    /// Base address of the memory block; dangling when no block is held.
    data: NonNull<T>,
    /// Number of slots in the memory block.
    cap: usize,
    /// Heap that owns the memory block.
    heap: H,
    /// Variant over T.
    marker: PhantomData<T>,
}

impl<T, H: Heap> Slots<T, H> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    #[inline]
    fn new(heap: H) -> Slots<T, H> {
        Slots {
            data: NonNull::dangling(),
            cap: if Self::IS_ZST { usize::MAX } else { 0 },
            heap: heap,
            marker: PhantomData,
        }
    }

    /// Allocates a fresh block of `cap` slots from this heap.
    fn allocate(&self, cap: usize) -> Result<NonNull<T>, HeapError> {
        if cap == 0 {
            return Ok(NonNull::dangling());
        }
        let layout = Layout::for_array::<T>(cap)?;
        let block = unsafe { self.heap.alloc(layout)? };
        Ok(block.cast::<T>())
    }

    /// Returns the currently held block to the heap, leaving no block held.
    ///
    /// # Safety
    ///
    /// No live values may remain in the released slots.
    unsafe fn release(&mut self) {
        if !Self::IS_ZST && self.cap != 0 {
            let layout = Layout::for_array_unchecked::<T>(self.cap);
            let block = Block::from_raw_parts(self.data.as_ptr() as *mut u8, layout.size());
            self.heap.dealloc(block, layout);
            self.data = NonNull::dangling();
            self.cap = 0;
        }
    }
}

impl<T, H: Heap> Drop for Slots<T, H> {
    fn drop(&mut self) {
        unsafe { self.release(); }
    }
}

/// A memory block sliced into front slack, a contiguous range of live
/// values, and back slack.
///
/// `head` counts the front slack; `cap - head - len` is the back slack.
/// Only slots in `head..head + len` hold materialized values. Values are
/// materialized and taken at the boundaries of the live range; growth
/// either compacts the live range in place, or relocates it to a new block.
pub(crate) struct Region<T, H: Heap> {
    slots: Slots<T, H>,
    /// Slot index of the first live value.
    head: usize,
    /// Number of live values.
    len: usize,
}

unsafe impl<T: Send, H: Heap + Send> Send for Region<T, H> {
}

unsafe impl<T: Sync, H: Heap + Sync> Sync for Region<T, H> {
}

impl<T, H: Heap> Region<T, H> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Returns an empty region that holds no memory block.
    #[inline]
    pub(crate) fn new(heap: H) -> Region<T, H> {
        let slots = Slots::new(heap);
        // Zero-sized values start centered so both ends have room.
        let head = slots.cap / 2;
        Region {
            slots: slots,
            head: head,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn heap(&self) -> &H {
        &self.slots.heap
    }

    #[inline]
    pub(crate) fn cap(&self) -> usize {
        self.slots.cap
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn front_slack(&self) -> usize {
        self.head
    }

    #[inline]
    pub(crate) fn back_slack(&self) -> usize {
        self.slots.cap - self.head - self.len
    }

    #[inline]
    pub(crate) fn slack(&self, side: Side) -> usize {
        match side {
            Side::Front => self.front_slack(),
            Side::Back => self.back_slack(),
        }
    }

    /// Returns a pointer to the slot at `index`.
    #[inline]
    fn slot(&self, index: usize) -> *mut T {
        debug_assert!(index <= self.slots.cap);
        self.slots.data.as_ptr().wrapping_add(index)
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.slot(self.head), self.len) }
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.slot(self.head), self.len) }
    }

    /// Moves `value` into the free slot adjacent to the `side` boundary of
    /// the live range, and returns a reference to it.
    ///
    /// # Safety
    ///
    /// The region must have slack on `side`.
    #[inline]
    pub(crate) unsafe fn materialize(&mut self, side: Side, value: T) -> &mut T {
        debug_assert!(self.slack(side) != 0);
        let index = match side {
            Side::Front => {
                self.head = self.head.wrapping_sub(1);
                self.head
            },
            Side::Back => self.head.wrapping_add(self.len),
        };
        let slot = self.slot(index);
        ptr::write(slot, value);
        self.len = self.len.wrapping_add(1);
        &mut *slot
    }

    /// Moves the value at the `side` boundary out of the live range.
    ///
    /// # Safety
    ///
    /// The region must not be empty.
    #[inline]
    pub(crate) unsafe fn take(&mut self, side: Side) -> T {
        debug_assert!(self.len != 0);
        self.len = self.len.wrapping_sub(1);
        let index = match side {
            Side::Front => {
                let index = self.head;
                self.head = self.head.wrapping_add(1);
                index
            },
            Side::Back => self.head.wrapping_add(self.len),
        };
        ptr::read(self.slot(index))
    }

    /// Drops every live value past the first `new_len`.
    pub(crate) fn truncate_back(&mut self, new_len: usize) {
        let old_len = self.len;
        if new_len < old_len {
            let tail = self.slot(self.head.wrapping_add(new_len));
            // Shrink first, so a panicking drop can't cause a double drop.
            self.len = new_len;
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(tail, old_len - new_len));
            }
        }
    }

    /// Shifts the live range flush against the edge opposite `side`, so that
    /// all slack ends up on `side`.
    fn compact(&mut self, side: Side) {
        let new_head = match side {
            Side::Front => self.slots.cap - self.len,
            Side::Back => 0,
        };
        if new_head != self.head {
            tracing::trace!(cap = self.slots.cap, len = self.len, side = ?side, "compacting deque region");
            unsafe { ptr::copy(self.slot(self.head), self.slot(new_head), self.len); }
            self.head = new_head;
        }
    }

    /// Moves the live range into a fresh block of `new_cap` slots, starting
    /// at slot `new_head`, then releases the old block. Leaves the region
    /// untouched if the new block can't be allocated.
    fn relocate(&mut self, new_cap: usize, new_head: usize) -> Result<(), HeapError> {
        debug_assert!(!Self::IS_ZST);
        debug_assert!(new_head + self.len <= new_cap);
        let new_data = match self.slots.allocate(new_cap) {
            Ok(new_data) => new_data,
            Err(error) => {
                tracing::debug!(cap = self.slots.cap, new_cap, len = self.len, %error, "failed to grow deque region");
                return Err(error);
            },
        };
        tracing::trace!(old_cap = self.slots.cap, new_cap, len = self.len, "relocating deque region");
        unsafe {
            ptr::copy_nonoverlapping(self.slot(self.head), new_data.as_ptr().wrapping_add(new_head), self.len);
            self.slots.release();
        }
        self.slots.data = new_data;
        self.slots.cap = new_cap;
        self.head = new_head;
        Ok(())
    }

    /// Ensures at least `additional` free slots on `side`, preferring
    /// compaction over reallocation, and growing the block per `policy` when
    /// it must reallocate.
    pub(crate) fn grow(&mut self, side: Side, additional: usize, policy: &GrowthPolicy) -> Result<(), HeapError> {
        if self.slack(side) >= additional {
            return Ok(());
        }
        let needed = match self.len.checked_add(additional) {
            Some(needed) => needed,
            None => return Err(HeapError::Oversized),
        };
        let spare = self.slack(side.opposite());
        if Self::IS_ZST || (needed <= self.slots.cap && spare >= policy.min_compact_slack()) {
            self.compact(side);
            return Ok(());
        }
        let new_cap = policy.grow(self.slots.cap, needed);
        let new_head = match side {
            Side::Front => new_cap - self.len,
            Side::Back => 0,
        };
        self.relocate(new_cap, new_head)
    }

    /// Ensures at least `additional` free slots on `side`. Compacts if the
    /// total slack suffices; otherwise relocates to a block of exactly
    /// `len + additional` slots.
    pub(crate) fn reserve(&mut self, side: Side, additional: usize) -> Result<(), HeapError> {
        if self.slack(side) >= additional {
            return Ok(());
        }
        let needed = match self.len.checked_add(additional) {
            Some(needed) => needed,
            None => return Err(HeapError::Oversized),
        };
        if needed <= self.slots.cap {
            self.compact(side);
            return Ok(());
        }
        let new_head = match side {
            Side::Front => additional,
            Side::Back => 0,
        };
        self.relocate(needed, new_head)
    }

    /// Relocates the live range into a block of exactly `len` slots, if
    /// there is any slack on `side`.
    pub(crate) fn shrink_to_fit(&mut self, side: Side) -> Result<(), HeapError> {
        if Self::IS_ZST || self.slack(side) == 0 {
            return Ok(());
        }
        let len = self.len;
        self.relocate(len, 0)
    }
}

impl<T, H: Heap> Drop for Region<T, H> {
    fn drop(&mut self) {
        // Slots release the memory block after the live values drop,
        // even if one of the drops panics.
        unsafe { ptr::drop_in_place(self.as_mut_slice() as *mut [T]); }
    }
}
