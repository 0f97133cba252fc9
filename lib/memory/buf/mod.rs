//! Growable double-ended buffers.
//!
//! A [`DequeBuf`] owns a single contiguous memory block, allocated from a
//! [`Heap`], in which its live elements occupy a contiguous range bracketed
//! by front slack and back slack. Insertion at either end is amortized O(1):
//! an end that runs out of slack first reclaims the slack abandoned at the
//! other end by shifting the live range in place, and only reallocates when
//! the live range fills the whole block.
//!
//! Every insertion is strongly failure safe. New elements are fully
//! constructed before any storage is touched, and a failed allocation leaves
//! the old block, with every live element, in place.
//!
//! [`Heap`]: crate::alloc::Heap

use core::fmt;
use core::mem;
use core::ops::{Deref, DerefMut};
use core::slice;
use crate::alloc::{Global, Heap, HeapError};

mod error;
mod growth;
mod iter;
mod region;

pub use self::error::{BufError, EmplaceError, InsertError};
pub use self::growth::GrowthPolicy;
pub use self::iter::IntoIter;

use self::region::{Region, Side};

/// A contiguous, growable, double-ended buffer of values, allocated from a
/// `Heap`.
///
/// Elements never need to be default constructible, clonable, or anything
/// else; they only need to be movable, which every Rust value is. A fresh
/// buffer holds no memory block, and allocates its first block on first
/// insertion.
///
/// Growth may relocate every live element, so references into a buffer
/// can't be held across insertions; the borrow checker enforces this.
pub struct DequeBuf<T, H: Heap = Global> {
    region: Region<T, H>,
    policy: GrowthPolicy,
}

#[cold]
#[track_caller]
fn alloc_failed(error: HeapError) -> ! {
    panic!("DequeBuf allocation failed: {}", error);
}

impl<T, H: Heap + Default> DequeBuf<T, H> {
    /// Returns an empty buffer that allocates from a default heap.
    #[inline]
    pub fn new() -> DequeBuf<T, H> {
        DequeBuf::with_heap(H::default())
    }

    /// Returns an empty buffer, allocated from a default heap, with room for
    /// at least `cap` back insertions.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    #[track_caller]
    pub fn with_capacity(cap: usize) -> DequeBuf<T, H> {
        match DequeBuf::try_with_capacity_in(cap, H::default()) {
            Ok(buf) => buf,
            Err(error) => alloc_failed(error),
        }
    }
}

impl<T, H: Heap> DequeBuf<T, H> {
    /// Returns an empty buffer that allocates from `heap`.
    #[inline]
    pub fn with_heap(heap: H) -> DequeBuf<T, H> {
        DequeBuf::with_heap_and_policy(heap, GrowthPolicy::default())
    }

    /// Returns an empty buffer that allocates from `heap`, and grows per `policy`.
    #[inline]
    pub fn with_heap_and_policy(heap: H, policy: GrowthPolicy) -> DequeBuf<T, H> {
        DequeBuf {
            region: Region::new(heap),
            policy: policy,
        }
    }

    /// Returns an empty buffer, allocated from `heap`, with room for at
    /// least `cap` back insertions; returns a `HeapError` if the allocation
    /// fails.
    pub fn try_with_capacity_in(cap: usize, heap: H) -> Result<DequeBuf<T, H>, HeapError> {
        let mut buf = DequeBuf::with_heap(heap);
        buf.try_reserve_back(cap)?;
        Ok(buf)
    }

    /// Returns this buffer with its growth policy replaced by `policy`.
    #[inline]
    pub fn with_policy(mut self, policy: GrowthPolicy) -> DequeBuf<T, H> {
        self.policy = policy;
        self
    }

    /// Returns the heap from which this buffer allocates.
    #[inline]
    pub fn heap(&self) -> &H {
        self.region.heap()
    }

    /// Returns the growth policy of this buffer.
    #[inline]
    pub fn policy(&self) -> &GrowthPolicy {
        &self.policy
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.region.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.region.len() == 0
    }

    /// Returns the total number of slots in the memory block, live or not.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.region.cap()
    }

    /// Returns the number of free slots before the first element.
    #[inline]
    pub fn front_slack(&self) -> usize {
        self.region.front_slack()
    }

    /// Returns the number of free slots after the last element.
    #[inline]
    pub fn back_slack(&self) -> usize {
        self.region.back_slack()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.region.as_slice()
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.region.as_mut_slice()
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.region.as_slice().iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.region.as_mut_slice().iter_mut()
    }

    /// Returns a reference to the first element, or `BufError::Empty`.
    #[inline]
    pub fn front(&self) -> Result<&T, BufError> {
        self.region.as_slice().first().ok_or(BufError::Empty)
    }

    /// Returns a reference to the last element, or `BufError::Empty`.
    #[inline]
    pub fn back(&self) -> Result<&T, BufError> {
        self.region.as_slice().last().ok_or(BufError::Empty)
    }

    #[inline]
    pub fn front_mut(&mut self) -> Result<&mut T, BufError> {
        self.region.as_mut_slice().first_mut().ok_or(BufError::Empty)
    }

    #[inline]
    pub fn back_mut(&mut self) -> Result<&mut T, BufError> {
        self.region.as_mut_slice().last_mut().ok_or(BufError::Empty)
    }

    /// Returns a reference to the first element, without checking for emptiness.
    ///
    /// # Safety
    ///
    /// The buffer must not be empty.
    #[inline]
    pub unsafe fn front_unchecked(&self) -> &T {
        self.region.as_slice().get_unchecked(0)
    }

    /// Returns a reference to the last element, without checking for emptiness.
    ///
    /// # Safety
    ///
    /// The buffer must not be empty.
    #[inline]
    pub unsafe fn back_unchecked(&self) -> &T {
        let live = self.region.as_slice();
        live.get_unchecked(live.len().wrapping_sub(1))
    }

    /// Moves `value` in before the first element; returns the value, along
    /// with a `HeapError`, if storage for it can't be allocated, in which
    /// case the buffer is unchanged.
    pub fn try_push_front(&mut self, value: T) -> Result<&mut T, InsertError<T>> {
        self.try_insert(Side::Front, value)
    }

    /// Moves `value` in after the last element; returns the value, along
    /// with a `HeapError`, if storage for it can't be allocated, in which
    /// case the buffer is unchanged.
    pub fn try_push_back(&mut self, value: T) -> Result<&mut T, InsertError<T>> {
        self.try_insert(Side::Back, value)
    }

    /// Moves `value` in before the first element.
    ///
    /// # Panics
    ///
    /// Panics if storage for the value can't be allocated.
    #[track_caller]
    pub fn push_front(&mut self, value: T) {
        if let Err(error) = self.try_push_front(value) {
            alloc_failed(error.error);
        }
    }

    /// Moves `value` in after the last element.
    ///
    /// # Panics
    ///
    /// Panics if storage for the value can't be allocated.
    #[track_caller]
    pub fn push_back(&mut self, value: T) {
        if let Err(error) = self.try_push_back(value) {
            alloc_failed(error.error);
        }
    }

    /// Constructs a new first element with `f`. The element is constructed
    /// before any storage is touched, so a panic in `f` leaves the buffer
    /// unchanged.
    #[track_caller]
    pub fn emplace_front<F: FnOnce() -> T>(&mut self, f: F) -> &mut T {
        let value = f();
        match self.try_insert(Side::Front, value) {
            Ok(slot) => slot,
            Err(error) => alloc_failed(error.error),
        }
    }

    /// Constructs a new last element with `f`. The element is constructed
    /// before any storage is touched, so a panic in `f` leaves the buffer
    /// unchanged.
    #[track_caller]
    pub fn emplace_back<F: FnOnce() -> T>(&mut self, f: F) -> &mut T {
        let value = f();
        match self.try_insert(Side::Back, value) {
            Ok(slot) => slot,
            Err(error) => alloc_failed(error.error),
        }
    }

    /// Constructs a new first element with the fallible constructor `f`.
    /// On any failure the buffer is left exactly as it was.
    pub fn try_emplace_front<E, F>(&mut self, f: F) -> Result<&mut T, EmplaceError<E>>
        where F: FnOnce() -> Result<T, E>
    {
        let value = f().map_err(EmplaceError::Construct)?;
        self.try_insert(Side::Front, value).map_err(|error| EmplaceError::Alloc(error.error))
    }

    /// Constructs a new last element with the fallible constructor `f`.
    /// On any failure the buffer is left exactly as it was.
    pub fn try_emplace_back<E, F>(&mut self, f: F) -> Result<&mut T, EmplaceError<E>>
        where F: FnOnce() -> Result<T, E>
    {
        let value = f().map_err(EmplaceError::Construct)?;
        self.try_insert(Side::Back, value).map_err(|error| EmplaceError::Alloc(error.error))
    }

    fn try_insert(&mut self, side: Side, value: T) -> Result<&mut T, InsertError<T>> {
        if let Err(error) = self.region.grow(side, 1, &self.policy) {
            return Err(InsertError { value: value, error: error });
        }
        Ok(unsafe { self.region.materialize(side, value) })
    }

    /// Removes and returns the first element, or `BufError::Empty`.
    #[inline]
    pub fn pop_front(&mut self) -> Result<T, BufError> {
        if self.region.len() == 0 {
            return Err(BufError::Empty);
        }
        Ok(unsafe { self.region.take(Side::Front) })
    }

    /// Removes and returns the last element, or `BufError::Empty`.
    #[inline]
    pub fn pop_back(&mut self) -> Result<T, BufError> {
        if self.region.len() == 0 {
            return Err(BufError::Empty);
        }
        Ok(unsafe { self.region.take(Side::Back) })
    }

    /// Removes and returns the first element, without checking for emptiness.
    ///
    /// # Safety
    ///
    /// The buffer must not be empty; popping an empty buffer is undefined
    /// behavior.
    #[inline]
    pub unsafe fn pop_front_unchecked(&mut self) -> T {
        self.region.take(Side::Front)
    }

    /// Removes and returns the last element, without checking for emptiness.
    ///
    /// # Safety
    ///
    /// The buffer must not be empty; popping an empty buffer is undefined
    /// behavior.
    #[inline]
    pub unsafe fn pop_back_unchecked(&mut self) -> T {
        self.region.take(Side::Back)
    }

    /// Ensures room for at least `additional` front insertions without
    /// reallocating. Compacts in place when the total slack suffices;
    /// otherwise relocates every element to a block of exactly
    /// `len + additional` slots. The old block is released only after every
    /// element has moved; on failure the buffer is unchanged.
    pub fn try_reserve_front(&mut self, additional: usize) -> Result<(), HeapError> {
        self.region.reserve(Side::Front, additional)
    }

    /// Ensures room for at least `additional` back insertions without
    /// reallocating. Compacts in place when the total slack suffices;
    /// otherwise relocates every element to a block of exactly
    /// `len + additional` slots. The old block is released only after every
    /// element has moved; on failure the buffer is unchanged.
    pub fn try_reserve_back(&mut self, additional: usize) -> Result<(), HeapError> {
        self.region.reserve(Side::Back, additional)
    }

    /// # Panics
    ///
    /// Panics if the allocation fails.
    #[track_caller]
    pub fn reserve_front(&mut self, additional: usize) {
        if let Err(error) = self.try_reserve_front(additional) {
            alloc_failed(error);
        }
    }

    /// # Panics
    ///
    /// Panics if the allocation fails.
    #[track_caller]
    pub fn reserve_back(&mut self, additional: usize) {
        if let Err(error) = self.try_reserve_back(additional) {
            alloc_failed(error);
        }
    }

    /// If there is any front slack, relocates to the minimal block that
    /// holds only the live range. An empty buffer releases its block
    /// entirely.
    pub fn shrink_to_fit_front(&mut self) -> Result<(), HeapError> {
        self.region.shrink_to_fit(Side::Front)
    }

    /// If there is any back slack, relocates to the minimal block that
    /// holds only the live range. An empty buffer releases its block
    /// entirely.
    pub fn shrink_to_fit_back(&mut self) -> Result<(), HeapError> {
        self.region.shrink_to_fit(Side::Back)
    }

    /// Drops every element past the first `len`.
    #[inline]
    pub fn truncate_back(&mut self, len: usize) {
        self.region.truncate_back(len);
    }

    /// Drops every element, retaining the memory block.
    #[inline]
    pub fn clear(&mut self) {
        self.region.truncate_back(0);
    }

    /// Exchanges the contents, heaps, and policies of two buffers.
    #[inline]
    pub fn swap(&mut self, other: &mut DequeBuf<T, H>) {
        mem::swap(self, other);
    }

    /// Appends every value yielded by `iter`; stops at, and returns, the
    /// first allocation failure. Values appended before the failure remain.
    /// Room for the iterator's lower size bound is made up front, with the
    /// same amortized growth as `push_back`.
    pub fn try_extend_back<I: IntoIterator<Item=T>>(&mut self, iter: I) -> Result<(), HeapError> {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.region.grow(Side::Back, lower, &self.policy)?;
        for value in iter {
            self.try_push_back(value).map_err(|error| error.error)?;
        }
        Ok(())
    }
}

impl<T: Clone, H: Heap> DequeBuf<T, H> {
    /// Inserts a clone of `value` before the first element. The clone is
    /// made before any storage is touched.
    #[track_caller]
    pub fn push_front_clone(&mut self, value: &T) {
        self.push_front(value.clone());
    }

    /// Inserts a clone of `value` after the last element. The clone is
    /// made before any storage is touched.
    #[track_caller]
    pub fn push_back_clone(&mut self, value: &T) {
        self.push_back(value.clone());
    }
}

impl<T: Clone, H: Heap + Clone> DequeBuf<T, H> {
    /// Returns a clone of this buffer, allocated from a clone of its heap,
    /// with exactly enough capacity for its elements.
    pub fn try_clone(&self) -> Result<DequeBuf<T, H>, HeapError> {
        let mut clone = DequeBuf::with_heap_and_policy(self.heap().clone(), self.policy);
        clone.try_reserve_back(self.len())?;
        for value in self.iter() {
            // Can't fail; capacity is reserved.
            clone.try_push_back(value.clone()).map_err(|error| error.error)?;
        }
        Ok(clone)
    }
}

impl<T, H: Heap> Deref for DequeBuf<T, H> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, H: Heap> DerefMut for DequeBuf<T, H> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, H: Heap + Default> Default for DequeBuf<T, H> {
    #[inline]
    fn default() -> DequeBuf<T, H> {
        DequeBuf::new()
    }
}

impl<T: Clone, H: Heap + Clone> Clone for DequeBuf<T, H> {
    #[track_caller]
    fn clone(&self) -> DequeBuf<T, H> {
        match self.try_clone() {
            Ok(clone) => clone,
            Err(error) => alloc_failed(error),
        }
    }
}

impl<T: fmt::Debug, H: Heap> fmt::Debug for DequeBuf<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, H: Heap> Extend<T> for DequeBuf<T, H> {
    #[track_caller]
    fn extend<I: IntoIterator<Item=T>>(&mut self, iter: I) {
        if let Err(error) = self.try_extend_back(iter) {
            alloc_failed(error);
        }
    }
}

impl<T, H: Heap + Default> FromIterator<T> for DequeBuf<T, H> {
    #[track_caller]
    fn from_iter<I: IntoIterator<Item=T>>(iter: I) -> DequeBuf<T, H> {
        let mut buf = DequeBuf::new();
        buf.extend(iter);
        buf
    }
}

impl<T, H: Heap> IntoIterator for DequeBuf<T, H> {
    type Item = T;
    type IntoIter = IntoIter<T, H>;

    #[inline]
    fn into_iter(self) -> IntoIter<T, H> {
        IntoIter::new(self.region)
    }
}

impl<'a, T, H: Heap> IntoIterator for &'a DequeBuf<T, H> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> slice::Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, H: Heap> IntoIterator for &'a mut DequeBuf<T, H> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> slice::IterMut<'a, T> {
        self.iter_mut()
    }
}
