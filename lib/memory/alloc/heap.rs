use core_alloc::sync::Arc;
use crate::block::{Block, Layout, LayoutError};

/// Allocator for raw memory blocks.
///
/// A `Heap` hands out uninitialized memory; callers never assume that
/// allocated blocks are zeroed, and explicitly materialize and drop every
/// value they place in a block.
///
/// # Safety
///
/// A `Block` returned by `alloc` must be valid for reads and writes of at
/// least `layout.size()` bytes, must be aligned to `layout.align()`, and must
/// remain valid until it is passed back to `dealloc` with the same `layout`.
pub unsafe trait Heap {
    /// Allocates a new memory block sized and aligned to at least `layout`;
    /// returns a `HeapError` if the allocation fails.
    ///
    /// # Safety
    ///
    /// The returned block must eventually be released by `dealloc` on this
    /// same `Heap`, with the same `layout`.
    unsafe fn alloc(&self, layout: Layout) -> Result<Block, HeapError>;

    /// Deallocates a memory `block` previously allocated by `alloc` with
    /// the given `layout`. Returns the number of freed bytes.
    ///
    /// # Safety
    ///
    /// `block` must have been allocated by this `Heap` with `layout`, and
    /// must not be used after this call.
    unsafe fn dealloc(&self, block: Block, layout: Layout) -> usize;
}

unsafe impl<'a, H: Heap + ?Sized> Heap for &'a H {
    #[inline]
    unsafe fn alloc(&self, layout: Layout) -> Result<Block, HeapError> {
        (**self).alloc(layout)
    }

    #[inline]
    unsafe fn dealloc(&self, block: Block, layout: Layout) -> usize {
        (**self).dealloc(block, layout)
    }
}

unsafe impl<H: Heap + ?Sized> Heap for Arc<H> {
    #[inline]
    unsafe fn alloc(&self, layout: Layout) -> Result<Block, HeapError> {
        (**self).alloc(layout)
    }

    #[inline]
    unsafe fn dealloc(&self, block: Block, layout: Layout) -> usize {
        (**self).dealloc(block, layout)
    }
}

/// Heap memory allocation error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    /// Improper structure alignment.
    #[error("misaligned allocation request")]
    Misaligned,
    /// Structure size overflow.
    #[error("allocation request overflows the address space")]
    Oversized,
    /// Insufficient available memory.
    #[error("out of memory")]
    OutOfMemory,
}

impl From<LayoutError> for HeapError {
    #[inline]
    fn from(error: LayoutError) -> HeapError {
        match error {
            LayoutError::Misaligned => HeapError::Misaligned,
            LayoutError::Oversized => HeapError::Oversized,
        }
    }
}
