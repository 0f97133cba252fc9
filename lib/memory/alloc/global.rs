use core_alloc::alloc;
use crate::block::{Block, Layout};
use crate::alloc::{Heap, HeapError};

/// `Heap` backed by the process-wide memory allocator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Global;

unsafe impl Heap for Global {
    unsafe fn alloc(&self, layout: Layout) -> Result<Block, HeapError> {
        // Zero-sized requests never reach the system allocator.
        if layout.size() == 0 {
            return Ok(Block::dangling(layout.align()));
        }
        let data = alloc::alloc(layout.to_core());
        if data.is_null() {
            return Err(HeapError::OutOfMemory);
        }
        Ok(Block::from_raw_parts(data, layout.size()))
    }

    unsafe fn dealloc(&self, block: Block, layout: Layout) -> usize {
        let size = block.size();
        if size != 0 {
            alloc::dealloc(block.as_ptr(), layout.to_core());
        }
        size
    }
}
