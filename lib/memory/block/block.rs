use core::fmt;
use core::hash;
use core::ptr::NonNull;

/// Address and size of a raw memory area.
#[derive(Clone, Copy)]
pub struct Block {
    /// Non-null pointer to the base address of the memory area.
    data: NonNull<u8>,
    /// Number of bytes in the memory area.
    size: usize,
}

unsafe impl Send for Block {
}

unsafe impl Sync for Block {
}

impl Block {
    /// Returns a zero-length `Block` whose undereferenceable sentinel address
    /// is aligned to `align`.
    ///
    /// # Panics
    ///
    /// Panics if `align` is zero.
    #[inline]
    pub const fn dangling(align: usize) -> Block {
        if align == 0 {
            panic!("zero alignment");
        }
        Block {
            data: unsafe { NonNull::new_unchecked(align as *mut u8) },
            size: 0,
        }
    }

    /// Constructs a `Block` from a non-zero `data` pointer to `size` bytes.
    ///
    /// # Safety
    ///
    /// `data` must be non-null. The returned `Block` logically takes
    /// ownership of the pointed-to memory.
    #[inline]
    pub const unsafe fn from_raw_parts(data: *mut u8, size: usize) -> Block {
        Block {
            data: NonNull::new_unchecked(data),
            size: size,
        }
    }

    /// Returns the number of bytes of memory owned by this `Block`.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if this `Block` spans no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns a pointer to the memory owned by this `Block`.
    #[inline]
    pub fn as_ptr(&self) -> *mut u8 {
        self.data.as_ptr()
    }

    /// Returns the base address of this `Block` cast to a typed pointer.
    #[inline]
    pub fn cast<T>(&self) -> NonNull<T> {
        self.data.cast::<T>()
    }
}

impl PartialEq for Block {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.data.as_ptr() == other.data.as_ptr() && self.size == other.size
    }
}

impl Eq for Block {
}

impl hash::Hash for Block {
    #[inline]
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.data.as_ptr().hash(state)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Block")
            .field("data", &self.data.as_ptr())
            .field("size", &self.size)
            .finish()
    }
}

impl fmt::Pointer for Block {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Pointer::fmt(&self.data.as_ptr(), f)
    }
}
