use core::alloc;
use core::fmt;
use core::mem;
use core::num::NonZeroUsize;

/// Size and alignment constraints for a memory block.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Required size in bytes of a valid memory block.
    size: usize,
    /// Required power-of-two base address alignment for a valid memory block.
    align: NonZeroUsize,
}

impl Layout {
    /// Returns a zero-sized `Layout` with byte alignment.
    #[inline]
    pub const fn empty() -> Layout {
        unsafe { Layout::from_size_align_unchecked(0, 1) }
    }

    /// Returns a `Layout` with the given size and power-of-two alignment.
    ///
    /// # Safety
    ///
    /// `align` must be a non-zero power of two, and `size` rounded up to
    /// `align` must not exceed `isize::MAX`.
    #[inline]
    pub const unsafe fn from_size_align_unchecked(size: usize, align: usize) -> Layout {
        Layout { size: size, align: NonZeroUsize::new_unchecked(align) }
    }

    /// Returns a `Layout` with the given size and power-of-two alignment,
    /// or a `LayoutError` for invalid constraints.
    #[inline]
    pub fn from_size_align(size: usize, align: usize) -> Result<Layout, LayoutError> {
        if !align.is_power_of_two() {
            return Err(LayoutError::Misaligned);
        }
        if size > isize::MAX as usize - (align - 1) {
            return Err(LayoutError::Oversized);
        }
        Ok(unsafe { Layout::from_size_align_unchecked(size, align) })
    }

    /// Returns the `Layout` of the parameterized type.
    #[inline]
    pub fn for_type<T>() -> Layout {
        let size = mem::size_of::<T>();
        let align = mem::align_of::<T>();
        unsafe { Layout::from_size_align_unchecked(size, align) }
    }

    /// Returns the `Layout` of an array of `len` values of the parameterized type.
    #[inline]
    pub fn for_array<T>(len: usize) -> Result<Layout, LayoutError> {
        let align = mem::align_of::<T>();
        let size = match mem::size_of::<T>().checked_mul(len) {
            Some(size) => size,
            None => return Err(LayoutError::Oversized),
        };
        if size > isize::MAX as usize - (align - 1) {
            return Err(LayoutError::Oversized);
        }
        Ok(unsafe { Layout::from_size_align_unchecked(size, align) })
    }

    /// Returns the `Layout` of an array of `len` values of the parameterized
    /// type, without checking for size overflow.
    ///
    /// # Safety
    ///
    /// `len` values of `T` must not overflow `isize::MAX` bytes.
    #[inline]
    pub unsafe fn for_array_unchecked<T>(len: usize) -> Layout {
        let align = mem::align_of::<T>();
        let size = mem::size_of::<T>().wrapping_mul(len);
        Layout::from_size_align_unchecked(size, align)
    }

    /// Returns the required size in bytes of a valid memory block.
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns the required power-of-two base address alignment for a valid memory block.
    #[inline]
    pub fn align(&self) -> usize {
        self.align.get()
    }

    /// Converts this `Layout` into the layout type of the `core::alloc` interface.
    #[inline]
    pub fn to_core(&self) -> alloc::Layout {
        unsafe { alloc::Layout::from_size_align_unchecked(self.size, self.align.get()) }
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Layout")
            .field("size", &self.size)
            .field("align", &self.align.get())
            .finish()
    }
}

/// Memory layout error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Improper structure alignment.
    #[error("alignment is not a power of two")]
    Misaligned,
    /// Structure size overflow.
    #[error("layout size overflows the address space")]
    Oversized,
}
