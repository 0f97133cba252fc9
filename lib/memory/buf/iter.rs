use core::fmt;
use core::iter::FusedIterator;
use crate::alloc::Heap;
use crate::buf::region::{Region, Side};

/// Owning iterator over the elements of a `DequeBuf`, front to back.
/// Elements not yet yielded drop with the iterator, after which the memory
/// block returns to its heap.
pub struct IntoIter<T, H: Heap> {
    region: Region<T, H>,
}

impl<T, H: Heap> IntoIter<T, H> {
    #[inline]
    pub(crate) fn new(region: Region<T, H>) -> IntoIter<T, H> {
        IntoIter { region: region }
    }

    /// Returns the elements not yet yielded.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.region.as_slice()
    }
}

impl<T, H: Heap> Iterator for IntoIter<T, H> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.region.len() != 0 {
            Some(unsafe { self.region.take(Side::Front) })
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.region.len();
        (len, Some(len))
    }
}

impl<T, H: Heap> DoubleEndedIterator for IntoIter<T, H> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.region.len() != 0 {
            Some(unsafe { self.region.take(Side::Back) })
        } else {
            None
        }
    }
}

impl<T, H: Heap> ExactSizeIterator for IntoIter<T, H> {
}

impl<T, H: Heap> FusedIterator for IntoIter<T, H> {
}

impl<T: fmt::Debug, H: Heap> fmt::Debug for IntoIter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
