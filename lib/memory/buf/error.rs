use core::fmt;
use crate::alloc::HeapError;

/// Checked access to a missing element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BufError {
    /// The buffer holds no elements.
    #[error("access to an empty container")]
    Empty,
}

/// Failed insertion of a value into a buffer. The buffer is left unchanged,
/// and the rejected value is handed back to the caller.
#[derive(thiserror::Error)]
#[error("insertion failed: {error}")]
pub struct InsertError<T> {
    /// Value that could not be inserted.
    pub value: T,
    /// Reason the insertion failed.
    pub error: HeapError,
}

impl<T> InsertError<T> {
    /// Returns the value that could not be inserted.
    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> fmt::Debug for InsertError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("InsertError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Failed in-place construction of a new element.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EmplaceError<E> {
    /// The element's constructor failed; the buffer is unchanged.
    #[error("element construction failed: {0}")]
    Construct(E),
    /// Storage for the element couldn't be allocated; the buffer is unchanged.
    #[error("element storage allocation failed: {0}")]
    Alloc(HeapError),
}
