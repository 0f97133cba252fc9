use std::fmt;
use ark_mem::alloc::HeapError;
use ark_mem::buf::EmplaceError as BufEmplaceError;

/// Error returned by [`BlockingQueue::push`]. The rejected value is handed
/// back to the caller.
///
/// [`BlockingQueue::push`]: super::BlockingQueue::push
#[derive(thiserror::Error)]
pub enum PushError<T> {
    /// Storage for the value couldn't be allocated; the queue is unchanged.
    #[error("failed to enqueue: {error}")]
    Alloc { value: T, error: HeapError },
    /// The queue has been closed.
    #[error("failed to enqueue: queue is closed")]
    Closed(T),
}

impl<T> PushError<T> {
    /// Returns the value that couldn't be enqueued.
    #[inline]
    pub fn into_inner(self) -> T {
        match self {
            PushError::Alloc { value, .. } => value,
            PushError::Closed(value) => value,
        }
    }
}

impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PushError::Alloc { error, .. } => f.debug_struct("Alloc")
                .field("error", error)
                .finish_non_exhaustive(),
            PushError::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

/// Error returned by [`BlockingQueue::try_emplace`].
///
/// [`BlockingQueue::try_emplace`]: super::BlockingQueue::try_emplace
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum EmplaceError<E> {
    /// The element's constructor failed; the queue is unchanged.
    #[error("element construction failed: {0}")]
    Construct(E),
    /// Storage for the element couldn't be allocated; the queue is unchanged.
    #[error("element storage allocation failed: {0}")]
    Alloc(HeapError),
    /// The queue has been closed; the constructor never ran.
    #[error("queue is closed")]
    Closed,
}

impl<E> From<BufEmplaceError<E>> for EmplaceError<E> {
    #[inline]
    fn from(error: BufEmplaceError<E>) -> EmplaceError<E> {
        match error {
            BufEmplaceError::Construct(error) => EmplaceError::Construct(error),
            BufEmplaceError::Alloc(error) => EmplaceError::Alloc(error),
        }
    }
}

/// Error returned by [`BlockingQueue::try_pop`].
///
/// [`BlockingQueue::try_pop`]: super::BlockingQueue::try_pop
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TryPopError {
    /// The queue was empty.
    #[error("queue is empty")]
    Empty,
    /// The queue was empty, and has been closed.
    #[error("queue is empty and closed")]
    Closed,
}

/// The queue is empty and closed; no element will ever arrive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("queue is empty and closed")]
pub struct Closed;

/// Error returned by [`BlockingQueue::wait_and_pop_timeout`].
///
/// [`BlockingQueue::wait_and_pop_timeout`]: super::BlockingQueue::wait_and_pop_timeout
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    /// No element arrived before the timeout elapsed.
    #[error("timed out waiting for an element")]
    Timeout,
    /// The queue is empty, and has been closed.
    #[error("queue is empty and closed")]
    Closed,
}

impl From<Closed> for WaitError {
    #[inline]
    fn from(_: Closed) -> WaitError {
        WaitError::Closed
    }
}

/// Error returned by [`BlockingQueue::close`].
///
/// [`BlockingQueue::close`]: super::BlockingQueue::close
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CloseError {
    /// The queue wasn't configured to be closeable.
    #[error("queue is not closeable")]
    Unsupported,
}
