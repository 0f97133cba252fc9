//! Thread-safe blocking FIFO queue.
//!
//! A [`BlockingQueue`] is a monitor: one mutex guards the queue's storage
//! for the whole of every operation, and one condition variable signals
//! consumers that the queue became non-empty. Producers never block, since
//! the queue is unbounded; consumers either poll with [`try_pop`], or block
//! in [`wait_and_pop`] until an element arrives.
//!
//! Each successful push wakes at most one blocked consumer. A woken consumer
//! re-checks the queue before dequeuing, so spurious wakeups, and consumers
//! racing a woken waiter for the same element, simply wait again.
//!
//! A queue may be configured as closeable. Closing a queue wakes every
//! blocked consumer; consumers keep draining the elements already queued,
//! and then observe [`Closed`] instead of blocking forever.
//!
//! [`try_pop`]: BlockingQueue::try_pop
//! [`wait_and_pop`]: BlockingQueue::wait_and_pop

use std::convert::Infallible;
use std::fmt;
use std::mem;
use std::ptr;
use std::time::{Duration, Instant};
use parking_lot::{Condvar, Mutex, MutexGuard};
use ark_mem::alloc::{Global, Heap, HeapError};
use ark_mem::buf::{BufError, DequeBuf};

mod config;
mod error;

pub use self::config::QueueConfig;
pub use self::error::{Closed, CloseError, EmplaceError, PushError, TryPopError, WaitError};

/// Thread-safe, unbounded FIFO queue with blocking consumers, stored in a
/// `DequeBuf` allocated from a `Heap`.
pub struct BlockingQueue<T, H: Heap = Global> {
    /// Queue storage and closed flag.
    state: Mutex<QueueState<T, H>>,
    /// Signaled when the queue becomes non-empty, or closes.
    ready: Condvar,
    /// Whether `close` is supported.
    closeable: bool,
}

struct QueueState<T, H: Heap> {
    buf: DequeBuf<T, H>,
    closed: bool,
}

/// Re-signals a consumer when a consumer unwinds after dequeuing, so the
/// wakeup it consumed isn't lost to other waiters.
struct Renotify<'a> {
    ready: &'a Condvar,
}

impl<'a> Renotify<'a> {
    #[inline]
    fn arm(ready: &'a Condvar) -> Renotify<'a> {
        Renotify { ready: ready }
    }

    #[inline]
    fn disarm(self) {
        mem::forget(self);
    }
}

impl<'a> Drop for Renotify<'a> {
    fn drop(&mut self) {
        tracing::debug!(renotify = true, "consumer unwound after dequeue; re-notifying waiters");
        self.ready.notify_one();
    }
}

impl<T> BlockingQueue<T> {
    /// Returns an empty, non-closeable queue allocated from the process heap.
    #[inline]
    pub fn new() -> BlockingQueue<T> {
        BlockingQueue::with_config(QueueConfig::default())
    }

    /// Returns an empty queue, allocated from the process heap, configured
    /// by `config`.
    ///
    /// # Panics
    ///
    /// Panics if the initial capacity can't be allocated.
    #[track_caller]
    pub fn with_config(config: QueueConfig) -> BlockingQueue<T> {
        match BlockingQueue::with_heap(Global, config) {
            Ok(queue) => queue,
            Err(error) => panic!("BlockingQueue allocation failed: {}", error),
        }
    }
}

impl<T, H: Heap> BlockingQueue<T, H> {
    /// Returns an empty queue, allocated from `heap`, configured by `config`;
    /// returns a `HeapError` if the initial capacity can't be allocated.
    pub fn with_heap(heap: H, config: QueueConfig) -> Result<BlockingQueue<T, H>, HeapError> {
        let mut buf = DequeBuf::with_heap_and_policy(heap, config.growth);
        buf.try_reserve_back(config.capacity)?;
        Ok(BlockingQueue {
            state: Mutex::new(QueueState {
                buf: buf,
                closed: false,
            }),
            ready: Condvar::new(),
            closeable: config.closeable,
        })
    }

    /// Enqueues `value` at the back of the queue, and wakes one blocked
    /// consumer. Never blocks on capacity. On failure the queue is unchanged,
    /// and `value` is handed back inside the error.
    pub fn push(&self, value: T) -> Result<(), PushError<T>> {
        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(PushError::Closed(value));
            }
            if let Err(error) = state.buf.try_push_back(value) {
                return Err(PushError::Alloc { value: error.value, error: error.error });
            }
        }
        self.ready.notify_one();
        Ok(())
    }

    /// Enqueues an element constructed by `f` under the queue lock, and wakes
    /// one blocked consumer.
    pub fn emplace<F: FnOnce() -> T>(&self, f: F) -> Result<(), EmplaceError<Infallible>> {
        self.try_emplace(|| Ok::<T, Infallible>(f()))
    }

    /// Enqueues an element constructed by the fallible constructor `f` under
    /// the queue lock, and wakes one blocked consumer. If construction or
    /// allocation fails, the queue is unchanged and no consumer is woken.
    pub fn try_emplace<E, F>(&self, f: F) -> Result<(), EmplaceError<E>>
        where F: FnOnce() -> Result<T, E>
    {
        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(EmplaceError::Closed);
            }
            state.buf.try_emplace_back(f)?;
        }
        self.ready.notify_one();
        Ok(())
    }

    /// Dequeues the front element without blocking; returns
    /// `TryPopError::Empty` if there is none.
    pub fn try_pop(&self) -> Result<T, TryPopError> {
        let mut state = self.state.lock();
        match state.buf.pop_front() {
            Ok(value) => Ok(value),
            Err(BufError::Empty) if state.closed => Err(TryPopError::Closed),
            Err(BufError::Empty) => Err(TryPopError::Empty),
        }
    }

    /// Dequeues the front element, blocking for as long as the queue is
    /// empty. Returns `Closed` only once a closeable queue has been closed
    /// and drained; a queue that isn't closeable blocks indefinitely.
    pub fn wait_and_pop(&self) -> Result<T, Closed> {
        let mut state = self.state.lock();
        self.wait_ready(&mut state)?;
        Ok(unsafe { state.buf.pop_front_unchecked() })
    }

    /// Dequeues the front element into `out`, blocking for as long as the
    /// queue is empty. The previous value of `out` drops under the queue
    /// lock; if that drop panics, another blocked consumer is woken before
    /// the panic propagates.
    pub fn wait_and_pop_into(&self, out: &mut T) -> Result<(), Closed> {
        let mut state = self.state.lock();
        self.wait_ready(&mut state)?;
        let value = unsafe { state.buf.pop_front_unchecked() };
        let renotify = Renotify::arm(&self.ready);
        *out = value;
        renotify.disarm();
        Ok(())
    }

    /// Dequeues the front element, blocking for at most `timeout` while the
    /// queue is empty.
    pub fn wait_and_pop_timeout(&self, timeout: Duration) -> Result<T, WaitError> {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => return self.wait_and_pop().map_err(WaitError::from),
        };
        let mut state = self.state.lock();
        let mut timed_out = false;
        while state.buf.is_empty() {
            if state.closed {
                return Err(WaitError::Closed);
            }
            if timed_out {
                return Err(WaitError::Timeout);
            }
            timed_out = self.ready.wait_until(&mut state, deadline).timed_out();
        }
        Ok(unsafe { state.buf.pop_front_unchecked() })
    }

    /// Blocks until the queue is non-empty, or closed and empty.
    fn wait_ready(&self, state: &mut MutexGuard<'_, QueueState<T, H>>) -> Result<(), Closed> {
        while state.buf.is_empty() {
            if state.closed {
                return Err(Closed);
            }
            self.ready.wait(state);
        }
        Ok(())
    }

    /// Dequeues every element at once, front to back, without blocking.
    pub fn drain(&self) -> Vec<T> {
        let mut state = self.state.lock();
        let mut items = Vec::with_capacity(state.buf.len());
        while let Ok(value) = state.buf.pop_front() {
            items.push(value);
        }
        items
    }

    /// Returns a clone of the front element, or `BufError::Empty`. The result
    /// may be stale by the time the caller observes it.
    pub fn front(&self) -> Result<T, BufError>
        where T: Clone
    {
        self.state.lock().buf.front().cloned()
    }

    /// Returns a clone of the back element, or `BufError::Empty`. The result
    /// may be stale by the time the caller observes it.
    pub fn back(&self) -> Result<T, BufError>
        where T: Clone
    {
        self.state.lock().buf.back().cloned()
    }

    /// Applies `f` to the front element under the queue lock.
    pub fn peek_front<R, F: FnOnce(&T) -> R>(&self, f: F) -> Result<R, BufError> {
        self.state.lock().buf.front().map(f)
    }

    /// Applies `f` to the back element under the queue lock.
    pub fn peek_back<R, F: FnOnce(&T) -> R>(&self, f: F) -> Result<R, BufError> {
        self.state.lock().buf.back().map(f)
    }

    /// Returns the number of queued elements; advisory only.
    #[inline]
    pub fn len(&self) -> usize {
        self.state.lock().buf.len()
    }

    /// Returns `true` if no elements are queued; advisory only.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.state.lock().buf.is_empty()
    }

    #[inline]
    pub fn is_closeable(&self) -> bool {
        self.closeable
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Closes the queue. Pushes fail from then on, and every blocked consumer
    /// wakes; consumers drain the remaining elements, then observe `Closed`.
    /// Closing an already closed queue does nothing.
    pub fn close(&self) -> Result<(), CloseError> {
        if !self.closeable {
            return Err(CloseError::Unsupported);
        }
        let remaining = {
            let mut state = self.state.lock();
            state.closed = true;
            state.buf.len()
        };
        tracing::debug!(remaining, "closed blocking queue");
        self.ready.notify_all();
        Ok(())
    }

    /// Exchanges the queued elements of two queues. Both locks are taken in
    /// address order. Consumers blocked on a queue that became non-empty
    /// are woken.
    pub fn swap(&self, other: &BlockingQueue<T, H>) {
        if ptr::eq(self, other) {
            return;
        }
        let (mut ours, mut theirs) = if (self as *const Self) < (other as *const Self) {
            let ours = self.state.lock();
            (ours, other.state.lock())
        } else {
            let theirs = other.state.lock();
            (self.state.lock(), theirs)
        };
        ours.buf.swap(&mut theirs.buf);
        let wake_ours = !ours.buf.is_empty();
        let wake_theirs = !theirs.buf.is_empty();
        drop(ours);
        drop(theirs);
        if wake_ours {
            self.ready.notify_all();
        }
        if wake_theirs {
            other.ready.notify_all();
        }
    }
}

impl<T> Default for BlockingQueue<T> {
    #[inline]
    fn default() -> BlockingQueue<T> {
        BlockingQueue::new()
    }
}

impl<T: fmt::Debug, H: Heap> fmt::Debug for BlockingQueue<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BlockingQueue")
            .field("items", &state.buf)
            .field("closed", &state.closed)
            .finish()
    }
}
