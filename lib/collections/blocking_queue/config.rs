use ark_mem::buf::GrowthPolicy;

/// Construction options for a `BlockingQueue`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueConfig {
    /// Number of elements to reserve room for up front.
    pub capacity: usize,
    /// Whether the queue supports `close`.
    pub closeable: bool,
    /// Growth policy of the queue's storage.
    pub growth: GrowthPolicy,
}

impl QueueConfig {
    #[inline]
    pub const fn new() -> QueueConfig {
        QueueConfig {
            capacity: 0,
            closeable: false,
            growth: GrowthPolicy::new(8),
        }
    }

    #[inline]
    pub const fn capacity(mut self, capacity: usize) -> QueueConfig {
        self.capacity = capacity;
        self
    }

    #[inline]
    pub const fn closeable(mut self, closeable: bool) -> QueueConfig {
        self.closeable = closeable;
        self
    }

    #[inline]
    pub const fn growth(mut self, growth: GrowthPolicy) -> QueueConfig {
        self.growth = growth;
        self
    }
}

impl Default for QueueConfig {
    #[inline]
    fn default() -> QueueConfig {
        QueueConfig::new()
    }
}
