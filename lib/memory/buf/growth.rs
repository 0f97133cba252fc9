use core::cmp;

/// Capacity growth and compaction rules of a `DequeBuf`.
///
/// Capacities below `small_cap` double on growth; larger capacities grow by
/// half again. An empty buffer grows to a single slot. Growth never yields
/// less capacity than an insertion needs.
///
/// When one end of a buffer runs out of slack, the live elements are shifted
/// toward the other end, instead of reallocating, whenever the other end has
/// at least `min_compact_slack` free slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Capacity below which growth doubles.
    small_cap: usize,
    /// Minimum opposite-side slack that triggers compaction over reallocation.
    min_compact_slack: usize,
}

impl GrowthPolicy {
    /// Returns a policy that doubles capacities below `small_cap`, and that
    /// compacts whenever any slack remains on the opposite side.
    #[inline]
    pub const fn new(small_cap: usize) -> GrowthPolicy {
        GrowthPolicy {
            small_cap: small_cap,
            min_compact_slack: 1,
        }
    }

    /// Returns this policy with compaction requiring at least `slack` free
    /// slots on the opposite side; zero is treated as one.
    #[inline]
    pub const fn with_min_compact_slack(mut self, slack: usize) -> GrowthPolicy {
        self.min_compact_slack = if slack == 0 { 1 } else { slack };
        self
    }

    /// Returns the capacity below which growth doubles.
    #[inline]
    pub const fn small_cap(&self) -> usize {
        self.small_cap
    }

    /// Returns the minimum opposite-side slack that triggers compaction.
    #[inline]
    pub const fn min_compact_slack(&self) -> usize {
        self.min_compact_slack
    }

    /// Returns the capacity to grow a block of `cap` slots to, given that at
    /// least `needed` slots are required.
    pub fn grow(&self, cap: usize, needed: usize) -> usize {
        let grown = if cap == 0 {
            1
        } else if cap < self.small_cap {
            cap.saturating_mul(2)
        } else {
            cap.saturating_add(cap / 2)
        };
        cmp::max(grown, needed)
    }
}

impl Default for GrowthPolicy {
    #[inline]
    fn default() -> GrowthPolicy {
        GrowthPolicy::new(8)
    }
}
