//! Intersection and sampling statistics.
//!
//! Counters accumulate in a thread-local so the hot intersection paths never
//! touch shared memory. The bucket renderer drains each worker's counters
//! after every bucket and the totals are merged once the frame is done.

use std::cell::Cell;
use std::ops::AddAssign;

/// Counters gathered during a render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Ray-triangle tests performed
    pub triangle_tests: u64,
    /// Ray-triangle tests that produced a hit
    pub triangle_hits: u64,
    /// Rejected because the ray is parallel to the triangle plane
    pub triangle_parallel: u64,
    /// Rejected by the barycentric bounds
    pub triangle_barycentric: u64,
    /// Rejected because `t` fell outside the query interval
    pub triangle_beyond: u64,
    /// Ray-quad tests that produced a hit
    pub quad_hits: u64,
    /// Scatter samples dropped because the mixture density was unusable
    pub guarded_samples: u64,
}

impl RenderStats {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for RenderStats {
    fn add_assign(&mut self, other: Self) {
        self.triangle_tests += other.triangle_tests;
        self.triangle_hits += other.triangle_hits;
        self.triangle_parallel += other.triangle_parallel;
        self.triangle_barycentric += other.triangle_barycentric;
        self.triangle_beyond += other.triangle_beyond;
        self.quad_hits += other.quad_hits;
        self.guarded_samples += other.guarded_samples;
    }
}

thread_local! {
    static LOCAL: Cell<RenderStats> = Cell::new(RenderStats::default());
}

/// Apply `f` to the current thread's counters.
#[inline]
pub(crate) fn record(f: impl FnOnce(&mut RenderStats)) {
    LOCAL.with(|cell| {
        let mut stats = cell.get();
        f(&mut stats);
        cell.set(stats);
    });
}

/// Return the current thread's counters and reset them to zero.
pub fn take() -> RenderStats {
    LOCAL.with(|cell| cell.take())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_take() {
        let _ = take();
        record(|s| s.triangle_tests += 2);
        record(|s| s.quad_hits += 1);

        let stats = take();
        assert_eq!(stats.triangle_tests, 2);
        assert_eq!(stats.quad_hits, 1);

        // Draining resets the counters
        assert!(take().is_empty());
    }

    #[test]
    fn test_merge() {
        let mut total = RenderStats::default();
        total += RenderStats {
            triangle_hits: 3,
            ..Default::default()
        };
        total += RenderStats {
            triangle_hits: 4,
            guarded_samples: 1,
            ..Default::default()
        };
        assert_eq!(total.triangle_hits, 7);
        assert_eq!(total.guarded_samples, 1);
    }
}
