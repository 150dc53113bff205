//! Diagnostics hooks injected into a reduction run.

use crate::reduce::result::ReductionStats;
use crate::Mana;
use tracing::{debug, trace};

/// Receives progress events from the engine. Every hook defaults to a no-op.
///
/// Hooks are called from worker threads in no particular order.
pub trait ReduceObserver: Sync {
    /// A sequential scan over `[lo, hi)` is starting.
    fn leaf_started(&self, _lo: usize, _hi: usize) {}

    /// The unit at `index` finished with `value`.
    fn unit_evaluated(&self, _index: usize, _id: u32, _value: Mana) {}

    /// The run completed successfully.
    fn finished(&self, _stats: &ReductionStats) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ReduceObserver for NoopObserver {}

/// Observer that forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ReduceObserver for TracingObserver {
    fn leaf_started(&self, lo: usize, hi: usize) {
        trace!(lo, hi, "leaf scan");
    }

    fn unit_evaluated(&self, index: usize, id: u32, value: Mana) {
        trace!(index, id, value, "hunt finished");
    }

    fn finished(&self, stats: &ReductionStats) {
        debug!(
            workers = stats.workers,
            cutoff = stats.cutoff,
            leaves = stats.leaves,
            units = stats.units_evaluated,
            elapsed = ?stats.elapsed_time,
            "reduction finished"
        );
    }
}
