//! Reduction output and run statistics.

use crate::reduce::partial::PartialResult;
use std::time::Duration;

/// Outcome of a successful reduction run.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    /// Global winner; `best_index` is `None` iff there were no units.
    pub best: PartialResult,
    pub stats: ReductionStats,
}

/// Statistics from a reduction run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReductionStats {
    /// Range size at or below which tasks scanned sequentially.
    pub cutoff: usize,
    /// Workers the run was sized for.
    pub workers: usize,
    /// Number of sequential leaf scans.
    pub leaves: u64,
    /// Number of `evaluate` calls made.
    pub units_evaluated: u64,
    /// Wall time of the whole run, including pool setup.
    pub elapsed_time: Duration,
}

impl ReductionStats {
    /// Units evaluated per second.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.units_evaluated as f64 / secs
        }
    }

    /// Format statistics as a human-readable string.
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Workers: {}\n", self.workers));
        s.push_str(&format!("Cutoff: {}\n", self.cutoff));
        s.push_str(&format!("Leaf tasks: {}\n", self.leaves));
        s.push_str(&format!("Units evaluated: {}\n", self.units_evaluated));
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Throughput: {:.0} units/sec\n", self.throughput()));
        s
    }
}
