//! Configuration for a reduction run.

use crate::error::ReduceError;

/// Leaf tasks per worker the cutoff aims for.
pub const DEFAULT_LEAF_MULTIPLIER: usize = 8;

/// Upper bound on the size of a dedicated worker pool.
pub const MAX_PARALLELISM: usize = 1024;

/// Configuration for a reduction run.
#[derive(Debug, Clone)]
pub struct ReduceConfig {
    /// `0` uses every core through the global pool; a positive value builds a
    /// pool with that many workers. Negative values are rejected.
    pub parallelism: i64,
    /// Target number of leaf tasks per worker.
    pub leaf_multiplier: usize,
    /// Fixed cutoff instead of the derived one.
    pub cutoff: Option<usize>,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            parallelism: 0,
            leaf_multiplier: DEFAULT_LEAF_MULTIPLIER,
            cutoff: None,
        }
    }
}

impl ReduceConfig {
    /// Set the parallelism hint (0 = all cores).
    pub fn with_parallelism(mut self, parallelism: i64) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Set the number of leaf tasks aimed for per worker.
    pub fn with_leaf_multiplier(mut self, leaf_multiplier: usize) -> Self {
        self.leaf_multiplier = leaf_multiplier;
        self
    }

    /// Use a fixed cutoff instead of the derived one.
    pub fn with_cutoff(mut self, cutoff: usize) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    /// Set the fixed cutoff from an Option.
    pub fn with_cutoff_option(mut self, cutoff: Option<usize>) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Reject settings that cannot describe a run.
    pub fn validate(&self) -> Result<(), ReduceError> {
        if self.parallelism < 0 {
            return Err(ReduceError::InvalidParallelism(self.parallelism));
        }
        if self.leaf_multiplier == 0 {
            return Err(ReduceError::InvalidLeafMultiplier);
        }
        if self.cutoff == Some(0) {
            return Err(ReduceError::InvalidCutoff);
        }
        Ok(())
    }

    /// Whether the run gets its own pool instead of the global one.
    pub fn uses_dedicated_pool(&self) -> bool {
        self.parallelism > 0
    }

    /// Number of pool threads the run is sized for (at least 1, at most `MAX_PARALLELISM`).
    pub fn workers(&self) -> usize {
        self.cores().min(MAX_PARALLELISM)
    }

    /// Cores the cutoff is derived from: the hint itself, uncapped, or the
    /// detected core count for a hint of 0.
    pub fn cores(&self) -> usize {
        if self.parallelism > 0 {
            usize::try_from(self.parallelism).unwrap_or(usize::MAX)
        } else {
            num_cpus::get().max(1)
        }
    }

    /// Range size at or below which a task scans sequentially:
    /// `max(1, n / (cores * leaf_multiplier))` unless overridden.
    pub fn cutoff_for(&self, n: usize) -> usize {
        match self.cutoff {
            Some(cutoff) => cutoff.max(1),
            None => {
                let leaves = self.cores().saturating_mul(self.leaf_multiplier.max(1));
                (n / leaves).max(1)
            }
        }
    }
}
