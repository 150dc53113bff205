//! Error types for the field, the hunts and the reduction engine.

use thiserror::Error;

/// Failure while constructing a field.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    /// The requested extent has no area.
    #[error("field extent must be positive, got x: [{xmin}, {xmax}], y: [{ymin}, {ymax}]")]
    EmptyExtent {
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
    },
}

/// Failure of a single search unit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HuntError {
    /// The starting coordinate lies outside the field.
    #[error("start ({row}, {col}) is outside a {rows}x{columns} field")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        columns: usize,
    },
    /// The climb did not settle within the allowed number of steps.
    #[error("climb exceeded {limit} steps without reaching a peak")]
    StepLimit { limit: u64 },
}

/// Failure of a reduction run.
#[derive(Debug, Error)]
pub enum ReduceError {
    /// Negative parallelism hint.
    #[error("parallelism hint must be >= 0, got {0}")]
    InvalidParallelism(i64),
    /// Leaf multiplier of zero.
    #[error("leaf multiplier must be >= 1")]
    InvalidLeafMultiplier,
    /// Cutoff override of zero.
    #[error("cutoff must be >= 1")]
    InvalidCutoff,
    /// The dedicated worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
    /// A search unit failed; the run has no result.
    #[error("search unit {id} at index {index} failed: {source}")]
    Evaluation {
        index: usize,
        id: u32,
        #[source]
        source: HuntError,
    },
}
