//! Parallel hill-climbing over a shared mana field.
//!
//! Many [`Hunt`]s climb a [`DungeonMap`] independently; the [`reduce`] engine
//! evaluates them with fork/join parallelism and returns the highest peak,
//! breaking ties towards the lowest collection index so the answer matches a
//! sequential scan exactly.

pub mod error;
pub mod field;
pub mod hunt;
pub mod reduce;

pub use error::{FieldError, HuntError, ReduceError};
pub use field::{DungeonMap, ManaField, RESOLUTION};
pub use hunt::{cells_evaluated, hunt_count, spawn_hunts, Hunt, Peak};
pub use reduce::{
    reduce, reduce_observed, reduce_with_hint, sequential_scan, PartialResult, ReduceConfig,
    ReduceObserver, Reduction, ReductionStats, SearchUnit, TracingObserver,
};

/// Scalar value of a field cell and of a finished search
pub type Mana = i64;
