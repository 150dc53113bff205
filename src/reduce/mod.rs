//! Parallel max reduction over an ordered collection of search units.
//!
//! The engine splits the index range in half recursively, scans small ranges
//! sequentially below a cutoff and merges sibling results with a fixed
//! value-then-index rule. The answer is therefore the same as a plain
//! left-to-right scan no matter how the work is scheduled.
//!
//! # Architecture
//!
//! - [`ReduceConfig`] holds the parallelism hint and the cutoff policy
//! - [`PartialResult`] is the best `(value, index)` pair of a range and owns
//!   the tie-break rule
//! - the **engine** forks with `rayon::join` and merges on the way back up
//! - a [`ReduceObserver`] receives optional diagnostics; nothing global
//!
//! # Example
//!
//! ```ignore
//! use dungeon_hunter::reduce::{ReduceConfig, reduce};
//!
//! let config = ReduceConfig::default()
//!     .with_parallelism(4)
//!     .with_leaf_multiplier(8);
//!
//! let reduction = reduce(&hunts, &config)?;
//! if let Some(index) = reduction.best.best_index { /* ... */ }
//! ```

pub mod config;
pub mod engine;
pub mod observer;
pub mod partial;
pub mod result;

pub use config::{ReduceConfig, DEFAULT_LEAF_MULTIPLIER, MAX_PARALLELISM};
pub use engine::{reduce, reduce_observed, reduce_with_hint, sequential_scan};
pub use observer::{NoopObserver, ReduceObserver, TracingObserver};
pub use partial::PartialResult;
pub use result::{Reduction, ReductionStats};

use crate::error::HuntError;
use crate::Mana;

/// A unit of work the engine ranks.
///
/// Implementations must be safe to evaluate concurrently with other units and
/// must return the same value however often and in whatever order they are
/// evaluated.
pub trait SearchUnit: Sync {
    /// Stable identifier, only used for diagnostics.
    fn id(&self) -> u32;

    /// Run the unit's search to completion and return the value it found.
    fn evaluate(&self) -> Result<Mana, HuntError>;
}
