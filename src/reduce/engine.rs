//! Fork/join reduction engine.
//!
//! A task over `[lo, hi)` either scans sequentially (range no larger than the
//! cutoff) or splits at `mid = lo + (hi - lo) / 2` and runs both halves with
//! `rayon::join`. Each merge applies [`PartialResult::combine`], so the winner
//! is the one a left-to-right scan would pick.

use crate::error::ReduceError;
use crate::reduce::config::ReduceConfig;
use crate::reduce::observer::{NoopObserver, ReduceObserver};
use crate::reduce::partial::PartialResult;
use crate::reduce::result::{Reduction, ReductionStats};
use crate::reduce::SearchUnit;
use rayon::ThreadPoolBuilder;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// What a finished task hands back to its parent.
#[derive(Debug, Clone, Copy)]
struct Tally {
    best: PartialResult,
    leaves: u64,
    evaluated: u64,
}

/// Why a task produced no tally.
#[derive(Debug)]
enum Halt {
    /// A unit in this range failed.
    Failed(ReduceError),
    /// Stopped early because a unit elsewhere failed.
    Abandoned,
}

type Outcome = Result<Tally, Halt>;

/// Shared, read-only context of one run.
struct Task<'a, U, O: ?Sized> {
    units: &'a [U],
    cutoff: usize,
    observer: &'a O,
    abort: &'a AtomicBool,
}

impl<U: SearchUnit, O: ReduceObserver + ?Sized> Task<'_, U, O> {
    fn run(&self, lo: usize, hi: usize) -> Outcome {
        assert!(
            lo <= hi && hi <= self.units.len(),
            "invalid reduction range [{}, {}) over {} units",
            lo,
            hi,
            self.units.len()
        );

        if hi - lo <= self.cutoff {
            return self.scan(lo, hi);
        }

        let mid = lo + (hi - lo) / 2;
        let (left, right) = rayon::join(|| self.run(lo, mid), || self.run(mid, hi));
        merge(left, right)
    }

    fn scan(&self, lo: usize, hi: usize) -> Outcome {
        self.observer.leaf_started(lo, hi);

        let mut best = PartialResult::NONE;
        for (index, unit) in self.units[lo..hi].iter().enumerate().map(|(i, u)| (lo + i, u)) {
            if self.abort.load(Ordering::Relaxed) {
                return Err(Halt::Abandoned);
            }

            let value = match unit.evaluate() {
                Ok(value) => value,
                Err(source) => {
                    self.abort.store(true, Ordering::Relaxed);
                    return Err(Halt::Failed(ReduceError::Evaluation {
                        index,
                        id: unit.id(),
                        source,
                    }));
                }
            };

            self.observer.unit_evaluated(index, unit.id(), value);
            best = best.offer(value, index);
        }

        Ok(Tally {
            best,
            leaves: 1,
            evaluated: (hi - lo) as u64,
        })
    }
}

/// Merge sibling outcomes. The left failure wins if both sides failed.
fn merge(left: Outcome, right: Outcome) -> Outcome {
    match (left, right) {
        (Ok(l), Ok(r)) => Ok(Tally {
            best: l.best.combine(r.best),
            leaves: l.leaves + r.leaves,
            evaluated: l.evaluated + r.evaluated,
        }),
        (Err(Halt::Failed(e)), _) | (_, Err(Halt::Failed(e))) => Err(Halt::Failed(e)),
        (Err(Halt::Abandoned), _) | (_, Err(Halt::Abandoned)) => Err(Halt::Abandoned),
    }
}

/// Find the best unit with default diagnostics (none).
pub fn reduce<U: SearchUnit>(units: &[U], config: &ReduceConfig) -> Result<Reduction, ReduceError> {
    reduce_observed(units, config, &NoopObserver)
}

/// Find the best unit using `hint` workers (`0` for all cores).
pub fn reduce_with_hint<U: SearchUnit>(units: &[U], hint: i64) -> Result<PartialResult, ReduceError> {
    let config = ReduceConfig::default().with_parallelism(hint);
    reduce(units, &config).map(|r| r.best)
}

/// Find the best unit, reporting progress to `observer`.
///
/// Every unit is evaluated exactly once when the run succeeds. The config is
/// validated before any unit is touched. If any unit fails the run fails;
/// units that have not started yet are skipped.
pub fn reduce_observed<U, O>(
    units: &[U],
    config: &ReduceConfig,
    observer: &O,
) -> Result<Reduction, ReduceError>
where
    U: SearchUnit,
    O: ReduceObserver + ?Sized,
{
    config.validate()?;
    let start_time = Instant::now();

    let n = units.len();
    let mut stats = ReductionStats {
        cutoff: config.cutoff_for(n),
        workers: config.workers(),
        ..Default::default()
    };

    let best = if n == 0 {
        PartialResult::NONE
    } else {
        let abort = AtomicBool::new(false);
        let task = Task {
            units,
            cutoff: stats.cutoff,
            observer,
            abort: &abort,
        };

        let outcome = if config.uses_dedicated_pool() {
            let pool = ThreadPoolBuilder::new()
                .num_threads(stats.workers)
                .thread_name(|i| format!("hunter-{}", i))
                .build()?;
            pool.install(|| task.run(0, n))
        } else {
            task.run(0, n)
        };

        match outcome {
            Ok(tally) => {
                stats.leaves = tally.leaves;
                stats.units_evaluated = tally.evaluated;
                tally.best
            }
            Err(Halt::Failed(e)) => return Err(e),
            // Only set together with a failure, which always reaches the root
            Err(Halt::Abandoned) => unreachable!("reduction abandoned without a failure"),
        }
    };

    stats.elapsed_time = start_time.elapsed();
    observer.finished(&stats);

    Ok(Reduction { best, stats })
}

/// Plain left-to-right scan with the same tie-break rule. Reference answer
/// for [`reduce`].
pub fn sequential_scan<U: SearchUnit>(units: &[U]) -> Result<PartialResult, ReduceError> {
    units
        .iter()
        .enumerate()
        .try_fold(PartialResult::NONE, |best, (index, unit)| {
            let value = unit.evaluate().map_err(|source| ReduceError::Evaluation {
                index,
                id: unit.id(),
                source,
            })?;
            Ok(best.offer(value, index))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HuntError;
    use crate::Mana;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    /// Unit with a fixed outcome that counts its evaluations.
    struct Fixed {
        id: u32,
        value: Result<Mana, HuntError>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn ok(id: u32, value: Mana) -> Self {
            Self {
                id,
                value: Ok(value),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(id: u32) -> Self {
            Self {
                id,
                value: Err(HuntError::StepLimit { limit: 0 }),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SearchUnit for Fixed {
        fn id(&self) -> u32 {
            self.id
        }

        fn evaluate(&self) -> Result<Mana, HuntError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.value.clone()
        }
    }

    fn units(values: &[Mana]) -> Vec<Fixed> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Fixed::ok(i as u32 + 1, v))
            .collect()
    }

    #[derive(Default)]
    struct Recorder {
        leaves: Mutex<Vec<(usize, usize)>>,
        finished: AtomicUsize,
    }

    impl ReduceObserver for Recorder {
        fn leaf_started(&self, lo: usize, hi: usize) {
            self.leaves.lock().unwrap().push((lo, hi));
        }

        fn finished(&self, _stats: &ReductionStats) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_empty_is_sentinel() {
        let empty: Vec<Fixed> = Vec::new();
        let reduction = reduce(&empty, &ReduceConfig::default()).unwrap();
        assert_eq!(reduction.best, PartialResult::NONE);
        assert_eq!(reduction.stats.leaves, 0);
        assert_eq!(sequential_scan(&empty).unwrap(), PartialResult::NONE);
    }

    #[test]
    fn test_duplicate_maximum() {
        let units = units(&[5, 9, 9, 3]);
        let config = ReduceConfig::default().with_parallelism(2).with_cutoff(1);
        let reduction = reduce(&units, &config).unwrap();
        assert_eq!(reduction.best, PartialResult::new(9, 1));
    }

    #[test]
    fn test_fully_split() {
        let units = units(&[1, 2, 3, 4, 5]);
        let recorder = Recorder::default();
        let config = ReduceConfig::default().with_parallelism(3).with_cutoff(1);
        let reduction = reduce_observed(&units, &config, &recorder).unwrap();

        assert_eq!(reduction.best, PartialResult::new(5, 4));
        assert_eq!(reduction.stats.leaves, 5);

        let mut leaves = recorder.leaves.lock().unwrap().clone();
        leaves.sort();
        assert_eq!(leaves, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);
        assert_eq!(recorder.finished.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_split_point_is_floor_midpoint() {
        let units = units(&[1, 1, 1, 1, 1, 1, 1]);
        let recorder = Recorder::default();
        let config = ReduceConfig::default().with_parallelism(1).with_cutoff(2);
        reduce_observed(&units, &config, &recorder).unwrap();

        // [0,7) -> [0,3) + [3,7); [0,3) -> [0,1) + [1,3); [3,7) -> [3,5) + [5,7)
        let mut leaves = recorder.leaves.lock().unwrap().clone();
        leaves.sort();
        assert_eq!(leaves, vec![(0, 1), (1, 3), (3, 5), (5, 7)]);
    }

    #[test]
    fn test_range_at_cutoff_is_one_leaf() {
        let units = units(&[4, 8, 8, 2]);
        let recorder = Recorder::default();
        let config = ReduceConfig::default().with_parallelism(2).with_cutoff(4);
        let whole = reduce_observed(&units, &config, &recorder).unwrap();

        assert_eq!(*recorder.leaves.lock().unwrap(), vec![(0, 4)]);
        assert_eq!(whole.stats.leaves, 1);

        let split = reduce(&units, &config.clone().with_cutoff(1)).unwrap();
        assert_eq!(whole.best, split.best);
    }

    #[test]
    fn test_every_unit_evaluated_once() {
        let units = units(&(0..257).map(|v| (v * 31) % 101).collect::<Vec<_>>());
        let reduction = reduce(&units, &ReduceConfig::default().with_parallelism(4)).unwrap();

        assert_eq!(reduction.stats.units_evaluated, 257);
        for unit in &units {
            assert_eq!(unit.calls.load(Ordering::SeqCst), 1, "unit {}", unit.id);
        }
    }

    #[test]
    fn test_negative_hint_rejected_before_work() {
        let units = units(&[1, 2, 3]);
        let err = reduce_with_hint(&units, -2).unwrap_err();

        assert!(matches!(err, ReduceError::InvalidParallelism(-2)));
        assert!(units.iter().all(|u| u.calls.load(Ordering::SeqCst) == 0));
    }

    #[test]
    fn test_failure_propagates() {
        let mut units = units(&[1, 2, 3, 4, 5, 6, 7, 8]);
        units[5] = Fixed::failing(42);

        let err = reduce(&units, &ReduceConfig::default().with_parallelism(2).with_cutoff(1))
            .unwrap_err();
        match err {
            ReduceError::Evaluation { index, id, source } => {
                assert_eq!(index, 5);
                assert_eq!(id, 42);
                assert_eq!(source, HuntError::StepLimit { limit: 0 });
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sequential_scan_failure() {
        let units = vec![Fixed::ok(1, 3), Fixed::failing(2), Fixed::ok(3, 9)];
        let err = sequential_scan(&units).unwrap_err();
        assert!(matches!(err, ReduceError::Evaluation { index: 1, id: 2, .. }));
        // The scan stops at the first failure
        assert_eq!(units[2].calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_merge_prefers_left_failure() {
        let fail = |index| {
            Err(Halt::Failed(ReduceError::Evaluation {
                index,
                id: 0,
                source: HuntError::StepLimit { limit: 0 },
            }))
        };
        match merge(fail(1), fail(7)) {
            Err(Halt::Failed(ReduceError::Evaluation { index, .. })) => assert_eq!(index, 1),
            other => panic!("unexpected outcome: {other:?}"),
        }
        match merge(Err(Halt::Abandoned), fail(7)) {
            Err(Halt::Failed(ReduceError::Evaluation { index, .. })) => assert_eq!(index, 7),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "invalid reduction range")]
    fn test_inverted_range_is_fatal() {
        let units = units(&[1, 2]);
        let abort = AtomicBool::new(false);
        let task = Task {
            units: &units,
            cutoff: 1,
            observer: &NoopObserver,
            abort: &abort,
        };
        let _ = task.run(2, 1);
    }

    #[test]
    fn test_stats_shape() {
        let units = units(&[7; 64]);
        let config = ReduceConfig::default().with_parallelism(2);
        let reduction = reduce(&units, &config).unwrap();

        // 64 / (2 * 8) = 4 per leaf
        assert_eq!(reduction.stats.cutoff, 4);
        assert_eq!(reduction.stats.workers, 2);
        assert_eq!(reduction.stats.leaves, 16);
        assert_eq!(reduction.best, PartialResult::new(7, 0));
    }
}
