//! Shared helpers for integration tests

#![allow(dead_code)]

use dungeon_hunter::{HuntError, Mana, SearchUnit};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Search unit with a preset outcome
pub struct ScriptedUnit {
    pub id: u32,
    pub outcome: Result<Mana, HuntError>,
    pub calls: AtomicUsize,
}

impl ScriptedUnit {
    pub fn new(id: u32, value: Mana) -> Self {
        Self {
            id,
            outcome: Ok(value),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(id: u32) -> Self {
        Self {
            id,
            outcome: Err(HuntError::OutOfBounds {
                row: 0,
                col: 0,
                rows: 0,
                columns: 0,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SearchUnit for ScriptedUnit {
    fn id(&self) -> u32 {
        self.id
    }

    fn evaluate(&self) -> Result<Mana, HuntError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// One unit per value, ids starting at 1
pub fn scripted(values: &[Mana]) -> Vec<ScriptedUnit> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| ScriptedUnit::new(i as u32 + 1, v))
        .collect()
}
