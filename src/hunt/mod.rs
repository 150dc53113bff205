//! Hill-climbing hunts over a mana field
//!
//! A [`Hunt`] starts at a grid cell and repeatedly steps to its highest
//! neighbour until no neighbour is strictly higher. The value it settles on is
//! what the reduction engine ranks.

pub mod spawn;

pub use spawn::{hunt_count, spawn_hunts};

use crate::error::HuntError;
use crate::field::{DungeonMap, ManaField};
use crate::reduce::SearchUnit;
use crate::Mana;
use std::sync::{Arc, OnceLock};

/// Neighbour offsets, clockwise from north. Earlier directions win ties.
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

/// Where a climb ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peak {
    pub row: usize,
    pub col: usize,
    pub mana: Mana,
    /// Number of moves taken from the start cell
    pub steps: u64,
}

/// A single hill climber
#[derive(Debug)]
pub struct Hunt<F: ManaField = DungeonMap> {
    id: u32,
    start_row: usize,
    start_col: usize,
    field: Arc<F>,
    record: OnceLock<Climb>,
}

/// Peak plus every cell the climb stood on, start first
#[derive(Debug, Clone)]
struct Climb {
    peak: Peak,
    trail: Vec<(usize, usize)>,
}

impl<F: ManaField> Hunt<F> {
    pub fn new(id: u32, start_row: usize, start_col: usize, field: Arc<F>) -> Self {
        Self {
            id,
            start_row,
            start_col,
            field,
            record: OnceLock::new(),
        }
    }

    pub fn start(&self) -> (usize, usize) {
        (self.start_row, self.start_col)
    }

    pub fn field(&self) -> &Arc<F> {
        &self.field
    }

    /// Peak reached by the first successful evaluation, if any
    pub fn peak(&self) -> Option<Peak> {
        self.record.get().map(|climb| climb.peak)
    }

    /// Cells the first successful evaluation stood on, start first
    pub fn trail(&self) -> Option<&[(usize, usize)]> {
        self.record.get().map(|climb| climb.trail.as_slice())
    }

    /// Climb from the start cell to a local maximum without recording it
    pub fn climb(&self) -> Result<Peak, HuntError> {
        self.walk().map(|climb| climb.peak)
    }

    fn walk(&self) -> Result<Climb, HuntError> {
        let field = self.field.as_ref();
        let (rows, columns) = (field.rows(), field.columns());

        if !field.contains(self.start_row, self.start_col) {
            return Err(HuntError::OutOfBounds {
                row: self.start_row,
                col: self.start_col,
                rows,
                columns,
            });
        }

        // Mana strictly increases on every move, so no cell is visited twice
        let limit = (rows * columns) as u64;
        let (mut row, mut col) = (self.start_row, self.start_col);
        let mut mana = field.mana_at(row, col);
        let mut steps = 0u64;
        let mut trail = vec![(row, col)];

        loop {
            let mut next: Option<(usize, usize, Mana)> = None;
            for (dr, dc) in DIRECTIONS {
                let (Some(r), Some(c)) = (row.checked_add_signed(dr), col.checked_add_signed(dc))
                else {
                    continue;
                };
                if !field.contains(r, c) {
                    continue;
                }
                let candidate = field.mana_at(r, c);
                let best_so_far = next.map_or(mana, |(_, _, m)| m);
                if candidate > best_so_far {
                    next = Some((r, c, candidate));
                }
            }

            match next {
                Some((r, c, m)) => {
                    steps += 1;
                    if steps > limit {
                        return Err(HuntError::StepLimit { limit });
                    }
                    row = r;
                    col = c;
                    mana = m;
                    trail.push((r, c));
                }
                None => {
                    return Ok(Climb {
                        peak: Peak {
                            row,
                            col,
                            mana,
                            steps,
                        },
                        trail,
                    })
                }
            }
        }
    }
}

impl<F: ManaField> SearchUnit for Hunt<F> {
    fn id(&self) -> u32 {
        self.id
    }

    fn evaluate(&self) -> Result<Mana, HuntError> {
        let climb = self.walk()?;
        let mana = climb.peak.mana;
        // A repeated evaluation reaches the same peak, keep the first record
        let _ = self.record.set(climb);
        Ok(mana)
    }
}

/// Number of distinct cells whose mana was read by the recorded climbs
///
/// A climb reads every cell it stands on and all in-bounds neighbours of it.
/// Hunts that were never evaluated contribute nothing.
pub fn cells_evaluated<F: ManaField>(field: &F, hunts: &[Hunt<F>]) -> usize {
    let columns = field.columns();
    let mut seen = vec![false; field.cells()];
    let mut count = 0;

    for &(row, col) in hunts.iter().filter_map(Hunt::trail).flatten() {
        let cells = std::iter::once((0, 0)).chain(DIRECTIONS).filter_map(|(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;
            field.contains(r, c).then_some((r, c))
        });
        for (r, c) in cells {
            let cell = &mut seen[r * columns + c];
            if !*cell {
                *cell = true;
                count += 1;
            }
        }
    }

    count
}
