//! The shared mana field that hunts climb over
//!
//! A field is a read-only grid of mana values. Hunts only ever read it, so a
//! single field is shared between all worker threads behind an `Arc`.

pub mod dungeon;

pub use dungeon::{DungeonMap, RESOLUTION};

use crate::Mana;

/// Read-only access to a grid of mana values
pub trait ManaField: Send + Sync {
    /// Number of grid rows
    fn rows(&self) -> usize;

    /// Number of grid columns
    fn columns(&self) -> usize;

    /// Mana at a grid cell. Callers must stay inside `rows() x columns()`.
    fn mana_at(&self, row: usize, col: usize) -> Mana;

    /// Whether a cell lies inside the grid
    fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.columns()
    }

    /// Total number of cells
    fn cells(&self) -> usize {
        self.rows() * self.columns()
    }
}
