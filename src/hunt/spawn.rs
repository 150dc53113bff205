//! Placing hunts on a field

use crate::field::{ManaField, RESOLUTION};
use crate::hunt::Hunt;
use rand::Rng;
use std::sync::Arc;

/// Number of hunts for a square map of half-width `gate_size` at the given density
///
/// The map has `(2 * gate_size)^2` square units; `density` is the number of
/// hunts per unit, scaled by the grid resolution.
pub fn hunt_count(gate_size: u32, density: f64) -> usize {
    let side = 2.0 * gate_size as f64;
    (density * side * side * RESOLUTION as f64).max(0.0) as usize
}

/// Create `count` hunts at random cells. Ids run from 1 to `count` in slice order.
pub fn spawn_hunts<F: ManaField, R: Rng>(
    field: &Arc<F>,
    count: usize,
    rng: &mut R,
) -> Vec<Hunt<F>> {
    let rows = field.rows();
    let columns = field.columns();

    (0..count)
        .map(|i| {
            let row = rng.random_range(0..rows);
            let col = rng.random_range(0..columns);
            Hunt::new(i as u32 + 1, row, col, Arc::clone(field))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::DungeonMap;
    use crate::reduce::SearchUnit;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_hunt_count() {
        assert_eq!(hunt_count(10, 0.5), 200 * RESOLUTION);
        assert_eq!(hunt_count(1, 0.0), 0);
        assert_eq!(hunt_count(5, -1.0), 0);
    }

    #[test]
    fn test_spawn_ids_and_bounds() {
        let field = Arc::new(DungeonMap::square(3.0, 5).unwrap());
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let hunts = spawn_hunts(&field, 50, &mut rng);

        assert_eq!(hunts.len(), 50);
        for (i, hunt) in hunts.iter().enumerate() {
            assert_eq!(hunt.id(), i as u32 + 1);
            let (row, col) = hunt.start();
            assert!(field.contains(row, col));
        }
    }

    #[test]
    fn test_spawn_is_reproducible() {
        let field = Arc::new(DungeonMap::square(3.0, 5).unwrap());
        let a = spawn_hunts(&field, 20, &mut ChaCha8Rng::seed_from_u64(9));
        let b = spawn_hunts(&field, 20, &mut ChaCha8Rng::seed_from_u64(9));

        let starts_a: Vec<_> = a.iter().map(Hunt::start).collect();
        let starts_b: Vec<_> = b.iter().map(Hunt::start).collect();
        assert_eq!(starts_a, starts_b);
    }
}
