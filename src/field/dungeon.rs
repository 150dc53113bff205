//! Seeded dungeon map
//!
//! The map covers `[xmin, xmax] x [ymin, ymax]` sampled at [`RESOLUTION`]
//! points per unit. Rows follow the x axis and columns the y axis. Mana is a
//! sum of Gaussian "boss" peaks at seeded positions plus a low ripple, and is
//! computed once at construction.

use crate::error::FieldError;
use crate::field::ManaField;
use crate::Mana;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Grid points per unit of map extent
pub const RESOLUTION: usize = 5;

/// Peaks are only painted within this many standard deviations of their centre
const PEAK_REACH: f64 = 4.0;

/// Map area (in square units) per boss peak
const AREA_PER_PEAK: f64 = 16.0;

/// Ripple amplitude added everywhere so that flat regions still have slope
const RIPPLE: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
struct BossPeak {
    x: f64,
    y: f64,
    height: f64,
    sigma: f64,
}

/// A rectangular grid of mana values
#[derive(Debug, Clone)]
pub struct DungeonMap {
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
    rows: usize,
    columns: usize,
    grid: Vec<Mana>,
}

impl DungeonMap {
    /// Build a map over the given extent, generating mana from `seed`
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64, seed: u64) -> Result<Self, FieldError> {
        if !(xmax > xmin && ymax > ymin) {
            return Err(FieldError::EmptyExtent {
                xmin,
                xmax,
                ymin,
                ymax,
            });
        }

        let rows = (((xmax - xmin) * RESOLUTION as f64).round() as usize).max(1);
        let columns = (((ymax - ymin) * RESOLUTION as f64).round() as usize).max(1);

        let mut map = DungeonMap {
            xmin,
            xmax,
            ymin,
            ymax,
            rows,
            columns,
            grid: vec![0; rows * columns],
        };

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let area = (xmax - xmin) * (ymax - ymin);
        let peak_count = ((area / AREA_PER_PEAK).ceil() as usize).max(3);
        let peaks: Vec<BossPeak> = (0..peak_count)
            .map(|_| BossPeak {
                x: rng.random_range(xmin..xmax),
                y: rng.random_range(ymin..ymax),
                height: rng.random_range(100.0..1000.0),
                sigma: rng.random_range(0.5..2.5),
            })
            .collect();

        map.paint(&peaks);
        Ok(map)
    }

    /// Square map spanning `[-gate_size, gate_size]` on both axes
    pub fn square(gate_size: f64, seed: u64) -> Result<Self, FieldError> {
        Self::new(-gate_size, gate_size, -gate_size, gate_size, seed)
    }

    /// Wrap precomputed values, row-major. Coordinates map onto `[0, rows] x [0, columns]`.
    ///
    /// # Panics
    /// If `values.len() != rows * columns`.
    pub fn from_grid(rows: usize, columns: usize, values: Vec<Mana>) -> Self {
        assert_eq!(
            values.len(),
            rows * columns,
            "grid of {}x{} needs {} values",
            rows,
            columns,
            rows * columns
        );
        DungeonMap {
            xmin: 0.0,
            xmax: rows as f64,
            ymin: 0.0,
            ymax: columns as f64,
            rows,
            columns,
            grid: values,
        }
    }

    fn paint(&mut self, peaks: &[BossPeak]) {
        let mut heights = vec![0.0f64; self.rows * self.columns];

        for row in 0..self.rows {
            let x = self.x_coord(row);
            for col in 0..self.columns {
                let y = self.y_coord(col);
                heights[row * self.columns + col] = RIPPLE * (x.sin() * y.cos());
            }
        }

        // Each peak only touches its own bounding box
        for peak in peaks {
            let reach = PEAK_REACH * peak.sigma;
            let (row_lo, row_hi) = self.row_span(peak.x - reach, peak.x + reach);
            let (col_lo, col_hi) = self.col_span(peak.y - reach, peak.y + reach);
            let two_sigma_sq = 2.0 * peak.sigma * peak.sigma;

            for row in row_lo..row_hi {
                let dx = self.x_coord(row) - peak.x;
                for col in col_lo..col_hi {
                    let dy = self.y_coord(col) - peak.y;
                    let falloff = (-(dx * dx + dy * dy) / two_sigma_sq).exp();
                    heights[row * self.columns + col] += peak.height * falloff;
                }
            }
        }

        for (cell, height) in self.grid.iter_mut().zip(heights) {
            *cell = height.round() as Mana;
        }
    }

    fn row_span(&self, x_lo: f64, x_hi: f64) -> (usize, usize) {
        let step = (self.xmax - self.xmin) / self.rows as f64;
        let lo = ((x_lo - self.xmin) / step).floor().max(0.0) as usize;
        let hi = (((x_hi - self.xmin) / step).ceil().max(0.0) as usize + 1).min(self.rows);
        (lo.min(hi), hi)
    }

    fn col_span(&self, y_lo: f64, y_hi: f64) -> (usize, usize) {
        let step = (self.ymax - self.ymin) / self.columns as f64;
        let lo = ((y_lo - self.ymin) / step).floor().max(0.0) as usize;
        let hi = (((y_hi - self.ymin) / step).ceil().max(0.0) as usize + 1).min(self.columns);
        (lo.min(hi), hi)
    }

    /// x coordinate of a grid row
    pub fn x_coord(&self, row: usize) -> f64 {
        self.xmin + (self.xmax - self.xmin) * row as f64 / self.rows as f64
    }

    /// y coordinate of a grid column
    pub fn y_coord(&self, col: usize) -> f64 {
        self.ymin + (self.ymax - self.ymin) * col as f64 / self.columns as f64
    }

    /// Map extent as `(xmin, xmax, ymin, ymax)`
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        (self.xmin, self.xmax, self.ymin, self.ymax)
    }

    /// The cell holding the highest mana on the whole map, lowest row-major index first
    pub fn global_peak(&self) -> (usize, usize, Mana) {
        let mut best = (0, 0, Mana::MIN);
        for (i, &mana) in self.grid.iter().enumerate() {
            if mana > best.2 {
                best = (i / self.columns, i % self.columns, mana);
            }
        }
        best
    }
}

impl ManaField for DungeonMap {
    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.columns
    }

    fn mana_at(&self, row: usize, col: usize) -> Mana {
        self.grid[row * self.columns + col]
    }
}
