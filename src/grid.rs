use std::path::Path;

use log::debug;
use rayon::prelude::*;

use crate::error::Result;
use crate::types::{Bounds, Coordinate};
use crate::util::{self, coordinate_bounds, lat_lng};

/// Rows and columns of the grid the density estimator uses.
pub const GRID_SIZE: usize = 20;

/// Largest number of rows or columns a grid may have.
pub const MAX_GRID_SIZE: usize = 1024;

// Below this many coordinates the counting pass stays on the calling thread.
const PARALLEL_THRESHOLD: usize = 4096;


/// `DensityGrid` is a fixed-resolution 2D histogram of coordinates over their bounding box. Row 0
/// is the southernmost band and column 0 the westernmost, so the linear index `row * cols + col`
/// scans south to north, west to east.
#[derive(Clone, Debug)]
pub struct DensityGrid {
    bounds: Bounds,
    rows: usize,
    cols: usize,
    counts: Vec<u32>,
}

/// Map a value in [min, min + range] to one of `cells` buckets. The exact max lands in the last
/// bucket; a zero range puts everything in bucket 0.
#[inline]
fn bucket(value: f64, min: f64, range: f64, cells: usize) -> usize {
    if range <= 0.0 || !range.is_finite() {
        return 0;
    }
    let idx = ((value - min) / range * cells as f64).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(cells - 1)
    }
}

impl DensityGrid {
    /// Count the given coordinates into a `rows` x `cols` grid spanning exactly their bounds.
    /// Returns None when there are no coordinates or either dimension is zero or larger than
    /// `MAX_GRID_SIZE`.
    pub fn from_coordinates(coordinates: &[Coordinate],
                            rows: usize,
                            cols: usize)
                            -> Option<DensityGrid> {
        if rows == 0 || cols == 0 || rows > MAX_GRID_SIZE || cols > MAX_GRID_SIZE {
            return None;
        }
        let cells = rows.checked_mul(cols)?;
        let bounds = coordinate_bounds(coordinates.iter())?;
        let mut grid = DensityGrid {
            bounds: bounds,
            rows: rows,
            cols: cols,
            counts: Vec::new(),
        };

        grid.counts = if coordinates.len() < PARALLEL_THRESHOLD {
            let mut counts = vec![0u32; cells];
            for c in coordinates {
                counts[grid.index_of(c)] += 1;
            }
            counts
        } else {
            coordinates.par_iter()
                .fold(|| vec![0u32; cells], |mut acc, c| {
                    acc[grid.index_of(c)] += 1;
                    acc
                })
                .reduce(|| vec![0u32; cells], |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                })
        };
        debug!("built {}x{} density grid over {} coordinates",
               rows,
               cols,
               coordinates.len());
        Some(grid)
    }

    /// Return the lat/lng boundaries of the grid.
    pub fn bbox(&self) -> Bounds {
        self.bounds
    }

    /// Grid dimensions as (rows, cols).
    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Immutable access to the per-cell counts, row-major.
    pub fn counts(&self) -> &[u32] {
        &self.counts[..]
    }

    /// Total number of counted coordinates.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Grid resolution, in degrees latitude per row and degrees longitude per column.
    pub fn degree_resolution(&self) -> (f64, f64) {
        (self.bounds.range_lat() / self.rows as f64, self.bounds.range_lng() / self.cols as f64)
    }

    /// Approximate cell size in meters (north-south, east-west), measured at the central
    /// latitude of the grid.
    pub fn resolution(&self) -> (f64, f64) {
        let (lat_len, lng_len) = lat_lng(self.bounds.center().lat);
        let (ra, ri) = self.degree_resolution();
        (ra * lat_len, ri * lng_len)
    }

    /// Cell (row, col) containing the given coordinate, clamped into the grid.
    pub fn cell_of(&self, c: &Coordinate) -> (usize, usize) {
        (bucket(c.lat, self.bounds.south, self.bounds.range_lat(), self.rows),
         bucket(c.lng, self.bounds.west, self.bounds.range_lng(), self.cols))
    }

    #[inline]
    fn index_of(&self, c: &Coordinate) -> usize {
        let (row, col) = self.cell_of(c);
        row * self.cols + col
    }

    /// Count stored for the cell at given row and column, None outside the grid.
    pub fn count(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.counts.get(row * self.cols + col).cloned()
    }

    /// Index of the most populated cell, the first in scan order on ties. None if every cell
    /// is empty.
    pub fn densest_cell(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (idx, &count) in self.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((idx, count)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Return the midpoint of the cell at given linear index.
    pub fn cell_center(&self, idx: usize) -> Coordinate {
        let (ra, ri) = self.degree_resolution();
        let row = (idx / self.cols) as f64;
        let col = (idx % self.cols) as f64;
        Coordinate {
            lat: self.bounds.south + (row + 0.5) * ra,
            lng: self.bounds.west + (col + 0.5) * ri,
        }
    }

    /// Write counts as a grayscale image, north up.
    pub fn write_heatmap<P: AsRef<Path>>(&self, p: P) -> Result<()> {
        let flipped: Vec<u32> = self.counts
            .chunks(self.cols)
            .rev()
            .flat_map(|row| row.iter().cloned())
            .collect();
        util::grid_to_img(&flipped, self.size(), p, None)
    }
}
