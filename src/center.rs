//! Choose an initial map center from a batch of listing coordinates.
//!
//! Two strategies are offered. The density strategy histograms the coordinates on a
//! `GRID_SIZE` x `GRID_SIZE` grid over their bounding box and returns the middle of the busiest
//! cell, which keeps a few far-away outliers from dragging the center the way a plain mean
//! would. The cluster strategy trusts clusters already aggregated by the listings server and
//! returns the biggest one.

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::grid::{DensityGrid, GRID_SIZE};
use crate::types::{Cluster, Coordinate};


/// Which center estimator to run.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CenterStrategy {
    #[default]
    Density,
    LargestCluster,
}

impl CenterStrategy {
    pub fn as_str(&self) -> &'static str {
        match *self {
            CenterStrategy::Density => "density",
            CenterStrategy::LargestCluster => "largest-cluster",
        }
    }
}

impl fmt::Display for CenterStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CenterStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<CenterStrategy, String> {
        match s {
            "density" | "average" => Ok(CenterStrategy::Density),
            "largest-cluster" | "cluster" => Ok(CenterStrategy::LargestCluster),
            other => Err(format!("unknown center strategy '{}'", other)),
        }
    }
}


/// Estimate a center as the midpoint of the densest cell of a `GRID_SIZE` square grid laid over
/// the coordinates' bounding box. Ties go to the first cell in row-major order, south to north
/// and west to east. Returns None for empty input.
///
/// The result always lies inside the bounding box of the input.
pub fn estimate_center_by_average(coordinates: &[Coordinate]) -> Option<Coordinate> {
    estimate_center_on_grid(coordinates, GRID_SIZE)
}

/// Density estimate on a `grid_size` square grid.
pub fn estimate_center_on_grid(coordinates: &[Coordinate],
                               grid_size: usize)
                               -> Option<Coordinate> {
    let grid = DensityGrid::from_coordinates(coordinates, grid_size, grid_size)?;
    match grid.densest_cell() {
        Some(idx) => {
            let center = grid.cell_center(idx);
            debug!("densest cell {} holds {} of {} coordinates",
                   idx,
                   grid.counts()[idx],
                   coordinates.len());
            Some(center)
        }
        None => Some(grid.bbox().center()),
    }
}

/// Return the coordinate of the cluster with the largest count, the first one on ties.
/// Returns None for empty input.
pub fn estimate_center_by_largest_cluster(clusters: &[Cluster]) -> Option<Coordinate> {
    let mut best: Option<&Cluster> = None;
    for c in clusters {
        match best {
            Some(b) if b.count >= c.count => {}
            _ => best = Some(c),
        }
    }
    best.map(Cluster::coordinate)
}

/// Run the requested strategy with a `grid_size` square density grid. The cluster strategy falls
/// back to the density estimate over `coordinates` when no clusters are available.
pub fn estimate_center(strategy: CenterStrategy,
                       coordinates: &[Coordinate],
                       clusters: &[Cluster],
                       grid_size: usize)
                       -> Option<Coordinate> {
    match strategy {
        CenterStrategy::Density => estimate_center_on_grid(coordinates, grid_size),
        CenterStrategy::LargestCluster => {
            estimate_center_by_largest_cluster(clusters)
                .or_else(|| estimate_center_on_grid(coordinates, grid_size))
        }
    }
}
