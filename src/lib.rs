//! Pick an initial map center from a batch of listing coordinates, and place map tooltips so they
//! stay on screen.
//!
//! Everything here is a pure function over plain numbers. Fetching listings, measuring the
//! tooltip and persisting results belong to the host application; [`CenterCache`] is offered as
//! an explicit object the host can hold on to.

mod types;
pub use types::*;

pub mod cache;
pub mod center;
pub mod config;
pub mod error;
pub mod extract;
pub mod grid;
pub mod tooltip;
pub mod util;

pub use cache::{CacheKey, CenterCache};
pub use center::{estimate_center, estimate_center_by_average, estimate_center_by_largest_cluster,
                 CenterStrategy};
pub use config::{load_config, Config};
pub use error::{Error, Result};
pub use extract::{extract_clusters, extract_coordinates, Extraction};
pub use grid::{DensityGrid, GRID_SIZE, MAX_GRID_SIZE};
pub use tooltip::{place_tooltip, TooltipPlacer};
