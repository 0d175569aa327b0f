use serde::{Deserialize, Serialize};

/// Represent some map coordinate in degrees.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Coordinate {
        Coordinate { lat: lat, lng: lng }
    }

    /// Both fields finite and within [-90, 90] x [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite() && (-90.0..=90.0).contains(&self.lat) &&
        (-180.0..=180.0).contains(&self.lng)
    }
}

/// Represent some map bounds in degrees. Longitudes are not wrapped at the antimeridian, so a
/// set of points straddling +/-180 produces a box spanning nearly the whole globe.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    pub fn range_lat(&self) -> f64 {
        self.north - self.south
    }
    pub fn range_lng(&self) -> f64 {
        self.east - self.west
    }

    /// Geometric center of the box.
    pub fn center(&self) -> Coordinate {
        Coordinate {
            lat: (self.north + self.south) / 2.0,
            lng: (self.east + self.west) / 2.0,
        }
    }

    pub fn contains(&self, c: &Coordinate) -> bool {
        c.lat >= self.south && c.lat <= self.north && c.lng >= self.west && c.lng <= self.east
    }
}

/// A server-aggregated group of listings.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Cluster {
    pub count: u64,
    pub lat: f64,
    pub lng: f64,
}

impl Cluster {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Screen position in pixels.
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x: x, y: y }
    }
}

/// Screen extent in pixels.
#[derive(Debug, PartialEq, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Size {
        Size {
            width: width,
            height: height,
        }
    }
}

/// Side of the tooltip box the pointer arrow is drawn on.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowEdge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Top-left corner of a placed tooltip and its arrow edge.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipPlacement {
    pub x: f64,
    pub y: f64,
    pub arrow_edge: ArrowEdge,
}
