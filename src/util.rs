use std::path::Path;

use imagefmt::{ColFmt, ColType};
use num::ToPrimitive;

use crate::error::{Error, Result};
use crate::types::{Bounds, Coordinate};


/// Compute the length in meters of one degree latitude and longitude at given latitude degree.
pub fn lat_lng(lat: f64) -> (f64, f64) {
    // Port of http://msi.nga.mil/MSISiteContent/StaticFiles/Calculators/degree.html
    let lat = lat * std::f64::consts::PI * 2.0 / 360.0;
    let m1 = 111132.92;
    let m2 = -559.82;
    let m3 = 1.175;
    let m4 = -0.0023;
    let p1 = 111412.84;
    let p2 = -93.5;
    let p3 = 0.118;

    let latlen = m1 + (m2 * (2.0 * lat).cos()) + (m3 * (4.0 * lat).cos()) +
                 (m4 * (6.0 * lat).cos());
    let longlen = (p1 * lat.cos()) + (p2 * (3.0 * lat).cos()) + (p3 * (5.0 * lat).cos());
    (latlen, longlen)
}


/// Find the min/max envelope over an iterator of coordinates, or None if it is empty.
pub fn coordinate_bounds<'a, I: Iterator<Item = &'a Coordinate>>(iter: I) -> Option<Bounds> {
    iter.fold(None, |acc: Option<Bounds>, c| {
        Some(match acc {
            None => {
                Bounds {
                    north: c.lat,
                    south: c.lat,
                    east: c.lng,
                    west: c.lng,
                }
            }
            Some(b) => {
                Bounds {
                    north: f64::max(b.north, c.lat),
                    south: f64::min(b.south, c.lat),
                    east: f64::max(b.east, c.lng),
                    west: f64::min(b.west, c.lng),
                }
            }
        })
    })
}


/// Scale given 2D numerical matrix to 0..255 grayscale bytes.
/// Clip specifies lower, upper bounds of values that will be clipped to black/white.
pub fn grayscale<T: Copy + ToPrimitive>(t: &[T], clip: Option<(f64, f64)>) -> Vec<u8> {
    let values: Vec<f64> = t.iter().map(|v| v.to_f64().unwrap_or(0.0)).collect();
    let (min, max) = {
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        match clip {
            Some((lo, hi)) => (f64::max(min, lo), f64::min(max, hi)),
            None => (min, max),
        }
    };
    // make sure range > 0 to avoid divide by zero later.
    let range = if max > min { max - min } else { 1.0 };
    values.iter()
        .map(|&v| if v < min {
            min
        } else if v > max {
            max
        } else {
            v
        })
        .map(|v| (255.0 * (v - min) / range).round() as u8)
        .collect()
}

/// Write given 2D numerical matrix to a scaled grayscale image at requested path. The image
/// format follows the file extension.
pub fn grid_to_img<T: Copy + ToPrimitive, P: AsRef<Path>>(t: &[T],
                                                          dim: (usize, usize),
                                                          p: P,
                                                          clip: Option<(f64, f64)>)
                                                          -> Result<()> {
    let (m, n) = dim;
    if m * n != t.len() {
        return Err(Error::Image(format!("matrix of {} cells does not fit {}x{}", t.len(), m, n)));
    }
    let bytes = grayscale(t, clip);
    imagefmt::write(p, n, m, ColFmt::Y, &bytes, ColType::Auto)
        .map_err(|e| Error::Image(format!("{:?}", e)))
}
