//! Pull coordinates and clusters out of listing API payloads.
//!
//! Payloads come in several shapes and spell their keys differently. Entries without a usable
//! coordinate are skipped without raising an error; the number skipped is reported alongside
//! the result.

use std::io::Read;

use geojson::GeoJson;
use log::debug;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::types::{Cluster, Coordinate};

const LAT_KEYS: &[&str] = &["lat", "latitude", "Latitude", "LAT"];
const LNG_KEYS: &[&str] = &["lng", "lon", "long", "longitude", "Longitude", "LNG"];
const NESTED_KEYS: &[&str] = &["coordinates", "location", "geo", "position", "address"];
const LIST_KEYS: &[&str] = &["listings", "results", "data", "items", "properties", "hits"];
const COUNT_KEYS: &[&str] = &["count", "doc_count", "point_count", "total"];


/// Coordinates recovered from a payload and how many entries had none.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Extraction {
    pub coordinates: Vec<Coordinate>,
    pub skipped: usize,
}

fn as_f64(v: &Value) -> Option<f64> {
    match *v {
        Value::Number(ref n) => n.as_f64(),
        Value::String(ref s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn first_number(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().filter_map(|k| obj.get(*k)).filter_map(as_f64).next()
}

/// Listing count of a cluster entry: finite and not negative.
fn count_of(obj: &Map<String, Value>) -> Option<u64> {
    first_number(obj, COUNT_KEYS).filter(|n| n.is_finite() && *n >= 0.0).map(|n| n as u64)
}

fn valid(c: Coordinate) -> Option<Coordinate> {
    if c.is_valid() { Some(c) } else { None }
}

/// Find a coordinate on a single entry, looking one level into known nested objects.
pub fn coordinate_of(v: &Value) -> Option<Coordinate> {
    match *v {
        Value::Object(ref obj) => {
            if let (Some(lat), Some(lng)) = (first_number(obj, LAT_KEYS),
                                             first_number(obj, LNG_KEYS)) {
                return valid(Coordinate::new(lat, lng));
            }
            NESTED_KEYS.iter()
                .filter_map(|k| obj.get(*k))
                .filter_map(|nested| match *nested {
                    Value::Object(_) => coordinate_of(nested),
                    Value::Array(_) => position_of(nested),
                    _ => None,
                })
                .next()
        }
        _ => None,
    }
}

/// GeoJSON order: [lng, lat].
fn position_of(v: &Value) -> Option<Coordinate> {
    match *v {
        Value::Array(ref pos) if pos.len() >= 2 => {
            let lng = as_f64(&pos[0])?;
            let lat = as_f64(&pos[1])?;
            valid(Coordinate::new(lat, lng))
        }
        _ => None,
    }
}

/// The list of entries in a payload: the payload itself if it is an array, otherwise the first
/// array under a known wrapper key.
fn entries(v: &Value) -> &[Value] {
    match *v {
        Value::Array(ref items) => &items[..],
        Value::Object(ref obj) => {
            LIST_KEYS.iter()
                .filter_map(|k| obj.get(*k))
                .filter_map(|v| v.as_array())
                .map(|a| &a[..])
                .next()
                .unwrap_or(&[])
        }
        _ => &[],
    }
}

/// Extract every recognizable coordinate from a listings payload.
pub fn extract_coordinates(v: &Value) -> Extraction {
    let mut out = Extraction::default();
    for entry in entries(v) {
        match coordinate_of(entry) {
            Some(c) => out.coordinates.push(c),
            None => out.skipped += 1,
        }
    }
    if out.skipped > 0 {
        debug!("skipped {} entries without a coordinate", out.skipped);
    }
    out
}

/// Extract clusters from a payload. Entries missing a count or a coordinate are dropped.
pub fn extract_clusters(v: &Value) -> Vec<Cluster> {
    let all = entries(v);
    let clusters: Vec<Cluster> = all.iter()
        .filter_map(|entry| {
            let obj = entry.as_object()?;
            let count = count_of(obj)?;
            let c = coordinate_of(entry)?;
            Some(Cluster {
                count: count,
                lat: c.lat,
                lng: c.lng,
            })
        })
        .collect();
    if clusters.len() < all.len() {
        debug!("skipped {} cluster entries", all.len() - clusters.len());
    }
    clusters
}


/// Point features of a GeoJSON document with their count property, and the number of features
/// looked at.
fn geojson_points<R: Read>(reader: R) -> Result<(Vec<(Coordinate, Option<u64>)>, usize)> {
    let value: Value = serde_json::from_reader(reader)?;
    let features = match GeoJson::from_json_value(value)? {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => vec![geojson::Feature::from(g)],
    };
    let mut points = Vec::with_capacity(features.len());
    for feature in &features {
        if let Some(ref geometry) = feature.geometry {
            if let geojson::Value::Point(ref pos) = geometry.value {
                if pos.len() < 2 {
                    continue;
                }
                let count = feature.properties
                    .as_ref()
                    .and_then(count_of);
                points.push((Coordinate::new(pos[1], pos[0]), count));
            }
        }
    }
    Ok((points, features.len()))
}

/// Read Point features of a GeoJSON document as coordinates. Non-point features and
/// out-of-range positions count as skipped.
pub fn coordinates_from_geojson<R: Read>(reader: R) -> Result<Extraction> {
    let (points, total) = geojson_points(reader)?;
    let coordinates: Vec<Coordinate> = points.into_iter()
        .map(|(c, _)| c)
        .filter(Coordinate::is_valid)
        .collect();
    let skipped = total - coordinates.len();
    if skipped > 0 {
        debug!("skipped {} GeoJSON features without a usable point", skipped);
    }
    Ok(Extraction {
        coordinates: coordinates,
        skipped: skipped,
    })
}

/// Read clustered Point features (`point_count` or `count` property) from a GeoJSON document.
pub fn clusters_from_geojson<R: Read>(reader: R) -> Result<Vec<Cluster>> {
    let (points, _) = geojson_points(reader)?;
    Ok(points.into_iter()
        .filter(|&(c, _)| c.is_valid())
        .filter_map(|(c, count)| {
            count.map(|n| {
                Cluster {
                    count: n,
                    lat: c.lat,
                    lng: c.lng,
                }
            })
        })
        .collect())
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_key_variants() {
        let payload = json!([
            {"lat": 1.0, "lng": 2.0},
            {"latitude": "3.5", "longitude": "4.5"},
            {"Latitude": 5, "Longitude": 6},
            {"location": {"lat": 7.0, "lon": 8.0}},
            {"geo": {"LAT": 9.0, "LNG": 10.0}},
            {"coordinates": [12.0, 11.0]}
        ]);
        let out = extract_coordinates(&payload);
        assert_eq!(out.skipped, 0);
        assert_eq!(out.coordinates,
                   vec![Coordinate::new(1.0, 2.0),
                        Coordinate::new(3.5, 4.5),
                        Coordinate::new(5.0, 6.0),
                        Coordinate::new(7.0, 8.0),
                        Coordinate::new(9.0, 10.0),
                        Coordinate::new(11.0, 12.0)]);
    }

    #[test]
    fn skips_malformed_entries() {
        let payload = json!({"listings": [
            {"lat": 1.0},
            {"lat": "north", "lng": 2.0},
            {"lat": 91.0, "lng": 0.0},
            "not an object",
            {"lat": 40.0, "lng": -74.0}
        ]});
        let out = extract_coordinates(&payload);
        assert_eq!(out.coordinates, vec![Coordinate::new(40.0, -74.0)]);
        assert_eq!(out.skipped, 4);
    }

    #[test]
    fn unknown_shape_is_empty() {
        let out = extract_coordinates(&json!({"nothing": true}));
        assert_eq!(out, Extraction::default());
        assert!(extract_coordinates(&json!(42)).coordinates.is_empty());
    }

    #[test]
    fn reads_clusters() {
        let payload = json!({"results": [
            {"count": 5, "lat": 1.0, "lng": 1.0},
            {"doc_count": 42, "location": {"lat": 2.0, "lng": 2.0}},
            {"lat": 3.0, "lng": 3.0},
            {"count": -1, "lat": 4.0, "lng": 4.0},
            {"count": "NaN", "lat": 5.0, "lng": 5.0},
            {"total": "inf", "lat": 6.0, "lng": 6.0}
        ]});
        assert_eq!(extract_clusters(&payload),
                   vec![Cluster { count: 5, lat: 1.0, lng: 1.0 },
                        Cluster { count: 42, lat: 2.0, lng: 2.0 }]);
    }

    const GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"point_count": 12},
             "geometry": {"type": "Point", "coordinates": [-122.4, 37.8]}},
            {"type": "Feature", "properties": null,
             "geometry": {"type": "Point", "coordinates": [-122.3, 37.7]}},
            {"type": "Feature", "properties": {"point_count": "-inf"},
             "geometry": {"type": "Point", "coordinates": [-122.2, 37.6]}},
            {"type": "Feature", "properties": {},
             "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}}
        ]
    }"#;

    #[test]
    fn geojson_points_become_coordinates() {
        let out = coordinates_from_geojson(GEOJSON.as_bytes()).unwrap();
        assert_eq!(out.coordinates,
                   vec![Coordinate::new(37.8, -122.4),
                        Coordinate::new(37.7, -122.3),
                        Coordinate::new(37.6, -122.2)]);
        assert_eq!(out.skipped, 1);
    }

    #[test]
    fn geojson_clusters_need_a_count() {
        let clusters = clusters_from_geojson(GEOJSON.as_bytes()).unwrap();
        assert_eq!(clusters, vec![Cluster { count: 12, lat: 37.8, lng: -122.4 }]);
    }

    #[test]
    fn malformed_geojson_is_an_error() {
        assert!(coordinates_from_geojson(&b"{\"type\": \"Nope\"}"[..]).is_err());
        assert!(coordinates_from_geojson(&b"not json"[..]).is_err());
    }
}
