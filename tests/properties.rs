use mapview::util::coordinate_bounds;
use mapview::{estimate_center_by_average, estimate_center_by_largest_cluster, place_tooltip,
              ArrowEdge, Cluster, Coordinate, Point, Size};
use proptest::prelude::*;

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng))
}

fn metro_coordinate() -> impl Strategy<Value = Coordinate> {
    (40.5f64..41.0, -74.3f64..-73.7).prop_map(|(lat, lng)| Coordinate::new(lat, lng))
}

proptest! {
    /// The density estimate never leaves the bounding box of its input.
    #[test]
    fn center_within_bounds(points in prop::collection::vec(coordinate(), 1..300)) {
        let _ = env_logger::builder().is_test(true).try_init();
        let bounds = coordinate_bounds(points.iter()).unwrap();
        let center = estimate_center_by_average(&points).unwrap();
        prop_assert!(bounds.contains(&center), "{:?} outside {:?}", center, bounds);
    }

    /// Same ordered input, same answer.
    #[test]
    fn center_is_deterministic(points in prop::collection::vec(metro_coordinate(), 1..500)) {
        prop_assert_eq!(estimate_center_by_average(&points), estimate_center_by_average(&points));
    }

    /// One location repeated any number of times is its own center.
    #[test]
    fn single_point_is_stable(p in coordinate(), n in 1usize..64) {
        let points = vec![p; n];
        prop_assert_eq!(estimate_center_by_average(&points), Some(p));
    }

    /// The chosen cluster has the maximum count and is the first with it.
    #[test]
    fn largest_cluster_is_first_maximum(counts in prop::collection::vec(0u64..50, 1..40)) {
        let clusters: Vec<Cluster> = counts.iter()
            .enumerate()
            .map(|(i, &count)| Cluster { count: count, lat: i as f64 * 0.1, lng: 0.0 })
            .collect();
        let max = *counts.iter().max().unwrap();
        let first = counts.iter().position(|&c| c == max).unwrap();
        prop_assert_eq!(estimate_center_by_largest_cluster(&clusters),
                        Some(clusters[first].coordinate()));
    }

    /// When the tooltip stays above or below the anchor, it respects horizontal padding as
    /// long as it fits the viewport at all.
    #[test]
    fn tooltip_respects_horizontal_padding(
        ax in 0.0f64..1000.0,
        ay in 0.0f64..1000.0,
        w in 10.0f64..400.0,
        h in 10.0f64..300.0,
    ) {
        let view = Size::new(1000.0, 1000.0);
        let p = place_tooltip(Point::new(ax, ay), Size::new(w, h), view, 16.0);
        prop_assert!(p.x.is_finite() && p.y.is_finite());
        match p.arrow_edge {
            ArrowEdge::Top | ArrowEdge::Bottom => {
                prop_assert!(p.x >= 16.0 - 1e-9);
                prop_assert!(p.x + w <= 1000.0 - 16.0 + 1e-9);
                prop_assert!(p.y >= 16.0 - 1e-9);
            }
            ArrowEdge::Left | ArrowEdge::Right => {
                prop_assert!(p.y >= 16.0 - 1e-9);
            }
        }
    }
}

#[test]
fn empty_inputs_signal_no_result() {
    assert_eq!(estimate_center_by_average(&[]), None);
    assert_eq!(estimate_center_by_largest_cluster(&[]), None);
}

#[test]
fn tooltip_examples() {
    let tip = Size::new(200.0, 100.0);
    let view = Size::new(1000.0, 1000.0);

    let p = place_tooltip(Point::new(500.0, 500.0), tip, view, 16.0);
    assert_eq!(p.arrow_edge, ArrowEdge::Bottom);
    assert!((p.x - 400.0).abs() < 1e-9);
    assert!((p.y + 100.0 + 16.0 - 500.0).abs() < 1e-9);

    let p = place_tooltip(Point::new(500.0, 20.0), tip, view, 16.0);
    assert_eq!(p.arrow_edge, ArrowEdge::Top);

    let p = place_tooltip(Point::new(5.0, 500.0), tip, view, 16.0);
    assert_eq!(p.x, 16.0);
}

#[test]
fn placement_serializes_with_lowercase_edge() {
    let p = place_tooltip(Point::new(500.0, 500.0),
                          Size::new(200.0, 100.0),
                          Size::new(1000.0, 1000.0),
                          16.0);
    let text = serde_json::to_string(&p).unwrap();
    assert_eq!(text, r#"{"x":400.0,"y":384.0,"arrowEdge":"bottom"}"#);
}
