//! Property tests for rewriting vertex runs of open lines and closed rings.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::cast_precision_loss,
    reason = "Tests can panic"
)]

use proptest::prelude::*;
use segment_reshape::geometry::{Component, Geometry, LineString, Point, Polygon};
use segment_reshape::operations::reshape::{move_vertex, reshape_geometry, Replacement};

/// An open line with strictly increasing x, so no two vertices coincide.
fn open_line(max_len: usize) -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec(-100i32..100, 2..max_len).prop_map(|ys| {
        ys.into_iter()
            .enumerate()
            .map(|(i, y)| Point::new(i as f64, f64::from(y)))
            .collect()
    })
}

fn free_points(len: usize) -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((-100i32..100, -100i32..100), len).prop_map(|xy| {
        xy.into_iter()
            .map(|(x, y)| Point::new(f64::from(x) + 0.5, f64::from(y)))
            .collect()
    })
}

/// A line plus a run `lo..=hi` of at least two vertices.
fn line_and_run() -> impl Strategy<Value = (Vec<Point>, usize, usize)> {
    open_line(16).prop_flat_map(|points| {
        let n = points.len();
        (Just(points), 0..n - 1)
            .prop_flat_map(move |(points, lo)| (Just(points), Just(lo), lo + 1..n))
    })
}

/// A ring of three to seven distinct vertices, stored closed, and a run
/// around it.
///
/// The run starts at ring position `start` and walks `len` positions
/// forward, or backward when reversed. A run of one more position than the
/// ring has comes back to where it started. Position 0 is numbered as the
/// closing vertex, the way shared segments are looked up.
fn ring_and_run() -> impl Strategy<Value = (Vec<Point>, Vec<usize>, bool)> {
    open_line(8)
        .prop_filter("a ring needs three vertices", |points| points.len() >= 3)
        .prop_flat_map(|points| {
            let n = points.len();
            (Just(points), 0..n, 2..=n + 1, any::<bool>())
        })
        .prop_map(|(mut points, start, len, reversed)| {
            let n = points.len();
            let indices = (0..len)
                .map(|step| {
                    let position = if reversed {
                        (start + n * 2 - step) % n
                    } else {
                        (start + step) % n
                    };
                    if position == 0 {
                        n
                    } else {
                        position
                    }
                })
                .collect();
            points.push(points[0]);
            (points, indices, reversed)
        })
}

fn is_closed_everywhere(geometry: &Geometry) -> bool {
    let components = geometry.components();
    !components.is_empty()
        && components.iter().all(|component| match component {
            Component::Line(line) => line.len() >= 2 && line.is_closed(),
            _ => false,
        })
}

fn points_of(geometry: &Geometry) -> Vec<Point> {
    match geometry {
        Geometry::LineString(line) => line.points.clone(),
        other => panic!("expected a line, got {other:?}"),
    }
}

proptest! {
    #[test]
    fn equal_length_replacement_swaps_run_in_place(
        ((points, lo, hi), replacement) in line_and_run()
            .prop_flat_map(|(points, lo, hi)| (Just((points, lo, hi)), free_points(hi - lo + 1)))
    ) {
        let original = Geometry::LineString(LineString::new(points.clone()));
        let indices: Vec<usize> = (lo..=hi).collect();
        let result = reshape_geometry(
            &original,
            &indices,
            &Replacement::Line(LineString::new(replacement.clone())),
        )
        .unwrap();

        let mut expected = points[..lo].to_vec();
        expected.extend_from_slice(&replacement);
        expected.extend_from_slice(&points[hi + 1..]);
        prop_assert_eq!(result.vertex_count(), points.len());
        prop_assert_eq!(points_of(&result), expected);
    }

    #[test]
    fn reshaping_back_restores_line(
        ((points, lo, hi), replacement) in line_and_run()
            .prop_flat_map(|(points, lo, hi)| {
                (Just((points, lo, hi)), (2usize..6).prop_flat_map(free_points))
            })
    ) {
        let original = Geometry::LineString(LineString::new(points.clone()));
        let indices: Vec<usize> = (lo..=hi).collect();
        let reshaped = reshape_geometry(
            &original,
            &indices,
            &Replacement::Line(LineString::new(replacement.clone())),
        )
        .unwrap();
        prop_assert_eq!(reshaped.vertex_count(), points.len() - indices.len() + replacement.len());

        let new_run: Vec<usize> = (lo..lo + replacement.len()).collect();
        let restored = reshape_geometry(
            &reshaped,
            &new_run,
            &Replacement::Line(LineString::new(points[lo..=hi].to_vec())),
        )
        .unwrap();
        prop_assert_eq!(restored, original);
    }

    #[test]
    fn moved_vertex_moves_back(
        (points, index) in open_line(16).prop_flat_map(|points| {
            let n = points.len();
            (Just(points), 0..n)
        }),
        x in -100.0f64..100.0,
        y in -100.0f64..100.0,
    ) {
        let original = Geometry::LineString(LineString::new(points.clone()));
        let moved = move_vertex(&original, index, Point::new(x, y)).unwrap();
        prop_assert_eq!(moved.vertex_at(index).copied(), Some(Point::new(x, y)));

        let restored = move_vertex(&moved, index, points[index]).unwrap();
        prop_assert_eq!(restored, original);
    }

    #[test]
    fn reshaped_ring_stays_closed(
        ((ring, indices, reversed), replacement, as_polygon) in
            (ring_and_run(), (3usize..6).prop_flat_map(free_points), any::<bool>())
    ) {
        let line = LineString::new(ring);
        let original = if as_polygon {
            Geometry::Polygon(Polygon::new(vec![line]))
        } else {
            Geometry::LineString(line)
        };
        let mut replacement = LineString::new(replacement);
        if reversed {
            replacement = replacement.reversed();
        }

        let result = reshape_geometry(
            &original,
            &indices,
            &Replacement::Line(replacement.clone()),
        )
        .unwrap();

        prop_assert!(is_closed_everywhere(&result), "{indices:?} gave {result}");
        prop_assert_eq!(result.geometry_type(), original.geometry_type());
        for p in &replacement.points {
            prop_assert!(result.vertices().any(|(_, v)| v == p), "{p:?} missing from {result}");
        }
    }
}
