use static_aabb2d_index::{StaticAABB2DIndex, StaticAABB2DIndexBuilder};

use super::bounding_box::{Aabb, BoundingBox};
use crate::geometry::{Component, Geometry, Point, Polygon};
use crate::math::intersect_2d::{point_on_segment, segments_intersect};
use crate::math::polygon_2d::point_in_ring;
use crate::math::{Point2, TOLERANCE};

/// Planar pieces of a geometry used by the intersection predicate.
#[derive(Debug, Default)]
struct Pieces {
    segments: Vec<(Point2, Point2)>,
    points: Vec<Point2>,
    /// Rings of every polygon part, exterior first.
    polygons: Vec<Vec<Vec<Point2>>>,
    /// One representative vertex per component.
    anchors: Vec<Point2>,
}

impl Pieces {
    fn new(geometry: &Geometry) -> Self {
        let mut pieces = Self::default();
        for component in geometry.components() {
            let points = component.points();
            let Some(first) = points.first() else {
                continue;
            };
            pieces.anchors.push(first.xy());
            match component {
                Component::Line(line) if line.len() >= 2 => pieces
                    .segments
                    .extend(line.segments().map(|(a, b)| (a.xy(), b.xy()))),
                _ => pieces.points.push(first.xy()),
            }
        }
        let polygons: &[Polygon] = match geometry {
            Geometry::Polygon(polygon) => std::slice::from_ref(polygon),
            Geometry::MultiPolygon(polygons) => polygons,
            _ => &[],
        };
        pieces.polygons = polygons
            .iter()
            .map(|polygon| {
                polygon
                    .rings
                    .iter()
                    .map(|ring| ring.points.iter().map(Point::xy).collect())
                    .collect()
            })
            .collect();
        pieces
    }

    /// Returns `true` if `p` lies in the interior of any polygon part.
    fn polygon_contains(&self, p: &Point2) -> bool {
        self.polygons.iter().any(|rings| match rings.split_first() {
            Some((exterior, holes)) => {
                point_in_ring(p, exterior) && !holes.iter().any(|hole| point_in_ring(p, hole))
            }
            None => false,
        })
    }
}

fn same_point(a: &Point2, b: &Point2) -> bool {
    (a - b).norm_squared() < TOLERANCE * TOLERANCE
}

/// Prepared intersection test against one geometry.
///
/// The prepared geometry's segments are kept in a static AABB index so that
/// testing a candidate costs one index query per candidate segment. Shared
/// boundaries, touching points and containment inside polygons all count as
/// intersecting.
pub struct Intersects {
    pieces: Pieces,
    index: Option<StaticAABB2DIndex<f64>>,
    bbox: Option<Aabb>,
}

impl Intersects {
    /// Prepares `geometry` for repeated intersection tests.
    #[must_use]
    pub fn new(geometry: &Geometry) -> Self {
        let pieces = Pieces::new(geometry);
        let mut builder = StaticAABB2DIndexBuilder::new(pieces.segments.len());
        for (a, b) in &pieces.segments {
            builder.add(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y));
        }
        Self {
            index: builder.build().ok(),
            bbox: BoundingBox::new(geometry).execute(),
            pieces,
        }
    }

    /// Returns `true` if `other` intersects the prepared geometry.
    #[must_use]
    pub fn execute(&self, other: &Geometry) -> bool {
        let (Some(bbox), Some(other_bbox)) = (self.bbox, BoundingBox::new(other).execute()) else {
            return false;
        };
        if !bbox.intersects(&other_bbox) {
            return false;
        }
        let other = Pieces::new(other);

        let crosses_boundary = other.segments.iter().any(|(a, b)| {
            self.candidates(a, b)
                .into_iter()
                .any(|i| {
                    let (c, d) = &self.pieces.segments[i];
                    segments_intersect(a, b, c, d)
                })
        });
        if crosses_boundary {
            return true;
        }

        let point_touches = other.points.iter().any(|p| {
            self.candidates(p, p).into_iter().any(|i| {
                let (c, d) = &self.pieces.segments[i];
                point_on_segment(p, c, d)
            }) || self.pieces.points.iter().any(|q| same_point(p, q))
        });
        if point_touches {
            return true;
        }

        let prepared_point_touches = self.pieces.points.iter().any(|p| {
            other
                .segments
                .iter()
                .any(|(c, d)| point_on_segment(p, c, d))
        });
        if prepared_point_touches {
            return true;
        }

        // No boundary contact left, so a component is either fully inside
        // a polygon or fully outside it.
        other.anchors.iter().any(|p| self.pieces.polygon_contains(p))
            || self.pieces.anchors.iter().any(|p| other.polygon_contains(p))
    }

    fn candidates(&self, a: &Point2, b: &Point2) -> Vec<usize> {
        match &self.index {
            Some(index) => index.query(
                a.x.min(b.x) - TOLERANCE,
                a.y.min(b.y) - TOLERANCE,
                a.x.max(b.x) + TOLERANCE,
                a.y.max(b.y) + TOLERANCE,
            ),
            None => (0..self.pieces.segments.len()).collect(),
        }
    }
}

/// Returns `true` if `point` lies on the component: equal to a point
/// component, or on any segment of a line or ring.
#[must_use]
pub fn point_touches_component(point: &Point, component: &Component<'_>) -> bool {
    let p = point.xy();
    match component {
        Component::Point(q) => point.same_xy(q),
        Component::Line(line) if line.len() == 1 => line.points.iter().any(|q| point.same_xy(q)),
        Component::Line(line) => line
            .segments()
            .any(|(a, b)| point_on_segment(&p, &a.xy(), &b.xy())),
    }
}
