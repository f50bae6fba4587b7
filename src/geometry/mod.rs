pub mod line_string;
pub mod point;
pub mod polygon;
pub mod vertex;
pub mod wkt;

pub use line_string::LineString;
pub use point::{Point, VertexKey};
pub use polygon::Polygon;
pub use vertex::VertexId;

use crate::math::polygon_2d::{rotate_to_canonical_start, signed_area_2d};
use crate::math::Point2;

/// Dimension class of a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Point,
    Line,
    Polygon,
}

/// An owned feature geometry.
///
/// All vertex edits operate on an owned value; callers clone the stored
/// geometry before mutating it.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    MultiPoint(Vec<Point>),
    LineString(LineString),
    MultiLineString(Vec<LineString>),
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

/// A single point, line or ring extracted from a geometry.
///
/// Components are the unit over which shared segments are matched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Component<'a> {
    Point(&'a Point),
    Line(&'a LineString),
}

impl<'a> Component<'a> {
    #[must_use]
    pub fn points(&self) -> &'a [Point] {
        match *self {
            Component::Point(p) => std::slice::from_ref(p),
            Component::Line(line) => &line.points,
        }
    }

    #[must_use]
    pub fn is_point(&self) -> bool {
        matches!(self, Component::Point(_))
    }
}

impl Geometry {
    #[must_use]
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => GeometryType::Point,
            Geometry::LineString(_) | Geometry::MultiLineString(_) => GeometryType::Line,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => GeometryType::Polygon,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(_) => false,
            Geometry::MultiPoint(points) => points.is_empty(),
            Geometry::LineString(line) => line.is_empty(),
            Geometry::MultiLineString(lines) => lines.iter().all(LineString::is_empty),
            Geometry::Polygon(polygon) => polygon.is_empty(),
            Geometry::MultiPolygon(polygons) => polygons.iter().all(Polygon::is_empty),
        }
    }

    /// Points, lines and rings in vertex-numbering order.
    #[must_use]
    pub fn components(&self) -> Vec<Component<'_>> {
        match self {
            Geometry::Point(p) => vec![Component::Point(p)],
            Geometry::MultiPoint(points) => points.iter().map(Component::Point).collect(),
            Geometry::LineString(line) => vec![Component::Line(line)],
            Geometry::MultiLineString(lines) => lines.iter().map(Component::Line).collect(),
            Geometry::Polygon(polygon) => polygon.rings.iter().map(Component::Line).collect(),
            Geometry::MultiPolygon(polygons) => polygons
                .iter()
                .flat_map(|polygon| polygon.rings.iter().map(Component::Line))
                .collect(),
        }
    }

    /// Rewrites the geometry into a canonical form for comparisons.
    ///
    /// Closed rings and lines start at their lexicographically smallest
    /// vertex. Polygon exteriors run clockwise, interiors counter-clockwise.
    pub fn normalize(&mut self) {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => {}
            Geometry::LineString(line) => normalize_closed(line),
            Geometry::MultiLineString(lines) => lines.iter_mut().for_each(normalize_closed),
            Geometry::Polygon(polygon) => normalize_polygon(polygon),
            Geometry::MultiPolygon(polygons) => polygons.iter_mut().for_each(normalize_polygon),
        }
    }

    /// Returns a normalized copy.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut geometry = self.clone();
        geometry.normalize();
        geometry
    }
}

impl From<Point> for Geometry {
    fn from(p: Point) -> Self {
        Geometry::Point(p)
    }
}

impl From<LineString> for Geometry {
    fn from(line: LineString) -> Self {
        Geometry::LineString(line)
    }
}

impl From<Polygon> for Geometry {
    fn from(polygon: Polygon) -> Self {
        Geometry::Polygon(polygon)
    }
}

fn normalize_polygon(polygon: &mut Polygon) {
    for (i, ring) in polygon.rings.iter_mut().enumerate() {
        let xy: Vec<Point2> = ring.points.iter().map(Point::xy).collect();
        let area = signed_area_2d(&xy);
        // Exterior clockwise (negative area), holes counter-clockwise.
        let wrong_way = if i == 0 { area > 0.0 } else { area < 0.0 };
        if wrong_way {
            ring.points.reverse();
        }
        normalize_closed(ring);
    }
}

fn normalize_closed(line: &mut LineString) {
    if !line.is_closed() || line.len() < 3 {
        return;
    }
    let open = &line.points[..line.len() - 1];
    let xy: Vec<Point2> = open.iter().map(Point::xy).collect();
    let mut points = rotate_to_canonical_start(open, &xy);
    if let Some(&first) = points.first() {
        points.push(first);
    }
    line.points = points;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn geom(wkt: &str) -> Geometry {
        wkt.parse().unwrap()
    }

    #[test]
    fn geometry_types() {
        assert_eq!(geom("POINT(0 0)").geometry_type(), GeometryType::Point);
        assert_eq!(geom("MULTIPOINT(0 0, 1 1)").geometry_type(), GeometryType::Point);
        assert_eq!(geom("LINESTRING(0 0, 1 1)").geometry_type(), GeometryType::Line);
        assert_eq!(
            geom("MULTIPOLYGON(((0 0, 1 0, 1 1, 0 0)))").geometry_type(),
            GeometryType::Polygon
        );
    }

    #[test]
    fn components_of_polygon_with_hole() {
        let g = geom("POLYGON((0 0, 0 5, 5 5, 5 0, 0 0), (1 1, 2 1, 2 2, 1 2, 1 1))");
        let components = g.components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[1].points()[0], Point::new(1.0, 1.0));
    }

    #[test]
    fn components_of_multipoint_are_points() {
        let g = geom("MULTIPOINT(0 0, 1 1)");
        assert!(g.components().iter().all(Component::is_point));
    }

    #[test]
    fn normalize_rotates_closed_line() {
        let g = geom("LINESTRING(1 1, 0 1, 0 0, 1 0, 1 1)").normalized();
        assert_eq!(g, geom("LINESTRING(0 0, 1 0, 1 1, 0 1, 0 0)"));
    }

    #[test]
    fn normalize_leaves_open_line() {
        let g = geom("LINESTRING(1 1, 0 0, 2 2)");
        assert_eq!(g.normalized(), g);
    }

    #[test]
    fn normalize_orients_polygon_rings() {
        let ccw = geom("POLYGON((0 0, 4 0, 4 4, 0 4, 0 0), (1 1, 1 2, 2 2, 2 1, 1 1))");
        let cw = geom("POLYGON((0 4, 4 4, 4 0, 0 0, 0 4), (2 1, 2 2, 1 2, 1 1, 2 1))");
        assert_eq!(ccw.normalized(), cw.normalized());
        assert_eq!(
            ccw.normalized(),
            geom("POLYGON((0 0, 0 4, 4 4, 4 0, 0 0), (1 1, 2 1, 2 2, 1 2, 1 1))")
        );
    }
}
