//! Flattened vertex numbering and single-vertex edits.
//!
//! Vertices are numbered across parts, then rings, then vertices, with the
//! closing vertex of every ring counted. For
//! `MULTIPOLYGON(((0 0, 1 0, 1 1, 0 0)), ((5 5, 6 5, 6 6, 5 5)))` the second
//! polygon starts at vertex 4.

use super::{Component, Geometry, LineString, Point};
use crate::error::GeometryError;

/// Position of a vertex inside a geometry.
///
/// `part` indexes the parts of a multi-geometry, `ring` the rings of a
/// polygon and `vertex` the point inside that ring or line. Unused levels
/// are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexId {
    pub part: usize,
    pub ring: usize,
    pub vertex: usize,
}

impl Geometry {
    /// Total number of vertices, closing vertices included.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.components().iter().map(|c| c.points().len()).sum()
    }

    /// Enumerates `(vertex number, point)` in numbering order.
    pub fn vertices(&self) -> impl Iterator<Item = (usize, &Point)> + '_ {
        self.components()
            .into_iter()
            .flat_map(|c| c.points().iter())
            .enumerate()
    }

    /// Maps a flattened vertex number to its position.
    #[must_use]
    pub fn vertex_id(&self, nr: usize) -> Option<VertexId> {
        let mut offset = 0;
        for (part, ring, len) in self.layout() {
            if nr < offset + len {
                return Some(VertexId {
                    part,
                    ring,
                    vertex: nr - offset,
                });
            }
            offset += len;
        }
        None
    }

    #[must_use]
    pub fn vertex_at(&self, nr: usize) -> Option<&Point> {
        self.vertices().nth(nr).map(|(_, p)| p)
    }

    /// The point, line or ring holding vertex `nr`, with the vertex number
    /// of its first point.
    #[must_use]
    pub fn component_of_vertex(&self, nr: usize) -> Option<(usize, Component<'_>)> {
        let mut offset = 0;
        for component in self.components() {
            let len = component.points().len();
            if nr < offset + len {
                return Some((offset, component));
            }
            offset += len;
        }
        None
    }

    /// Moves vertex `nr` to `p`.
    ///
    /// Moving the first or last vertex of a polygon ring moves its closing
    /// twin as well.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::VertexOutOfRange` if `nr` is not a vertex.
    pub fn move_vertex(&mut self, nr: usize, p: Point) -> Result<(), GeometryError> {
        let id = self.checked_vertex_id(nr)?;
        match self {
            Geometry::Point(point) => *point = p,
            Geometry::MultiPoint(points) => points[id.part] = p,
            Geometry::LineString(line) => line.points[id.vertex] = p,
            Geometry::MultiLineString(lines) => lines[id.part].points[id.vertex] = p,
            Geometry::Polygon(polygon) => {
                move_ring_vertex(&mut polygon.rings[id.ring], id.vertex, p);
            }
            Geometry::MultiPolygon(polygons) => {
                move_ring_vertex(&mut polygons[id.part].rings[id.ring], id.vertex, p);
            }
        }
        Ok(())
    }

    /// Inserts `p` before vertex `nr`.
    ///
    /// Inserting at the start of a polygon ring also moves the closing
    /// vertex to `p`. For a multipoint, `p` becomes a new part and `nr` may
    /// equal the number of parts to append.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::VertexOutOfRange` if `nr` is not a vertex, or
    /// `GeometryError::InvalidEdit` for a single point geometry.
    pub fn insert_vertex(&mut self, nr: usize, p: Point) -> Result<(), GeometryError> {
        if let Geometry::MultiPoint(points) = self {
            if nr > points.len() {
                return Err(GeometryError::VertexOutOfRange {
                    index: nr,
                    count: points.len(),
                });
            }
            points.insert(nr, p);
            return Ok(());
        }
        let id = self.checked_vertex_id(nr)?;
        match self {
            Geometry::Point(_) => {
                return Err(GeometryError::InvalidEdit(
                    "cannot insert a vertex into a point".into(),
                ))
            }
            Geometry::MultiPoint(_) => {}
            Geometry::LineString(line) => line.points.insert(id.vertex, p),
            Geometry::MultiLineString(lines) => lines[id.part].points.insert(id.vertex, p),
            Geometry::Polygon(polygon) => {
                insert_ring_vertex(&mut polygon.rings[id.ring], id.vertex, p);
            }
            Geometry::MultiPolygon(polygons) => {
                insert_ring_vertex(&mut polygons[id.part].rings[id.ring], id.vertex, p);
            }
        }
        Ok(())
    }

    /// Deletes vertex `nr`.
    ///
    /// A line left with a single point is emptied; an emptied part of a
    /// multi-geometry is removed. A polygon ring with four or fewer stored
    /// vertices is removed as a whole, an exterior being replaced by the
    /// first hole. Deleting the first or last vertex of a ring re-syncs the
    /// closing vertex.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::VertexOutOfRange` if `nr` is not a vertex, or
    /// `GeometryError::InvalidEdit` for a single point geometry.
    pub fn delete_vertex(&mut self, nr: usize) -> Result<(), GeometryError> {
        let id = self.checked_vertex_id(nr)?;
        match self {
            Geometry::Point(_) => {
                return Err(GeometryError::InvalidEdit(
                    "cannot delete the vertex of a point".into(),
                ))
            }
            Geometry::MultiPoint(points) => {
                points.remove(id.part);
            }
            Geometry::LineString(line) => delete_line_vertex(line, id.vertex),
            Geometry::MultiLineString(lines) => {
                delete_line_vertex(&mut lines[id.part], id.vertex);
                if lines[id.part].is_empty() {
                    lines.remove(id.part);
                }
            }
            Geometry::Polygon(polygon) => {
                delete_ring_vertex(&mut polygon.rings, id.ring, id.vertex);
            }
            Geometry::MultiPolygon(polygons) => {
                delete_ring_vertex(&mut polygons[id.part].rings, id.ring, id.vertex);
                if polygons[id.part].rings.is_empty() {
                    polygons.remove(id.part);
                }
            }
        }
        Ok(())
    }

    fn checked_vertex_id(&self, nr: usize) -> Result<VertexId, GeometryError> {
        self.vertex_id(nr)
            .ok_or_else(|| GeometryError::VertexOutOfRange {
                index: nr,
                count: self.vertex_count(),
            })
    }

    /// `(part, ring, vertex count)` for every component.
    fn layout(&self) -> Vec<(usize, usize, usize)> {
        match self {
            Geometry::Point(_) => vec![(0, 0, 1)],
            Geometry::MultiPoint(points) => (0..points.len()).map(|i| (i, 0, 1)).collect(),
            Geometry::LineString(line) => vec![(0, 0, line.len())],
            Geometry::MultiLineString(lines) => lines
                .iter()
                .enumerate()
                .map(|(i, line)| (i, 0, line.len()))
                .collect(),
            Geometry::Polygon(polygon) => polygon
                .rings
                .iter()
                .enumerate()
                .map(|(r, ring)| (0, r, ring.len()))
                .collect(),
            Geometry::MultiPolygon(polygons) => polygons
                .iter()
                .enumerate()
                .flat_map(|(i, polygon)| {
                    polygon
                        .rings
                        .iter()
                        .enumerate()
                        .map(move |(r, ring)| (i, r, ring.len()))
                })
                .collect(),
        }
    }
}

fn move_ring_vertex(ring: &mut LineString, vertex: usize, p: Point) {
    let last = ring.len() - 1;
    ring.points[vertex] = p;
    if vertex == 0 {
        ring.points[last] = p;
    } else if vertex == last {
        ring.points[0] = p;
    }
}

fn insert_ring_vertex(ring: &mut LineString, vertex: usize, p: Point) {
    ring.points.insert(vertex, p);
    if vertex == 0 {
        let last = ring.len() - 1;
        ring.points[last] = p;
    }
}

fn delete_line_vertex(line: &mut LineString, vertex: usize) {
    line.points.remove(vertex);
    if line.len() == 1 {
        line.points.clear();
    }
}

fn delete_ring_vertex(rings: &mut Vec<LineString>, ring: usize, vertex: usize) {
    let n = rings[ring].len();
    if n <= 4 {
        rings.remove(ring);
        return;
    }
    let points = &mut rings[ring].points;
    points.remove(vertex);
    let last = points.len() - 1;
    if vertex == 0 {
        points[last] = points[0];
    } else if vertex == n - 1 {
        points[0] = points[last];
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn geom(wkt: &str) -> Geometry {
        wkt.parse().unwrap()
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn numbering_spans_parts_and_rings() {
        let g = geom(concat!(
            "MULTIPOLYGON(((0 0, 0 5, 5 5, 5 0, 0 0), (1 1, 2 1, 2 2, 1 1)), ",
            "((10 10, 10 11, 11 11, 10 10)))",
        ));
        assert_eq!(g.vertex_count(), 13);
        assert_eq!(
            g.vertex_id(5),
            Some(VertexId {
                part: 0,
                ring: 1,
                vertex: 0
            })
        );
        assert_eq!(
            g.vertex_id(9),
            Some(VertexId {
                part: 1,
                ring: 0,
                vertex: 0
            })
        );
        assert_eq!(g.vertex_id(13), None);
        assert_eq!(g.vertex_at(10), Some(&p(10.0, 11.0)));
    }

    #[test]
    fn component_of_vertex_reports_offset() {
        let g = geom("MULTILINESTRING((0 0, 1 1), (2 2, 3 3, 4 4))");
        let (offset, component) = g.component_of_vertex(3).unwrap();
        assert_eq!(offset, 2);
        assert_eq!(component.points().len(), 3);
        assert!(g.component_of_vertex(5).is_none());
    }

    #[test]
    fn move_line_vertex() {
        let mut g = geom("LINESTRING(0 0, 1 1, 2 2)");
        g.move_vertex(0, p(-1.0, -1.0)).unwrap();
        assert_eq!(g, geom("LINESTRING(-1 -1, 1 1, 2 2)"));
    }

    #[test]
    fn move_closed_line_start_leaves_end() {
        let mut g = geom("LINESTRING(0 0, 1 0, 1 1, 0 0)");
        g.move_vertex(0, p(-1.0, 0.0)).unwrap();
        assert_eq!(g, geom("LINESTRING(-1 0, 1 0, 1 1, 0 0)"));
    }

    #[test]
    fn move_ring_origin_moves_closing_vertex() {
        let mut g = geom("POLYGON((0 0, 0 1, 1 1, 1 0, 0 0))");
        g.move_vertex(4, p(-1.0, -1.0)).unwrap();
        assert_eq!(g, geom("POLYGON((-1 -1, 0 1, 1 1, 1 0, -1 -1))"));
    }

    #[test]
    fn move_out_of_range() {
        let mut g = geom("LINESTRING(0 0, 1 1)");
        let err = g.move_vertex(2, p(0.0, 0.0)).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::VertexOutOfRange { index: 2, count: 2 }
        ));
    }

    #[test]
    fn insert_before_vertex() {
        let mut g = geom("LINESTRING(0 0, 2 2)");
        g.insert_vertex(1, p(1.0, 1.0)).unwrap();
        assert_eq!(g, geom("LINESTRING(0 0, 1 1, 2 2)"));
    }

    #[test]
    fn insert_needs_existing_vertex() {
        let mut g = geom("LINESTRING(0 0, 2 2)");
        assert!(g.insert_vertex(2, p(3.0, 3.0)).is_err());
    }

    #[test]
    fn insert_at_ring_start_resyncs_closing_vertex() {
        let mut g = geom("POLYGON((0 0, 0 1, 1 1, 1 0, 0 0))");
        g.insert_vertex(0, p(-1.0, -1.0)).unwrap();
        assert_eq!(g, geom("POLYGON((-1 -1, 0 0, 0 1, 1 1, 1 0, -1 -1))"));
    }

    #[test]
    fn insert_into_multipoint_adds_part() {
        let mut g = geom("MULTIPOINT(0 0, 1 1)");
        g.insert_vertex(2, p(2.0, 2.0)).unwrap();
        assert_eq!(g, geom("MULTIPOINT(0 0, 1 1, 2 2)"));
    }

    #[test]
    fn point_rejects_insert_and_delete() {
        let mut g = geom("POINT(0 0)");
        assert!(matches!(
            g.insert_vertex(0, p(1.0, 1.0)),
            Err(GeometryError::InvalidEdit(_))
        ));
        assert!(matches!(g.delete_vertex(0), Err(GeometryError::InvalidEdit(_))));
    }

    #[test]
    fn delete_line_vertex_down_to_empty() {
        let mut g = geom("LINESTRING(0 0, 1 1, 2 2)");
        g.delete_vertex(1).unwrap();
        assert_eq!(g, geom("LINESTRING(0 0, 2 2)"));
        g.delete_vertex(0).unwrap();
        assert!(g.is_empty());
    }

    #[test]
    fn delete_removes_emptied_line_part() {
        let mut g = geom("MULTILINESTRING((0 0, 1 1), (2 2, 3 3))");
        g.delete_vertex(0).unwrap();
        assert_eq!(g, geom("MULTILINESTRING((2 2, 3 3))"));
    }

    #[test]
    fn delete_ring_origin_resyncs() {
        let mut g = geom("POLYGON((0 0, 0 1, 1 1, 1 0, 0 0))");
        g.delete_vertex(0).unwrap();
        assert_eq!(g, geom("POLYGON((0 1, 1 1, 1 0, 0 1))"));

        let mut g = geom("POLYGON((0 0, 0 1, 1 1, 1 0, 0 0))");
        g.delete_vertex(4).unwrap();
        assert_eq!(g, geom("POLYGON((1 0, 0 1, 1 1, 1 0))"));
    }

    #[test]
    fn delete_from_triangle_removes_ring() {
        let mut g = geom("POLYGON((0 0, 0 5, 5 5, 5 0, 0 0), (1 1, 2 1, 2 2, 1 1))");
        g.delete_vertex(6).unwrap();
        assert_eq!(g, geom("POLYGON((0 0, 0 5, 5 5, 5 0, 0 0))"));
    }

    #[test]
    fn delete_from_exterior_triangle_promotes_hole() {
        let mut g = geom("POLYGON((0 0, 0 5, 5 0, 0 0), (1 1, 2 1, 2 2, 1 2, 1 1))");
        g.delete_vertex(1).unwrap();
        assert_eq!(g, geom("POLYGON((1 1, 2 1, 2 2, 1 2, 1 1))"));
    }

    #[test]
    fn delete_removes_emptied_polygon_part() {
        let mut g = geom("MULTIPOLYGON(((0 0, 0 1, 1 0, 0 0)), ((5 5, 5 6, 6 6, 6 5, 5 5)))");
        g.delete_vertex(0).unwrap();
        assert_eq!(g, geom("MULTIPOLYGON(((5 5, 5 6, 6 6, 6 5, 5 5)))"));
    }

    #[test]
    fn delete_multipoint_part() {
        let mut g = geom("MULTIPOINT(0 0, 1 1, 2 2)");
        g.delete_vertex(1).unwrap();
        assert_eq!(g, geom("MULTIPOINT(0 0, 2 2)"));
    }
}
