//! Well-known text reading and writing.
//!
//! Supports `POINT`, `MULTIPOINT`, `LINESTRING`, `MULTILINESTRING`,
//! `POLYGON` and `MULTIPOLYGON` with an optional `Z` tag and `EMPTY`
//! bodies. Written geometries use the compact form `LINESTRING(0 0, 1 1)`.

use std::fmt;
use std::str::FromStr;

use super::{Geometry, LineString, Point, Polygon};
use crate::error::GeometryError;

impl FromStr for Geometry {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let geometry = parser.geometry()?;
        parser.skip_whitespace();
        if parser.pos < parser.src.len() {
            return Err(parser.error("trailing characters"));
        }
        Ok(geometry)
    }
}

const KEYWORDS: [&str; 6] = [
    "POINT",
    "MULTIPOINT",
    "LINESTRING",
    "MULTILINESTRING",
    "POLYGON",
    "MULTIPOLYGON",
];

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            src: s.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, msg: &str) -> GeometryError {
        GeometryError::Wkt(format!("{msg} at offset {}", self.pos))
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.src.get(self.pos).copied()
    }

    fn expect(&mut self, c: u8) -> Result<(), GeometryError> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", c as char)))
        }
    }

    fn word(&mut self) -> String {
        self.skip_whitespace();
        let start = self.pos;
        while self.pos < self.src.len() && self.src[self.pos].is_ascii_alphabetic() {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.src[start..self.pos]).to_ascii_uppercase()
    }

    fn number(&mut self) -> Result<f64, GeometryError> {
        self.skip_whitespace();
        let start = self.pos;
        while self.pos < self.src.len()
            && matches!(self.src[self.pos], b'0'..=b'9' | b'.' | b'-' | b'+' | b'e' | b'E')
        {
            self.pos += 1;
        }
        let text = String::from_utf8_lossy(&self.src[start..self.pos]);
        text.parse::<f64>()
            .map_err(|_| GeometryError::Wkt(format!("invalid number '{text}' at offset {start}")))
    }

    /// Parses the geometry keyword, its optional `Z` tag and the body.
    fn geometry(&mut self) -> Result<Geometry, GeometryError> {
        let mut keyword = self.word();
        let mut has_z = false;
        if let Some(stripped) = keyword.strip_suffix('Z') {
            if KEYWORDS.contains(&stripped) {
                keyword = stripped.to_string();
                has_z = true;
            }
        }
        let save = self.pos;
        if self.word() == "Z" {
            has_z = true;
        } else {
            self.pos = save;
        }
        let save = self.pos;
        if self.word() == "EMPTY" {
            return empty(&keyword).ok_or_else(|| self.error("cannot be empty"));
        }
        self.pos = save;

        match keyword.as_str() {
            "POINT" => {
                self.expect(b'(')?;
                let p = self.coord(has_z)?;
                self.expect(b')')?;
                Ok(Geometry::Point(p))
            }
            "MULTIPOINT" => self.multipoint(has_z).map(Geometry::MultiPoint),
            "LINESTRING" => self.line(has_z).map(Geometry::LineString),
            "MULTILINESTRING" => self
                .list(|parser| parser.line(has_z))
                .map(Geometry::MultiLineString),
            "POLYGON" => self.polygon(has_z).map(Geometry::Polygon),
            "MULTIPOLYGON" => self
                .list(|parser| parser.polygon(has_z))
                .map(Geometry::MultiPolygon),
            other => Err(self.error(&format!("unknown geometry type '{other}'"))),
        }
    }

    fn coord(&mut self, has_z: bool) -> Result<Point, GeometryError> {
        let x = self.number()?;
        let y = self.number()?;
        let z = match self.peek() {
            Some(b',' | b')') | None => None,
            Some(_) => Some(self.number()?),
        };
        if has_z && z.is_none() {
            return Err(self.error("missing Z coordinate"));
        }
        Ok(Point { x, y, z })
    }

    /// Parses `( item, item, ... )`.
    fn list<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, GeometryError>,
    ) -> Result<Vec<T>, GeometryError> {
        self.expect(b'(')?;
        let mut items = vec![item(self)?];
        while self.peek() == Some(b',') {
            self.pos += 1;
            items.push(item(self)?);
        }
        self.expect(b')')?;
        Ok(items)
    }

    fn line(&mut self, has_z: bool) -> Result<LineString, GeometryError> {
        self.list(|parser| parser.coord(has_z)).map(LineString::new)
    }

    fn polygon(&mut self, has_z: bool) -> Result<Polygon, GeometryError> {
        self.list(|parser| parser.line(has_z)).map(Polygon::new)
    }

    /// Accepts both `MULTIPOINT(0 0, 1 1)` and `MULTIPOINT((0 0), (1 1))`.
    fn multipoint(&mut self, has_z: bool) -> Result<Vec<Point>, GeometryError> {
        self.list(|parser| {
            if parser.peek() == Some(b'(') {
                parser.pos += 1;
                let p = parser.coord(has_z)?;
                parser.expect(b')')?;
                Ok(p)
            } else {
                parser.coord(has_z)
            }
        })
    }
}

fn empty(keyword: &str) -> Option<Geometry> {
    match keyword {
        "MULTIPOINT" => Some(Geometry::MultiPoint(Vec::new())),
        "LINESTRING" => Some(Geometry::LineString(LineString::default())),
        "MULTILINESTRING" => Some(Geometry::MultiLineString(Vec::new())),
        "POLYGON" => Some(Geometry::Polygon(Polygon::default())),
        "MULTIPOLYGON" => Some(Geometry::MultiPolygon(Vec::new())),
        _ => None,
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let has_z = self.vertices().any(|(_, p)| p.z.is_some());
        let keyword = match self {
            Geometry::Point(_) => "POINT",
            Geometry::MultiPoint(_) => "MULTIPOINT",
            Geometry::LineString(_) => "LINESTRING",
            Geometry::MultiLineString(_) => "MULTILINESTRING",
            Geometry::Polygon(_) => "POLYGON",
            Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        };
        f.write_str(keyword)?;
        if has_z {
            f.write_str(" Z")?;
        }
        if self.is_empty() {
            return f.write_str(" EMPTY");
        }
        match self {
            Geometry::Point(p) => write_points(f, std::slice::from_ref(p), has_z),
            Geometry::MultiPoint(points) => write_points(f, points, has_z),
            Geometry::LineString(line) => write_points(f, &line.points, has_z),
            Geometry::MultiLineString(lines) => {
                write_list(f, lines, |f, line| write_points(f, &line.points, has_z))
            }
            Geometry::Polygon(polygon) => write_rings(f, polygon, has_z),
            Geometry::MultiPolygon(polygons) => {
                write_list(f, polygons, |f, polygon| write_rings(f, polygon, has_z))
            }
        }
    }
}

fn write_list<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    mut write_item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    f.write_str("(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_item(f, item)?;
    }
    f.write_str(")")
}

fn write_points(f: &mut fmt::Formatter<'_>, points: &[Point], has_z: bool) -> fmt::Result {
    write_list(f, points, |f, p| {
        write!(f, "{} {}", p.x, p.y)?;
        if has_z {
            write!(f, " {}", p.z.unwrap_or(0.0))?;
        }
        Ok(())
    })
}

fn write_rings(f: &mut fmt::Formatter<'_>, polygon: &Polygon, has_z: bool) -> fmt::Result {
    write_list(f, &polygon.rings, |f, ring| write_points(f, &ring.points, has_z))
}
