use super::Point;

/// An ordered sequence of points.
///
/// A line string is closed when it has at least two points and its first
/// and last point share the same X/Y.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString {
    pub points: Vec<Point>,
}

impl LineString {
    #[must_use]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates a 2D line string from `(x, y)` pairs.
    #[must_use]
    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self {
            points: coords.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() >= 2 => first.same_xy(last),
            _ => false,
        }
    }

    #[must_use]
    pub fn start_point(&self) -> Option<&Point> {
        self.points.first()
    }

    #[must_use]
    pub fn end_point(&self) -> Option<&Point> {
        self.points.last()
    }

    /// Returns the same line digitized in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Returns the line with its first point appended when it is not closed.
    #[must_use]
    pub fn closed(&self) -> Self {
        let mut line = self.clone();
        if !line.is_closed() {
            if let Some(&first) = line.points.first() {
                line.points.push(first);
            }
        }
        line
    }

    /// Iterates over consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (&Point, &Point)> {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }
}
