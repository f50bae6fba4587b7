use crate::math::Point2;

/// A vertex coordinate with an optional Z value.
///
/// Z is carried through edits but never takes part in topology matching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Point {
    /// Creates a 2D point.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Creates a 3D point.
    #[must_use]
    pub fn new_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Exact X/Y identity used for all vertex matching.
    #[must_use]
    pub fn key(&self) -> VertexKey {
        VertexKey::new(self.x, self.y)
    }

    /// Planar coordinate for the predicates in [`crate::math`].
    #[must_use]
    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Returns `true` if both points share exactly the same X and Y.
    #[must_use]
    pub fn same_xy(&self, other: &Point) -> bool {
        self.key() == other.key()
    }
}

/// Hashable exact-coordinate key of a vertex.
///
/// Built from the bit patterns of X and Y, with `-0.0` folded into `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexKey(u64, u64);

impl VertexKey {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self(bits(x), bits(y))
    }

    #[must_use]
    pub fn x(self) -> f64 {
        f64::from_bits(self.0)
    }

    #[must_use]
    pub fn y(self) -> f64 {
        f64::from_bits(self.1)
    }
}

fn bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0_f64.to_bits()
    } else {
        v.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_z() {
        assert_eq!(Point::new(1.0, 2.0).key(), Point::new_z(1.0, 2.0, 5.0).key());
    }

    #[test]
    fn key_folds_negative_zero() {
        assert_eq!(Point::new(-0.0, 1.0).key(), Point::new(0.0, 1.0).key());
    }

    #[test]
    fn key_is_exact() {
        assert_ne!(Point::new(0.1 + 0.2, 0.0).key(), Point::new(0.3, 0.0).key());
    }

    #[test]
    fn key_round_trips_coordinates() {
        let key = Point::new(1.5, -2.25).key();
        assert_eq!((key.x(), key.y()), (1.5, -2.25));
    }
}
