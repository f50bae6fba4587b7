use super::{Point2, Vector2, TOLERANCE};

/// Turn direction of a point relative to a directed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Orientation of `c` relative to the directed line `a → b`.
#[must_use]
pub fn orientation(a: &Point2, b: &Point2, c: &Point2) -> Orientation {
    let ab: Vector2 = b - a;
    let ac: Vector2 = c - a;
    let cross = ab.perp(&ac);
    if cross.abs() < TOLERANCE {
        Orientation::Collinear
    } else if cross > 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Clockwise
    }
}

/// Returns `true` if `p` lies within the bounding box of `a → b`.
fn within_extent(p: &Point2, a: &Point2, b: &Point2) -> bool {
    p.x >= a.x.min(b.x) - TOLERANCE
        && p.x <= a.x.max(b.x) + TOLERANCE
        && p.y >= a.y.min(b.y) - TOLERANCE
        && p.y <= a.y.max(b.y) + TOLERANCE
}

/// Returns `true` if `p` lies on the closed segment `a → b`.
#[must_use]
pub fn point_on_segment(p: &Point2, a: &Point2, b: &Point2) -> bool {
    orientation(a, b, p) == Orientation::Collinear && within_extent(p, a, b)
}

/// Returns `true` if the closed segments `a0 → a1` and `b0 → b1` share
/// at least one point, including touching endpoints and collinear overlap.
#[must_use]
pub fn segments_intersect(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let o1 = orientation(a0, a1, b0);
    let o2 = orientation(a0, a1, b1);
    let o3 = orientation(b0, b1, a0);
    let o4 = orientation(b0, b1, a1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && within_extent(b0, a0, a1))
        || (o2 == Orientation::Collinear && within_extent(b1, a0, a1))
        || (o3 == Orientation::Collinear && within_extent(a0, b0, b1))
        || (o4 == Orientation::Collinear && within_extent(a1, b0, b1))
}
