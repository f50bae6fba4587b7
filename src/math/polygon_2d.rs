use super::Point2;

/// Computes the signed area of a ring in the XY plane (shoelace formula).
///
/// The ring may be given open or closed. Positive for counter-clockwise,
/// negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` if `p` lies strictly inside the closed ring (crossing number).
///
/// Points exactly on the boundary may be reported either way; callers that
/// care about the boundary test it separately.
#[must_use]
pub fn point_in_ring(p: &Point2, ring: &[Point2]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (&ring[i], &ring[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Index of the lexicographically smallest vertex (x, then y).
///
/// Used to rotate an open ring to a deterministic start for comparisons.
#[must_use]
pub fn canonical_start_index(points: &[Point2]) -> usize {
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x || (pt.x == b.x && pt.y < b.y) {
            best = i;
        }
    }
    best
}

/// Rotates an open ring so it starts at [`canonical_start_index`].
#[must_use]
pub fn rotate_to_canonical_start<T: Clone>(items: &[T], points: &[Point2]) -> Vec<T> {
    if items.len() < 2 {
        return items.to_vec();
    }
    let best = canonical_start_index(points);
    let mut rotated = Vec::with_capacity(items.len());
    rotated.extend_from_slice(&items[best..]);
    rotated.extend_from_slice(&items[..best]);
    rotated
}
