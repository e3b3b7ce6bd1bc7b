//! Polygon primitives for planting zones: area and point containment.
//!
//! Boundaries are slices of [`Point`] that are implicitly closed: the last
//! vertex connects back to the first. Both primitives assume simple
//! (non-self-intersecting) polygons; self-intersecting input is not
//! validated and its results are unspecified.

use plantplan_types::Point;

/// Minimum number of vertices for a boundary to describe a polygon.
pub const MIN_VERTICES: usize = 3;

/// Iterate over the edges of a closed boundary, including the wraparound
/// edge from the last vertex back to the first.
pub fn edges(boundary: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    boundary
        .iter()
        .copied()
        .zip(boundary.iter().copied().cycle().skip(1))
}

/// Area enclosed by a boundary, using the shoelace (surveyor's) formula.
///
/// The absolute value makes the result independent of winding order.
/// Boundaries with fewer than three vertices, or whose vertices are all
/// collinear, have area `0.0`. Callers treat a zero area as an unusable
/// zone rather than an error.
pub fn area(boundary: &[Point]) -> f64 {
    if boundary.len() < MIN_VERTICES {
        return 0.0;
    }

    let twice_signed: f64 = edges(boundary)
        .map(|(a, b)| a.x.mul_add(b.y, -(b.x * a.y)))
        .sum();

    twice_signed.abs() / 2.0
}

/// Whether a boundary encloses a positive area.
pub fn is_usable(boundary: &[Point]) -> bool {
    area(boundary) > 0.0
}

/// Even-odd point-in-polygon test by horizontal ray casting towards `+x`.
///
/// An edge registers a crossing only when `min(y1, y2) < y <= max(y1, y2)`
/// and `x <= max(x1, x2)`. The half-open y interval keeps a vertex shared by
/// two edges from being counted twice and means horizontal edges never
/// register. For a vertical edge the crossing x is the edge's own x, so the
/// point counts as left of it only when `x <= edge.x`.
///
/// Consequently points on a left or bottom edge are outside and points on a
/// right or top edge are inside.
#[allow(clippy::float_cmp)]
pub fn contains(point: Point, boundary: &[Point]) -> bool {
    let Point { x, y } = point;
    let mut inside = false;

    for (p1, p2) in edges(boundary) {
        if y <= p1.y.min(p2.y) || y > p1.y.max(p2.y) || x > p1.x.max(p2.x) {
            continue;
        }

        // Exact comparison: only a truly vertical edge takes this branch.
        let x_cross = if p1.x == p2.x {
            p1.x
        } else {
            (y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x
        };

        if x <= x_cross {
            inside = !inside;
        }
    }

    inside
}
