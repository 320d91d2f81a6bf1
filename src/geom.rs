use nalgebra::Point2;

// Orientation of the turn a -> b -> c: positive for counter-clockwise, zero for
// collinear, negative for clockwise. Equals the 2D cross product (b - a) x (c - b).
#[must_use]
pub fn orient(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    (b - a).perp(&(c - b))
}

#[must_use]
pub fn is_ccw(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> bool {
    orient(a, b, c) > 0.0
}

// A point p is above another point q if p.y > q.y, or p.y == q.y and p.x < q.x.
// The tiebreak makes "above" a total order over distinct points, so a horizontal
// run of vertices is processed left to right by the sweep.
#[must_use]
pub fn above(p: Point2<f64>, q: Point2<f64>) -> bool {
    p.y > q.y || (p.y == q.y && p.x < q.x)
}

#[must_use]
pub fn distance(p: Point2<f64>, q: Point2<f64>) -> f64 {
    (p - q).norm()
}

// Interior angle at b, in degrees, measured counter-clockwise from ray b->a to
// ray b->c. Collinear points yield 0 (not 360), hence the final modulo.
#[must_use]
pub fn ccw_angle(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    let ba = a - b;
    let bc = c - b;
    // The dot product can stray past 1.0 by a few ulps, so clamp before acos.
    let cos = (ba.dot(&bc) / (ba.norm() * bc.norm())).clamp(-1.0, 1.0);
    let deg = cos.acos().to_degrees();
    if is_ccw(a, b, c) {
        deg
    } else {
        (360.0 - deg) % 360.0
    }
}

// Point-in-triangle via the sign of the three edge cross products. A point on an
// edge (zero cross product, inside that edge's bounding box) counts as inside.
#[must_use]
pub fn point_in_triangle(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>, p: Point2<f64>) -> bool {
    let ab_ap = (b - a).perp(&(p - a));
    let bc_bp = (c - b).perp(&(p - b));
    let ca_cp = (a - c).perp(&(p - c));

    if ab_ap == 0.0 {
        return in_bbox(a, b, p);
    }
    if bc_bp == 0.0 {
        return in_bbox(b, c, p);
    }
    if ca_cp == 0.0 {
        return in_bbox(c, a, p);
    }

    (ab_ap > 0.0 && bc_bp > 0.0 && ca_cp > 0.0) || (ab_ap < 0.0 && bc_bp < 0.0 && ca_cp < 0.0)
}

fn in_bbox(a: Point2<f64>, b: Point2<f64>, p: Point2<f64>) -> bool {
    a.x.min(b.x) <= p.x && p.x <= a.x.max(b.x) && a.y.min(b.y) <= p.y && p.y <= a.y.max(b.y)
}

// Twice the signed area of a ring (shoelace): positive for counter-clockwise.
#[must_use]
pub fn signed_area(ring: &[Point2<f64>]) -> f64 {
    let mut sum = 0.0;
    for (i, p) in ring.iter().enumerate() {
        let q = ring[(i + 1) % ring.len()];
        sum += p.x * q.y - q.x * p.y;
    }
    sum
}

// True iff segments a-b and c-d properly cross (intersect in a single point that
// is interior to both). Shared endpoints and collinear overlaps do not count.
#[must_use]
pub fn segments_cross(
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    d: Point2<f64>,
) -> bool {
    orient(a, b, c) * orient(a, b, d) < 0.0 && orient(c, d, a) * orient(c, d, b) < 0.0
}
