// Shared test fixtures and oracles. Test-only.

use itertools::Itertools;
use nalgebra::Point2;

use crate::geom;
use crate::mesh::PolyMesh;

pub fn pts(raw: &[(f64, f64)]) -> Vec<Point2<f64>> {
    raw.iter().map(|&(x, y)| Point2::new(x, y)).collect()
}

// The 15-vertex running example of Computational Geometry (de Berg et al.,
// chapter 3), with concrete coordinates preserving the figure's geometry.
// The book numbers the vertices clockwise in this listing, so reverse for
// a counter-clockwise ring.
pub fn de_berg_ring() -> Vec<Point2<f64>> {
    let mut ring = pts(&[
        (10.0, 21.0),
        (11.82, 22.31),
        (13.48, 21.35),
        (14.68, 21.97),
        (14.86, 18.85),
        (17.2, 19.51),
        (16.16, 15.91),
        (13.88, 16.55),
        (15.58, 12.45),
        (10.76, 15.11),
        (9.58, 14.31),
        (8.54, 15.91),
        (9.0, 19.0),
        (10.38, 17.95),
        (10.94, 19.59),
    ]);
    ring.reverse();
    ring
}

// An 18-vertex coastline ring from a shapefile dataset. The dataset stores it
// clockwise; reverse for a counter-clockwise ring.
pub fn coast_ring() -> Vec<Point2<f64>> {
    let mut ring = pts(&[
        (114.0, -8.590444),
        (113.998361, -8.592111),
        (110.7075, -8.202111),
        (108.862528, -7.609583),
        (107.843306, -7.739583),
        (106.401667, -7.384639),
        (106.505, -6.965472),
        (105.207111, -6.751694),
        (105.797944, -6.489167),
        (106.038333, -5.874611),
        (108.3025, -6.240389),
        (108.932472, -6.841306),
        (110.406667, -6.952083),
        (111.029167, -6.416278),
        (112.547472, -6.842917),
        (113.155833, -7.74625),
        (114.438333, -7.78875),
        (114.592917, -8.752528),
    ]);
    ring.reverse();
    ring
}

// True if some half-edge pair connects the two coordinate pairs, either way.
pub fn diagonal_exists(mesh: &PolyMesh, a: (f64, f64), b: (f64, f64)) -> bool {
    let a = Point2::new(a.0, a.1);
    let b = Point2::new(b.0, b.1);
    mesh.edges.keys().any(|e| {
        let u = mesh.position(mesh.root(e));
        let v = mesh.position(mesh.dest(e));
        (u == a && v == b) || (u == b && v == a)
    })
}

// Even-odd point-in-polygon oracle, independent of the triangulation code
// under test. Boundary points count as inside.
pub fn polygon_contains(ring: &[Point2<f64>], p: Point2<f64>) -> bool {
    for (&a, &b) in ring.iter().circular_tuple_windows() {
        if geom::orient(a, b, p) == 0.0
            && a.x.min(b.x) <= p.x
            && p.x <= a.x.max(b.x)
            && a.y.min(b.y) <= p.y
            && p.y <= a.y.max(b.y)
        {
            return true;
        }
    }
    let mut inside = false;
    for (&a, &b) in ring.iter().circular_tuple_windows() {
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}
