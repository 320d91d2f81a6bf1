#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::float_cmp,
    clippy::many_single_char_names,
    clippy::similar_names
)]

pub mod dual;
pub mod funnel;
pub mod geom;
pub mod mesh;
pub mod monotone;
pub mod route;
pub mod status;
pub mod triangulate;

#[cfg(test)]
mod fixtures;

pub use mesh::{EdgeKey, FaceKey, MeshError, PolyMesh, VertKey, VertMap};
pub use route::{RouteError, Router, shortest_path};

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use nalgebra::Point2;
    use rand::Rng;

    use crate::fixtures;
    use crate::mesh::PolyMesh;
    use crate::route::{RouteError, Router};
    use crate::triangulate::triangulate_ring;

    #[test]
    fn serialize() {
        let (mesh, _) = triangulate_ring(&fixtures::de_berg_ring()).unwrap();

        let serialized = serde_json::to_string(&mesh).unwrap();
        let deserialized: PolyMesh = serde_json::from_str(&serialized).unwrap();

        assert_eq!(mesh.nr_verts(), deserialized.nr_verts());
        assert_eq!(mesh.nr_edges(), deserialized.nr_edges());
        assert_eq!(mesh.nr_faces(), deserialized.nr_faces());
        for f in deserialized.bounded_faces() {
            assert_eq!(deserialized.corners(f).len(), 3);
        }
    }

    #[test]
    fn coastline_queries_match_containment() {
        let ring = fixtures::coast_ring();
        let router = Router::new(&ring).unwrap();

        let mut rng = rand::rng();
        for _ in 0..200 {
            let source = Point2::new(
                rng.random_range(105.2..114.6),
                rng.random_range(-8.76..-5.87),
            );
            let target = Point2::new(
                rng.random_range(105.2..114.6),
                rng.random_range(-8.76..-5.87),
            );
            let both_inside = fixtures::polygon_contains(&ring, source)
                && fixtures::polygon_contains(&ring, target);

            match router.shortest_path(source, target) {
                Ok(path) => {
                    assert!(both_inside);
                    assert_eq!(path[0], source);
                    assert_eq!(*path.last().unwrap(), target);
                    for bend in &path[1..path.len() - 1] {
                        assert!(ring.contains(bend));
                    }
                }
                Err(RouteError::PointNotInPolygon(..)) => assert!(!both_inside),
                Err(other) => panic!("unexpected error {other}"),
            }
        }
    }

    #[test]
    fn repeated_triangulation_is_fresh_but_equivalent() {
        let ring = fixtures::de_berg_ring();
        let (a, _) = triangulate_ring(&ring).unwrap();
        let (b, _) = triangulate_ring(&ring).unwrap();

        assert_eq!(a.nr_verts(), b.nr_verts());
        assert_eq!(a.nr_edges(), b.nr_edges());
        assert_eq!(a.nr_faces(), b.nr_faces());

        // Same triangles by coordinates, not by identity.
        let corner_set = |mesh: &PolyMesh| {
            mesh.bounded_faces()
                .map(|f| {
                    mesh.face_points(f)
                        .iter()
                        .map(|p| (p.x.to_bits(), p.y.to_bits()))
                        .sorted()
                        .collect_vec()
                })
                .sorted()
                .collect_vec()
        };
        assert_eq!(corner_set(&a), corner_set(&b));
    }
}
