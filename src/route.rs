use nalgebra::Point2;
use petgraph::graphmap::DiGraphMap;
use thiserror::Error;

use crate::dual::{self, SleeveTree};
use crate::funnel;
use crate::geom;
use crate::mesh::{EdgeKey, FaceKey, MeshError, PolyMesh, VertMap};
use crate::triangulate;

#[derive(Debug, Error, PartialEq)]
pub enum RouteError {
    #[error(transparent)]
    InvalidRing(#[from] MeshError),
    #[error("polygon edges {0} and {1} cross")]
    EdgesCross(usize, usize),
    #[error("point ({0}, {1}) is not inside the polygon")]
    PointNotInPolygon(f64, f64),
}

// One triangulated polygon, reusable across any number of point-to-point
// queries. Accepts the ring in either orientation; a clockwise ring is
// reversed before the mesh is built.
#[derive(Debug)]
pub struct Router {
    mesh: PolyMesh,
    verts: VertMap,
}

impl Router {
    pub fn new(ring: &[Point2<f64>]) -> Result<Self, RouteError> {
        let ring = validated_ccw(ring)?;
        let (mesh, verts) = triangulate::triangulate_ring(&ring)?;
        Ok(Self { mesh, verts })
    }

    #[must_use]
    pub fn mesh(&self) -> &PolyMesh {
        &self.mesh
    }

    #[must_use]
    pub fn vert_map(&self) -> &VertMap {
        &self.verts
    }

    // The ordered strip of triangles from the one containing `source` to the
    // one containing `target`.
    pub fn sleeve(
        &self,
        source: Point2<f64>,
        target: Point2<f64>,
    ) -> Result<Vec<FaceKey>, RouteError> {
        self.query(source, target).map(|(_, sleeve)| sleeve)
    }

    // The polyline from `source` to `target`: starts at the source, ends at
    // the target, bends only at polygon vertices.
    pub fn shortest_path(
        &self,
        source: Point2<f64>,
        target: Point2<f64>,
    ) -> Result<Vec<Point2<f64>>, RouteError> {
        let (graph, sleeve) = self.query(source, target)?;
        let (bot, top) = funnel::portals(&self.mesh, &graph, &sleeve);
        Ok(funnel::string_pull(&bot, &top, source, target))
    }

    fn query(
        &self,
        source: Point2<f64>,
        target: Point2<f64>,
    ) -> Result<(DiGraphMap<FaceKey, EdgeKey>, Vec<FaceKey>), RouteError> {
        let root = dual::face_containing(&self.mesh, source)
            .ok_or(RouteError::PointNotInPolygon(source.x, source.y))?;
        let graph = dual::dual_graph(&self.mesh);
        let tree = SleeveTree::build(&graph, root);
        let sleeve = tree.path_to_point(&self.mesh, target);
        if sleeve.is_empty() {
            return Err(RouteError::PointNotInPolygon(target.x, target.y));
        }
        Ok((graph, sleeve))
    }
}

// One-shot query over a fresh triangulation.
pub fn shortest_path(
    ring: &[Point2<f64>],
    source: Point2<f64>,
    target: Point2<f64>,
) -> Result<Vec<Point2<f64>>, RouteError> {
    Router::new(ring)?.shortest_path(source, target)
}

// Reject rings with properly crossing edges, then normalise the orientation to
// counter-clockwise. Adjacent edges only share an endpoint, which is not a
// proper crossing, so every pair can be tested uniformly.
fn validated_ccw(ring: &[Point2<f64>]) -> Result<Vec<Point2<f64>>, RouteError> {
    let n = ring.len();
    for i in 0..n {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        for j in i + 1..n {
            let (c, d) = (ring[j], ring[(j + 1) % n]);
            if geom::segments_cross(a, b, c, d) {
                return Err(RouteError::EdgesCross(i, j));
            }
        }
    }

    let mut ring = ring.to_vec();
    if geom::signed_area(&ring) < 0.0 {
        ring.reverse();
    }
    Ok(ring)
}
