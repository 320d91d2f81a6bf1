use nalgebra::Point2;
use petgraph::graphmap::DiGraphMap;

use crate::geom;
use crate::mesh::{EdgeKey, FaceKey, PolyMesh};

// Dual graph of a triangulated polygon: one node per bounded triangle, one arc
// per shared diagonal. The arc f1 -> f2 carries the half-edge that bounds f1,
// so the portal between two sleeve neighbours is a single edge-weight lookup.
// The unbounded face never appears.
#[must_use]
pub fn dual_graph(mesh: &PolyMesh) -> DiGraphMap<FaceKey, EdgeKey> {
    let mut graph = DiGraphMap::new();
    for f in mesh.bounded_faces() {
        graph.add_node(f);
        for e in mesh.face_edges(f) {
            let nf = mesh.face(mesh.twin(e));
            if mesh.faces[nf].outer.is_some() {
                graph.add_edge(f, nf, e);
            }
        }
    }
    graph
}

#[must_use]
pub fn face_contains(mesh: &PolyMesh, f: FaceKey, p: Point2<f64>) -> bool {
    let pts = mesh.face_points(f);
    geom::point_in_triangle(pts[0], pts[1], pts[2], p)
}

// Linear scan for the triangle containing p; None if p is outside the polygon.
#[must_use]
pub fn face_containing(mesh: &PolyMesh, p: Point2<f64>) -> Option<FaceKey> {
    mesh.bounded_faces().find(|&f| face_contains(mesh, f, p))
}

struct Node {
    face: FaceKey,
    parent: Option<usize>,
    children: Vec<usize>,
}

// The dual graph rooted at a chosen triangle. Because the dual of a
// triangulated simple polygon is a tree, skipping the parent is enough to
// prevent revisits. Construction and search are iterative with an explicit
// stack; polygon sleeves get long enough to overflow a call stack otherwise.
pub struct SleeveTree {
    nodes: Vec<Node>,
}

impl SleeveTree {
    #[must_use]
    pub fn build(graph: &DiGraphMap<FaceKey, EdgeKey>, root: FaceKey) -> Self {
        let mut nodes = vec![Node {
            face: root,
            parent: None,
            children: Vec::new(),
        }];
        let mut pending = vec![0_usize];
        while let Some(i) = pending.pop() {
            let face = nodes[i].face;
            let parent_face = nodes[i].parent.map(|p| nodes[p].face);
            for nf in graph.neighbors(face) {
                if Some(nf) == parent_face {
                    continue;
                }
                let child = nodes.len();
                nodes.push(Node {
                    face: nf,
                    parent: Some(i),
                    children: Vec::new(),
                });
                nodes[i].children.push(child);
                pending.push(child);
            }
        }
        Self { nodes }
    }

    #[must_use]
    pub fn root(&self) -> FaceKey {
        self.nodes[0].face
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn faces(&self) -> impl Iterator<Item = FaceKey> + '_ {
        self.nodes.iter().map(|n| n.face)
    }

    // The sleeve from the root triangle to the triangle containing p: depth
    // -first until a containing node is found, then walk the parent chain back.
    // Empty when no triangle contains p.
    #[must_use]
    pub fn path_to_point(&self, mesh: &PolyMesh, p: Point2<f64>) -> Vec<FaceKey> {
        let mut pending = vec![0_usize];
        let mut found = None;
        while let Some(i) = pending.pop() {
            if face_contains(mesh, self.nodes[i].face, p) {
                found = Some(i);
                break;
            }
            pending.extend(self.nodes[i].children.iter().copied());
        }

        let mut path = Vec::new();
        let mut cursor = found;
        while let Some(i) = cursor {
            path.push(self.nodes[i].face);
            cursor = self.nodes[i].parent;
        }
        path.reverse();
        path
    }
}
