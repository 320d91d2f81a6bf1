use std::collections::HashSet;

use bimap::BiHashMap;
use itertools::Itertools;
use nalgebra::Point2;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

new_key_type! {
    pub struct VertKey;
    pub struct EdgeKey;
    pub struct FaceKey;
}

// Maps input ring indices to vertex keys and back.
pub type VertMap = BiHashMap<usize, VertKey>;

#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("polygon ring needs at least 3 vertices, got {0}")]
    RingTooShort(usize),
    #[error("polygon ring repeats the vertex ({0}, {1})")]
    DuplicateVertex(f64, f64),
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Vert {
    pub position: Point2<f64>,
    // The outgoing half-edge that bounds the polygon interior, not an arbitrary
    // one. Assigned at build time and never reassigned afterwards; the star
    // walks in `outgoing_bounding` and `edge_between` rely on it.
    pub rep: EdgeKey,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub root: VertKey,
    pub twin: EdgeKey,
    pub next: EdgeKey,
    pub prev: EdgeKey,
    pub face: FaceKey,
}

impl Edge {
    pub(crate) fn new(root: VertKey) -> Self {
        Self {
            root,
            twin: EdgeKey::default(),
            next: EdgeKey::default(),
            prev: EdgeKey::default(),
            face: FaceKey::default(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Face {
    // Some half-edge on the outer boundary; None for the unbounded face.
    pub outer: Option<EdgeKey>,
    // One half-edge per hole boundary. Only the unbounded face has one here,
    // and exactly one: the polygon itself, seen from outside.
    pub inner: Vec<EdgeKey>,
}

// A doubly connected edge list for a simple polygon and its refinements.
// Vertices and half-edges are only ever added; faces are removed and replaced
// whenever a diagonal splits one, which slotmap makes O(1).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PolyMesh {
    pub verts: SlotMap<VertKey, Vert>,
    pub edges: SlotMap<EdgeKey, Edge>,
    pub faces: SlotMap<FaceKey, Face>,
    ring: Vec<VertKey>,
}

impl PolyMesh {
    // Build the DCEL of a counter-clockwise polygon ring (no repeated closing
    // vertex). Each consecutive pair of vertices gets a twin pair of half-edges,
    // the earlier of the two bounding the interior. Returns the mesh together
    // with a map from ring index to vertex key.
    pub fn from_ring(ring: &[Point2<f64>]) -> Result<(Self, VertMap), MeshError> {
        if ring.len() < 3 {
            return Err(MeshError::RingTooShort(ring.len()));
        }
        let mut seen = HashSet::new();
        for p in ring {
            if !seen.insert((OrderedFloat(p.x), OrderedFloat(p.y))) {
                return Err(MeshError::DuplicateVertex(p.x, p.y));
            }
        }

        let mut mesh = Self::default();
        let mut map = VertMap::new();
        for (i, &position) in ring.iter().enumerate() {
            let v = mesh.verts.insert(Vert {
                position,
                rep: EdgeKey::default(),
            });
            mesh.ring.push(v);
            map.insert(i, v);
        }

        // Twin half-edges per ring segment; the vertex rep is the interior one.
        let mut interior = Vec::with_capacity(ring.len());
        for (a, b) in mesh.ring.clone().into_iter().circular_tuple_windows() {
            let h1 = mesh.edges.insert(Edge::new(a));
            let h2 = mesh.edges.insert(Edge::new(b));
            mesh.edges[h1].twin = h2;
            mesh.edges[h2].twin = h1;
            mesh.verts[a].rep = h1;
            interior.push(h1);
        }

        // Link next/prev. The interior successor of h1 is the rep of its
        // destination vertex; the exterior chain mirrors it through the twins.
        for &h1 in &interior {
            let h2 = mesh.edges[h1].twin;
            let h1_next = mesh.verts[mesh.edges[h2].root].rep;
            let h2_prev = mesh.edges[h1_next].twin;
            mesh.edges[h1].next = h1_next;
            mesh.edges[h1_next].prev = h1;
            mesh.edges[h2].prev = h2_prev;
            mesh.edges[h2_prev].next = h2;
        }

        let exterior_start = mesh.edges[interior[0]].twin;
        let unbounded = mesh.faces.insert(Face {
            outer: None,
            inner: vec![exterior_start],
        });
        mesh.relabel_cycle(exterior_start, unbounded);
        let bounded = mesh.faces.insert(Face {
            outer: Some(interior[0]),
            inner: vec![],
        });
        mesh.relabel_cycle(interior[0], bounded);

        Ok((mesh, map))
    }

    // Insert the diagonal u-v into the bounded face f, splitting it in two.
    // Preconditions (fatal if violated): u and v lie on the boundary of f and
    // the open segment u-v is strictly interior to f. Returns the new half-edge
    // from u to v.
    pub fn insert_diagonal(&mut self, u: VertKey, v: VertKey, f: FaceKey) -> EdgeKey {
        let h1 = self.outgoing_bounding(u, f);
        let h2 = self.outgoing_bounding(v, f);

        let e1 = self.edges.insert(Edge::new(u));
        let e2 = self.edges.insert(Edge::new(v));
        self.edges[e1].twin = e2;
        self.edges[e2].twin = e1;

        // Splice the diagonal into both boundary chains.
        let h1_prev = self.edges[h1].prev;
        let h2_prev = self.edges[h2].prev;
        self.edges[e1].next = h2;
        self.edges[e1].prev = h1_prev;
        self.edges[e2].next = h1;
        self.edges[e2].prev = h2_prev;
        self.edges[h1_prev].next = e1;
        self.edges[h1].prev = e2;
        self.edges[h2_prev].next = e2;
        self.edges[h2].prev = e1;

        // Replace the split face with the two halves.
        self.faces.remove(f);
        let f1 = self.faces.insert(Face {
            outer: Some(e1),
            inner: vec![],
        });
        let f2 = self.faces.insert(Face {
            outer: Some(e2),
            inner: vec![],
        });
        self.relabel_cycle(e1, f1);
        self.relabel_cycle(e2, f2);

        e1
    }

    fn relabel_cycle(&mut self, start: EdgeKey, f: FaceKey) {
        let mut h = start;
        loop {
            self.edges[h].face = f;
            h = self.edges[h].next;
            if h == start {
                break;
            }
        }
    }

    // The half-edge with origin v that bounds face f. Walks the star of v via
    // prev.twin; terminates because the star is finite and v lies on f.
    #[must_use]
    pub fn outgoing_bounding(&self, v: VertKey, f: FaceKey) -> EdgeKey {
        let mut h = self.verts[v].rep;
        while self.edges[h].face != f {
            h = self.edges[self.edges[h].prev].twin;
        }
        h
    }

    // The half-edge from u to v; u and v must be connected.
    #[must_use]
    pub fn edge_between(&self, u: VertKey, v: VertKey) -> EdgeKey {
        let mut h = self.verts[u].rep;
        while self.dest(h) != v {
            h = self.edges[self.edges[h].prev].twin;
        }
        h
    }

    // All half-edges with origin v, in star order starting from the rep.
    #[must_use]
    pub fn outgoing(&self, v: VertKey) -> Vec<EdgeKey> {
        let start = self.verts[v].rep;
        let mut result = vec![start];
        let mut h = self.edges[self.edges[start].prev].twin;
        while h != start {
            result.push(h);
            h = self.edges[self.edges[h].prev].twin;
        }
        result
    }

    // The single bounded face whose boundary holds both u and v. Used for the
    // rare residual diagonals of the triangulation stack, where the face to
    // split cannot be tracked incrementally. Fatal if no such face exists.
    #[must_use]
    pub fn common_face(&self, u: VertKey, v: VertKey) -> FaceKey {
        let u_faces: HashSet<FaceKey> =
            self.outgoing(u).iter().map(|&h| self.edges[h].face).collect();
        self.outgoing(v)
            .iter()
            .map(|&h| self.edges[h].face)
            .find(|&f| u_faces.contains(&f) && self.faces[f].outer.is_some())
            .expect("diagonal endpoints share no bounded face")
    }

    // Boundary half-edges of a bounded face, in counter-clockwise order.
    #[must_use]
    pub fn face_edges(&self, f: FaceKey) -> Vec<EdgeKey> {
        let start = self.faces[f].outer.expect("face is unbounded");
        let mut result = vec![start];
        let mut h = self.edges[start].next;
        while h != start {
            result.push(h);
            h = self.edges[h].next;
        }
        result
    }

    #[must_use]
    pub fn corners(&self, f: FaceKey) -> Vec<VertKey> {
        self.face_edges(f).iter().map(|&h| self.edges[h].root).collect()
    }

    #[must_use]
    pub fn face_points(&self, f: FaceKey) -> Vec<Point2<f64>> {
        self.corners(f).iter().map(|&v| self.position(v)).collect()
    }

    pub fn bounded_faces(&self) -> impl Iterator<Item = FaceKey> + '_ {
        self.faces
            .iter()
            .filter(|(_, face)| face.outer.is_some())
            .map(|(k, _)| k)
    }

    #[must_use]
    pub fn unbounded_face(&self) -> FaceKey {
        self.faces
            .iter()
            .find(|(_, face)| face.outer.is_none())
            .map(|(k, _)| k)
            .expect("mesh has no unbounded face")
    }

    // Input ring vertices in their original counter-clockwise order.
    #[must_use]
    pub fn ring(&self) -> &[VertKey] {
        &self.ring
    }

    #[must_use]
    pub fn position(&self, v: VertKey) -> Point2<f64> {
        self.verts[v].position
    }

    #[must_use]
    pub fn rep(&self, v: VertKey) -> EdgeKey {
        self.verts[v].rep
    }

    #[must_use]
    pub fn root(&self, e: EdgeKey) -> VertKey {
        self.edges[e].root
    }

    #[must_use]
    pub fn dest(&self, e: EdgeKey) -> VertKey {
        self.edges[self.edges[e].twin].root
    }

    #[must_use]
    pub fn endpoints(&self, e: EdgeKey) -> (VertKey, VertKey) {
        (self.root(e), self.dest(e))
    }

    #[must_use]
    pub fn twin(&self, e: EdgeKey) -> EdgeKey {
        self.edges[e].twin
    }

    #[must_use]
    pub fn next(&self, e: EdgeKey) -> EdgeKey {
        self.edges[e].next
    }

    #[must_use]
    pub fn prev(&self, e: EdgeKey) -> EdgeKey {
        self.edges[e].prev
    }

    #[must_use]
    pub fn face(&self, e: EdgeKey) -> FaceKey {
        self.edges[e].face
    }

    #[must_use]
    pub fn nr_verts(&self) -> usize {
        self.verts.len()
    }

    #[must_use]
    pub fn nr_edges(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn nr_faces(&self) -> usize {
        self.faces.len()
    }
}
