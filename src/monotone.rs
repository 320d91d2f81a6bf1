use std::cmp::Reverse;

use nalgebra::Point2;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;

use crate::geom;
use crate::mesh::{EdgeKey, PolyMesh, VertKey};
use crate::status::SweepStatus;

// The five vertex classes of the monotone-partition sweep. "Above" uses the
// lexicographic order of geom::above throughout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertClass {
    Start,
    Split,
    End,
    Merge,
    Regular,
}

// Classify the middle vertex b given its boundary neighbours a (before) and
// c (after). Both angle comparisons are strict, so an interior angle of
// exactly 180 degrees lands in Regular.
#[must_use]
pub fn classify(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> VertClass {
    let angle = geom::ccw_angle(a, b, c);
    let above_both = geom::above(b, a) && geom::above(b, c);
    let below_both = !geom::above(b, a) && !geom::above(b, c);
    if angle < 180.0 && above_both {
        VertClass::Start
    } else if angle > 180.0 && above_both {
        VertClass::Split
    } else if angle < 180.0 && below_both {
        VertClass::End
    } else if angle > 180.0 && below_both {
        VertClass::Merge
    } else {
        VertClass::Regular
    }
}

// Classify every vertex of the (still undivided) polygon by walking the
// boundary of its single bounded face.
#[must_use]
pub fn classify_vertices(mesh: &PolyMesh) -> SecondaryMap<VertKey, VertClass> {
    let f = mesh
        .bounded_faces()
        .next()
        .expect("polygon mesh has a bounded face");
    let mut classes = SecondaryMap::new();
    for e in mesh.face_edges(f) {
        let b = mesh.root(e);
        let a = mesh.root(mesh.prev(e));
        let c = mesh.root(mesh.next(e));
        classes.insert(
            b,
            classify(mesh.position(a), mesh.position(b), mesh.position(c)),
        );
    }
    classes
}

// Partition the polygon into y-monotone faces by inserting diagonals at every
// split and merge vertex (de Berg chapter 3). The mesh must hold a freshly
// built counter-clockwise polygon. Returns the vertex classification.
pub fn make_monotone(mesh: &mut PolyMesh) -> SecondaryMap<VertKey, VertClass> {
    let mut sweep = Sweep {
        status: SweepStatus::default(),
        helper: SecondaryMap::new(),
        classes: classify_vertices(mesh),
    };

    // Top to bottom; the leftmost of a horizontal run goes first.
    let mut events = mesh.ring().to_vec();
    events.sort_by_key(|&v| {
        let p = mesh.position(v);
        (Reverse(OrderedFloat(p.y)), OrderedFloat(p.x))
    });

    for v in events {
        match sweep.classes[v] {
            VertClass::Start => sweep.start(mesh, v),
            VertClass::Split => sweep.split(mesh, v),
            VertClass::End => sweep.end(mesh, v),
            VertClass::Merge => sweep.merge(mesh, v),
            VertClass::Regular => sweep.regular(mesh, v),
        }
    }

    sweep.classes
}

// The incoming interior half-edge e_{i-1} of v. The rep's prev would be wrong
// here: diagonal insertions resplice prev pointers, while twin.next.twin of
// the rep keeps pointing at the original polygon edge.
fn incoming(mesh: &PolyMesh, v: VertKey) -> EdgeKey {
    mesh.twin(mesh.next(mesh.twin(mesh.rep(v))))
}

// Sweep state: the status BST plus, for each status edge, its helper, the
// lowest vertex above the sweep line that sees the edge horizontally through
// the interior. Bundled so the five handlers can be exercised in isolation.
struct Sweep {
    status: SweepStatus,
    helper: SecondaryMap<EdgeKey, VertKey>,
    classes: SecondaryMap<VertKey, VertClass>,
}

impl Sweep {
    fn start(&mut self, mesh: &mut PolyMesh, v: VertKey) {
        let e = mesh.rep(v);
        self.status.insert(mesh, e, mesh.position(v));
        self.helper.insert(e, v);
    }

    fn end(&mut self, mesh: &mut PolyMesh, v: VertKey) {
        let prev = incoming(mesh, v);
        self.cut_if_merge_helper(mesh, v, prev);
        self.status.remove(mesh, prev, mesh.position(v));
    }

    fn split(&mut self, mesh: &mut PolyMesh, v: VertKey) {
        let p = mesh.position(v);
        let e_j = self
            .status
            .left_of(mesh, p)
            .expect("split vertex has no edge to its left");
        let h = self.helper[e_j];
        let f = mesh.face(e_j);
        mesh.insert_diagonal(v, h, f);
        self.helper.insert(e_j, v);

        let e = mesh.rep(v);
        self.status.insert(mesh, e, p);
        self.helper.insert(e, v);
    }

    fn merge(&mut self, mesh: &mut PolyMesh, v: VertKey) {
        let prev = incoming(mesh, v);
        self.cut_if_merge_helper(mesh, v, prev);
        self.status.remove(mesh, prev, mesh.position(v));

        let e_j = self
            .status
            .left_of(mesh, mesh.position(v))
            .expect("merge vertex has no edge to its left");
        self.cut_if_merge_helper(mesh, v, e_j);
        self.helper.insert(e_j, v);
    }

    fn regular(&mut self, mesh: &mut PolyMesh, v: VertKey) {
        let e = mesh.rep(v);
        let prev = incoming(mesh, v);
        let v_prev = mesh.position(mesh.root(prev));
        let v_next = mesh.position(mesh.dest(e));

        // The interior lies to the right of v exactly when the predecessor
        // vertex is above the successor.
        if geom::above(v_prev, v_next) {
            self.cut_if_merge_helper(mesh, v, prev);
            let p = mesh.position(v);
            self.status.remove(mesh, prev, p);
            self.status.insert(mesh, e, p);
            self.helper.insert(e, v);
        } else {
            let e_j = self
                .status
                .left_of(mesh, mesh.position(v))
                .expect("regular vertex has no edge to its left");
            self.cut_if_merge_helper(mesh, v, e_j);
            self.helper.insert(e_j, v);
        }
    }

    // If the helper of e is a merge vertex, connect v to it with a diagonal
    // through e's current incident face.
    fn cut_if_merge_helper(&mut self, mesh: &mut PolyMesh, v: VertKey, e: EdgeKey) {
        let h = self.helper[e];
        if self.classes[h] == VertClass::Merge {
            let f = mesh.face(e);
            mesh.insert_diagonal(v, h, f);
        }
    }
}
