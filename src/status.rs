use nalgebra::Point2;
use ordered_float::OrderedFloat;

use crate::mesh::{EdgeKey, PolyMesh};

// The x-coordinate where half-edge e meets the horizontal sweep line through
// `sweep`. The intersection always exists while e is in the status. A
// horizontal edge reports its trailing (larger) x.
#[must_use]
pub fn sweep_x(mesh: &PolyMesh, e: EdgeKey, sweep: Point2<f64>) -> f64 {
    let orig = mesh.position(mesh.root(e));
    let dest = mesh.position(mesh.dest(e));
    if orig.x == dest.x {
        orig.x
    } else if orig.y == dest.y {
        orig.x.max(dest.x)
    } else {
        (dest.x - orig.x) * (sweep.y - orig.y) / (dest.y - orig.y) + orig.x
    }
}

struct Node {
    edge: EdgeKey,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

// Sweep-line status: the polygon edges currently intersected by the sweep
// line, ordered left to right by `sweep_x`. The key is dynamic, but all
// comparisons made during one event share the same sweep position, and edges
// of a simple polygon never swap order while both are in the status, so a
// plain unbalanced BST stays consistent. No two stored edges compare equal:
// that would mean two polygon edges cross.
#[derive(Default)]
pub struct SweepStatus {
    root: Option<Box<Node>>,
}

impl SweepStatus {
    pub fn insert(&mut self, mesh: &PolyMesh, edge: EdgeKey, sweep: Point2<f64>) {
        let key = OrderedFloat(sweep_x(mesh, edge, sweep));
        self.root = Some(insert_node(self.root.take(), key, edge, mesh, sweep));
    }

    pub fn remove(&mut self, mesh: &PolyMesh, edge: EdgeKey, sweep: Point2<f64>) {
        let key = OrderedFloat(sweep_x(mesh, edge, sweep));
        self.root = remove_node(self.root.take(), key, mesh, sweep);
    }

    // The stored edge immediately to the left of `p`: the one with the largest
    // key still <= p.x. A point lying on an edge returns that edge.
    #[must_use]
    pub fn left_of(&self, mesh: &PolyMesh, p: Point2<f64>) -> Option<EdgeKey> {
        left_of_node(self.root.as_deref(), mesh, p)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

fn insert_node(
    node: Option<Box<Node>>,
    key: OrderedFloat<f64>,
    edge: EdgeKey,
    mesh: &PolyMesh,
    sweep: Point2<f64>,
) -> Box<Node> {
    match node {
        None => Box::new(Node {
            edge,
            left: None,
            right: None,
        }),
        Some(mut n) => {
            if key > OrderedFloat(sweep_x(mesh, n.edge, sweep)) {
                n.right = Some(insert_node(n.right.take(), key, edge, mesh, sweep));
            } else {
                n.left = Some(insert_node(n.left.take(), key, edge, mesh, sweep));
            }
            n
        }
    }
}

fn remove_node(
    node: Option<Box<Node>>,
    key: OrderedFloat<f64>,
    mesh: &PolyMesh,
    sweep: Point2<f64>,
) -> Option<Box<Node>> {
    let mut n = node?;
    let node_key = OrderedFloat(sweep_x(mesh, n.edge, sweep));
    if key > node_key {
        n.right = remove_node(n.right.take(), key, mesh, sweep);
        Some(n)
    } else if key < node_key {
        n.left = remove_node(n.left.take(), key, mesh, sweep);
        Some(n)
    } else {
        match (n.left.take(), n.right.take()) {
            (None, right) => right,
            (left, None) => left,
            (left, Some(right)) => {
                // Two children: replace with the inorder successor and delete
                // it from the right subtree.
                let succ = min_edge(&right);
                let succ_key = OrderedFloat(sweep_x(mesh, succ, sweep));
                n.edge = succ;
                n.left = left;
                n.right = remove_node(Some(right), succ_key, mesh, sweep);
                Some(n)
            }
        }
    }
}

fn min_edge(node: &Node) -> EdgeKey {
    node.left.as_ref().map_or(node.edge, |l| min_edge(l))
}

fn left_of_node(node: Option<&Node>, mesh: &PolyMesh, p: Point2<f64>) -> Option<EdgeKey> {
    let n = node?;
    let key = sweep_x(mesh, n.edge, p);
    if p.x == key {
        return Some(n.edge);
    }
    if p.x > key {
        left_of_node(n.right.as_deref(), mesh, p).or(Some(n.edge))
    } else {
        left_of_node(n.left.as_deref(), mesh, p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Edge, EdgeKey, Vert};

    // A free-standing twin pair, enough structure for the status to key on.
    fn seg(mesh: &mut PolyMesh, o: (f64, f64), d: (f64, f64)) -> EdgeKey {
        let u = mesh.verts.insert(Vert {
            position: Point2::new(o.0, o.1),
            rep: EdgeKey::default(),
        });
        let v = mesh.verts.insert(Vert {
            position: Point2::new(d.0, d.1),
            rep: EdgeKey::default(),
        });
        let e = mesh.edges.insert(Edge::new(u));
        let t = mesh.edges.insert(Edge::new(v));
        mesh.edges[e].twin = t;
        mesh.edges[t].twin = e;
        e
    }

    struct Fixture {
        mesh: PolyMesh,
        h: Vec<EdgeKey>,
    }

    // Twelve downward segments spread across the plane, h[0] leftmost-ish.
    fn fixture() -> Fixture {
        let mut mesh = PolyMesh::default();
        let h = vec![
            seg(&mut mesh, (22.33, 21.05), (21.16, 15.65)),
            seg(&mut mesh, (21.56, 25.07), (38.21, 1.50)),
            seg(&mut mesh, (29.21, 19.56), (28.73, 16.02)),
            seg(&mut mesh, (33.38, 22.27), (32.67, 10.19)),
            seg(&mut mesh, (34.95, 23.33), (33.41, 12.27)),
            seg(&mut mesh, (38.27297, 21.56243), (37.07312, 4.82169)),
            seg(&mut mesh, (22.17378, 23.18687), (19.12567, 12.12181)),
            seg(&mut mesh, (23.50994, 20.76509), (21.5057, 10.91092)),
            seg(&mut mesh, (30.50663, 19.43235), (32.0, 16.0)),
            seg(&mut mesh, (35.53536, 21.3079), (34.24096, 8.82317)),
            seg(&mut mesh, (37.20556, 21.26614), (36.28695, 9.03194)),
            seg(&mut mesh, (39.08454, 19.92999), (38.33295, 8.19685)),
        ];
        Fixture { mesh, h }
    }

    fn origin(mesh: &PolyMesh, e: EdgeKey) -> Point2<f64> {
        mesh.position(mesh.root(e))
    }

    fn lower_end(mesh: &PolyMesh, e: EdgeKey) -> Point2<f64> {
        mesh.position(mesh.dest(e))
    }

    #[test]
    fn sweep_x_interpolates() {
        let mut mesh = PolyMesh::default();
        let slanted = seg(&mut mesh, (0.0, 4.0), (4.0, 0.0));
        assert_eq!(sweep_x(&mesh, slanted, Point2::new(0.0, 2.0)), 2.0);

        let vertical = seg(&mut mesh, (1.0, 4.0), (1.0, 0.0));
        assert_eq!(sweep_x(&mesh, vertical, Point2::new(0.0, 2.0)), 1.0);

        // Horizontal edges report their trailing end.
        let horizontal = seg(&mut mesh, (2.0, 3.0), (5.0, 3.0));
        assert_eq!(sweep_x(&mesh, horizontal, Point2::new(0.0, 3.0)), 5.0);
    }

    #[test]
    fn remove_keeps_left_queries_consistent() {
        let Fixture { mesh, h } = fixture();
        let mut status = SweepStatus::default();
        for &e in &[h[1], h[4], h[3], h[5], h[0], h[2]] {
            let at = origin(&mesh, e);
            status.insert(&mesh, e, at);
        }

        let q = Point2::new(31.27, 18.99);
        assert_eq!(status.left_of(&mesh, q), Some(h[2]));
        status.remove(&mesh, h[2], lower_end(&mesh, h[2]));
        assert_eq!(status.left_of(&mesh, q), Some(h[1]));

        status.remove(&mesh, h[0], lower_end(&mesh, h[0]));

        let q = Point2::new(35.95, 18.81);
        assert_eq!(status.left_of(&mesh, q), Some(h[4]));
        status.remove(&mesh, h[4], lower_end(&mesh, h[4]));
        assert_eq!(status.left_of(&mesh, q), Some(h[3]));
        status.remove(&mesh, h[3], lower_end(&mesh, h[3]));
        assert_eq!(status.left_of(&mesh, q), Some(h[1]));

        let q = Point2::new(40.44412, 18.19142);
        assert_eq!(status.left_of(&mesh, q), Some(h[5]));
        status.remove(&mesh, h[5], lower_end(&mesh, h[5]));
        assert_eq!(status.left_of(&mesh, q), Some(h[1]));

        status.remove(&mesh, h[1], lower_end(&mesh, h[1]));
        assert!(status.is_empty());
    }

    #[test]
    fn left_of_between_and_on_edges() {
        let Fixture { mesh, h } = fixture();
        let mut status = SweepStatus::default();
        for &i in &[1, 4, 3, 5, 0, 2, 6, 8, 7, 10, 9, 11] {
            let at = origin(&mesh, h[i]);
            status.insert(&mesh, h[i], at);
        }

        // Points strictly between neighbouring edges.
        let between = [
            ((40.44, 18.19), 11),
            ((35.95, 18.81), 9),
            ((33.70, 19.56), 3),
            ((31.27, 18.99), 8),
            ((27.58, 18.619), 1),
            ((24.10, 18.39), 7),
            ((22.38639, 19.17972), 0),
        ];
        for ((x, y), expect) in between {
            assert_eq!(status.left_of(&mesh, Point2::new(x, y)), Some(h[expect]));
        }

        // A point on an edge reports that edge, at either endpoint.
        for &e in &h {
            assert_eq!(status.left_of(&mesh, origin(&mesh, e)), Some(e));
            assert_eq!(status.left_of(&mesh, lower_end(&mesh, e)), Some(e));
        }
    }
}
