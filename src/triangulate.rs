use std::cmp::Reverse;
use std::collections::HashSet;

use itertools::Itertools;
use nalgebra::Point2;
use ordered_float::OrderedFloat;

use crate::geom;
use crate::mesh::{FaceKey, MeshError, PolyMesh, VertKey, VertMap};
use crate::monotone;

// Triangulate a counter-clockwise polygon ring: build the DCEL, partition it
// into y-monotone faces, then triangulate each face. The resulting mesh has
// n - 2 triangles.
pub fn triangulate_ring(ring: &[Point2<f64>]) -> Result<(PolyMesh, VertMap), MeshError> {
    let (mut mesh, map) = PolyMesh::from_ring(ring)?;
    monotone::make_monotone(&mut mesh);
    let faces = mesh.bounded_faces().collect_vec();
    for f in faces {
        triangulate_monotone_face(&mut mesh, f);
    }
    Ok((mesh, map))
}

// Triangulate one y-monotone face with the stack sweep of de Berg chapter 3.3.
// The face to split is tracked incrementally from the returned diagonal of the
// previous insertion; only the rare residual diagonals at the bottom vertex
// fall back to a brute-force common-face search.
pub fn triangulate_monotone_face(mesh: &mut PolyMesh, f: FaceKey) {
    let mut vertices = mesh.corners(f);
    vertices.sort_by_key(|&v| {
        let p = mesh.position(v);
        (Reverse(OrderedFloat(p.y)), OrderedFloat(p.x))
    });
    let n = vertices.len();
    let top = vertices[0];
    let bot = vertices[n - 1];
    let (left_chain, right_chain) = chains(mesh, f, top, bot);

    let mut stack = vec![vertices[0], vertices[1]];

    for j in 2..n - 1 {
        let v_j = vertices[j];
        let top_of_stack = *stack.last().expect("stack never empties mid-sweep");

        if left_chain.contains(&v_j) && right_chain.contains(&top_of_stack) {
            // Opposite chains, v_j on the left. The bottom of the stack is
            // already connected to v_j; the face bounded by that edge is the
            // one the first diagonal splits.
            let mut face = mesh.face(mesh.edge_between(stack[0], v_j));
            while let Some(u) = stack.pop() {
                if !stack.is_empty() {
                    let d = mesh.insert_diagonal(v_j, u, face);
                    face = mesh.face(d);
                }
            }
            stack.push(vertices[j - 1]);
            stack.push(v_j);
        } else if right_chain.contains(&v_j) && left_chain.contains(&top_of_stack) {
            // Opposite chains, v_j on the right: the remaining funnel face is
            // on the twin side of each inserted diagonal.
            let mut face = mesh.face(mesh.edge_between(v_j, stack[0]));
            while let Some(u) = stack.pop() {
                if !stack.is_empty() {
                    let d = mesh.insert_diagonal(v_j, u, face);
                    face = mesh.face(mesh.twin(d));
                }
            }
            stack.push(vertices[j - 1]);
            stack.push(v_j);
        } else if right_chain.contains(&v_j) && right_chain.contains(&top_of_stack) {
            // Same chain, right: v_j already connects to the stack top.
            let mut u = stack.pop().expect("stack holds at least two vertices");
            let mut face = mesh.face(mesh.edge_between(v_j, u));
            while let Some(&t) = stack.last() {
                if geom::orient(mesh.position(v_j), mesh.position(u), mesh.position(t)) > 0.0 {
                    stack.pop();
                    u = t;
                    let d = mesh.insert_diagonal(v_j, u, face);
                    face = mesh.face(d);
                } else {
                    break;
                }
            }
            stack.push(u);
            stack.push(v_j);
        } else {
            // Same chain, left: mirrored orientation test and twin side.
            let mut u = stack.pop().expect("stack holds at least two vertices");
            let mut face = mesh.face(mesh.edge_between(u, v_j));
            while let Some(&t) = stack.last() {
                if geom::orient(mesh.position(v_j), mesh.position(u), mesh.position(t)) <= 0.0 {
                    stack.pop();
                    u = t;
                    let d = mesh.insert_diagonal(v_j, u, face);
                    face = mesh.face(mesh.twin(d));
                } else {
                    break;
                }
            }
            stack.push(u);
            stack.push(v_j);
        }
    }

    // The bottom vertex connects to every leftover stack vertex except the two
    // ends. The funnel geometry gives no cheap handle on the face to split
    // here, so each diagonal pays for a common-face search.
    if stack.len() > 2 {
        for &u in stack[1..stack.len() - 1].iter().rev() {
            let cf = mesh.common_face(bot, u);
            mesh.insert_diagonal(bot, u, cf);
        }
    }
}

// Split the boundary of a y-monotone face into its left and right chains,
// walking counter-clockwise from the top vertex. Top and bottom vertices
// belong to both chains.
fn chains(
    mesh: &PolyMesh,
    f: FaceKey,
    top: VertKey,
    bot: VertKey,
) -> (HashSet<VertKey>, HashSet<VertKey>) {
    let mut left: HashSet<VertKey> = HashSet::from([top, bot]);
    let mut right = left.clone();

    let top_h = mesh
        .face_edges(f)
        .into_iter()
        .find(|&e| mesh.root(e) == top)
        .expect("top vertex lies on the face boundary");

    let mut h = top_h;
    let mut on_left = true;
    loop {
        if on_left {
            left.insert(mesh.root(h));
        } else {
            right.insert(mesh.root(h));
        }
        h = mesh.next(h);
        if mesh.root(h) == bot {
            on_left = false;
        }
        if h == top_h {
            break;
        }
    }

    (left, right)
}
