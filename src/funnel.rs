use itertools::Itertools;
use nalgebra::Point2;
use petgraph::graphmap::DiGraphMap;

use crate::geom;
use crate::mesh::{EdgeKey, FaceKey, PolyMesh};

// Portal endpoints along a sleeve of triangles. For each consecutive pair the
// shared diagonal is read off the dual arc; the half-edge bounds the earlier
// triangle, its origin goes to `bot` and its destination to `top`. "Bot" and
// "top" are labels tied to that half-edge, not to geometric orientation.
#[must_use]
pub fn portals(
    mesh: &PolyMesh,
    graph: &DiGraphMap<FaceKey, EdgeKey>,
    sleeve: &[FaceKey],
) -> (Vec<Point2<f64>>, Vec<Point2<f64>>) {
    let mut bot = Vec::new();
    let mut top = Vec::new();
    for (&f1, &f2) in sleeve.iter().tuple_windows() {
        let &e = graph
            .edge_weight(f1, f2)
            .expect("consecutive sleeve triangles share a diagonal");
        bot.push(mesh.position(mesh.root(e)));
        top.push(mesh.position(mesh.dest(e)));
    }
    (bot, top)
}

// Simple stupid funnel: pull the string from `source` to `target` through the
// portal sequence. The output starts at the source, ends at the target, and
// bends only at portal endpoints, which are polygon vertices. Exact when the
// sleeve carries the true shortest path; when a chain stalls against the apex
// the distance tiebreak below can pick the slightly longer side.
#[must_use]
pub fn string_pull(
    bot_portals: &[Point2<f64>],
    top_portals: &[Point2<f64>],
    source: Point2<f64>,
    target: Point2<f64>,
) -> Vec<Point2<f64>> {
    let mut bot = bot_portals.to_vec();
    let mut top = top_portals.to_vec();
    bot.push(target);
    top.push(target);

    let mut path = vec![source];
    let mut apex = source;
    let mut bot_idx = 0;
    let mut top_idx = 0;

    loop {
        if apex == target {
            break;
        }
        if top[top_idx] == target || bot[bot_idx] == target {
            path.push(target);
            break;
        }

        let bot_next = bot[bot_idx + 1];
        let top_next = top[top_idx + 1];
        let mut stuck = true;

        // The next bot portal does not widen the funnel on the bot side.
        if geom::orient(apex, bot[bot_idx], bot_next) >= 0.0 {
            stuck = false;
            if bot[bot_idx] == apex || geom::orient(apex, top[top_idx], bot_next) < 0.0 {
                bot_idx += 1;
            } else {
                // Bot crossed over top: the top cursor becomes the apex, and
                // both cursors restart past the zero-width portals that share
                // it.
                apex = top[top_idx];
                path.push(apex);
                bot_idx = top_idx + leading_run(&top[top_idx..]);
                top_idx = bot_idx + 1;
                continue;
            }
        }

        if geom::orient(apex, top[top_idx], top_next) <= 0.0 {
            stuck = false;
            if top[top_idx] == apex || geom::orient(apex, bot[bot_idx], top_next) > 0.0 {
                top_idx += 1;
            } else {
                apex = bot[bot_idx];
                path.push(apex);
                top_idx = bot_idx + leading_run(&bot[bot_idx..]);
                bot_idx = top_idx + 1;
                continue;
            }
        }

        if stuck {
            // Neither chain can advance, which happens when both cursors sit
            // on the apex. Move along whichever chain currently ends farther
            // from the target.
            if geom::distance(bot[bot_idx], target) > geom::distance(top[top_idx], target) {
                apex = top[top_idx];
                path.push(apex);
                bot_idx = top_idx + leading_run(&top[top_idx..]);
                top_idx = bot_idx + 1;
            } else {
                apex = bot[bot_idx];
                path.push(apex);
                top_idx = bot_idx + leading_run(&bot[bot_idx..]);
                bot_idx = top_idx + 1;
            }
        }
    }

    path
}

// How many elements directly after the first one equal it.
fn leading_run(points: &[Point2<f64>]) -> usize {
    points[1..].iter().take_while(|&&p| p == points[0]).count()
}
