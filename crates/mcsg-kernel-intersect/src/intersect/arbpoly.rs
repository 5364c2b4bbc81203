//! Line-polyhedron intersection, one face at a time.

use mcsg_kernel_geom::ArbPoly;
use mcsg_kernel_math::ZERO_TOL;

use super::{intersect_plane, sorted_unique};
use crate::Line;

/// Intersect a line with a convex polyhedron.
///
/// Each face plane is hit in turn and the hit kept when it lies inside,
/// on an edge of, or on a vertex of that face's loop.
pub fn intersect_arb_poly(line: &Line, arb: &ArbPoly) -> Vec<f64> {
    let hits = arb
        .planes()
        .iter()
        .enumerate()
        .filter_map(|(i, pl)| intersect_plane(line, pl).map(|l| (i, l)))
        .filter(|&(i, l)| arb.face_position(i, &line.at(l), ZERO_TOL).is_inside())
        .map(|(_, l)| l)
        .collect();
    sorted_unique(hits)
}
