//! Line-box intersection through the six face planes.

use mcsg_kernel_geom::{MBrect, SurfaceOps};
use mcsg_kernel_math::ZERO_TOL;

use super::{intersect_plane, sorted_unique};
use crate::Line;

/// Intersect a line with a box, keeping face hits that lie on the box.
///
/// A line through an edge or corner reports it once.
pub fn intersect_mbrect(line: &Line, rect: &MBrect) -> Vec<f64> {
    let hits = rect
        .planes()
        .iter()
        .filter_map(|pl| intersect_plane(line, pl))
        .filter(|&l| rect.eqn_value(&line.at(l)) <= ZERO_TOL)
        .collect();
    sorted_unique(hits)
}
