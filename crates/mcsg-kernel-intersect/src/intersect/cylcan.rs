//! Line-can intersection: side wall plus the two end caps.

use mcsg_kernel_geom::{CylCan, SurfaceOps};
use mcsg_kernel_math::ZERO_TOL;

use super::{intersect_plane, intersect_quadric, sorted_unique};
use crate::Line;

/// Intersect a line with a finite cylinder.
pub fn intersect_cyl_can(line: &Line, can: &CylCan) -> Vec<f64> {
    let mut hits = Vec::new();
    if let Some(eqn) = can.side_wall().base_eqn() {
        hits.extend(intersect_quadric(line, &eqn).into_iter().filter(|&l| {
            let (h, _) = can.local(&line.at(l));
            h >= -ZERO_TOL && h <= can.height() + ZERO_TOL
        }));
    }
    for cap in can.caps().iter() {
        if let Some(l) = intersect_plane(line, cap) {
            let (_, rho) = can.local(&line.at(l));
            if rho <= can.radius() + ZERO_TOL {
                hits.push(l);
            }
        }
    }
    sorted_unique(hits)
}
