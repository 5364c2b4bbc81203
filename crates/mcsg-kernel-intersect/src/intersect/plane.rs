//! Line-plane intersection (closed-form).

use mcsg_kernel_geom::Plane;
use mcsg_kernel_math::PARALLEL_TOL;

use crate::Line;

/// Intersect a line with a plane.
///
/// Returns the line parameter of the hit, or `None` if the line is
/// parallel to the plane.
pub fn intersect_plane(line: &Line, plane: &Plane) -> Option<f64> {
    let normal = plane.normal();
    let denom = line.direction.dot(normal);
    if denom.abs() < PARALLEL_TOL {
        return None;
    }
    Some((plane.dist() - normal.dot(&line.origin.coords)) / denom)
}
