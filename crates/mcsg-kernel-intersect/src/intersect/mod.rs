//! Line-surface intersection algorithms.
//!
//! Each surface kind has a dedicated intersector returning the line
//! parameters `λ` of its hits, sorted ascending with coincident hits merged.

mod arbpoly;
mod cone;
mod cylcan;
mod mbrect;
mod plane;
mod quadric;

pub use arbpoly::intersect_arb_poly;
pub use cone::intersect_cone;
pub use cylcan::intersect_cyl_can;
pub use mbrect::intersect_mbrect;
pub use plane::intersect_plane;
pub use quadric::{intersect_quadric, intersect_quadric_surface};

use mcsg_kernel_geom::Surface;
use mcsg_kernel_math::ZERO_TOL;

use crate::Line;

/// Intersect a line with a surface, returning every `λ` in increasing order.
///
/// This dispatches on the surface variant. Invalid lines and null surfaces
/// have no hits.
pub fn intersect_surface(line: &Line, surface: &Surface) -> Vec<f64> {
    if !line.is_valid() {
        return Vec::new();
    }
    match surface {
        Surface::Plane(p) => intersect_plane(line, p).into_iter().collect(),
        Surface::Sphere(_) | Surface::Cylinder(_) | Surface::EllipticCyl(_) | Surface::General(_) => {
            intersect_quadric_surface(line, surface)
        }
        Surface::Cone(c) => intersect_cone(line, c),
        Surface::MBrect(b) => intersect_mbrect(line, b),
        Surface::CylCan(c) => intersect_cyl_can(line, c),
        Surface::ArbPoly(a) => intersect_arb_poly(line, a),
        Surface::Null(_) => Vec::new(),
    }
}

/// Sort ascending and merge parameters closer than the zero tolerance.
pub(crate) fn sorted_unique(mut lambdas: Vec<f64>) -> Vec<f64> {
    lambdas.sort_by(f64::total_cmp);
    lambdas.dedup_by(|b, a| (*b - *a).abs() <= ZERO_TOL);
    lambdas
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcsg_kernel_math::{Point3, Vec3};

    #[test]
    fn test_sorted_unique() {
        let v = sorted_unique(vec![3.0, -1.0, 3.0 + 1e-9, 0.5]);
        assert_eq!(v, vec![-1.0, 0.5, 3.0]);
    }

    #[test]
    fn test_dispatch_by_kind() {
        let line = Line::new(Point3::new(-10.0, 0.0, 0.0), Vec3::x());
        let cases = [
            ("px 3", 1),
            ("so 5", 2),
            ("cy 2", 2),
            ("ex 4 3", 0),
            ("rpp -1 1 -1 1 -1 1", 2),
            ("rcc -2 0 0 4 0 0 1", 2),
        ];
        for (card, want) in cases {
            let s: Surface = card.parse().unwrap();
            assert_eq!(intersect_surface(&line, &s).len(), want, "{card}");
        }
        assert!(intersect_surface(&line, &Surface::Null(Default::default())).is_empty());
    }
}
