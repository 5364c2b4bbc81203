//! Line-quadric intersection (quadratic in `λ`).

use mcsg_kernel_geom::quadratic::eqn_value;
use mcsg_kernel_geom::{Surface, SurfaceOps};
use mcsg_kernel_math::{quadratic_matrix, Vec3};
use mcsg_kernel_poly::solve_quadratic;

use super::sorted_unique;
use crate::{Line, IMAG_TOL};

/// Intersect a line with the quadric `[A,B,C,D,E,F,G,H,J,K]`.
///
/// Substituting `origin + λ dir` gives `a λ^2 + b λ + c` with
/// `a = dᵀQd`, `b = 2 oᵀQd + L.d` and `c` the equation at the origin.
/// A tangent line yields a single parameter.
pub fn intersect_quadric(line: &Line, eqn: &[f64; 10]) -> Vec<f64> {
    let q = quadratic_matrix(eqn);
    let lin = Vec3::new(eqn[6], eqn[7], eqn[8]);
    let d = &line.direction;
    let qd = q * d;
    let a = d.dot(&qd);
    let b = 2.0 * line.origin.coords.dot(&qd) + lin.dot(d);
    let c = eqn_value(eqn, &line.origin);

    let real = solve_quadratic(a, b, c)
        .into_iter()
        .filter(|z| z.im.abs() < IMAG_TOL)
        .map(|z| z.re)
        .collect();
    sorted_unique(real)
}

/// Intersect a line with any surface that has a quadratic form.
///
/// Surfaces without one have no hits here.
pub fn intersect_quadric_surface(line: &Line, surface: &Surface) -> Vec<f64> {
    match surface.base_eqn() {
        Some(eqn) => intersect_quadric(line, &eqn),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use mcsg_kernel_math::Point3;

    fn hits(card: &str, line: &Line) -> Vec<f64> {
        let s: Surface = card.parse().unwrap();
        intersect_quadric_surface(line, &s)
    }

    #[test]
    fn test_sphere_both_signs() {
        let line = Line::new(Point3::origin(), Vec3::x());
        let l = hits("so 5", &line);
        assert_eq!(l.len(), 2);
        assert_abs_diff_eq!(l[0], -5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(l[1], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cylinder_through_axis() {
        let line = Line::new(Point3::new(-10.0, 0.0, 3.0), Vec3::x());
        let l = hits("cz 2", &line);
        assert_eq!(l.len(), 2);
        let mid = line.at(0.5 * (l[0] + l[1]));
        assert_abs_diff_eq!(line.at(l[0]).x, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(line.at(l[1]).x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cylinder_tangent_and_miss() {
        let tangent = Line::new(Point3::new(-10.0, 2.0, 0.0), Vec3::x());
        let l = hits("cz 2", &tangent);
        assert_eq!(l.len(), 1);
        assert_abs_diff_eq!(l[0], 10.0, epsilon = 1e-9);
        let miss = Line::new(Point3::new(-10.0, 3.0, 0.0), Vec3::x());
        assert!(hits("cz 2", &miss).is_empty());
    }

    #[test]
    fn test_parallel_to_cylinder_axis() {
        let inside = Line::new(Point3::new(0.5, 0.0, 0.0), Vec3::z());
        assert!(hits("cz 2", &inside).is_empty());
    }

    #[test]
    fn test_elliptic_and_general() {
        let line = Line::new(Point3::origin(), Vec3::x());
        let l = hits("ez 5 4", &line);
        assert_eq!(l.len(), 2);
        assert_abs_diff_eq!(l[1], 5.0, epsilon = 1e-9);

        let up = Line::new(Point3::new(0.0, 0.0, -7.0), Vec3::z());
        let g = hits("gq 1 1 1 0 0 0 0 0 0 -4", &up);
        assert_eq!(g.len(), 2);
        assert_abs_diff_eq!(up.at(g[0]).z, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(up.at(g[1]).z, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_points_lie_on_surface() {
        let s: Surface = "s 1 2 3 4".parse().unwrap();
        let line = Line::new(Point3::new(-3.0, 1.0, 0.0), Vec3::new(1.0, 0.3, 0.5));
        let l = intersect_quadric_surface(&line, &s);
        assert_eq!(l.len(), 2);
        for lambda in l {
            assert!(s.distance(&line.at(lambda)) < 1e-9);
        }
    }
}
