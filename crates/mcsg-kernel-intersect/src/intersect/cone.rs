//! Line-cone intersection with nappe selection.

use mcsg_kernel_geom::{Cone, SurfaceOps};

use super::quadric::intersect_quadric;
use crate::Line;

/// Intersect a line with a cone.
///
/// Roots of the double-cone quadric are kept only on the nappe selected by
/// the cone's cut flag; with no flag both nappes count.
pub fn intersect_cone(line: &Line, cone: &Cone) -> Vec<f64> {
    let Some(eqn) = cone.base_eqn() else {
        return Vec::new();
    };
    intersect_quadric(line, &eqn)
        .into_iter()
        .filter(|&l| cone.on_kept_nappe((line.at(l) - cone.centre()).dot(cone.normal())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use mcsg_kernel_geom::Surface;
    use mcsg_kernel_math::{Point3, Vec3};

    fn cone(card: &str) -> Cone {
        match card.parse::<Surface>().unwrap() {
            Surface::Cone(c) => c,
            other => panic!("expected a cone, got {:?}", other.kind()),
        }
    }

    /// Parallel to the axis, crossing both nappes at y = -1 and y = 3.
    fn both_nappes() -> Line {
        Line::new(Point3::new(2.0, -10.0, 0.0), Vec3::y())
    }

    #[test]
    fn test_double_cone() {
        let line = both_nappes();
        let l = intersect_cone(&line, &cone("ky 1 1"));
        assert_eq!(l.len(), 2);
        assert_abs_diff_eq!(line.at(l[0]).y, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(line.at(l[1]).y, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cut_flag_selects_nappe() {
        let line = both_nappes();
        let up = intersect_cone(&line, &cone("ky 1 1 1"));
        assert_eq!(up.len(), 1);
        assert_abs_diff_eq!(line.at(up[0]).y, 3.0, epsilon = 1e-9);

        let down = intersect_cone(&line, &cone("ky 1 1 -1"));
        assert_eq!(down.len(), 1);
        assert_abs_diff_eq!(line.at(down[0]).y, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_across_one_nappe() {
        let line = Line::new(Point3::new(-10.0, 5.0, 0.0), Vec3::x());
        let l = intersect_cone(&line, &cone("ky 1 1 1"));
        assert_eq!(l.len(), 2);
        assert_abs_diff_eq!(line.at(l[0]).x, -4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(line.at(l[1]).x, 4.0, epsilon = 1e-9);
        assert!(intersect_cone(&line, &cone("ky 1 1 -1")).is_empty());
    }
}
