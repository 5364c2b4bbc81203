//! Lines in 3D and their intersection with surfaces.

use mcsg_kernel_geom::Surface;
use mcsg_kernel_math::{Point3, Vec3, PARALLEL_TOL};

use crate::intersect::intersect_surface;

/// A line `origin + λ direction`, `λ` unrestricted in sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// A point on the line; `λ = 0`.
    pub origin: Point3,
    /// Unit direction, or zero for an invalid line.
    pub direction: Vec3,
}

impl Line {
    /// Create a line through `origin` along `direction`.
    ///
    /// The direction is normalized. A zero direction gives an invalid line
    /// that intersects nothing.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        let len = direction.norm();
        let direction = if len < PARALLEL_TOL {
            Vec3::zeros()
        } else {
            direction / len
        };
        Self { origin, direction }
    }

    /// Line through two points, directed from `a` to `b`.
    pub fn through(a: &Point3, b: &Point3) -> Self {
        Self::new(*a, b - a)
    }

    /// True if the direction is a unit vector.
    pub fn is_valid(&self) -> bool {
        self.direction.norm_squared() > 0.5
    }

    /// Evaluate the line at parameter `lambda`.
    #[inline]
    pub fn at(&self, lambda: f64) -> Point3 {
        self.origin + lambda * self.direction
    }

    /// Parameter of the foot of the perpendicular from `p`.
    pub fn lambda_of(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(&self.direction)
    }

    /// The point on the line closest to `p`.
    pub fn closest_point(&self, p: &Point3) -> Point3 {
        self.at(self.lambda_of(p))
    }

    /// Perpendicular distance from `p` to the line.
    pub fn distance(&self, p: &Point3) -> f64 {
        (p - self.closest_point(p)).norm()
    }

    /// Append the intersections with `surface` to `out` in increasing `λ`
    /// and return how many were added. `out` is not cleared.
    pub fn intersect(&self, out: &mut Vec<Point3>, surface: &Surface) -> usize {
        let lambdas = intersect_surface(self, surface);
        out.extend(lambdas.iter().map(|&l| self.at(l)));
        lambdas.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_normalizes_direction() {
        let l = Line::new(Point3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, 4.0));
        assert!(l.is_valid());
        assert_abs_diff_eq!(l.direction.z, 1.0);
        let p = l.at(2.5);
        assert_abs_diff_eq!(p.z, 5.5);
    }

    #[test]
    fn test_zero_direction_is_invalid() {
        let l = Line::new(Point3::origin(), Vec3::zeros());
        assert!(!l.is_valid());
        let s: Surface = "so 5".parse().unwrap();
        let mut out = Vec::new();
        assert_eq!(l.intersect(&mut out, &s), 0);
    }

    #[test]
    fn test_closest_point_and_distance() {
        let l = Line::new(Point3::new(0.0, 1.0, 0.0), Vec3::x());
        let p = Point3::new(7.0, 4.0, 4.0);
        assert_abs_diff_eq!(l.lambda_of(&p), 7.0);
        assert_abs_diff_eq!(l.closest_point(&p).y, 1.0);
        assert_abs_diff_eq!(l.distance(&p), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_intersect_appends() {
        let l = Line::new(Point3::origin(), Vec3::x());
        let s: Surface = "px 80".parse().unwrap();
        let mut out = vec![Point3::new(-1.0, -1.0, -1.0)];
        assert_eq!(l.intersect(&mut out, &s), 1);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].x, 80.0);
    }

    #[test]
    fn test_through() {
        let l = Line::through(&Point3::new(1.0, 1.0, 1.0), &Point3::new(1.0, 1.0, -3.0));
        assert_abs_diff_eq!(l.direction.z, -1.0);
        assert_abs_diff_eq!(l.lambda_of(&Point3::new(1.0, 1.0, -3.0)), 4.0);
    }
}
