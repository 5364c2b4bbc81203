use mcsg_kernel_math::{Mat3, Point3, Vec3, ZERO_TOL};

use crate::{SurfaceError, SurfaceKind, SurfaceOps};

/// A sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    centre: Point3,
    radius: f64,
}

impl Sphere {
    /// Sphere about `centre`. The radius must be positive.
    pub fn new(centre: Point3, radius: f64) -> Result<Self, SurfaceError> {
        if radius <= 0.0 {
            return Err(SurfaceError::Degenerate(format!("sphere radius {radius}")));
        }
        Ok(Self { centre, radius })
    }

    /// Centre point.
    pub fn centre(&self) -> &Point3 {
        &self.centre
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Change the radius, keeping the centre.
    pub fn set_radius(&mut self, radius: f64) -> Result<(), SurfaceError> {
        if radius <= 0.0 {
            return Err(SurfaceError::Degenerate(format!("sphere radius {radius}")));
        }
        self.radius = radius;
        Ok(())
    }

    /// Same centre and radius within `tol`.
    pub fn same_surface(&self, other: &Sphere, tol: f64) -> bool {
        (self.centre - other.centre).norm() <= tol && (self.radius - other.radius).abs() <= tol
    }
}

impl SurfaceOps for Sphere {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Sphere
    }

    fn base_eqn(&self) -> Option<[f64; 10]> {
        let c = self.centre.coords;
        Some([
            1.0,
            1.0,
            1.0,
            0.0,
            0.0,
            0.0,
            -2.0 * c.x,
            -2.0 * c.y,
            -2.0 * c.z,
            c.norm_squared() - self.radius * self.radius,
        ])
    }

    fn eqn_value(&self, p: &Point3) -> f64 {
        (p - self.centre).norm_squared() - self.radius * self.radius
    }

    fn side(&self, p: &Point3) -> i32 {
        let d = (p - self.centre).norm() - self.radius;
        if d > ZERO_TOL {
            1
        } else if d < -ZERO_TOL {
            -1
        } else {
            0
        }
    }

    fn distance(&self, p: &Point3) -> f64 {
        ((p - self.centre).norm() - self.radius).abs()
    }

    fn normal_at(&self, p: &Point3) -> Vec3 {
        let d = p - self.centre;
        let len = d.norm();
        if len < ZERO_TOL {
            return Vec3::z();
        }
        d / len
    }

    fn apply_isometry(&mut self, r: &Mat3, t: &Vec3) {
        self.centre = Point3::from(r * self.centre.coords + t);
    }
}
