use mcsg_kernel_math::{Mat3, Point3, Vec3, PARALLEL_TOL, ZERO_TOL};

use crate::quadratic::eqn_from_parts;
use crate::{SurfaceError, SurfaceKind, SurfaceOps};

/// An infinite circular cylinder.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    centre: Point3,
    normal: Vec3,
    radius: f64,
}

impl Cylinder {
    /// Cylinder of `radius` whose axis passes through `centre` along `axis`.
    pub fn new(centre: Point3, axis: Vec3, radius: f64) -> Result<Self, SurfaceError> {
        if radius <= 0.0 {
            return Err(SurfaceError::Degenerate(format!("cylinder radius {radius}")));
        }
        let len = axis.norm();
        if len < PARALLEL_TOL {
            return Err(SurfaceError::Degenerate("cylinder axis has zero length".into()));
        }
        Ok(Self {
            centre,
            normal: axis / len,
            radius,
        })
    }

    pub(crate) fn from_unit(centre: Point3, normal: Vec3, radius: f64) -> Self {
        Self {
            centre,
            normal,
            radius,
        }
    }

    /// A point on the axis.
    pub fn centre(&self) -> &Point3 {
        &self.centre
    }

    /// Unit axis direction.
    pub fn normal(&self) -> &Vec3 {
        &self.normal
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Change the radius, keeping the axis.
    pub fn set_radius(&mut self, radius: f64) -> Result<(), SurfaceError> {
        if radius <= 0.0 {
            return Err(SurfaceError::Degenerate(format!("cylinder radius {radius}")));
        }
        self.radius = radius;
        Ok(())
    }

    /// Component of `p - centre` perpendicular to the axis.
    pub fn radial(&self, p: &Point3) -> Vec3 {
        let d = p - self.centre;
        d - d.dot(&self.normal) * self.normal
    }

    /// Same axis line (either direction) and radius within `tol`.
    pub fn same_surface(&self, other: &Cylinder, tol: f64) -> bool {
        (self.radius - other.radius).abs() <= tol
            && self.normal.cross(&other.normal).norm() <= tol
            && self.radial(&other.centre).norm() <= tol
    }
}

impl SurfaceOps for Cylinder {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Cylinder
    }

    fn base_eqn(&self) -> Option<[f64; 10]> {
        let n = self.normal;
        let q = Mat3::identity() - n * n.transpose();
        let c = self.centre.coords;
        let qc = q * c;
        Some(eqn_from_parts(
            &q,
            &(-2.0 * qc),
            c.dot(&qc) - self.radius * self.radius,
        ))
    }

    fn eqn_value(&self, p: &Point3) -> f64 {
        self.radial(p).norm_squared() - self.radius * self.radius
    }

    fn side(&self, p: &Point3) -> i32 {
        let d = self.radial(p).norm() - self.radius;
        if d > ZERO_TOL {
            1
        } else if d < -ZERO_TOL {
            -1
        } else {
            0
        }
    }

    fn distance(&self, p: &Point3) -> f64 {
        (self.radial(p).norm() - self.radius).abs()
    }

    fn normal_at(&self, p: &Point3) -> Vec3 {
        let r = self.radial(p);
        let len = r.norm();
        if len < ZERO_TOL {
            return mcsg_kernel_math::perpendicular(&self.normal);
        }
        r / len
    }

    fn apply_isometry(&mut self, r: &Mat3, t: &Vec3) {
        self.centre = Point3::from(r * self.centre.coords + t);
        self.normal = (r * self.normal).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadratic::{eqn_equal, eqn_value};
    use approx::assert_abs_diff_eq;
    use mcsg_kernel_math::Transform;

    #[test]
    fn test_base_eqn_cz() {
        // c/z 3 5 2: (x-3)^2 + (y-5)^2 - 4
        let c = Cylinder::new(Point3::new(3.0, 5.0, 0.0), Vec3::z(), 2.0).unwrap();
        let want = [1.0, 1.0, 0.0, 0.0, 0.0, 0.0, -6.0, -10.0, 0.0, 30.0];
        assert!(eqn_equal(&c.base_eqn().unwrap(), &want, 1e-12));
        let p = Point3::new(1.0, 1.0, 7.0);
        assert_abs_diff_eq!(eqn_value(&want, &p), c.eqn_value(&p), epsilon = 1e-12);
    }

    #[test]
    fn test_distance_and_side() {
        let c = Cylinder::new(Point3::origin(), Vec3::x(), 3.0).unwrap();
        assert_abs_diff_eq!(c.distance(&Point3::new(50.0, 0.0, 5.0)), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.distance(&Point3::new(-9.0, 1.0, 0.0)), 2.0, epsilon = 1e-12);
        assert_eq!(c.side(&Point3::new(7.0, 1.0, 1.0)), -1);
        assert_eq!(c.side(&Point3::new(7.0, 0.0, 3.0)), 0);
        assert_eq!(c.side(&Point3::new(7.0, 0.0, 4.0)), 1);
    }

    #[test]
    fn test_same_surface_reversed_axis() {
        let a = Cylinder::new(Point3::new(1.0, 1.0, 0.0), Vec3::z(), 2.0).unwrap();
        let b = Cylinder::new(Point3::new(1.0, 1.0, -40.0), -Vec3::z(), 2.0).unwrap();
        assert!(a.same_surface(&b, 1e-9));
        let c = Cylinder::new(Point3::new(1.0, 1.5, 0.0), Vec3::z(), 2.0).unwrap();
        assert!(!a.same_surface(&c, 1e-9));
    }

    #[test]
    fn test_rotate() {
        let mut c = Cylinder::new(Point3::new(0.0, 4.0, 0.0), Vec3::z(), 1.0).unwrap();
        c.rotate(&Transform::rotation_x(std::f64::consts::FRAC_PI_2));
        // axis now along -y through (0, 0, 4)
        assert_abs_diff_eq!(c.normal().y.abs(), 1.0, epsilon = 1e-12);
        assert_eq!(c.side(&Point3::new(0.0, 100.0, 4.0)), -1);
    }
}
