use mcsg_kernel_math::{perpendicular, Mat3, Point3, Vec3, PARALLEL_TOL, ZERO_TOL};

use crate::{Cylinder, Plane, SurfaceError, SurfaceKind, SurfaceOps};

/// A finite right circular cylinder (MCNP `rcc`): base centre, axis vector
/// spanning the full height, and radius.
#[derive(Debug, Clone, PartialEq)]
pub struct CylCan {
    base: Point3,
    axis: Vec3,
    height: f64,
    radius: f64,
}

impl CylCan {
    /// Can from the centre of its base face, the height vector and radius.
    pub fn new(base: Point3, height: Vec3, radius: f64) -> Result<Self, SurfaceError> {
        if radius <= 0.0 {
            return Err(SurfaceError::Degenerate(format!("rcc radius {radius}")));
        }
        let h = height.norm();
        if h < PARALLEL_TOL {
            return Err(SurfaceError::Degenerate("rcc height vector has zero length".into()));
        }
        Ok(Self {
            base,
            axis: height / h,
            height: h,
            radius,
        })
    }

    /// Centre of the base face.
    pub fn base(&self) -> &Point3 {
        &self.base
    }

    /// Unit axis, pointing from base to top.
    pub fn axis(&self) -> &Vec3 {
        &self.axis
    }

    /// Height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The infinite cylinder carrying the side wall.
    pub fn side_wall(&self) -> Cylinder {
        Cylinder::from_unit(self.base, self.axis, self.radius)
    }

    /// Base and top planes, outward normals.
    pub fn caps(&self) -> [Plane; 2] {
        let c = self.axis.dot(&self.base.coords);
        [
            Plane::from_unit(-self.axis, -c),
            Plane::from_unit(self.axis, c + self.height),
        ]
    }

    /// Axial and radial coordinates of `p`.
    pub fn local(&self, p: &Point3) -> (f64, f64) {
        let d = p - self.base;
        let h = d.dot(&self.axis);
        (h, (d - h * self.axis).norm())
    }

    /// Same base, axis, height and radius within `tol`.
    pub fn same_surface(&self, other: &CylCan, tol: f64) -> bool {
        (self.base - other.base).norm() <= tol
            && (self.axis - other.axis).norm() <= tol
            && (self.height - other.height).abs() <= tol
            && (self.radius - other.radius).abs() <= tol
    }
}

impl SurfaceOps for CylCan {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::CylCan
    }

    fn base_eqn(&self) -> Option<[f64; 10]> {
        None
    }

    fn eqn_value(&self, p: &Point3) -> f64 {
        let (h, rho) = self.local(p);
        (rho - self.radius).max(-h).max(h - self.height)
    }

    fn distance(&self, p: &Point3) -> f64 {
        let (h, rho) = self.local(p);
        let dr = rho - self.radius;
        let dh = (-h).max(h - self.height);
        if dr <= 0.0 && dh <= 0.0 {
            return (-dr).min(-dh);
        }
        (dr.max(0.0).powi(2) + dh.max(0.0).powi(2)).sqrt()
    }

    fn normal_at(&self, p: &Point3) -> Vec3 {
        let d = p - self.base;
        let (h, rho) = self.local(p);
        let dr = rho - self.radius;
        if dr >= -h && dr >= h - self.height {
            let r = d - h * self.axis;
            if r.norm() < ZERO_TOL {
                return perpendicular(&self.axis);
            }
            return r.normalize();
        }
        if h < self.height / 2.0 {
            -self.axis
        } else {
            self.axis
        }
    }

    fn apply_isometry(&mut self, r: &Mat3, t: &Vec3) {
        self.base = Point3::from(r * self.base.coords + t);
        self.axis = (r * self.axis).normalize();
    }
}
