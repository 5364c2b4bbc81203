use mcsg_kernel_math::{perpendicular, Mat3, Point3, Vec3, PARALLEL_TOL, ZERO_TOL};

use crate::quadratic::eqn_from_parts;
use crate::{SurfaceError, SurfaceKind, SurfaceOps};

/// A circular cone with apex `centre`, axis `normal` and half-angle `alpha`.
///
/// Implicit form: `cos^2(alpha) |d|^2 - (d . n)^2` with `d = p - centre`,
/// negative inside the cone. `cut_flag` selects a nappe: `+1` keeps only
/// the half with `d . n > 0`, `-1` the other half, `0` both. Points on the
/// discarded nappe's side count as outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Cone {
    centre: Point3,
    normal: Vec3,
    cangle: f64,
    cut_flag: i32,
}

impl Cone {
    /// Cone from apex, axis direction, `cos(alpha)` and nappe flag.
    pub fn new(centre: Point3, axis: Vec3, cangle: f64, cut_flag: i32) -> Result<Self, SurfaceError> {
        if !(cangle > 0.0 && cangle < 1.0) {
            return Err(SurfaceError::Degenerate(format!("cone cosine {cangle}")));
        }
        let len = axis.norm();
        if len < PARALLEL_TOL {
            return Err(SurfaceError::Degenerate("cone axis has zero length".into()));
        }
        Ok(Self {
            centre,
            normal: axis / len,
            cangle,
            cut_flag: cut_flag.signum(),
        })
    }

    /// Cone from the MCNP `t^2 = tan^2(alpha)` parameter.
    pub fn from_tan_sq(
        centre: Point3,
        axis: Vec3,
        tan_sq: f64,
        cut_flag: i32,
    ) -> Result<Self, SurfaceError> {
        if tan_sq <= 0.0 {
            return Err(SurfaceError::Degenerate(format!("cone t^2 {tan_sq}")));
        }
        Self::new(centre, axis, 1.0 / (1.0 + tan_sq).sqrt(), cut_flag)
    }

    /// Apex.
    pub fn centre(&self) -> &Point3 {
        &self.centre
    }

    /// Unit axis direction.
    pub fn normal(&self) -> &Vec3 {
        &self.normal
    }

    /// Cosine of the half-angle.
    pub fn cangle(&self) -> f64 {
        self.cangle
    }

    /// Half-angle in radians.
    pub fn half_angle(&self) -> f64 {
        self.cangle.acos()
    }

    /// Nappe selector (-1, 0, +1).
    pub fn cut_flag(&self) -> i32 {
        self.cut_flag
    }

    /// Select a nappe.
    pub fn set_cut_flag(&mut self, flag: i32) {
        self.cut_flag = flag.signum();
    }

    /// True if a point at axial coordinate `h` lies on a kept nappe.
    pub fn on_kept_nappe(&self, h: f64) -> bool {
        self.cut_flag == 0 || h * self.cut_flag as f64 > 0.0
    }

    fn axial_radial(&self, p: &Point3) -> (f64, f64, Vec3) {
        let d = p - self.centre;
        let h = d.dot(&self.normal);
        let r = d - h * self.normal;
        (h, r.norm(), r)
    }

    /// Same apex, angle and nappe choice. A reversed axis matches when the
    /// nappe flag is reversed too.
    pub fn same_surface(&self, other: &Cone, tol: f64) -> bool {
        if (self.centre - other.centre).norm() > tol
            || (self.cangle - other.cangle).abs() > tol
        {
            return false;
        }
        if (self.normal - other.normal).norm() <= tol {
            return self.cut_flag == other.cut_flag;
        }
        (self.normal + other.normal).norm() <= tol && self.cut_flag == -other.cut_flag
    }
}

impl SurfaceOps for Cone {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Cone
    }

    fn base_eqn(&self) -> Option<[f64; 10]> {
        let n = self.normal;
        let c2 = self.cangle * self.cangle;
        let q = Mat3::identity() * c2 - n * n.transpose();
        let c = self.centre.coords;
        let qc = q * c;
        Some(eqn_from_parts(&q, &(-2.0 * qc), c.dot(&qc)))
    }

    fn eqn_value(&self, p: &Point3) -> f64 {
        let d = p - self.centre;
        let h = d.dot(&self.normal);
        self.cangle * self.cangle * d.norm_squared() - h * h
    }

    fn side(&self, p: &Point3) -> i32 {
        let (h, _, _) = self.axial_radial(p);
        if !self.on_kept_nappe(h) && h.abs() > ZERO_TOL {
            return 1;
        }
        let v = self.eqn_value(p);
        if v > ZERO_TOL {
            1
        } else if v < -ZERO_TOL {
            -1
        } else {
            0
        }
    }

    /// Closed form in the half-plane through the axis: the nearest generator
    /// ray of each kept nappe, or the apex.
    fn distance(&self, p: &Point3) -> f64 {
        let (h, rho, _) = self.axial_radial(p);
        let c = self.cangle;
        let s = (1.0 - c * c).sqrt();

        let to_ray = |dir_h: f64| {
            // generator direction (dir_h * c, s)
            let along = h * dir_h * c + rho * s;
            if along >= 0.0 {
                (h * dir_h * s - rho * c).abs()
            } else {
                (h * h + rho * rho).sqrt()
            }
        };

        let mut best = f64::INFINITY;
        if self.cut_flag >= 0 {
            best = best.min(to_ray(1.0));
        }
        if self.cut_flag <= 0 {
            best = best.min(to_ray(-1.0));
        }
        best
    }

    fn normal_at(&self, p: &Point3) -> Vec3 {
        let d = p - self.centre;
        let h = d.dot(&self.normal);
        let g = 2.0 * self.cangle * self.cangle * d - 2.0 * h * self.normal;
        let len = g.norm();
        if len < ZERO_TOL {
            return perpendicular(&self.normal);
        }
        g / len
    }

    fn apply_isometry(&mut self, r: &Mat3, t: &Vec3) {
        self.centre = Point3::from(r * self.centre.coords + t);
        self.normal = (r * self.normal).normalize();
    }
}
