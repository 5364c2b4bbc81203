use mcsg_kernel_math::{Mat3, Point3, Vec3, ZERO_TOL};

use crate::quadratic::{eqn_equal, eqn_gradient, eqn_value, quadric_distance, transform_eqn};
use crate::{SurfaceKind, SurfaceOps};

/// An arbitrary quadric held directly as its ten coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct General {
    eqn: [f64; 10],
}

impl General {
    /// Quadric from `[A, B, C, D, E, F, G, H, J, K]`.
    pub fn new(eqn: [f64; 10]) -> Self {
        Self { eqn }
    }

    /// MCNP `sq A B C D E F G x y z`:
    /// `A(x-x0)^2 + B(y-y0)^2 + C(z-z0)^2 + 2D(x-x0) + 2E(y-y0) + 2F(z-z0) + G`.
    pub fn from_sq(p: &[f64; 10]) -> Self {
        let [a, b, c, d, e, f, g, x0, y0, z0] = *p;
        Self::new([
            a,
            b,
            c,
            0.0,
            0.0,
            0.0,
            2.0 * (d - a * x0),
            2.0 * (e - b * y0),
            2.0 * (f - c * z0),
            a * x0 * x0 + b * y0 * y0 + c * z0 * z0 - 2.0 * (d * x0 + e * y0 + f * z0) + g,
        ])
    }

    /// MCNP `gq A B C D E F G H J K`, where `D` multiplies `xy`, `E` `yz` and
    /// `F` `zx`.
    pub fn from_gq(p: &[f64; 10]) -> Self {
        Self::new([p[0], p[1], p[2], p[3], p[5], p[4], p[6], p[7], p[8], p[9]])
    }

    /// The coefficients.
    pub fn eqn(&self) -> &[f64; 10] {
        &self.eqn
    }

    /// Same normalised coefficients within `tol`.
    pub fn same_surface(&self, other: &General, tol: f64) -> bool {
        eqn_equal(&self.eqn, &other.eqn, tol)
    }
}

impl SurfaceOps for General {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::General
    }

    fn base_eqn(&self) -> Option<[f64; 10]> {
        Some(self.eqn)
    }

    fn eqn_value(&self, p: &Point3) -> f64 {
        eqn_value(&self.eqn, p)
    }

    fn distance(&self, p: &Point3) -> f64 {
        quadric_distance(&self.eqn, p)
    }

    fn normal_at(&self, p: &Point3) -> Vec3 {
        let g = eqn_gradient(&self.eqn, p);
        let len = g.norm();
        if len < ZERO_TOL {
            return Vec3::z();
        }
        g / len
    }

    fn apply_isometry(&mut self, r: &Mat3, t: &Vec3) {
        self.eqn = transform_eqn(&self.eqn, r, t);
    }
}
