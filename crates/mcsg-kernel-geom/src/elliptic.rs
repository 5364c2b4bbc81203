use mcsg_kernel_math::{Mat3, Point3, Vec3, PARALLEL_TOL, ZERO_TOL};

use crate::quadratic::{eqn_equal, eqn_from_parts};
use crate::{SurfaceError, SurfaceKind, SurfaceOps};

/// Bisection cap for [`ellipse_distance`]; enough to exhaust `f64`.
const BISECT_MAX: usize = 1100;

/// An infinite elliptic cylinder.
///
/// The cross-section has semi-axis `a_len` along `a_axis` and `b_len` along
/// `normal x a_axis`.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipticCyl {
    centre: Point3,
    normal: Vec3,
    a_axis: Vec3,
    a_len: f64,
    b_len: f64,
}

impl EllipticCyl {
    /// Elliptic cylinder about `centre` along `normal`, with semi-axis
    /// `a_len` in the `cross` direction and `b_len` perpendicular to both.
    ///
    /// `cross` is made perpendicular to `normal` first.
    pub fn new(
        centre: Point3,
        normal: Vec3,
        cross: Vec3,
        a_len: f64,
        b_len: f64,
    ) -> Result<Self, SurfaceError> {
        if a_len <= 0.0 || b_len <= 0.0 {
            return Err(SurfaceError::Degenerate(format!(
                "elliptic cylinder radii {a_len}, {b_len}"
            )));
        }
        let n_len = normal.norm();
        if n_len < PARALLEL_TOL {
            return Err(SurfaceError::Degenerate("elliptic axis has zero length".into()));
        }
        let n = normal / n_len;
        let a = cross - cross.dot(&n) * n;
        let a_norm = a.norm();
        if a_norm < PARALLEL_TOL {
            return Err(SurfaceError::Degenerate(
                "elliptic cross direction parallel to axis".into(),
            ));
        }
        Ok(Self {
            centre,
            normal: n,
            a_axis: a / a_norm,
            a_len,
            b_len,
        })
    }

    /// A point on the axis.
    pub fn centre(&self) -> &Point3 {
        &self.centre
    }

    /// Unit axis direction.
    pub fn normal(&self) -> &Vec3 {
        &self.normal
    }

    /// Unit direction of the `a` semi-axis.
    pub fn a_axis(&self) -> &Vec3 {
        &self.a_axis
    }

    /// Unit direction of the `b` semi-axis.
    pub fn b_axis(&self) -> Vec3 {
        self.normal.cross(&self.a_axis)
    }

    /// Semi-axis lengths `(a, b)`.
    pub fn radii(&self) -> (f64, f64) {
        (self.a_len, self.b_len)
    }

    fn local(&self, p: &Point3) -> (f64, f64) {
        let d = p - self.centre;
        (d.dot(&self.a_axis), d.dot(&self.b_axis()))
    }

    /// Same quadric within `tol`, compared on normalised coefficients.
    pub fn same_surface(&self, other: &EllipticCyl, tol: f64) -> bool {
        match (self.base_eqn(), other.base_eqn()) {
            (Some(a), Some(b)) => eqn_equal(&a, &b, tol),
            _ => false,
        }
    }
}

impl SurfaceOps for EllipticCyl {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::EllipticCyl
    }

    fn base_eqn(&self) -> Option<[f64; 10]> {
        let a = self.a_axis;
        let b = self.b_axis();
        let q = a * a.transpose() / (self.a_len * self.a_len)
            + b * b.transpose() / (self.b_len * self.b_len);
        let c = self.centre.coords;
        let qc = q * c;
        Some(eqn_from_parts(&q, &(-2.0 * qc), c.dot(&qc) - 1.0))
    }

    fn eqn_value(&self, p: &Point3) -> f64 {
        let (u, v) = self.local(p);
        (u / self.a_len).powi(2) + (v / self.b_len).powi(2) - 1.0
    }

    fn distance(&self, p: &Point3) -> f64 {
        let (u, v) = self.local(p);
        if self.a_len >= self.b_len {
            ellipse_distance(self.a_len, self.b_len, u.abs(), v.abs())
        } else {
            ellipse_distance(self.b_len, self.a_len, v.abs(), u.abs())
        }
    }

    fn normal_at(&self, p: &Point3) -> Vec3 {
        let (u, v) = self.local(p);
        let g = self.a_axis * (u / (self.a_len * self.a_len))
            + self.b_axis() * (v / (self.b_len * self.b_len));
        let len = g.norm();
        if len < ZERO_TOL {
            return self.a_axis;
        }
        g / len
    }

    fn apply_isometry(&mut self, r: &Mat3, t: &Vec3) {
        self.centre = Point3::from(r * self.centre.coords + t);
        self.normal = (r * self.normal).normalize();
        self.a_axis = (r * self.a_axis).normalize();
    }
}

/// Distance from `(y0, y1)` (first quadrant) to the ellipse with semi-axes
/// `e0 >= e1 > 0`.
///
/// Bisects on the Lagrange parameter of the closest point, which is robust
/// for very elongated ellipses where a polynomial formulation is not.
pub fn ellipse_distance(e0: f64, e1: f64, y0: f64, y1: f64) -> f64 {
    if y1 > 0.0 {
        if y0 > 0.0 {
            let z0 = y0 / e0;
            let z1 = y1 / e1;
            let g = z0 * z0 + z1 * z1 - 1.0;
            if g == 0.0 {
                return 0.0;
            }
            let r0 = (e0 / e1) * (e0 / e1);
            let sbar = ellipse_root(r0, z0, z1, g);
            let x0 = r0 * y0 / (sbar + r0);
            let x1 = y1 / (sbar + 1.0);
            return ((x0 - y0).powi(2) + (x1 - y1).powi(2)).sqrt();
        }
        return (y1 - e1).abs();
    }

    let numer0 = e0 * y0;
    let denom0 = e0 * e0 - e1 * e1;
    if numer0 < denom0 {
        let xde0 = numer0 / denom0;
        let x0 = e0 * xde0;
        let x1 = e1 * (1.0 - xde0 * xde0).sqrt();
        ((x0 - y0).powi(2) + x1 * x1).sqrt()
    } else {
        (y0 - e0).abs()
    }
}

fn ellipse_root(r0: f64, z0: f64, z1: f64, g: f64) -> f64 {
    let n0 = r0 * z0;
    let mut s0 = z1 - 1.0;
    let mut s1 = if g < 0.0 { 0.0 } else { n0.hypot(z1) - 1.0 };
    let mut s = 0.0;
    for _ in 0..BISECT_MAX {
        s = 0.5 * (s0 + s1);
        if s == s0 || s == s1 {
            break;
        }
        let ratio0 = n0 / (s + r0);
        let ratio1 = z1 / (s + 1.0);
        let g = ratio0 * ratio0 + ratio1 * ratio1 - 1.0;
        if g > 0.0 {
            s0 = s;
        } else if g < 0.0 {
            s1 = s;
        } else {
            break;
        }
    }
    s
}
