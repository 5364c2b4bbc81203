use mcsg_kernel_math::{Mat3, Point3, Vec3, PARALLEL_TOL};

use crate::{Plane, SurfaceError, SurfaceKind, SurfaceOps};

/// Orthogonality tolerance for the box edges (cosine of the angle).
const ORTHO_TOL: f64 = 1e-6;

/// A rectangular parallelepiped: `corner + sum s_i axes[i]`,
/// `0 <= s_i <= lengths[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MBrect {
    corner: Point3,
    axes: [Vec3; 3],
    lengths: [f64; 3],
}

impl MBrect {
    /// Box from a corner and three mutually perpendicular edge vectors
    /// (MCNP `box`).
    pub fn new(corner: Point3, edges: [Vec3; 3]) -> Result<Self, SurfaceError> {
        let mut axes = [Vec3::zeros(); 3];
        let mut lengths = [0.0; 3];
        for (i, e) in edges.iter().enumerate() {
            let len = e.norm();
            if len < PARALLEL_TOL {
                return Err(SurfaceError::Degenerate(format!("box edge {} has zero length", i + 1)));
            }
            axes[i] = e / len;
            lengths[i] = len;
        }
        for (i, j) in [(0, 1), (0, 2), (1, 2)] {
            if axes[i].dot(&axes[j]).abs() > ORTHO_TOL {
                return Err(SurfaceError::Degenerate(format!(
                    "box edges {} and {} are not perpendicular",
                    i + 1,
                    j + 1
                )));
            }
        }
        Ok(Self {
            corner,
            axes,
            lengths,
        })
    }

    /// Axis-aligned box between `min` and `max` (MCNP `rpp`).
    pub fn from_bounds(min: Point3, max: Point3) -> Result<Self, SurfaceError> {
        let d = max - min;
        if d.x <= 0.0 || d.y <= 0.0 || d.z <= 0.0 {
            return Err(SurfaceError::Degenerate("rpp bounds are not increasing".into()));
        }
        Self::new(
            min,
            [
                Vec3::new(d.x, 0.0, 0.0),
                Vec3::new(0.0, d.y, 0.0),
                Vec3::new(0.0, 0.0, d.z),
            ],
        )
    }

    /// The base corner.
    pub fn corner(&self) -> &Point3 {
        &self.corner
    }

    /// Unit edge directions.
    pub fn axes(&self) -> &[Vec3; 3] {
        &self.axes
    }

    /// Edge lengths.
    pub fn lengths(&self) -> &[f64; 3] {
        &self.lengths
    }

    /// The six face planes, outward normals, in the order
    /// `-a0, +a0, -a1, +a1, -a2, +a2`.
    pub fn planes(&self) -> [Plane; 6] {
        let c = self.corner.coords;
        let face = |i: usize, upper: bool| {
            let a = self.axes[i];
            if upper {
                Plane::from_unit(a, a.dot(&c) + self.lengths[i])
            } else {
                Plane::from_unit(-a, -a.dot(&c))
            }
        };
        [
            face(0, false),
            face(0, true),
            face(1, false),
            face(1, true),
            face(2, false),
            face(2, true),
        ]
    }

    /// Coordinates of `p` along the three edges, measured from the corner.
    pub fn local(&self, p: &Point3) -> [f64; 3] {
        let d = p - self.corner;
        [d.dot(&self.axes[0]), d.dot(&self.axes[1]), d.dot(&self.axes[2])]
    }

    /// Same corner, edges and lengths within `tol`.
    pub fn same_surface(&self, other: &MBrect, tol: f64) -> bool {
        (self.corner - other.corner).norm() <= tol
            && self
                .axes
                .iter()
                .zip(other.axes.iter())
                .all(|(a, b)| (a - b).norm() <= tol)
            && self
                .lengths
                .iter()
                .zip(other.lengths.iter())
                .all(|(a, b)| (a - b).abs() <= tol)
    }
}

impl SurfaceOps for MBrect {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::MBrect
    }

    fn base_eqn(&self) -> Option<[f64; 10]> {
        None
    }

    /// Largest signed face distance: negative strictly inside.
    fn eqn_value(&self, p: &Point3) -> f64 {
        self.planes()
            .iter()
            .map(|pl| pl.signed_distance(p))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    fn distance(&self, p: &Point3) -> f64 {
        let u = self.local(p);
        let mut outside = 0.0;
        let mut inside = f64::INFINITY;
        for i in 0..3 {
            let below = -u[i];
            let above = u[i] - self.lengths[i];
            let gap = below.max(above);
            if gap > 0.0 {
                outside += gap * gap;
            }
            inside = inside.min(-gap);
        }
        if outside > 0.0 {
            outside.sqrt()
        } else {
            inside
        }
    }

    fn normal_at(&self, p: &Point3) -> Vec3 {
        let planes = self.planes();
        let mut best = 0;
        let mut best_val = f64::NEG_INFINITY;
        for (i, pl) in planes.iter().enumerate() {
            let v = pl.signed_distance(p);
            if v > best_val {
                best_val = v;
                best = i;
            }
        }
        *planes[best].normal()
    }

    fn apply_isometry(&mut self, r: &Mat3, t: &Vec3) {
        self.corner = Point3::from(r * self.corner.coords + t);
        for a in self.axes.iter_mut() {
            *a = (r * *a).normalize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_rpp() -> MBrect {
        MBrect::from_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 6.0)).unwrap()
    }

    #[test]
    fn test_side() {
        let b = unit_rpp();
        assert_eq!(b.side(&Point3::new(1.0, 1.0, 1.0)), -1);
        assert_eq!(b.side(&Point3::new(2.0, 1.0, 1.0)), 0);
        assert_eq!(b.side(&Point3::new(3.0, 1.0, 1.0)), 1);
        assert_eq!(b.side(&Point3::new(1.0, -1.0, 7.0)), 1);
    }

    #[test]
    fn test_distance() {
        let b = unit_rpp();
        assert_abs_diff_eq!(b.distance(&Point3::new(1.0, 1.0, 3.0)), 1.0);
        assert_abs_diff_eq!(b.distance(&Point3::new(5.0, 2.0, 3.0)), 3.0);
        // off a corner
        assert_abs_diff_eq!(
            b.distance(&Point3::new(3.0, 5.0, 3.0)),
            2.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_box_rejects_skew_edges() {
        let r = MBrect::new(
            Point3::origin(),
            [Vec3::x(), Vec3::new(1.0, 1.0, 0.0), Vec3::z()],
        );
        assert!(matches!(r, Err(SurfaceError::Degenerate(_))));
        assert!(MBrect::from_bounds(Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn test_planes_and_move() {
        let mut b = unit_rpp();
        let planes = b.planes();
        assert_abs_diff_eq!(planes[1].dist(), 2.0);
        assert_abs_diff_eq!(planes[0].dist(), 0.0);
        b.displace(&Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(b.side(&Point3::new(11.0, 1.0, 1.0)), -1);
        assert_abs_diff_eq!(b.normal_at(&Point3::new(11.0, 1.0, 5.9)).z, 1.0);
    }
}
