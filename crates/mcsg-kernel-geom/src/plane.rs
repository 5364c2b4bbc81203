use mcsg_kernel_math::{Mat3, Point3, Vec3, PARALLEL_TOL};

use crate::{SurfaceError, SurfaceKind, SurfaceOps};

/// An infinite plane `n . p = d` with unit normal `n`.
///
/// The positive side is the one the normal points into.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    normal: Vec3,
    dist: f64,
}

impl Plane {
    /// Plane `normal . p = dist`. Both are scaled so the normal is a unit
    /// vector.
    pub fn new(normal: Vec3, dist: f64) -> Result<Self, SurfaceError> {
        let len = normal.norm();
        if len < PARALLEL_TOL {
            return Err(SurfaceError::Degenerate("plane normal has zero length".into()));
        }
        Ok(Self {
            normal: normal / len,
            dist: dist / len,
        })
    }

    /// Plane through `point` with the given normal.
    pub fn from_point_normal(point: &Point3, normal: &Vec3) -> Result<Self, SurfaceError> {
        Self::new(*normal, normal.dot(&point.coords))
    }

    /// Plane through three points, normal `(b - a) x (c - a)`.
    pub fn from_points(a: &Point3, b: &Point3, c: &Point3) -> Result<Self, SurfaceError> {
        let n = (b - a).cross(&(c - a));
        if n.norm() < PARALLEL_TOL * (b - a).norm().max(1.0) {
            return Err(SurfaceError::Degenerate("plane points are collinear".into()));
        }
        Self::from_point_normal(a, &n)
    }

    /// Axis-aligned plane `x_axis = dist`.
    pub fn along_axis(axis: crate::Axis, dist: f64) -> Self {
        Self {
            normal: axis.unit(),
            dist,
        }
    }

    pub(crate) fn from_unit(normal: Vec3, dist: f64) -> Self {
        Self { normal, dist }
    }

    /// Unit normal.
    pub fn normal(&self) -> &Vec3 {
        &self.normal
    }

    /// Signed offset from the origin along the normal.
    pub fn dist(&self) -> f64 {
        self.dist
    }

    /// `n . p - d`.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.dist
    }

    /// Foot of the perpendicular from `p`.
    pub fn project(&self, p: &Point3) -> Point3 {
        p - self.signed_distance(p) * self.normal
    }

    /// The same plane with the sides swapped.
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            dist: -self.dist,
        }
    }

    /// True if `other` is this plane with reversed orientation.
    pub fn is_opposite(&self, other: &Plane, tol: f64) -> bool {
        (self.normal + other.normal).norm() <= tol && (self.dist + other.dist).abs() <= tol
    }

    /// True if the two planes coincide with the same orientation.
    pub fn same_surface(&self, other: &Plane, tol: f64) -> bool {
        (self.normal - other.normal).norm() <= tol && (self.dist - other.dist).abs() <= tol
    }

    /// The reflection in this plane as `(H, t)` with `p' = H p + t`.
    pub fn reflection(&self) -> (Mat3, Vec3) {
        let n = self.normal;
        (
            Mat3::identity() - 2.0 * n * n.transpose(),
            2.0 * self.dist * n,
        )
    }
}

impl SurfaceOps for Plane {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Plane
    }

    fn base_eqn(&self) -> Option<[f64; 10]> {
        let n = self.normal;
        Some([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, n.x, n.y, n.z, -self.dist])
    }

    fn eqn_value(&self, p: &Point3) -> f64 {
        self.signed_distance(p)
    }

    fn distance(&self, p: &Point3) -> f64 {
        self.signed_distance(p).abs()
    }

    fn normal_at(&self, _p: &Point3) -> Vec3 {
        self.normal
    }

    fn apply_isometry(&mut self, r: &Mat3, t: &Vec3) {
        self.normal = (r * self.normal).normalize();
        self.dist += self.normal.dot(t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Axis;
    use approx::assert_abs_diff_eq;
    use mcsg_kernel_math::Transform;

    #[test]
    fn test_new_normalizes() {
        let p = Plane::new(Vec3::new(2.0, 0.0, 0.0), 10.0).unwrap();
        assert_abs_diff_eq!(p.normal().x, 1.0);
        assert_abs_diff_eq!(p.dist(), 5.0);
        assert!(Plane::new(Vec3::zeros(), 1.0).is_err());
    }

    #[test]
    fn test_from_points() {
        let p = Plane::from_points(
            &Point3::new(0.0, 0.0, 3.0),
            &Point3::new(1.0, 0.0, 3.0),
            &Point3::new(0.0, 1.0, 3.0),
        )
        .unwrap();
        assert_abs_diff_eq!(p.normal().z, 1.0);
        assert_abs_diff_eq!(p.dist(), 3.0);
        assert!(Plane::from_points(
            &Point3::origin(),
            &Point3::new(1.0, 1.0, 1.0),
            &Point3::new(2.0, 2.0, 2.0)
        )
        .is_err());
    }

    #[test]
    fn test_side_and_distance() {
        let p = Plane::along_axis(Axis::X, 80.0);
        assert_eq!(p.side(&Point3::new(100.0, 0.0, 0.0)), 1);
        assert_eq!(p.side(&Point3::origin()), -1);
        assert_eq!(p.side(&Point3::new(80.0, 5.0, 5.0)), 0);
        assert_abs_diff_eq!(p.distance(&Point3::new(70.0, 3.0, 0.0)), 10.0);
    }

    #[test]
    fn test_opposite() {
        let a = Plane::along_axis(Axis::Y, 4.0);
        let b = Plane::new(Vec3::new(0.0, -3.0, 0.0), -12.0).unwrap();
        assert!(a.is_opposite(&b, 1e-10));
        assert!(!a.same_surface(&b, 1e-10));
        assert!(a.same_surface(&b.flipped(), 1e-10));
    }

    #[test]
    fn test_isometries() {
        let mut p = Plane::along_axis(Axis::X, 1.0);
        p.displace(&Vec3::new(2.0, 5.0, 0.0));
        assert_abs_diff_eq!(p.dist(), 3.0);

        p.rotate(&Transform::rotation_z(std::f64::consts::FRAC_PI_2));
        assert_abs_diff_eq!(p.normal().y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.dist(), 3.0, epsilon = 1e-12);

        // mirror y = 3 in z = 0 leaves it unchanged
        let before = p.clone();
        p.mirror(&Plane::along_axis(Axis::Z, 0.0));
        assert!(p.same_surface(&before, 1e-12));

        // mirror x = 1 in x = 4 gives -x = -7, i.e. x = 7 reversed
        let mut q = Plane::along_axis(Axis::X, 1.0);
        q.mirror(&Plane::along_axis(Axis::X, 4.0));
        assert_abs_diff_eq!(q.normal().x, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(q.dist(), -7.0, epsilon = 1e-12);
    }
}
