#![warn(missing_docs)]

//! Math types for the mcsg geometry kernel.
//!
//! Thin wrappers around nalgebra providing the types the surface algebra
//! works in: points, vectors, rigid transforms and the
//! tolerance set used for every "effectively zero" comparison.

use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A 3x3 matrix (quadratic forms, rotation blocks).
pub type Mat3 = Matrix3<f64>;

/// A 4x4 affine transformation matrix.
///
/// Surfaces only accept rigid motions (rotations, reflections and
/// translations); the quadratic form of a surface is not preserved under
/// shear or non-uniform scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// The matrix product `self * other`, so `other` acts first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// The upper-left 3x3 block.
    pub fn linear_part(&self) -> Mat3 {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// The translation column.
    pub fn translation_part(&self) -> Vec3 {
        Vec3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric and numeric comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Geometric "effectively zero" (distances, equation values).
    pub zero: f64,
    /// Bound on `|a·b|` below which a direction counts as parallel to a plane.
    pub parallel: f64,
    /// Maximum equation residual for an accepted three-surface solution.
    pub residual: f64,
    /// Maximum imaginary part of a polynomial root counted as real.
    pub root: f64,
}

impl Tolerance {
    /// Kernel defaults.
    pub const DEFAULT: Self = Self {
        zero: 1e-5,
        parallel: 1e-8,
        residual: 1e-3,
        root: 1e-6,
    };

    /// Copy with a different `zero` tolerance.
    pub fn with_zero(self, zero: f64) -> Self {
        Self { zero, ..self }
    }

    /// Copy with a different `residual` tolerance.
    pub fn with_residual(self, residual: f64) -> Self {
        Self { residual, ..self }
    }

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.zero
    }

    /// Check if a scalar is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.zero
    }

    /// -1, 0 or +1 depending on which side of the zero band `value` lies.
    pub fn sign(&self, value: f64) -> i32 {
        if value > self.zero {
            1
        } else if value < -self.zero {
            -1
        } else {
            0
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Shorthand for `Tolerance::DEFAULT.zero`.
pub const ZERO_TOL: f64 = Tolerance::DEFAULT.zero;

/// Shorthand for `Tolerance::DEFAULT.parallel`.
pub const PARALLEL_TOL: f64 = Tolerance::DEFAULT.parallel;

/// A unit vector perpendicular to `v`.
///
/// Picks the coordinate axis least aligned with `v` and orthogonalises it.
pub fn perpendicular(v: &Vec3) -> Vec3 {
    let n = v.normalize();
    let arbitrary = if n.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    (arbitrary - arbitrary.dot(&n) * n).normalize()
}

/// Symmetric matrix of the quadratic part of `[A,B,C,D,E,F,G,H,J,K]`.
pub fn quadratic_matrix(eqn: &[f64; 10]) -> Mat3 {
    Mat3::new(
        eqn[0],
        eqn[3] / 2.0,
        eqn[4] / 2.0,
        eqn[3] / 2.0,
        eqn[1],
        eqn[5] / 2.0,
        eqn[4] / 2.0,
        eqn[5] / 2.0,
        eqn[2],
    )
}
