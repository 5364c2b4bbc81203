#![warn(missing_docs)]

//! Implicit surfaces for the mcsg geometry kernel.
//!
//! Every surface divides space into a negative (inside) and positive
//! (outside) half. Quadrics also express themselves as the ten-coefficient
//! general quadratic form
//!
//! ```text
//! A x^2 + B y^2 + C z^2 + D xy + E xz + F yz + G x + H y + J z + K = 0
//! ```
//!
//! stored as `[A, B, C, D, E, F, G, H, J, K]`. The macrobodies ([`MBrect`],
//! [`CylCan`]), the polyhedron [`ArbPoly`] and [`NullSurface`] have no
//! single quadratic form.
//!
//! Surfaces are a closed set, held in the [`Surface`] enum and dispatched
//! by `match`. Cards in MCNP syntax are parsed by the [`factory`] module.

use std::fmt;

use mcsg_kernel_math::{Mat3, Point3, Transform, Vec3, ZERO_TOL};
use thiserror::Error;

mod arbpoly;
mod cone;
mod cylcan;
mod cylinder;
mod elliptic;
pub mod factory;
mod general;
mod mbrect;
mod null;
mod plane;
pub mod quadratic;
mod sphere;

pub use arbpoly::{in_loop, ArbPoly, LoopPosition};
pub use cone::Cone;
pub use cylcan::CylCan;
pub use cylinder::Cylinder;
pub use elliptic::EllipticCyl;
pub use factory::{parse_card, parse_surface, process_line, SurfaceCard};
pub use general::General;
pub use mbrect::MBrect;
pub use null::NullSurface;
pub use plane::Plane;
pub use sphere::Sphere;

// =============================================================================
// Errors
// =============================================================================

/// Failure to build a surface from a card or from explicit parameters.
///
/// Each variant maps to a negative integer [`code`](SurfaceError::code).
/// Codes `<= -100` are hard failures; anything else is soft and the caller
/// may substitute a [`NullSurface`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    /// The mnemonic is not a known surface type.
    #[error("unknown surface type `{0}`")]
    UnknownKey(String),

    /// Nothing to parse, or no valid surface number.
    #[error("empty or unnumbered surface card")]
    EmptyCard,

    /// A parameter is not a number.
    #[error("bad number `{0}`")]
    BadNumber(String),

    /// Wrong number of parameters for the mnemonic.
    #[error("`{key}` does not take {found} parameters")]
    ParameterCount {
        /// The mnemonic.
        key: String,
        /// Parameters supplied.
        found: usize,
    },

    /// The parameters describe no surface.
    #[error("degenerate surface: {0}")]
    Degenerate(String),
}

impl SurfaceError {
    /// The integer error code.
    pub fn code(&self) -> i32 {
        match self {
            SurfaceError::UnknownKey(_) => -101,
            SurfaceError::EmptyCard => -100,
            SurfaceError::Degenerate(_) => -3,
            SurfaceError::BadNumber(_) => -2,
            SurfaceError::ParameterCount { .. } => -1,
        }
    }

    /// True when the failure must abort the build.
    pub fn is_hard(&self) -> bool {
        self.code() <= -100
    }
}

// =============================================================================
// Kinds and axes
// =============================================================================

/// The kind of a surface (for tag-based dispatch and per-kind indexing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SurfaceKind {
    /// Infinite plane.
    Plane,
    /// Sphere.
    Sphere,
    /// Infinite circular cylinder.
    Cylinder,
    /// Circular cone, one or both nappes.
    Cone,
    /// Infinite elliptic cylinder.
    EllipticCyl,
    /// Arbitrary quadric.
    General,
    /// Rectangular parallelepiped macrobody.
    MBrect,
    /// Convex polyhedron.
    ArbPoly,
    /// Finite right circular cylinder macrobody.
    CylCan,
    /// Placeholder for a surface that failed to parse.
    Null,
}

impl SurfaceKind {
    /// Dense index of the kind, `0..SurfaceKind::COUNT`.
    pub fn class_index(self) -> usize {
        self as usize
    }

    /// Number of kinds.
    pub const COUNT: usize = 10;
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SurfaceKind::Plane => "plane",
            SurfaceKind::Sphere => "sphere",
            SurfaceKind::Cylinder => "cylinder",
            SurfaceKind::Cone => "cone",
            SurfaceKind::EllipticCyl => "elliptic cylinder",
            SurfaceKind::General => "general quadric",
            SurfaceKind::MBrect => "box",
            SurfaceKind::ArbPoly => "arbitrary polyhedron",
            SurfaceKind::CylCan => "cylinder can",
            SurfaceKind::Null => "null",
        };
        f.write_str(name)
    }
}

/// A coordinate axis, as selected by the `x`/`y`/`z` suffix of a mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// Unit vector along the axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::x(),
            Axis::Y => Vec3::y(),
            Axis::Z => Vec3::z(),
        }
    }

    /// Index of the axis (0, 1, 2).
    pub fn index(self) -> usize {
        self as usize
    }

    /// The two remaining axes in increasing order (`X -> (Y, Z)`,
    /// `Y -> (X, Z)`, `Z -> (X, Y)`).
    pub fn others(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }

    /// Parse a trailing `x`, `y` or `z`.
    pub fn from_suffix(c: char) -> Option<Self> {
        match c {
            'x' | 'X' => Some(Axis::X),
            'y' | 'Y' => Some(Axis::Y),
            'z' | 'Z' => Some(Axis::Z),
            _ => None,
        }
    }
}

// =============================================================================
// Surface operations
// =============================================================================

/// Operations every concrete surface supports.
///
/// Sign convention: negative inside, positive outside, zero on the surface
/// within [`ZERO_TOL`].
pub trait SurfaceOps {
    /// The kind of this surface.
    fn kind(&self) -> SurfaceKind;

    /// The general quadratic form, if the surface is a single quadric.
    fn base_eqn(&self) -> Option<[f64; 10]>;

    /// Value of the implicit equation at `p`. Composite surfaces return a
    /// signed distance-like value with the same sign convention.
    fn eqn_value(&self, p: &Point3) -> f64;

    /// -1 inside, +1 outside, 0 on the surface.
    fn side(&self, p: &Point3) -> i32 {
        let v = self.eqn_value(p);
        if v > ZERO_TOL {
            1
        } else if v < -ZERO_TOL {
            -1
        } else {
            0
        }
    }

    /// Euclidean distance from `p` to the surface (never negative).
    fn distance(&self, p: &Point3) -> f64;

    /// True if `p` lies on the surface within [`ZERO_TOL`].
    fn on_surface(&self, p: &Point3) -> bool {
        self.distance(p) <= ZERO_TOL
    }

    /// Outward unit normal at (or nearest to) `p`.
    fn normal_at(&self, p: &Point3) -> Vec3;

    /// Apply `p -> r p + t` where `r` is orthogonal.
    fn apply_isometry(&mut self, r: &Mat3, t: &Vec3);

    /// Rotate about the origin by the linear part of `tr`.
    fn rotate(&mut self, tr: &Transform) {
        self.apply_isometry(&tr.linear_part(), &Vec3::zeros());
    }

    /// Translate by `v`.
    fn displace(&mut self, v: &Vec3) {
        self.apply_isometry(&Mat3::identity(), v);
    }

    /// Reflect in `plane`.
    fn mirror(&mut self, plane: &Plane) {
        let (h, t) = plane.reflection();
        self.apply_isometry(&h, &t);
    }

    /// Rotate by the linear part of `tr`, then displace by its translation.
    fn transform(&mut self, tr: &Transform) {
        self.apply_isometry(&tr.linear_part(), &tr.translation_part());
    }
}

// =============================================================================
// Surface enum
// =============================================================================

/// Any surface the kernel understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// Plane.
    Plane(Plane),
    /// Sphere.
    Sphere(Sphere),
    /// Circular cylinder.
    Cylinder(Cylinder),
    /// Cone.
    Cone(Cone),
    /// Elliptic cylinder.
    EllipticCyl(EllipticCyl),
    /// General quadric.
    General(General),
    /// Box macrobody.
    MBrect(MBrect),
    /// Convex polyhedron.
    ArbPoly(ArbPoly),
    /// Finite cylinder macrobody.
    CylCan(CylCan),
    /// Null surface.
    Null(NullSurface),
}

macro_rules! dispatch {
    ($value:expr, $s:ident => $body:expr) => {
        match $value {
            Surface::Plane($s) => $body,
            Surface::Sphere($s) => $body,
            Surface::Cylinder($s) => $body,
            Surface::Cone($s) => $body,
            Surface::EllipticCyl($s) => $body,
            Surface::General($s) => $body,
            Surface::MBrect($s) => $body,
            Surface::ArbPoly($s) => $body,
            Surface::CylCan($s) => $body,
            Surface::Null($s) => $body,
        }
    };
}

impl SurfaceOps for Surface {
    fn kind(&self) -> SurfaceKind {
        dispatch!(self, s => s.kind())
    }

    fn base_eqn(&self) -> Option<[f64; 10]> {
        dispatch!(self, s => s.base_eqn())
    }

    fn eqn_value(&self, p: &Point3) -> f64 {
        dispatch!(self, s => s.eqn_value(p))
    }

    fn side(&self, p: &Point3) -> i32 {
        dispatch!(self, s => s.side(p))
    }

    fn distance(&self, p: &Point3) -> f64 {
        dispatch!(self, s => s.distance(p))
    }

    fn on_surface(&self, p: &Point3) -> bool {
        dispatch!(self, s => s.on_surface(p))
    }

    fn normal_at(&self, p: &Point3) -> Vec3 {
        dispatch!(self, s => s.normal_at(p))
    }

    fn apply_isometry(&mut self, r: &Mat3, t: &Vec3) {
        dispatch!(self, s => s.apply_isometry(r, t))
    }
}

impl Surface {
    /// True if `self` and `other` are the same kind and describe the same
    /// geometry within `tol`.
    pub fn same_surface(&self, other: &Surface, tol: f64) -> bool {
        match (self, other) {
            (Surface::Plane(a), Surface::Plane(b)) => a.same_surface(b, tol),
            (Surface::Sphere(a), Surface::Sphere(b)) => a.same_surface(b, tol),
            (Surface::Cylinder(a), Surface::Cylinder(b)) => a.same_surface(b, tol),
            (Surface::Cone(a), Surface::Cone(b)) => a.same_surface(b, tol),
            (Surface::EllipticCyl(a), Surface::EllipticCyl(b)) => a.same_surface(b, tol),
            (Surface::General(a), Surface::General(b)) => a.same_surface(b, tol),
            (Surface::MBrect(a), Surface::MBrect(b)) => a.same_surface(b, tol),
            (Surface::ArbPoly(a), Surface::ArbPoly(b)) => a.same_surface(b, tol),
            (Surface::CylCan(a), Surface::CylCan(b)) => a.same_surface(b, tol),
            (Surface::Null(_), Surface::Null(_)) => true,
            _ => false,
        }
    }

    /// The plane, if this surface is one.
    pub fn as_plane(&self) -> Option<&Plane> {
        match self {
            Surface::Plane(p) => Some(p),
            _ => None,
        }
    }

    /// True for the null placeholder.
    pub fn is_null(&self) -> bool {
        matches!(self, Surface::Null(_))
    }

    /// Route to the visitor method for the concrete type.
    pub fn accept<V: SurfaceVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Surface::Plane(s) => visitor.visit_plane(s),
            Surface::Sphere(s) => visitor.visit_sphere(s),
            Surface::Cylinder(s) => visitor.visit_cylinder(s),
            Surface::Cone(s) => visitor.visit_cone(s),
            Surface::EllipticCyl(s) => visitor.visit_elliptic_cyl(s),
            Surface::General(s) => visitor.visit_general(s),
            Surface::MBrect(s) => visitor.visit_mbrect(s),
            Surface::ArbPoly(s) => visitor.visit_arb_poly(s),
            Surface::CylCan(s) => visitor.visit_cyl_can(s),
            Surface::Null(s) => visitor.visit_null(s),
        }
    }
}

impl std::str::FromStr for Surface {
    type Err = SurfaceError;

    /// Parse a definition without surface number, e.g. `"c/z 3 5 50"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        factory::parse_definition(s)
    }
}

macro_rules! impl_from {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for Surface {
                fn from(s: $ty) -> Self {
                    Surface::$ty(s)
                }
            }
        )*
    };
}

impl_from!(Plane, Sphere, Cylinder, Cone, EllipticCyl, General, MBrect, ArbPoly, CylCan);

impl From<NullSurface> for Surface {
    fn from(s: NullSurface) -> Self {
        Surface::Null(s)
    }
}

/// Double-dispatch target: one method per concrete surface type.
pub trait SurfaceVisitor {
    /// Visit a plane.
    fn visit_plane(&mut self, s: &Plane);
    /// Visit a sphere.
    fn visit_sphere(&mut self, s: &Sphere);
    /// Visit a cylinder.
    fn visit_cylinder(&mut self, s: &Cylinder);
    /// Visit a cone.
    fn visit_cone(&mut self, s: &Cone);
    /// Visit an elliptic cylinder.
    fn visit_elliptic_cyl(&mut self, s: &EllipticCyl);
    /// Visit a general quadric.
    fn visit_general(&mut self, s: &General);
    /// Visit a box macrobody.
    fn visit_mbrect(&mut self, s: &MBrect);
    /// Visit a polyhedron.
    fn visit_arb_poly(&mut self, s: &ArbPoly);
    /// Visit a finite cylinder.
    fn visit_cyl_can(&mut self, s: &CylCan);
    /// Visit the null surface. Does nothing by default.
    fn visit_null(&mut self, _s: &NullSurface) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_error_codes() {
        assert!(SurfaceError::UnknownKey("zz".into()).is_hard());
        assert!(SurfaceError::EmptyCard.is_hard());
        assert!(!SurfaceError::BadNumber("q".into()).is_hard());
        assert!(!SurfaceError::Degenerate("r".into()).is_hard());
        assert_eq!(
            SurfaceError::ParameterCount {
                key: "px".into(),
                found: 3
            }
            .code(),
            -1
        );
    }

    #[test]
    fn test_class_index_dense() {
        let kinds = [
            SurfaceKind::Plane,
            SurfaceKind::Sphere,
            SurfaceKind::Cylinder,
            SurfaceKind::Cone,
            SurfaceKind::EllipticCyl,
            SurfaceKind::General,
            SurfaceKind::MBrect,
            SurfaceKind::ArbPoly,
            SurfaceKind::CylCan,
            SurfaceKind::Null,
        ];
        for (i, k) in kinds.iter().enumerate() {
            assert_eq!(k.class_index(), i);
        }
        assert_eq!(kinds.len(), SurfaceKind::COUNT);
    }

    #[test]
    fn test_enum_dispatch() {
        let s: Surface = "so 5".parse().unwrap();
        assert_eq!(s.kind(), SurfaceKind::Sphere);
        assert_eq!(s.side(&Point3::origin()), -1);
        assert_abs_diff_eq!(s.distance(&Point3::new(8.0, 0.0, 0.0)), 3.0, epsilon = 1e-12);
        assert!(s.on_surface(&Point3::new(0.0, 5.0, 0.0)));
    }

    #[test]
    fn test_same_surface_needs_same_kind() {
        let a: Surface = "px 5".parse().unwrap();
        let b: Surface = "p 2 0 0 10".parse().unwrap();
        let c: Surface = "so 5".parse().unwrap();
        assert!(a.same_surface(&b, 1e-5));
        assert!(!a.same_surface(&c, 1e-5));
    }

    #[test]
    fn test_transform_moves_surface() {
        let mut s: Surface = "cz 2".parse().unwrap();
        s.transform(&Transform::translation(10.0, 0.0, 0.0));
        assert_eq!(s.side(&Point3::new(10.0, 0.0, 3.0)), -1);
        assert_eq!(s.side(&Point3::origin()), 1);
    }

    #[derive(Default)]
    struct Counter {
        planes: usize,
        others: usize,
    }

    impl SurfaceVisitor for Counter {
        fn visit_plane(&mut self, _s: &Plane) {
            self.planes += 1;
        }
        fn visit_sphere(&mut self, _s: &Sphere) {
            self.others += 1;
        }
        fn visit_cylinder(&mut self, _s: &Cylinder) {
            self.others += 1;
        }
        fn visit_cone(&mut self, _s: &Cone) {
            self.others += 1;
        }
        fn visit_elliptic_cyl(&mut self, _s: &EllipticCyl) {
            self.others += 1;
        }
        fn visit_general(&mut self, _s: &General) {
            self.others += 1;
        }
        fn visit_mbrect(&mut self, _s: &MBrect) {
            self.others += 1;
        }
        fn visit_arb_poly(&mut self, _s: &ArbPoly) {
            self.others += 1;
        }
        fn visit_cyl_can(&mut self, _s: &CylCan) {
            self.others += 1;
        }
    }

    #[test]
    fn test_accept_routes_by_type() {
        let mut c = Counter::default();
        for card in ["px 1", "py 2", "cx 3", "kz 0 1"] {
            let s: Surface = card.parse().unwrap();
            s.accept(&mut c);
        }
        Surface::Null(NullSurface).accept(&mut c);
        assert_eq!(c.planes, 2);
        assert_eq!(c.others, 2);
    }
}
