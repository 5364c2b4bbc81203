use mcsg_kernel_math::{Mat3, Point3, Vec3};

use crate::{SurfaceKind, SurfaceOps};

/// Stand-in for a surface whose card failed to parse.
///
/// Every point is outside, nothing is ever hit and the surface is
/// infinitely far away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullSurface;

impl SurfaceOps for NullSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Null
    }

    fn base_eqn(&self) -> Option<[f64; 10]> {
        None
    }

    fn eqn_value(&self, _p: &Point3) -> f64 {
        f64::INFINITY
    }

    fn side(&self, _p: &Point3) -> i32 {
        1
    }

    fn distance(&self, _p: &Point3) -> f64 {
        f64::INFINITY
    }

    fn on_surface(&self, _p: &Point3) -> bool {
        false
    }

    fn normal_at(&self, _p: &Point3) -> Vec3 {
        Vec3::z()
    }

    fn apply_isometry(&mut self, _r: &Mat3, _t: &Vec3) {}
}
