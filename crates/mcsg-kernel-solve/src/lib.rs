#![warn(missing_docs)]

//! Three-surface intersection for the mcsg geometry kernel.
//!
//! - [`make_triplet`] - a ten-coefficient quadric as a [`PolyVar3`]
//! - [`SolveValues`] - every real common root of three trivariate
//!   polynomials, by Bezout elimination and back substitution
//! - [`sur_inter`] - the surface-level entry points, with fast paths for
//!   planes
//!
//! [`PolyVar3`]: mcsg_kernel_poly::PolyVar3

pub mod sur_inter;
mod triplet;
mod values;

pub use sur_inter::{make_point, make_point_near, process_point};
pub use triplet::make_triplet;
pub use values::SolveValues;

use mcsg_kernel_geom::SurfaceKind;
use thiserror::Error;

/// Errors from the three-surface solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The surface is a composite or null surface with no single quadratic
    /// form.
    #[error("{kind} surface has no quadratic form")]
    NotQuadratic {
        /// The offending surface kind.
        kind: SurfaceKind,
    },
}
