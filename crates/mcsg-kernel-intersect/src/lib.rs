#![warn(missing_docs)]

//! Line-surface intersection for the mcsg geometry kernel.
//!
//! - [`Line`] - origin plus unit direction, with per-surface [`Line::intersect`]
//! - [`intersect`] - the intersection algorithm for each surface kind
//! - [`LineIntersectVisit`] - runs one line against many surfaces and keeps
//!   the hits ordered along the line
//!
//! Intersections are reported as signed line parameters `λ`, so points
//! behind the origin are kept as well as those ahead of it.
//!
//! # Example
//!
//! ```
//! use mcsg_kernel_geom::Surface;
//! use mcsg_kernel_intersect::Line;
//! use mcsg_kernel_math::{Point3, Vec3};
//!
//! let plane: Surface = "px 80".parse().unwrap();
//! let line = Line::new(Point3::origin(), Vec3::x());
//! let mut out = Vec::new();
//! assert_eq!(line.intersect(&mut out, &plane), 1);
//! assert_eq!(out[0].x, 80.0);
//! ```

pub mod intersect;
mod line;
mod visit;

pub use line::Line;
pub use visit::{InterPoint, LineIntersectVisit};

/// Largest imaginary part for which a root of the line quadratic still
/// counts as real.
///
/// This separates real from complex roots and is far tighter than the
/// geometric zero tolerance.
pub const IMAG_TOL: f64 = 1e-38;
