#![warn(missing_docs)]

//! Polynomial engine for the mcsg geometry kernel.
//!
//! Dense polynomials over `f64`:
//!
//! - [`PolyVar1`] - univariate, with closed-form roots up to degree 3 and
//!   Durand–Kerner iteration above that.
//! - [`PolyVar`] - recursive multivariate polynomial whose coefficients are
//!   polynomials in the remaining variables. [`PolyVar2`] is in `(x, y)`,
//!   [`PolyVar3`] in `(x, y, z)`; the last variable is the leading one.
//! - [`PolyVar::reduce`] - Bezout-resultant elimination of the leading
//!   variable from a pair of polynomials.
//!
//! # Example
//!
//! ```
//! use mcsg_kernel_poly::PolyVar1;
//!
//! let p: PolyVar1 = "x^3-9x^2+26x-24".parse().unwrap();
//! let roots = p.real_roots(1e-6);
//! assert_eq!(roots.len(), 3);
//! assert!((roots[0] - 2.0).abs() < 1e-9);
//! ```

mod bezout;
mod coeff;
mod parse;
mod poly1;
mod polyvar;
mod solve;

pub use coeff::PolyCoeff;
pub use num_complex::Complex64;
pub use poly1::PolyVar1;
pub use polyvar::{PolyVar, PolyVar2, PolyVar3};
pub use solve::{durand_kerner, solve_cubic, solve_quadratic, DK_MAX_ITER};

use thiserror::Error;

/// Errors from polynomial construction and access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolyError {
    /// The algebraic string could not be parsed.
    #[error("cannot parse polynomial `{input}`: {reason}")]
    Parse {
        /// The offending input.
        input: String,
        /// What went wrong.
        reason: String,
    },

    /// Coefficient index beyond the polynomial degree.
    #[error("coefficient index {index} out of range (degree {degree})")]
    Index {
        /// Requested index.
        index: usize,
        /// Current degree.
        degree: usize,
    },

    /// An operation needed a non-zero polynomial.
    #[error("empty value: {0}")]
    EmptyValue(&'static str),

    /// Wrong number of variables supplied or referenced.
    #[error("variable mismatch: expected {expected} variables, found {found}")]
    Mismatch {
        /// Variables the polynomial has.
        expected: usize,
        /// Variables supplied or referenced.
        found: usize,
    },
}
