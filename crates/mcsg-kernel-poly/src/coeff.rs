//! The recursive coefficient trait shared by every polynomial level.

use std::fmt;
use std::ops::{AddAssign, MulAssign, Neg, SubAssign};

/// Behaviour common to [`PolyVar1`](crate::PolyVar1) and every
/// [`PolyVar<T>`](crate::PolyVar), so that a polynomial in `N` variables can
/// use a polynomial in `N - 1` variables as its coefficient type.
///
/// Variable `0` is `x`, the innermost. A polynomial with `VARS == n` treats
/// variable `n - 1` as its leading variable.
pub trait PolyCoeff:
    Clone
    + fmt::Debug
    + PartialEq
    + Default
    + for<'a> AddAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + MulAssign<f64>
    + Neg<Output = Self>
{
    /// Number of variables.
    const VARS: usize;

    /// The constant polynomial `c`.
    fn constant(c: f64) -> Self;

    /// Polynomial product.
    fn product(&self, other: &Self) -> Self;

    /// Largest absolute coefficient.
    fn max_abs(&self) -> f64;

    /// True if every coefficient satisfies `|c| <= eps`.
    fn is_zero(&self, eps: f64) -> bool;

    /// Drop leading coefficients that are negligible relative to the largest
    /// coefficient (`|c| <= eps * max_abs`). At least one coefficient is kept.
    fn compress(&mut self, eps: f64);

    /// Evaluate with `vals[k]` substituted for variable `k`.
    ///
    /// `vals` must hold at least `VARS` entries.
    fn eval(&self, vals: &[f64]) -> f64;

    /// Bit `k` is set when variable `k` occurs with non-zero power.
    fn variable_flag(&self) -> u32;

    /// Partial derivative with respect to variable `var`.
    fn partial(&self, var: usize) -> Self;

    /// Add `c * x^powers[0] * y^powers[1] * ...`.
    fn add_term(&mut self, powers: &[usize], c: f64);

    /// All non-zero monomials as `(powers, coefficient)`.
    fn monomials(&self) -> Vec<(Vec<usize>, f64)>;

    /// Scale so that the largest coefficient has magnitude one.
    fn normalize(&mut self) {
        let m = self.max_abs();
        if m > 0.0 {
            *self *= 1.0 / m;
        }
    }
}

const VAR_NAMES: [char; 4] = ['x', 'y', 'z', 'w'];

/// Write monomials as `3x^2y-2z+1`, highest powers of the leading variable first.
pub(crate) fn fmt_monomials(
    f: &mut fmt::Formatter<'_>,
    mut terms: Vec<(Vec<usize>, f64)>,
) -> fmt::Result {
    if terms.is_empty() {
        return write!(f, "0");
    }
    terms.sort_by(|a, b| b.0.iter().rev().cmp(a.0.iter().rev()));

    for (i, (powers, c)) in terms.iter().enumerate() {
        let is_const = powers.iter().all(|&p| p == 0);
        let mag = c.abs();
        if *c < 0.0 {
            write!(f, "-")?;
        } else if i > 0 {
            write!(f, "+")?;
        }
        if is_const || mag != 1.0 {
            write!(f, "{}", mag)?;
        }
        for (k, &p) in powers.iter().enumerate() {
            let name = VAR_NAMES.get(k).copied().unwrap_or('?');
            match p {
                0 => {}
                1 => write!(f, "{}", name)?,
                _ => write!(f, "{}^{}", name, p)?,
            }
        }
    }
    Ok(())
}
