//! Recursive multivariate polynomial.

use crate::coeff::{fmt_monomials, PolyCoeff};
use crate::parse::parse_monomials;
use crate::poly1::PolyVar1;
use crate::PolyError;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A polynomial in its leading variable whose coefficients are polynomials
/// of type `T` in the remaining (inner) variables.
///
/// `coeffs[i]` multiplies `v^i` where `v` is the leading variable. There is
/// always at least one coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyVar<T: PolyCoeff> {
    coeffs: Vec<T>,
}

/// Polynomial in `(x, y)`; `y` leads.
pub type PolyVar2 = PolyVar<PolyVar1>;

/// Polynomial in `(x, y, z)`; `z` leads.
pub type PolyVar3 = PolyVar<PolyVar2>;

impl<T: PolyCoeff> PolyVar<T> {
    /// Create from coefficients in increasing power of the leading variable.
    pub fn new(coeffs: Vec<T>) -> Self {
        if coeffs.is_empty() {
            return Self::default();
        }
        Self { coeffs }
    }

    /// Coefficients in increasing power of the leading variable.
    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }

    /// Coefficient of `v^index`.
    pub fn coef(&self, index: usize) -> Result<&T, PolyError> {
        self.coeffs.get(index).ok_or(PolyError::Index {
            index,
            degree: self.degree(),
        })
    }

    /// Degree in the leading variable (uncompressed).
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// The coefficient of the highest power of the leading variable.
    pub fn leading(&self) -> &T {
        &self.coeffs[self.coeffs.len() - 1]
    }

    /// The inner polynomial when the leading variable does not occur.
    pub fn as_lower(&self) -> Option<&T> {
        if self.coeffs.iter().skip(1).all(|c| c.is_zero(0.0)) {
            Some(&self.coeffs[0])
        } else {
            None
        }
    }

    /// Index of the only variable that occurs, if exactly one does.
    pub fn single_var(&self) -> Option<usize> {
        let flag = self.variable_flag();
        if flag.count_ones() == 1 {
            Some(flag.trailing_zeros() as usize)
        } else {
            None
        }
    }

    /// Substitute `inner[k]` for every inner variable `k`, leaving a
    /// univariate polynomial in the leading variable.
    pub fn substitute_inner(&self, inner: &[f64]) -> PolyVar1 {
        PolyVar1::new(self.coeffs.iter().map(|c| c.eval(inner)).collect())
    }

    /// Evaluate with a length check.
    pub fn try_eval(&self, vals: &[f64]) -> Result<f64, PolyError> {
        if vals.len() < Self::VARS {
            return Err(PolyError::Mismatch {
                expected: Self::VARS,
                found: vals.len(),
            });
        }
        Ok(self.eval(vals))
    }
}

impl<T: PolyCoeff> Default for PolyVar<T> {
    fn default() -> Self {
        Self {
            coeffs: vec![T::default()],
        }
    }
}

impl<T: PolyCoeff> PolyCoeff for PolyVar<T> {
    const VARS: usize = T::VARS + 1;

    fn constant(c: f64) -> Self {
        Self {
            coeffs: vec![T::constant(c)],
        }
    }

    fn product(&self, other: &Self) -> Self {
        let mut out = vec![T::default(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero(0.0) {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                if b.is_zero(0.0) {
                    continue;
                }
                out[i + j] += &a.product(b);
            }
        }
        Self { coeffs: out }
    }

    fn max_abs(&self) -> f64 {
        self.coeffs.iter().fold(0.0, |m, c| m.max(c.max_abs()))
    }

    fn is_zero(&self, eps: f64) -> bool {
        self.coeffs.iter().all(|c| c.is_zero(eps))
    }

    fn compress(&mut self, eps: f64) {
        for c in &mut self.coeffs {
            c.compress(eps);
        }
        let limit = eps * self.max_abs();
        while self.coeffs.len() > 1 && self.coeffs[self.coeffs.len() - 1].is_zero(limit) {
            self.coeffs.pop();
        }
    }

    fn eval(&self, vals: &[f64]) -> f64 {
        let v = vals[Self::VARS - 1];
        self.coeffs
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * v + c.eval(vals))
    }

    fn variable_flag(&self) -> u32 {
        let inner = self
            .coeffs
            .iter()
            .fold(0, |flag, c| flag | c.variable_flag());
        if self.coeffs.iter().skip(1).any(|c| !c.is_zero(0.0)) {
            inner | (1 << (Self::VARS - 1))
        } else {
            inner
        }
    }

    fn partial(&self, var: usize) -> Self {
        if var == Self::VARS - 1 {
            if self.coeffs.len() < 2 {
                return Self::default();
            }
            let coeffs = self
                .coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| {
                    let mut d = c.clone();
                    d *= i as f64;
                    d
                })
                .collect();
            Self { coeffs }
        } else {
            Self {
                coeffs: self.coeffs.iter().map(|c| c.partial(var)).collect(),
            }
        }
    }

    fn add_term(&mut self, powers: &[usize], c: f64) {
        let p = powers.get(Self::VARS - 1).copied().unwrap_or(0);
        if self.coeffs.len() <= p {
            self.coeffs.resize(p + 1, T::default());
        }
        self.coeffs[p].add_term(powers, c);
    }

    fn monomials(&self) -> Vec<(Vec<usize>, f64)> {
        let mut out = Vec::new();
        for (p, coef) in self.coeffs.iter().enumerate() {
            for (mut powers, c) in coef.monomials() {
                powers.push(p);
                out.push((powers, c));
            }
        }
        out
    }
}

impl<'a, T: PolyCoeff> AddAssign<&'a PolyVar<T>> for PolyVar<T> {
    fn add_assign(&mut self, rhs: &'a PolyVar<T>) {
        if self.coeffs.len() < rhs.coeffs.len() {
            self.coeffs.resize(rhs.coeffs.len(), T::default());
        }
        for (a, b) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *a += b;
        }
    }
}

impl<'a, T: PolyCoeff> SubAssign<&'a PolyVar<T>> for PolyVar<T> {
    fn sub_assign(&mut self, rhs: &'a PolyVar<T>) {
        if self.coeffs.len() < rhs.coeffs.len() {
            self.coeffs.resize(rhs.coeffs.len(), T::default());
        }
        for (a, b) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *a -= b;
        }
    }
}

impl<T: PolyCoeff> MulAssign<f64> for PolyVar<T> {
    fn mul_assign(&mut self, rhs: f64) {
        for c in &mut self.coeffs {
            *c *= rhs;
        }
    }
}

impl<T: PolyCoeff> Neg for PolyVar<T> {
    type Output = PolyVar<T>;

    fn neg(self) -> PolyVar<T> {
        Self {
            coeffs: self.coeffs.into_iter().map(|c| -c).collect(),
        }
    }
}

impl<T: PolyCoeff> Add for &PolyVar<T> {
    type Output = PolyVar<T>;

    fn add(self, rhs: &PolyVar<T>) -> PolyVar<T> {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl<T: PolyCoeff> Sub for &PolyVar<T> {
    type Output = PolyVar<T>;

    fn sub(self, rhs: &PolyVar<T>) -> PolyVar<T> {
        let mut out = self.clone();
        out -= rhs;
        out
    }
}

impl<T: PolyCoeff> Mul for &PolyVar<T> {
    type Output = PolyVar<T>;

    fn mul(self, rhs: &PolyVar<T>) -> PolyVar<T> {
        self.product(rhs)
    }
}

impl<T: PolyCoeff> fmt::Display for PolyVar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_monomials(f, self.monomials())
    }
}

impl<T: PolyCoeff> FromStr for PolyVar<T> {
    type Err = PolyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut p = Self::default();
        for (powers, c) in parse_monomials(s, Self::VARS)? {
            p.add_term(&powers, c);
        }
        p.compress(0.0);
        Ok(p)
    }
}
