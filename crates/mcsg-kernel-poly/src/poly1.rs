//! Univariate polynomial.

use crate::coeff::{fmt_monomials, PolyCoeff};
use crate::parse::parse_monomials;
use crate::solve::{durand_kerner, horner, solve_cubic, solve_quadratic};
use crate::PolyError;
use num_complex::Complex64;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Newton steps applied to each real root after extraction.
const POLISH_STEPS: usize = 3;

/// A dense polynomial in one variable.
///
/// `coeffs[i]` multiplies `x^i`. There is always at least one coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct PolyVar1 {
    coeffs: Vec<f64>,
}

impl PolyVar1 {
    /// Create from coefficients in increasing power.
    pub fn new(coeffs: Vec<f64>) -> Self {
        if coeffs.is_empty() {
            return Self::default();
        }
        Self { coeffs }
    }

    /// The monic polynomial with the given real roots.
    pub fn from_roots(roots: &[f64]) -> Self {
        roots.iter().fold(Self::constant(1.0), |acc, &r| {
            acc.product(&Self::new(vec![-r, 1.0]))
        })
    }

    /// Coefficients in increasing power.
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// Degree (number of coefficients minus one, uncompressed).
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Coefficient of `x^index`.
    pub fn coef(&self, index: usize) -> Result<f64, PolyError> {
        self.coeffs.get(index).copied().ok_or(PolyError::Index {
            index,
            degree: self.degree(),
        })
    }

    /// Evaluate at `x` (Horner).
    pub fn value(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    /// Evaluate at complex `z`.
    pub fn value_complex(&self, z: Complex64) -> Complex64 {
        horner(&self.coeffs, z)
    }

    /// First derivative.
    pub fn derivative(&self) -> Self {
        if self.coeffs.len() < 2 {
            return Self::default();
        }
        Self::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| c * i as f64)
                .collect(),
        )
    }

    /// Divide through by the leading coefficient.
    pub fn make_monic(&self) -> Result<Self, PolyError> {
        let mut p = self.clone();
        p.compress(0.0);
        let lead = p.coeffs[p.degree()];
        if lead == 0.0 {
            return Err(PolyError::EmptyValue("monic form of the zero polynomial"));
        }
        p *= 1.0 / lead;
        Ok(p)
    }

    /// All complex roots.
    ///
    /// Exact zero roots are factored out first. Degree up to 3 is solved in
    /// closed form, anything higher by Durand–Kerner. The zero polynomial and
    /// non-zero constants have no roots.
    pub fn calc_roots(&self) -> Vec<Complex64> {
        let mut p = self.clone();
        p.compress(DEFAULT_COMPRESS);

        let zeros = p.coeffs.iter().take_while(|&&c| c == 0.0).count();
        if zeros == p.coeffs.len() {
            return Vec::new();
        }
        let mut roots = vec![Complex64::new(0.0, 0.0); zeros];
        let reduced = Self::new(p.coeffs[zeros..].to_vec());

        match reduced.check_small_poly() {
            Some(small) => roots.extend(small),
            None => roots.extend(reduced.calc_durand_kerner_roots(DEFAULT_EPS)),
        }
        roots
    }

    /// Closed-form roots for degree 0 to 3; `None` for anything larger.
    pub fn check_small_poly(&self) -> Option<Vec<Complex64>> {
        let c = &self.coeffs;
        match self.degree() {
            0 => Some(Vec::new()),
            1 => Some(solve_quadratic(0.0, c[1], c[0])),
            2 => Some(solve_quadratic(c[2], c[1], c[0])),
            3 => Some(solve_cubic(c[3], c[2], c[1], c[0])),
            _ => None,
        }
    }

    /// Durand–Kerner roots regardless of degree.
    pub fn calc_durand_kerner_roots(&self, eps: f64) -> Vec<Complex64> {
        let mut p = self.clone();
        p.compress(0.0);
        durand_kerner(&p.coeffs, eps)
    }

    /// Real roots: complex roots with `|im| < eps`, polished, sorted and
    /// de-duplicated within `eps`.
    pub fn real_roots(&self, eps: f64) -> Vec<f64> {
        let deriv = self.derivative();
        let mut out: Vec<f64> = self
            .calc_roots()
            .into_iter()
            .filter(|z| z.im.abs() < eps)
            .map(|z| self.polish(&deriv, z.re, eps))
            .collect();
        out.sort_by(f64::total_cmp);
        out.dedup_by(|a, b| (*a - *b).abs() < eps * (1.0 + b.abs()));
        out
    }

    /// A few Newton steps; abandoned near multiple roots or if a step is large.
    fn polish(&self, deriv: &PolyVar1, mut x: f64, eps: f64) -> f64 {
        for _ in 0..POLISH_STEPS {
            let d = deriv.value(x);
            if d.abs() <= eps.sqrt() * self.max_abs().max(1.0) {
                break;
            }
            let step = self.value(x) / d;
            if !step.is_finite() || step.abs() > eps.sqrt() * (1.0 + x.abs()) {
                break;
            }
            x -= step;
        }
        x
    }
}

/// Relative threshold used by [`PolyVar1::calc_roots`] to drop noise terms.
const DEFAULT_COMPRESS: f64 = 1e-14;

/// Durand–Kerner convergence target used by [`PolyVar1::calc_roots`].
const DEFAULT_EPS: f64 = 1e-6;

impl Default for PolyVar1 {
    fn default() -> Self {
        Self { coeffs: vec![0.0] }
    }
}

impl PolyCoeff for PolyVar1 {
    const VARS: usize = 1;

    fn constant(c: f64) -> Self {
        Self { coeffs: vec![c] }
    }

    fn product(&self, other: &Self) -> Self {
        let mut out = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if *a == 0.0 {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Self { coeffs: out }
    }

    fn max_abs(&self) -> f64 {
        self.coeffs.iter().fold(0.0, |m, c| m.max(c.abs()))
    }

    fn is_zero(&self, eps: f64) -> bool {
        self.coeffs.iter().all(|c| c.abs() <= eps)
    }

    fn compress(&mut self, eps: f64) {
        let limit = eps * self.max_abs();
        while self.coeffs.len() > 1 && self.coeffs[self.coeffs.len() - 1].abs() <= limit {
            self.coeffs.pop();
        }
    }

    fn eval(&self, vals: &[f64]) -> f64 {
        self.value(vals[0])
    }

    fn variable_flag(&self) -> u32 {
        if self.coeffs.iter().skip(1).any(|&c| c != 0.0) {
            1
        } else {
            0
        }
    }

    fn partial(&self, var: usize) -> Self {
        if var == 0 {
            self.derivative()
        } else {
            Self::default()
        }
    }

    fn add_term(&mut self, powers: &[usize], c: f64) {
        let p = powers.first().copied().unwrap_or(0);
        if self.coeffs.len() <= p {
            self.coeffs.resize(p + 1, 0.0);
        }
        self.coeffs[p] += c;
    }

    fn monomials(&self) -> Vec<(Vec<usize>, f64)> {
        self.coeffs
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != 0.0)
            .map(|(i, &c)| (vec![i], c))
            .collect()
    }
}

impl<'a> AddAssign<&'a PolyVar1> for PolyVar1 {
    fn add_assign(&mut self, rhs: &'a PolyVar1) {
        if self.coeffs.len() < rhs.coeffs.len() {
            self.coeffs.resize(rhs.coeffs.len(), 0.0);
        }
        for (a, b) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *a += b;
        }
    }
}

impl<'a> SubAssign<&'a PolyVar1> for PolyVar1 {
    fn sub_assign(&mut self, rhs: &'a PolyVar1) {
        if self.coeffs.len() < rhs.coeffs.len() {
            self.coeffs.resize(rhs.coeffs.len(), 0.0);
        }
        for (a, b) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *a -= b;
        }
    }
}

impl MulAssign<f64> for PolyVar1 {
    fn mul_assign(&mut self, rhs: f64) {
        self.coeffs.iter_mut().for_each(|c| *c *= rhs);
    }
}

impl Neg for PolyVar1 {
    type Output = PolyVar1;

    fn neg(mut self) -> PolyVar1 {
        self *= -1.0;
        self
    }
}

impl Add for &PolyVar1 {
    type Output = PolyVar1;

    fn add(self, rhs: &PolyVar1) -> PolyVar1 {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl Sub for &PolyVar1 {
    type Output = PolyVar1;

    fn sub(self, rhs: &PolyVar1) -> PolyVar1 {
        let mut out = self.clone();
        out -= rhs;
        out
    }
}

impl Mul for &PolyVar1 {
    type Output = PolyVar1;

    fn mul(self, rhs: &PolyVar1) -> PolyVar1 {
        self.product(rhs)
    }
}

impl Mul<f64> for &PolyVar1 {
    type Output = PolyVar1;

    fn mul(self, rhs: f64) -> PolyVar1 {
        let mut out = self.clone();
        out *= rhs;
        out
    }
}

impl fmt::Display for PolyVar1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_monomials(f, self.monomials())
    }
}

impl FromStr for PolyVar1 {
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
