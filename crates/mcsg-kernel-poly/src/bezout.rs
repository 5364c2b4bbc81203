//! Variable elimination by Bezout resultant.
//!
//! For `f` and `g` of degree at most `n` in the leading variable,
//! `(f(s) g(t) - f(t) g(s)) / (s - t) = sum B[i][j] s^i t^j` defines the
//! `n x n` Bezout matrix. Its determinant is (up to sign) the resultant, a
//! polynomial in the inner variables that vanishes wherever `f` and `g`
//! share a root in the leading variable.

use crate::coeff::PolyCoeff;
use crate::polyvar::PolyVar;

impl<T: PolyCoeff> PolyVar<T> {
    /// Eliminate the leading variable from `self` and `other`.
    ///
    /// Fast paths: if either polynomial does not involve the leading variable
    /// it is itself the eliminated condition; if either is linear in it the
    /// resultant is formed by direct substitution. Otherwise the Bezout
    /// matrix determinant is expanded.
    ///
    /// When one operand is free of the leading variable, only that operand
    /// is returned (`self` first). The true resultant is a power of it, so
    /// the zero set is the same, but nothing of the other operand survives:
    /// callers eliminating from a system must reduce every pair, as
    /// `SolveValues` does.
    pub fn reduce(&self, other: &Self) -> T {
        let mut a = self.clone();
        let mut b = other.clone();
        a.compress(0.0);
        b.compress(0.0);

        match (a.degree(), b.degree()) {
            (0, _) => a.coeffs()[0].clone(),
            (_, 0) => b.coeffs()[0].clone(),
            (1, _) => eliminate_linear(&a, &b),
            (_, 1) => eliminate_linear(&b, &a),
            _ => determinant(&bezout_matrix(a.coeffs(), b.coeffs())),
        }
    }
}

/// Resultant of `lin = a1 v + a0` with `g`: substitute `v = -a0 / a1` and
/// clear denominators, `sum_k g_k (-a0)^k a1^(n-k)`.
fn eliminate_linear<T: PolyCoeff>(lin: &PolyVar<T>, g: &PolyVar<T>) -> T {
    let a0 = -lin.coeffs()[0].clone();
    let a1 = &lin.coeffs()[1];
    let n = g.degree();

    let mut pow_a0 = vec![T::constant(1.0)];
    let mut pow_a1 = vec![T::constant(1.0)];
    for k in 1..=n {
        pow_a0.push(pow_a0[k - 1].product(&a0));
        pow_a1.push(pow_a1[k - 1].product(a1));
    }

    let mut res = T::default();
    for (k, gk) in g.coeffs().iter().enumerate() {
        if gk.is_zero(0.0) {
            continue;
        }
        res += &gk.product(&pow_a0[k]).product(&pow_a1[n - k]);
    }
    res
}

/// The `n x n` Bezout matrix of two coefficient lists.
pub(crate) fn bezout_matrix<T: PolyCoeff>(f: &[T], g: &[T]) -> Vec<Vec<T>> {
    let n = f.len().max(g.len()) - 1;
    let zero = T::default();
    let at = |v: &[T], i: usize| v.get(i).cloned().unwrap_or_else(|| zero.clone());

    let mut m = vec![vec![T::default(); n]; n];
    for p in 1..=n {
        for q in 0..p {
            let mut c = at(f, p).product(&at(g, q));
            c -= &at(f, q).product(&at(g, p));
            if c.is_zero(0.0) {
                continue;
            }
            for r in 0..(p - q) {
                m[q + r][p - 1 - r] += &c;
            }
        }
    }
    m
}

/// Laplace expansion along the first row.
pub(crate) fn determinant<T: PolyCoeff>(m: &[Vec<T>]) -> T {
    match m.len() {
        0 => T::constant(1.0),
        1 => m[0][0].clone(),
        2 => {
            let mut d = m[0][0].product(&m[1][1]);
            d -= &m[0][1].product(&m[1][0]);
            d
        }
        n => {
            let mut det = T::default();
            for j in 0..n {
                if m[0][j].is_zero(0.0) {
                    continue;
                }
                let minor: Vec<Vec<T>> = m[1..]
                    .iter()
                    .map(|row| {
                        row.iter()
                            .enumerate()
                            .filter(|(k, _)| *k != j)
                            .map(|(_, v)| v.clone())
                            .collect()
                    })
                    .collect();
                let term = m[0][j].product(&determinant(&minor));
                if j % 2 == 0 {
                    det += &term;
                } else {
                    det -= &term;
                }
            }
            det
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PolyVar1, PolyVar2, PolyVar3};

    fn roots_of(p: &PolyVar1) -> Vec<f64> {
        p.real_roots(1e-6)
    }

    #[test]
    fn test_reduce_two_lines() {
        // y = x + 1 and y = 3 - x meet at x = 1
        let a: PolyVar2 = "y-x-1".parse().unwrap();
        let b: PolyVar2 = "y+x-3".parse().unwrap();
        let r = a.reduce(&b);
        let roots = roots_of(&r);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reduce_circle_and_line() {
        // x^2 + y^2 = 25 with y = x + 1 -> x = 3 or x = -4
        let circle: PolyVar2 = "x^2+y^2-25".parse().unwrap();
        let line: PolyVar2 = "y-x-1".parse().unwrap();
        let roots = roots_of(&circle.reduce(&line));
        assert_eq!(roots.len(), 2);
        assert!((roots[0] + 4.0).abs() < 1e-9);
        assert!((roots[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_reduce_two_circles() {
        // x^2 + y^2 = 25 and (x-3)^2 + y^2 = 16 meet at x = 3
        let a: PolyVar2 = "x^2+y^2-25".parse().unwrap();
        let b: PolyVar2 = "x^2-6x+y^2-7".parse().unwrap();
        let r = a.reduce(&b);
        let roots = roots_of(&r);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_reduce_missing_variable() {
        let a: PolyVar3 = "x^2+y^2-1".parse().unwrap();
        let b: PolyVar3 = "z-2".parse().unwrap();
        let r = a.reduce(&b);
        assert!((r.eval(&[1.0, 0.0]) - 0.0).abs() < 1e-12);
        assert!((r.eval(&[0.0, 0.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reduce_constant_operand_is_returned_alone() {
        let free: PolyVar2 = "x-2".parse().unwrap();
        let circle: PolyVar2 = "x^2+y^2-25".parse().unwrap();
        // x = 2 alone, whichever side it is on; the circle adds nothing
        assert_eq!(free.reduce(&circle).coeffs(), &[-2.0, 1.0]);
        assert_eq!(circle.reduce(&free).coeffs(), &[-2.0, 1.0]);

        let other: PolyVar2 = "x+3".parse().unwrap();
        assert_eq!(free.reduce(&other).coeffs(), &[-2.0, 1.0]);
        assert_eq!(other.reduce(&free).coeffs(), &[3.0, 1.0]);
    }

    #[test]
    fn test_bezout_matrix_quadratics() {
        // f = s^2 + a0, g = s^2 + b0 -> B = [[0, b0-a0],[b0-a0, 0]]
        let f = vec![PolyVar1::constant(2.0), PolyVar1::default(), PolyVar1::constant(1.0)];
        let g = vec![PolyVar1::constant(-3.0), PolyVar1::default(), PolyVar1::constant(1.0)];
        let m = bezout_matrix(&f, &g);
        assert_eq!(m.len(), 2);
        assert_eq!(m[0][1].coeffs(), &[-5.0]);
        assert_eq!(m[1][0].coeffs(), &[-5.0]);
        assert!(m[0][0].is_zero(0.0));
        assert_eq!(determinant(&m).coeffs(), &[-25.0]);
    }

    #[test]
    fn test_determinant_3x3() {
        let c = |v: f64| PolyVar1::constant(v);
        let m = vec![
            vec![c(2.0), c(0.0), c(1.0)],
            vec![c(1.0), c(3.0), c(2.0)],
            vec![c(1.0), c(1.0), c(1.0)],
        ];
        // 2(3-2) - 0 + 1(1-3) = 0
        assert!(determinant(&m).is_zero(1e-12));
        let m2 = vec![
            vec![c(1.0), c(2.0), c(3.0)],
            vec![c(0.0), c(1.0), c(4.0)],
            vec![c(5.0), c(6.0), c(0.0)],
        ];
        assert_eq!(determinant(&m2).coeffs(), &[1.0]);
    }
}
