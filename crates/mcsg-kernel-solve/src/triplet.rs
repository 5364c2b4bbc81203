//! Quadric coefficient vectors as trivariate polynomials.

use mcsg_kernel_poly::{PolyCoeff, PolyVar3};

/// Monomial powers `[x, y, z]` of `[A,B,C,D,E,F,G,H,J,K]`.
const POWERS: [[usize; 3]; 10] = [
    [2, 0, 0],
    [0, 2, 0],
    [0, 0, 2],
    [1, 1, 0],
    [1, 0, 1],
    [0, 1, 1],
    [1, 0, 0],
    [0, 1, 0],
    [0, 0, 1],
    [0, 0, 0],
];

/// The general quadratic `[A,B,C,D,E,F,G,H,J,K]` as a polynomial in
/// `(x, y, z)`.
pub fn make_triplet(eqn: &[f64; 10]) -> PolyVar3 {
    let mut p = PolyVar3::default();
    for (powers, &c) in POWERS.iter().zip(eqn.iter()) {
        if c != 0.0 {
            p.add_term(powers, c);
        }
    }
    p
}
