//! Operations on the ten-coefficient general quadratic form.
//!
//! `eqn = [A, B, C, D, E, F, G, H, J, K]` represents
//! `f(p) = p^T Q p + L . p + K` with `Q` from
//! [`quadratic_matrix`](mcsg_kernel_math::quadratic_matrix) and
//! `L = (G, H, J)`.

use mcsg_kernel_math::{quadratic_matrix, Mat3, Point3, Vec3};
use mcsg_kernel_poly::PolyVar1;

/// Evaluate the quadratic form at `p`.
pub fn eqn_value(eqn: &[f64; 10], p: &Point3) -> f64 {
    let (x, y, z) = (p.x, p.y, p.z);
    eqn[0] * x * x
        + eqn[1] * y * y
        + eqn[2] * z * z
        + eqn[3] * x * y
        + eqn[4] * x * z
        + eqn[5] * y * z
        + eqn[6] * x
        + eqn[7] * y
        + eqn[8] * z
        + eqn[9]
}

/// Gradient of the quadratic form at `p`.
pub fn eqn_gradient(eqn: &[f64; 10], p: &Point3) -> Vec3 {
    let (x, y, z) = (p.x, p.y, p.z);
    Vec3::new(
        2.0 * eqn[0] * x + eqn[3] * y + eqn[4] * z + eqn[6],
        2.0 * eqn[1] * y + eqn[3] * x + eqn[5] * z + eqn[7],
        2.0 * eqn[2] * z + eqn[4] * x + eqn[5] * y + eqn[8],
    )
}

/// Assemble coefficients from the symmetric matrix `q`, linear part `l` and
/// constant `k`.
pub fn eqn_from_parts(q: &Mat3, l: &Vec3, k: f64) -> [f64; 10] {
    [
        q[(0, 0)],
        q[(1, 1)],
        q[(2, 2)],
        q[(0, 1)] + q[(1, 0)],
        q[(0, 2)] + q[(2, 0)],
        q[(1, 2)] + q[(2, 1)],
        l.x,
        l.y,
        l.z,
        k,
    ]
}

/// Coefficients of the image of the surface under `p -> r p + t`, with `r`
/// orthogonal.
///
/// `Q' = R Q R^T`, `L' = R L - 2 Q' t`, `K' = K + t^T Q' t - (R L) . t`.
pub fn transform_eqn(eqn: &[f64; 10], r: &Mat3, t: &Vec3) -> [f64; 10] {
    let q = quadratic_matrix(eqn);
    let l = Vec3::new(eqn[6], eqn[7], eqn[8]);
    let q2 = r * q * r.transpose();
    let rl = r * l;
    let qt = q2 * t;
    let l2 = rl - 2.0 * qt;
    let k2 = eqn[9] + t.dot(&qt) - rl.dot(t);
    eqn_from_parts(&q2, &l2, k2)
}

/// Scale so that the largest coefficient magnitude is one. The sign is kept,
/// so the inside/outside convention survives.
pub fn normalize_geq(eqn: &[f64; 10]) -> [f64; 10] {
    let m = eqn.iter().fold(0.0_f64, |acc, c| acc.max(c.abs()));
    if m == 0.0 {
        return *eqn;
    }
    eqn.map(|c| c / m)
}

/// True if the normalised coefficient vectors agree within `tol`.
pub fn eqn_equal(a: &[f64; 10], b: &[f64; 10], tol: f64) -> bool {
    let na = normalize_geq(a);
    let nb = normalize_geq(b);
    na.iter().zip(nb.iter()).all(|(x, y)| (x - y).abs() <= tol)
}

/// Euclidean distance from `p` to the quadric `eqn`.
///
/// Rotates into the eigenframe of `Q`, where the quadric reads
/// `sum l_i y_i^2 + g . y + K = 0`. A closest point satisfies
/// `y_i = (q_i + t g_i) / (1 - 2 t l_i)` for the Lagrange multiplier `t`;
/// substituting and clearing denominators gives a polynomial of degree at
/// most six in `t`. Every real root yields a candidate and the nearest wins.
pub fn quadric_distance(eqn: &[f64; 10], p: &Point3) -> f64 {
    if let Some(d) = lagrange_distance(eqn, p) {
        return d;
    }
    // a point on a symmetry element has a continuum of closest points
    let nudge = 1e-7 * (1.0 + p.coords.norm());
    let shifted = p + Vec3::new(nudge, nudge * 0.7, nudge * 0.3);
    if let Some(d) = lagrange_distance(eqn, &shifted) {
        return d;
    }
    let grad = eqn_gradient(eqn, p).norm();
    if grad > 0.0 {
        eqn_value(eqn, p).abs() / grad
    } else {
        f64::INFINITY
    }
}

fn lagrange_distance(eqn: &[f64; 10], p: &Point3) -> Option<f64> {
    let q = quadratic_matrix(eqn);
    let l = Vec3::new(eqn[6], eqn[7], eqn[8]);
    let eig = q.symmetric_eigen();
    let rt = eig.eigenvectors.transpose();
    let g = rt * l;
    let qy = rt * p.coords;
    let lam = eig.eigenvalues;

    let num: Vec<PolyVar1> = (0..3).map(|i| PolyVar1::new(vec![qy[i], g[i]])).collect();
    let den: Vec<PolyVar1> = (0..3)
        .map(|i| PolyVar1::new(vec![1.0, -2.0 * lam[i]]))
        .collect();
    let den_sq: Vec<PolyVar1> = den.iter().map(|d| d * d).collect();

    // product of den_j^2 over j != skip
    let others = |skip: Option<usize>| {
        (0..3)
            .filter(|j| Some(*j) != skip)
            .fold(PolyVar1::new(vec![1.0]), |acc, j| &acc * &den_sq[j])
    };

    let mut poly = &others(None) * eqn[9];
    for i in 0..3 {
        let rest = others(Some(i));
        let quad = &(&num[i] * &num[i]) * lam[i];
        let lin = &(&num[i] * &den[i]) * g[i];
        let term = &(&quad + &lin) * &rest;
        poly = &poly + &term;
    }

    let roots = if poly.degree() == 0 {
        // constant: zero only if every t works, i.e. p already on surface
        if eqn_value(eqn, p).abs() <= f64::EPSILON {
            return Some(0.0);
        }
        Vec::new()
    } else {
        poly.real_roots(1e-6)
    };

    let mut best: Option<f64> = None;
    for t in roots {
        let mut y = Vec3::zeros();
        let mut valid = true;
        for i in 0..3 {
            let d = den[i].value(t);
            if d.abs() < 1e-9 {
                valid = false;
                break;
            }
            y[i] = num[i].value(t) / d;
        }
        if !valid {
            continue;
        }
        let dist = (y - qy).norm();
        best = Some(best.map_or(dist, |b: f64| b.min(dist)));
    }
    best
}
