//! Closed-form quadratic/cubic roots and Durand–Kerner iteration.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Iteration cap for [`durand_kerner`].
pub const DK_MAX_ITER: usize = 300;

/// Relative size under which a leading coefficient counts as absent.
const DEGENERATE_REL: f64 = 1e-12;

/// Relative size under which a discriminant is snapped to zero.
const DISCRIMINANT_REL: f64 = 1e-14;

/// Roots of `a*x^2 + b*x + c = 0`.
///
/// Returns two roots (real ones in increasing order, or a conjugate pair with
/// negative imaginary part first), one root when the equation is linear
/// (`a` negligible), or none when it has no `x` dependence at all.
///
/// Uses `q = -(b + sign(b) sqrt(disc)) / 2` and roots `q/a`, `c/q` to avoid
/// cancellation. A repeated root is returned twice with identical values.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<Complex64> {
    let scale = a.abs() + b.abs() + c.abs();
    if scale == 0.0 {
        return Vec::new();
    }
    if a.abs() <= DEGENERATE_REL * scale {
        if b.abs() <= DEGENERATE_REL * scale {
            return Vec::new();
        }
        return vec![Complex64::new(-c / b, 0.0)];
    }

    let mut disc = b * b - 4.0 * a * c;
    if disc.abs() <= DISCRIMINANT_REL * (b * b + (4.0 * a * c).abs()) {
        disc = 0.0;
    }

    if disc >= 0.0 {
        let sgn = if b < 0.0 { -1.0 } else { 1.0 };
        let q = -0.5 * (b + sgn * disc.sqrt());
        let (r1, r2) = if q == 0.0 {
            // b == 0 and c == 0
            (0.0, 0.0)
        } else {
            (q / a, c / q)
        };
        let (lo, hi) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };
        vec![Complex64::new(lo, 0.0), Complex64::new(hi, 0.0)]
    } else {
        let re = -b / (2.0 * a);
        let im = (-disc).sqrt() / (2.0 * a.abs());
        vec![Complex64::new(re, -im), Complex64::new(re, im)]
    }
}

/// Roots of `a*x^3 + b*x^2 + c*x + d = 0`.
///
/// Works on the depressed cubic `t^3 + p t + q` and branches on the
/// discriminant `(q/2)^2 + (p/3)^3`: one real root and a conjugate pair
/// (Cardano), a repeated root, or three distinct real roots (trigonometric
/// form). Falls back to [`solve_quadratic`] when `a` is negligible.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Vec<Complex64> {
    let scale = a.abs() + b.abs() + c.abs() + d.abs();
    if a.abs() <= DEGENERATE_REL * scale {
        return solve_quadratic(b, c, d);
    }

    let (b, c, d) = (b / a, c / a, d / a);
    let shift = b / 3.0;
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;

    let half_q = q / 2.0;
    let third_p = p / 3.0;
    let mut delta = half_q * half_q + third_p * third_p * third_p;
    if delta.abs() <= DISCRIMINANT_REL * (half_q * half_q + third_p.abs().powi(3)) {
        delta = 0.0;
    }

    let real = |t: f64| Complex64::new(t - shift, 0.0);

    if delta > 0.0 {
        let sd = delta.sqrt();
        let u = (-half_q + sd).cbrt();
        let v = (-half_q - sd).cbrt();
        let re = -(u + v) / 2.0 - shift;
        let im = (u - v) * 3.0_f64.sqrt() / 2.0;
        vec![
            real(u + v),
            Complex64::new(re, -im.abs()),
            Complex64::new(re, im.abs()),
        ]
    } else if delta == 0.0 {
        if p.abs() <= DEGENERATE_REL * (1.0 + b.abs()) {
            vec![real(0.0), real(0.0), real(0.0)]
        } else {
            let single = 3.0 * q / p;
            let double = -3.0 * q / (2.0 * p);
            vec![real(single), real(double), real(double)]
        }
    } else {
        // p < 0 here
        let m = 2.0 * (-third_p).sqrt();
        let arg = ((3.0 * q) / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
        let theta = arg.acos() / 3.0;
        let mut roots: Vec<Complex64> = (0..3)
            .map(|k| real(m * (theta - 2.0 * PI * k as f64 / 3.0).cos()))
            .collect();
        roots.sort_by(|x, y| x.re.total_cmp(&y.re));
        roots
    }
}

/// All complex roots of the polynomial with coefficients `coeffs`
/// (increasing power, leading coefficient non-zero) by Durand–Kerner
/// simultaneous iteration.
///
/// Starts from powers of `0.4 + 0.9i` and updates in place with
/// `z_i -= f(z_i) / prod_{j != i}(z_i - z_j)` until every update is below
/// `eps / 100` or [`DK_MAX_ITER`] sweeps have run.
pub fn durand_kerner(coeffs: &[f64], eps: f64) -> Vec<Complex64> {
    if coeffs.len() < 2 {
        return Vec::new();
    }
    let n = coeffs.len() - 1;
    let lead = coeffs[n];
    let monic: Vec<f64> = coeffs.iter().map(|c| c / lead).collect();

    let seed = Complex64::new(0.4, 0.9);
    let mut z: Vec<Complex64> = (0..n).map(|i| seed.powu(i as u32)).collect();
    let target = eps / 100.0;

    for iter in 0..DK_MAX_ITER {
        let mut max_step = 0.0_f64;
        for i in 0..n {
            let num = horner(&monic, z[i]);
            let mut den = Complex64::new(1.0, 0.0);
            for (j, zj) in z.iter().enumerate() {
                if j != i {
                    den *= z[i] - zj;
                }
            }
            if den.norm() < f64::MIN_POSITIVE {
                // coincident estimates: nudge apart and keep iterating
                z[i] += Complex64::new(eps, eps);
                max_step = f64::INFINITY;
                continue;
            }
            let step = num / den;
            z[i] -= step;
            max_step = max_step.max(step.norm());
        }
        if max_step < target {
            log::trace!("durand-kerner converged: degree {} in {} sweeps", n, iter + 1);
            return z;
        }
    }
    log::trace!("durand-kerner hit iteration cap for degree {}", n);
    z
}

/// Evaluate `coeffs` (increasing power) at complex `z`.
pub(crate) fn horner(coeffs: &[f64], z: Complex64) -> Complex64 {
    coeffs
        .iter()
        .rev()
        .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * z + c)
}
