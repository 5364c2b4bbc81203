//! Common real roots of three trivariate polynomials.

use log::debug;
use mcsg_kernel_math::{Mat3, Point3, Tolerance, Vec3};
use mcsg_kernel_poly::{PolyCoeff, PolyVar1, PolyVar2, PolyVar3};

use crate::make_triplet;

/// Coefficients below this fraction of the largest are elimination noise.
const NOISE: f64 = 1e-10;

/// Newton iterations used to polish a candidate point.
const NEWTON_STEPS: usize = 8;

const PAIRS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];

/// Solver for the real points where three polynomials in `(x, y, z)`
/// vanish together.
///
/// `z` is eliminated pairwise by Bezout resultants, leaving polynomials in
/// `(x, y)`; `y` is eliminated the same way, leaving polynomials in `x`.
/// Roots of the lowest-degree one are back-substituted to recover `y` and
/// then `z`. Every candidate is Newton-polished on the three original
/// equations and kept only when all residuals are below
/// [`Tolerance::residual`].
///
/// A system that is not fully determined (two equations the same surface,
/// or an elimination that vanishes identically) has no isolated points and
/// yields none. So does an inconsistent one.
///
/// ```
/// use mcsg_kernel_solve::SolveValues;
///
/// let mut sv = SolveValues::new(
///     "x-23".parse().unwrap(),
///     "y-10".parse().unwrap(),
///     "z-30".parse().unwrap(),
/// );
/// assert_eq!(sv.solve_all(), 1);
/// assert!((sv.answers()[0].y - 10.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct SolveValues {
    eqns: [PolyVar3; 3],
    grads: [[PolyVar3; 3]; 3],
    tol: Tolerance,
    answers: Vec<Point3>,
}

impl SolveValues {
    /// Solver for `a = b = c = 0`. Each equation is scaled so its largest
    /// coefficient has magnitude one.
    pub fn new(a: PolyVar3, b: PolyVar3, c: PolyVar3) -> Self {
        let eqns = [a, b, c].map(|mut p| {
            p.compress(0.0);
            p.normalize();
            p
        });
        let grads = [0, 1, 2].map(|i| [0, 1, 2].map(|v| eqns[i].partial(v)));
        Self {
            eqns,
            grads,
            tol: Tolerance::DEFAULT,
            answers: Vec::new(),
        }
    }

    /// Solver for three quadrics `[A,B,C,D,E,F,G,H,J,K]`.
    pub fn from_quadrics(a: &[f64; 10], b: &[f64; 10], c: &[f64; 10]) -> Self {
        Self::new(make_triplet(a), make_triplet(b), make_triplet(c))
    }

    /// Use `tol` for root extraction, residuals and point dedup.
    pub fn with_tolerance(mut self, tol: Tolerance) -> Self {
        self.tol = tol;
        self
    }

    /// The three (normalized) equations.
    pub fn equations(&self) -> &[PolyVar3; 3] {
        &self.eqns
    }

    /// Points found by the last [`solve_all`](Self::solve_all).
    pub fn answers(&self) -> &[Point3] {
        &self.answers
    }

    /// Find every isolated real solution; returns how many were found.
    pub fn solve_all(&mut self) -> usize {
        self.answers.clear();
        let candidates = self.candidates();
        let tried = candidates.len();
        for p in candidates {
            let p = self.polish(p);
            if self.max_residual(&p) >= self.tol.residual {
                continue;
            }
            if !self.answers.iter().any(|q| self.tol.points_equal(q, &p)) {
                self.answers.push(p);
            }
        }
        debug!("solve_all: {} of {} candidates accepted", self.answers.len(), tried);
        self.answers.len()
    }

    fn candidates(&self) -> Vec<Point3> {
        let Some(planar) = self.eliminate_z() else {
            return Vec::new();
        };
        let Some(outer) = self.eliminate_y(&planar) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for x in self.candidate_roots(&outer) {
            let Some(middle) = lowest_degree(planar.iter().map(|p| p.substitute_inner(&[x]))) else {
                continue;
            };
            for y in self.candidate_roots(&middle) {
                let Some(inner) = lowest_degree(self.eqns.iter().map(|p| p.substitute_inner(&[x, y])))
                else {
                    continue;
                };
                out.extend(self.candidate_roots(&inner).into_iter().map(|z| Point3::new(x, y, z)));
            }
        }
        out
    }

    /// Pairwise resultants in `z`, cleaned of noise; identically zero ones
    /// are dropped. `None` when nothing is left or a non-zero constant shows
    /// the system is inconsistent.
    fn eliminate_z(&self) -> Option<Vec<PolyVar2>> {
        let mut planar = Vec::new();
        for (i, j) in PAIRS {
            if proportional(&self.eqns[i], &self.eqns[j]) {
                continue;
            }
            let r = clean(&self.eqns[i].reduce(&self.eqns[j]));
            if r.is_zero(0.0) {
                continue;
            }
            if r.variable_flag() == 0 {
                debug!("eliminate_z: equations {i} and {j} are inconsistent");
                return None;
            }
            planar.push(r);
        }
        if planar.is_empty() {
            debug!("eliminate_z: every resultant vanishes; system is under-determined");
            return None;
        }
        Some(planar)
    }

    /// The lowest-degree polynomial in `x` alone, taken from the planar
    /// set directly or from pairwise resultants in `y`.
    fn eliminate_y(&self, planar: &[PolyVar2]) -> Option<PolyVar1> {
        let mut outer: Vec<PolyVar1> = planar
            .iter()
            .filter(|p| p.variable_flag() == 0b01)
            .filter_map(|p| p.as_lower().cloned())
            .collect();
        for (i, a) in planar.iter().enumerate() {
            for b in &planar[i + 1..] {
                if proportional(a, b) {
                    continue;
                }
                let r = clean(&a.reduce(b));
                if r.is_zero(0.0) {
                    continue;
                }
                if r.variable_flag() == 0 {
                    debug!("eliminate_y: inconsistent pair {a} and {b}");
                    return None;
                }
                outer.push(r);
            }
        }
        let best = lowest_degree(outer.into_iter());
        if best.is_none() {
            debug!("eliminate_y: no polynomial in x alone; system is under-determined");
        }
        best
    }

    /// Real parts of roots whose imaginary part is small enough that the
    /// Newton polish may still land on a real solution.
    fn candidate_roots(&self, p: &PolyVar1) -> Vec<f64> {
        let im_max = self.tol.residual.sqrt();
        let mut roots: Vec<f64> = p
            .calc_roots()
            .into_iter()
            .filter(|z| z.im.abs() <= im_max * (1.0 + z.re.abs()))
            .map(|z| z.re)
            .collect();
        roots.sort_by(f64::total_cmp);
        roots.dedup_by(|b, a| (*b - *a).abs() <= self.tol.root * (1.0 + a.abs()));
        roots
    }

    fn values(&self, p: &Point3) -> Vec3 {
        let v = [p.x, p.y, p.z];
        Vec3::new(self.eqns[0].eval(&v), self.eqns[1].eval(&v), self.eqns[2].eval(&v))
    }

    fn max_residual(&self, p: &Point3) -> f64 {
        self.values(p).amax()
    }

    /// Newton steps on the three equations. The result is only used when
    /// it improves the residual.
    fn polish(&self, start: Point3) -> Point3 {
        let mut p = start;
        for _ in 0..NEWTON_STEPS {
            let v = [p.x, p.y, p.z];
            let jac = Mat3::from_fn(|r, c| self.grads[r][c].eval(&v));
            let Some(inv) = jac.try_inverse() else {
                break;
            };
            let step = inv * self.values(&p);
            if !step.iter().all(|s| s.is_finite()) {
                break;
            }
            p -= step;
            if step.norm() <= f64::EPSILON * (1.0 + p.coords.norm()) {
                break;
            }
        }
        if self.max_residual(&p) <= self.max_residual(&start) {
            p
        } else {
            start
        }
    }
}

/// Drop monomials below `NOISE` times the largest coefficient, then
/// normalize.
fn clean<T: PolyCoeff>(p: &T) -> T {
    let limit = NOISE * p.max_abs();
    let mut out = T::default();
    for (powers, c) in p.monomials() {
        if c.abs() > limit {
            out.add_term(&powers, c);
        }
    }
    out.compress(0.0);
    out.normalize();
    out
}

/// True if two normalized polynomials agree up to sign. Their resultant
/// vanishes identically, but only up to rounding.
fn proportional<T: PolyCoeff>(a: &T, b: &T) -> bool {
    let mut diff = a.clone();
    diff -= b;
    let mut sum = a.clone();
    sum += b;
    diff.is_zero(NOISE) || sum.is_zero(NOISE)
}

/// The non-constant polynomial of least degree, after noise compression.
fn lowest_degree(polys: impl Iterator<Item = PolyVar1>) -> Option<PolyVar1> {
    polys
        .map(|mut p| {
            p.compress(NOISE);
            p
        })
        .filter(|p| p.degree() > 0)
        .min_by_key(|p| p.degree())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use mcsg_kernel_geom::{Surface, SurfaceOps};

    fn quadric(card: &str) -> [f64; 10] {
        card.parse::<Surface>().unwrap().base_eqn().unwrap()
    }

    fn solve(a: &str, b: &str, c: &str) -> Vec<Point3> {
        let mut sv = SolveValues::from_quadrics(&quadric(a), &quadric(b), &quadric(c));
        sv.solve_all();
        let mut pts = sv.answers().to_vec();
        pts.sort_by(|p, q| {
            p.x.total_cmp(&q.x)
                .then(p.y.total_cmp(&q.y))
                .then(p.z.total_cmp(&q.z))
        });
        pts
    }

    #[test]
    fn test_three_planes() {
        let pts = solve("px 23", "py 10", "pz 30");
        assert_eq!(pts.len(), 1);
        assert_abs_diff_eq!(pts[0].x, 23.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pts[0].y, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pts[0].z, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_crossed_cylinders_and_plane() {
        let pts = solve("cz 5", "cx 5", "pz 3");
        assert_eq!(pts.len(), 4);
        let want = [(-3.0, -4.0), (-3.0, 4.0), (3.0, -4.0), (3.0, 4.0)];
        for (p, (x, y)) in pts.iter().zip(want) {
            assert_abs_diff_eq!(p.x, x, epsilon = 1e-6);
            assert_abs_diff_eq!(p.y, y, epsilon = 1e-6);
            assert_abs_diff_eq!(p.z, 3.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_sphere_cylinder_plane() {
        let pts = solve("so 5", "cz 3", "py 0");
        assert_eq!(pts.len(), 4);
        for p in &pts {
            assert_abs_diff_eq!(p.x.abs(), 3.0, epsilon = 1e-6);
            assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(p.z.abs(), 4.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_sphere_and_two_planes() {
        let pts = solve("so 5", "px 3", "py 0");
        assert_eq!(pts.len(), 2);
        assert_abs_diff_eq!(pts[0].z, -4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pts[1].z, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_disjoint_cylinders() {
        assert!(solve("c/z 0 0 1", "c/z 5 0 1", "pz 0").is_empty());
    }

    #[test]
    fn test_identical_surfaces() {
        assert!(solve("so 5", "so 5", "so 5").is_empty());
        assert!(solve("cz 5", "cz 5", "pz 3").is_empty());
    }

    #[test]
    fn test_parallel_planes() {
        assert!(solve("pz 1", "pz 2", "px 0").is_empty());
    }

    #[test]
    fn test_tolerance_and_rerun() {
        let mut sv = SolveValues::from_quadrics(&quadric("px 1"), &quadric("py 2"), &quadric("pz 3"))
            .with_tolerance(Tolerance::DEFAULT.with_residual(1e-8));
        assert_eq!(sv.solve_all(), 1);
        assert_eq!(sv.solve_all(), 1);
        assert_eq!(sv.answers().len(), 1);
        assert_abs_diff_eq!(sv.equations()[0].eval(&[1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_proportional() {
        let mut a: PolyVar2 = "x^2+y^2-25".parse().unwrap();
        a.normalize();
        let mut b = -a.clone();
        assert!(proportional(&a, &b));
        b.add_term(&[0, 1], 0.5);
        assert!(!proportional(&a, &b));
    }

    #[test]
    fn test_clean_drops_noise() {
        let p: PolyVar2 = "x-23".parse().unwrap();
        let mut noisy = p.clone();
        noisy.add_term(&[0, 1], 1e-14);
        assert_eq!(noisy.variable_flag(), 0b11);
        let c = clean(&noisy);
        assert_eq!(c.variable_flag(), 0b01);
    }
}
