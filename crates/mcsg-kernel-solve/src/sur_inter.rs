//! Points common to three surfaces.
//!
//! Planes take closed-form paths: three planes are a 3x3 linear solve, and
//! two planes meet in a line that is intersected with the third surface.
//! Anything else goes through [`SolveValues`].

use log::debug;
use mcsg_kernel_geom::{Plane, Surface, SurfaceOps};
use mcsg_kernel_intersect::Line;
use mcsg_kernel_math::{Mat3, Point3, Tolerance, Vec3};

use crate::{SolveError, SolveValues};

/// Every point on all three surfaces.
///
/// Composite and null surfaces have no quadratic form and are rejected.
/// Surfaces that meet in a curve or not at all give no points.
pub fn process_point(a: &Surface, b: &Surface, c: &Surface) -> Result<Vec<Point3>, SolveError> {
    process_point_with(a, b, c, &Tolerance::DEFAULT)
}

/// [`process_point`] with explicit tolerances.
pub fn process_point_with(
    a: &Surface,
    b: &Surface,
    c: &Surface,
    tol: &Tolerance,
) -> Result<Vec<Point3>, SolveError> {
    let surfaces = [a, b, c];
    let mut eqns = [[0.0; 10]; 3];
    for (s, eqn) in surfaces.iter().zip(eqns.iter_mut()) {
        *eqn = s.base_eqn().ok_or(SolveError::NotQuadratic { kind: s.kind() })?;
    }

    let planes: Vec<&Plane> = surfaces.iter().filter_map(|s| s.as_plane()).collect();
    let others: Vec<&Surface> = surfaces
        .iter()
        .copied()
        .filter(|s| s.as_plane().is_none())
        .collect();

    let points = match (planes.as_slice(), others.as_slice()) {
        ([p, q, r], _) => three_planes(p, q, r, tol).into_iter().collect(),
        ([p, q], [other]) => two_planes_and(p, q, other, tol),
        _ => {
            let mut sv = SolveValues::from_quadrics(&eqns[0], &eqns[1], &eqns[2]).with_tolerance(*tol);
            sv.solve_all();
            sv.answers()
                .iter()
                .copied()
                .filter(|p| surfaces.iter().all(|s| on_kept_nappe(s, p)))
                .collect()
        }
    };
    debug!("process_point: {} point(s)", points.len());
    Ok(points)
}

/// The first point common to the three surfaces, if any.
pub fn make_point(a: &Surface, b: &Surface, c: &Surface) -> Result<Option<Point3>, SolveError> {
    Ok(process_point(a, b, c)?.into_iter().next())
}

/// The common point nearest to `near`, if any.
pub fn make_point_near(
    a: &Surface,
    b: &Surface,
    c: &Surface,
    near: &Point3,
) -> Result<Option<Point3>, SolveError> {
    Ok(process_point(a, b, c)?
        .into_iter()
        .min_by(|p, q| (p - near).norm().total_cmp(&(q - near).norm())))
}

fn three_planes(p: &Plane, q: &Plane, r: &Plane, tol: &Tolerance) -> Option<Point3> {
    let m = Mat3::from_rows(&[
        p.normal().transpose(),
        q.normal().transpose(),
        r.normal().transpose(),
    ]);
    if m.determinant().abs() < tol.parallel {
        return None;
    }
    let inv = m.try_inverse()?;
    Some(Point3::from(inv * Vec3::new(p.dist(), q.dist(), r.dist())))
}

/// Intersect the line of two planes with `other`.
fn two_planes_and(p: &Plane, q: &Plane, other: &Surface, tol: &Tolerance) -> Vec<Point3> {
    let (n1, n2) = (p.normal(), q.normal());
    let u = n1.cross(n2);
    let len_sq = u.norm_squared();
    if len_sq.sqrt() < tol.parallel {
        return Vec::new();
    }
    // satisfies n1.x = d1 and n2.x = d2
    let origin = (p.dist() * n2.cross(&u) + q.dist() * u.cross(n1)) / len_sq;
    let line = Line::new(Point3::from(origin), u);
    let mut out = Vec::new();
    line.intersect(&mut out, other);
    out
}

fn on_kept_nappe(surface: &Surface, p: &Point3) -> bool {
    match surface {
        Surface::Cone(c) => c.on_kept_nappe((p - c.centre()).dot(c.normal())),
        _ => true,
    }
}
