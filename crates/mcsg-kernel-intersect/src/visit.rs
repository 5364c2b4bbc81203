//! Collecting the hits of one line against many surfaces.

use mcsg_kernel_geom::{
    ArbPoly, Cone, CylCan, Cylinder, EllipticCyl, General, MBrect, Plane, Sphere, Surface,
    SurfaceOps, SurfaceVisitor,
};
use mcsg_kernel_math::{Point3, ZERO_TOL};

use crate::intersect::{
    intersect_arb_poly, intersect_cone, intersect_cyl_can, intersect_mbrect, intersect_plane,
    intersect_quadric,
};
use crate::Line;

/// One intersection of a line with a named surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterPoint {
    /// Signed line parameter of the hit.
    pub distance: f64,
    /// The hit point.
    pub point: Point3,
    /// Surface number, `0` when the surface was visited without one.
    pub surface: i32,
    /// Side of the surface the line moves into after the hit: `+1`, `-1`,
    /// or `0` for a tangent hit.
    pub sense: i32,
}

/// Runs a line against surfaces and keeps the hits ordered by `λ`.
///
/// Surfaces are visited through [`Surface::accept`], so each concrete type
/// reaches its own intersector.
#[derive(Debug, Clone)]
pub struct LineIntersectVisit {
    line: Line,
    current: i32,
    hits: Vec<InterPoint>,
}

impl LineIntersectVisit {
    /// Start collecting hits along `line`.
    pub fn new(line: Line) -> Self {
        Self {
            line,
            current: 0,
            hits: Vec::new(),
        }
    }

    /// The line being traced.
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Intersect an unnamed surface. Returns the number of hits added.
    pub fn visit(&mut self, surface: &Surface) -> usize {
        self.visit_named(0, surface)
    }

    /// Intersect surface number `name`. Returns the number of hits added.
    pub fn visit_named(&mut self, name: i32, surface: &Surface) -> usize {
        let before = self.hits.len();
        self.current = name;
        if self.line.is_valid() {
            surface.accept(self);
        }
        self.hits.len() - before
    }

    /// All hits, ordered by `λ`.
    pub fn hits(&self) -> &[InterPoint] {
        &self.hits
    }

    /// Number of hits.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// True when nothing has been hit.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Hit points, ordered by `λ`.
    pub fn points(&self) -> Vec<Point3> {
        self.hits.iter().map(|h| h.point).collect()
    }

    /// Hit parameters, ascending.
    pub fn distances(&self) -> Vec<f64> {
        self.hits.iter().map(|h| h.distance).collect()
    }

    /// The hit nearest the line origin in either direction.
    pub fn closest(&self) -> Option<&InterPoint> {
        self.hits
            .iter()
            .min_by(|a, b| a.distance.abs().total_cmp(&b.distance.abs()))
    }

    /// Hits strictly ahead of the origin.
    pub fn forward(&self) -> impl Iterator<Item = &InterPoint> {
        self.hits.iter().filter(|h| h.distance > 0.0)
    }

    /// The first hit ahead of the origin.
    pub fn first_forward(&self) -> Option<&InterPoint> {
        self.forward().next()
    }

    /// The hit nearest to `p`.
    pub fn near_point(&self, p: &Point3) -> Option<&InterPoint> {
        self.hits
            .iter()
            .min_by(|a, b| (a.point - p).norm().total_cmp(&(b.point - p).norm()))
    }

    /// Drop all hits, keeping the line.
    pub fn clear(&mut self) {
        self.hits.clear();
    }

    fn record<S: SurfaceOps>(&mut self, surface: &S, lambdas: impl IntoIterator<Item = f64>) {
        for distance in lambdas {
            let point = self.line.at(distance);
            let along = self.line.direction.dot(&surface.normal_at(&point));
            let sense = if along > ZERO_TOL {
                1
            } else if along < -ZERO_TOL {
                -1
            } else {
                0
            };
            let hit = InterPoint {
                distance,
                point,
                surface: self.current,
                sense,
            };
            let at = self.hits.partition_point(|h| h.distance <= distance);
            self.hits.insert(at, hit);
        }
    }

    fn record_quadric<S: SurfaceOps>(&mut self, surface: &S) {
        if let Some(eqn) = surface.base_eqn() {
            let lambdas = intersect_quadric(&self.line, &eqn);
            self.record(surface, lambdas);
        }
    }
}

impl SurfaceVisitor for LineIntersectVisit {
    fn visit_plane(&mut self, s: &Plane) {
        let hit = intersect_plane(&self.line, s);
        self.record(s, hit);
    }

    fn visit_sphere(&mut self, s: &Sphere) {
        self.record_quadric(s);
    }

    fn visit_cylinder(&mut self, s: &Cylinder) {
        self.record_quadric(s);
    }

    fn visit_cone(&mut self, s: &Cone) {
        let hits = intersect_cone(&self.line, s);
        self.record(s, hits);
    }

    fn visit_elliptic_cyl(&mut self, s: &EllipticCyl) {
        self.record_quadric(s);
    }

    fn visit_general(&mut self, s: &General) {
        self.record_quadric(s);
    }

    fn visit_mbrect(&mut self, s: &MBrect) {
        let hits = intersect_mbrect(&self.line, s);
        self.record(s, hits);
    }

    fn visit_arb_poly(&mut self, s: &ArbPoly) {
        let hits = intersect_arb_poly(&self.line, s);
        self.record(s, hits);
    }

    fn visit_cyl_can(&mut self, s: &CylCan) {
        let hits = intersect_cyl_can(&self.line, s);
        self.record(s, hits);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use mcsg_kernel_math::Vec3;

    fn surf(card: &str) -> Surface {
        card.parse().unwrap()
    }

    fn traced() -> LineIntersectVisit {
        let mut v = LineIntersectVisit::new(Line::new(Point3::origin(), Vec3::x()));
        assert_eq!(v.visit_named(10, &surf("so 5")), 2);
        assert_eq!(v.visit_named(20, &surf("px 3")), 1);
        assert_eq!(v.visit_named(30, &surf("px -8")), 1);
        v
    }

    #[test]
    fn test_hits_sorted_across_surfaces() {
        let v = traced();
        assert_eq!(v.distances(), vec![-8.0, -5.0, 3.0, 5.0]);
        let names: Vec<i32> = v.hits().iter().map(|h| h.surface).collect();
        assert_eq!(names, vec![30, 10, 20, 10]);
        assert_abs_diff_eq!(v.points()[0].x, -8.0);
    }

    #[test]
    fn test_queries() {
        let v = traced();
        assert_eq!(v.closest().unwrap().surface, 20);
        assert_eq!(v.forward().count(), 2);
        assert_abs_diff_eq!(v.first_forward().unwrap().distance, 3.0);
        let near = v.near_point(&Point3::new(-6.0, 1.0, 0.0)).unwrap();
        assert_eq!(near.surface, 10);
    }

    #[test]
    fn test_sense() {
        let v = traced();
        // leaving the sphere's inside at +5, entering it at -5
        assert_eq!(v.hits()[1].sense, -1);
        assert_eq!(v.hits()[3].sense, 1);
        assert_eq!(v.hits()[2].sense, 1);
    }

    #[test]
    fn test_tangent_sense_is_zero() {
        let mut v = LineIntersectVisit::new(Line::new(Point3::new(-10.0, 2.0, 0.0), Vec3::x()));
        assert_eq!(v.visit(&surf("cz 2")), 1);
        assert_eq!(v.hits()[0].sense, 0);
        assert_eq!(v.hits()[0].surface, 0);
    }

    #[test]
    fn test_composites_and_null() {
        let mut v = LineIntersectVisit::new(Line::new(Point3::new(-10.0, 0.5, 0.5), Vec3::x()));
        assert_eq!(v.visit(&surf("rpp 0 1 0 1 0 1")), 2);
        assert_eq!(v.visit(&surf("rcc 4 0.5 0.5 2 0 0 1")), 2);
        assert_eq!(v.visit(&Surface::Null(Default::default())), 0);
        assert_eq!(v.distances(), vec![10.0, 11.0, 14.0, 16.0]);
        assert_eq!(v.hits()[0].sense, -1);
        assert_eq!(v.hits()[1].sense, 1);
    }

    #[test]
    fn test_clear_and_empty() {
        let mut v = traced();
        assert!(!v.is_empty());
        v.clear();
        assert!(v.is_empty());
        assert!(v.closest().is_none());
        assert!(v.first_forward().is_none());
        assert_eq!(v.line().direction, Vec3::x());
    }
}
