use std::f64::consts::PI;

use mcsg_kernel_math::{Mat3, Point3, Vec3, PARALLEL_TOL, ZERO_TOL};

use crate::{Plane, SurfaceError, SurfaceKind, SurfaceOps};

/// Where a point lies relative to a planar polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPosition {
    /// Strictly inside.
    Interior,
    /// On an edge.
    Edge,
    /// On a vertex.
    Vertex,
    /// Outside.
    Outside,
}

impl LoopPosition {
    /// Integer classification: 3 interior, 1 edge, 0 vertex, -1 outside.
    pub fn code(self) -> i32 {
        match self {
            LoopPosition::Interior => 3,
            LoopPosition::Edge => 1,
            LoopPosition::Vertex => 0,
            LoopPosition::Outside => -1,
        }
    }

    /// True unless outside.
    pub fn is_inside(self) -> bool {
        self != LoopPosition::Outside
    }
}

/// Classify `p` (assumed in the polygon's plane) against the closed loop
/// `pts` by summing the angles it subtends, signed about `normal`: about
/// `2 pi` inside, about zero outside.
pub fn in_loop(p: &Point3, pts: &[Point3], normal: &Vec3, tol: f64) -> LoopPosition {
    if pts.iter().any(|v| (v - p).norm() <= tol) {
        return LoopPosition::Vertex;
    }
    let mut sum = 0.0;
    for (i, v) in pts.iter().enumerate() {
        let w = &pts[(i + 1) % pts.len()];
        let a = v - p;
        let b = w - p;
        let cross = a.cross(&b);
        let edge = (w - v).norm();
        if edge > 0.0 && cross.norm() <= tol * edge && a.dot(&b) < 0.0 {
            return LoopPosition::Edge;
        }
        sum += cross.dot(normal).atan2(a.dot(&b));
    }
    if sum.abs() > PI {
        LoopPosition::Interior
    } else {
        LoopPosition::Outside
    }
}

/// A convex polyhedron given by vertices and faces (MCNP `arb`).
///
/// Face planes are oriented outward, away from the vertex centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbPoly {
    vertices: Vec<Point3>,
    faces: Vec<Vec<usize>>,
    planes: Vec<Plane>,
}

impl ArbPoly {
    /// Build from vertices and faces; each face lists at least three vertex
    /// indices (0-based) in loop order.
    pub fn new(vertices: Vec<Point3>, faces: Vec<Vec<usize>>) -> Result<Self, SurfaceError> {
        if vertices.len() < 4 || faces.len() < 4 {
            return Err(SurfaceError::Degenerate(format!(
                "arb needs 4 vertices and 4 faces, got {} and {}",
                vertices.len(),
                faces.len()
            )));
        }
        let centroid = Point3::from(
            vertices.iter().fold(Vec3::zeros(), |acc, v| acc + v.coords) / vertices.len() as f64,
        );

        let mut planes = Vec::with_capacity(faces.len());
        for (fi, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(SurfaceError::Degenerate(format!("arb face {} has {} vertices", fi + 1, face.len())));
            }
            if let Some(&bad) = face.iter().find(|&&i| i >= vertices.len()) {
                return Err(SurfaceError::Degenerate(format!("arb face {} uses vertex {}", fi + 1, bad + 1)));
            }
            let pts: Vec<Point3> = face.iter().map(|&i| vertices[i]).collect();

            // Newell normal
            let mut n = Vec3::zeros();
            for (i, v) in pts.iter().enumerate() {
                let w = pts[(i + 1) % pts.len()];
                n += v.coords.cross(&w.coords);
            }
            if n.norm() < PARALLEL_TOL {
                return Err(SurfaceError::Degenerate(format!("arb face {} has no area", fi + 1)));
            }
            let mut plane = Plane::from_point_normal(&pts[0], &n)?;
            if pts.iter().any(|p| plane.signed_distance(p).abs() > ZERO_TOL) {
                return Err(SurfaceError::Degenerate(format!("arb face {} is not planar", fi + 1)));
            }
            if plane.signed_distance(&centroid) > 0.0 {
                plane = plane.flipped();
            }
            planes.push(plane);
        }
        Ok(Self {
            vertices,
            faces,
            planes,
        })
    }

    /// Vertices.
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Faces as vertex index lists.
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// Outward face planes, one per face.
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// The vertex loop of face `i`.
    pub fn face_loop(&self, i: usize) -> Vec<Point3> {
        self.faces[i].iter().map(|&k| self.vertices[k]).collect()
    }

    /// Position of `p` (in the plane of face `i`) relative to that face.
    pub fn face_position(&self, i: usize, p: &Point3, tol: f64) -> LoopPosition {
        in_loop(p, &self.face_loop(i), self.planes[i].normal(), tol)
    }

    /// Same vertices and faces within `tol`.
    pub fn same_surface(&self, other: &ArbPoly, tol: f64) -> bool {
        self.faces == other.faces
            && self.vertices.len() == other.vertices.len()
            && self
                .vertices
                .iter()
                .zip(other.vertices.iter())
                .all(|(a, b)| (a - b).norm() <= tol)
    }
}

fn segment_distance(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + t * ab)).norm()
}

impl SurfaceOps for ArbPoly {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::ArbPoly
    }

    fn base_eqn(&self) -> Option<[f64; 10]> {
        None
    }

    fn eqn_value(&self, p: &Point3) -> f64 {
        self.planes
            .iter()
            .map(|pl| pl.signed_distance(p))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    fn distance(&self, p: &Point3) -> f64 {
        let inner = self.eqn_value(p);
        if inner <= 0.0 {
            return -inner;
        }
        let mut best = f64::INFINITY;
        for (i, plane) in self.planes.iter().enumerate() {
            let foot = plane.project(p);
            if self.face_position(i, &foot, ZERO_TOL).is_inside() {
                best = best.min(plane.signed_distance(p).abs());
                continue;
            }
            let pts = self.face_loop(i);
            for (k, v) in pts.iter().enumerate() {
                best = best.min(segment_distance(p, v, &pts[(k + 1) % pts.len()]));
            }
        }
        best
    }

    fn normal_at(&self, p: &Point3) -> Vec3 {
        let mut best = Vec3::z();
        let mut best_val = f64::NEG_INFINITY;
        for pl in &self.planes {
            let v = pl.signed_distance(p);
            if v > best_val {
                best_val = v;
                best = *pl.normal();
            }
        }
        best
    }

    fn apply_isometry(&mut self, r: &Mat3, t: &Vec3) {
        for v in self.vertices.iter_mut() {
            *v = Point3::from(r * v.coords + t);
        }
        for pl in self.planes.iter_mut() {
            pl.apply_isometry(r, t);
        }
    }
}
