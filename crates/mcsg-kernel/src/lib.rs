#![warn(missing_docs)]

//! Surface geometry kernel facade for mcsg.
//!
//! Provides [`GeometryBuild`], the context one model build works through:
//! it owns the numbered surfaces, parses MCNP surface cards into them, runs
//! lines against them and finds the points where three of them meet.
//!
//! # Example
//!
//! ```
//! use mcsg_kernel::{GeometryBuild, Point3};
//!
//! let mut build = GeometryBuild::new();
//! build.add_cards("1 px 23\n2 py 10\n3 pz 30").unwrap();
//! let corner = build.corner(1, 2, 3).unwrap();
//! assert_eq!(corner, Some(Point3::new(23.0, 10.0, 30.0)));
//! ```

pub use mcsg_kernel_geom;
pub use mcsg_kernel_intersect;
pub use mcsg_kernel_math;
pub use mcsg_kernel_poly;
pub use mcsg_kernel_registry;
pub use mcsg_kernel_solve;

pub use mcsg_kernel_geom::{Surface, SurfaceError, SurfaceKind, SurfaceOps};
pub use mcsg_kernel_intersect::{InterPoint, Line, LineIntersectVisit};
pub use mcsg_kernel_math::{Point3, Tolerance, Vec3};
pub use mcsg_kernel_registry::{RegistryError, SurfIndex};
pub use mcsg_kernel_solve::{process_point, SolveError};

use log::debug;
use mcsg_kernel_solve::sur_inter::process_point_with;
use thiserror::Error;

/// Errors from a geometry build.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// Card parsing or surface numbering failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The three-surface solver rejected its input.
    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Result alias for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// The surfaces of one model build and the queries run against them.
///
/// Each build owns its registry; nothing is shared between builds.
#[derive(Debug, Clone, Default)]
pub struct GeometryBuild {
    index: SurfIndex,
}

impl GeometryBuild {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Empty build with default tolerances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty build using `tol` for surface comparison and corner solving.
    pub fn with_tolerance(tol: Tolerance) -> Self {
        Self {
            index: SurfIndex::with_tolerance(tol),
        }
    }

    /// Tolerances in use.
    pub fn tolerance(&self) -> &Tolerance {
        self.index.tolerance()
    }

    /// The surface registry.
    pub fn surfaces(&self) -> &SurfIndex {
        &self.index
    }

    /// Mutable access to the surface registry.
    pub fn surfaces_mut(&mut self) -> &mut SurfIndex {
        &mut self.index
    }

    // =========================================================================
    // Surfaces
    // =========================================================================

    /// Parse one surface card and register it. Returns the canonical number.
    pub fn add_card(&mut self, line: &str) -> Result<i32> {
        Ok(self.index.process_card(line)?)
    }

    /// Register every card in `text`, one per line.
    ///
    /// Blank lines and `c` comment lines are skipped. Stops at the first
    /// hard failure.
    pub fn add_cards(&mut self, text: &str) -> Result<Vec<i32>> {
        let mut names = Vec::new();
        for line in text.lines() {
            if is_comment(line) {
                continue;
            }
            names.push(self.add_card(line)?);
        }
        debug!("added {} card(s), {} surface(s) registered", names.len(), self.index.len());
        Ok(names)
    }

    /// Register an already built surface as number `name`.
    pub fn add_surface(&mut self, name: i32, surface: Surface) -> Result<i32> {
        Ok(self.index.add_surface(name, None, surface)?)
    }

    /// The surface numbered `name`.
    pub fn surface(&self, name: i32) -> Result<&Surface> {
        self.index
            .get(name)
            .ok_or(BuildError::Registry(RegistryError::NotFound(name)))
    }

    /// Side of `p` relative to a signed surface number: `-n` is the
    /// negative half-space of surface `n`, so its sides are swapped.
    pub fn side(&self, signed: i32, p: &Point3) -> Result<i32> {
        let side = self.surface(signed.abs())?.side(p);
        Ok(if signed < 0 { -side } else { side })
    }

    /// Replace plane `name` by its registered opposite, if any. Returns the
    /// signed number to use in its place.
    pub fn fold_opposite(&mut self, name: i32) -> i32 {
        self.index.remove_opposite(name)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Hits of `line` on the named surfaces, sorted along the line.
    pub fn line_hits(&self, line: Line, names: &[i32]) -> Result<LineIntersectVisit> {
        let mut visit = LineIntersectVisit::new(line);
        for &name in names {
            let surface = self.surface(name.abs())?;
            visit.visit_named(name.abs(), surface);
        }
        Ok(visit)
    }

    /// Hits of `line` on every registered surface.
    pub fn line_hits_all(&self, line: Line) -> LineIntersectVisit {
        let mut visit = LineIntersectVisit::new(line);
        for (name, entry) in self.index.iter() {
            visit.visit_named(name, &entry.surface);
        }
        visit
    }

    /// Every point common to surfaces `a`, `b` and `c`.
    pub fn corners(&self, a: i32, b: i32, c: i32) -> Result<Vec<Point3>> {
        let (sa, sb, sc) = (
            self.surface(a.abs())?,
            self.surface(b.abs())?,
            self.surface(c.abs())?,
        );
        Ok(process_point_with(sa, sb, sc, self.tolerance())?)
    }

    /// The first point common to the three surfaces.
    pub fn corner(&self, a: i32, b: i32, c: i32) -> Result<Option<Point3>> {
        Ok(self.corners(a, b, c)?.into_iter().next())
    }

    /// The common point of the three surfaces nearest to `near`.
    pub fn corner_near(&self, a: i32, b: i32, c: i32, near: &Point3) -> Result<Option<Point3>> {
        Ok(self
            .corners(a, b, c)?
            .into_iter()
            .min_by(|p, q| (p - near).norm().total_cmp(&(q - near).norm())))
    }
}

fn is_comment(line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        None => true,
        Some(first) => first.eq_ignore_ascii_case("c") || first.starts_with('$'),
    }
}
