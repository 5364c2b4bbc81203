#![warn(missing_docs)]

//! Numbered surface registry for the mcsg geometry kernel.
//!
//! A [`SurfIndex`] owns every surface of one model build, keyed by its
//! surface number. Adding a surface that is geometrically equal to one
//! already registered returns the existing number instead of storing a
//! duplicate.
//!
//! # Example
//!
//! ```
//! use mcsg_kernel_registry::SurfIndex;
//!
//! let mut index = SurfIndex::new();
//! assert_eq!(index.process_card("10 px 5").unwrap(), 10);
//! assert_eq!(index.process_card("20 p 2 0 0 10").unwrap(), 10);
//! assert_eq!(index.len(), 1);
//! ```

mod index;

pub use index::{SurfIndex, SurfaceEntry};

use mcsg_kernel_geom::SurfaceError;
use thiserror::Error;

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// No surface has this number.
    #[error("surface {0} not found")]
    NotFound(i32),

    /// The number is taken by a different surface.
    #[error("surface number {0} is already in use")]
    NameClash(i32),

    /// Surface numbers are positive.
    #[error("invalid surface number {0}")]
    InvalidName(i32),

    /// A card failed to parse with a hard error.
    #[error(transparent)]
    Card(#[from] SurfaceError),
}
