//! # physkit-math
//!
//! Linear algebra re-exports and background grids for the physkit toolkit.
//!
//! Provides:
//! - Re-exports of `glam` double-precision types (`DVec2`, `DVec3`)
//! - [`Grid`]: uniform Cartesian grid in 2D or 3D, with node/cell
//!   indexing and the cell-edge queries the MPM time-step bound needs

pub mod grid;

pub use grid::{Grid, IndexBox};

// Re-export glam types as the canonical math types for physkit.
pub use glam::{DVec2, DVec3};
