//! # physkit-kernels
//!
//! Weight-function abstraction and kernel catalog.
//!
//! ## Design
//!
//! The [`WeightFunction`] trait defines a radial kernel `w(r, h)` and its
//! derivative. Different kernels (spiky, cubic spline, Gauss, ...) can be
//! swapped at runtime via the strategy pattern; [`KernelKind`] names the
//! closed catalog and builds boxed instances.
//!
//! [`GridWeightFunction`] binds a kernel to a background grid: the support
//! radius is stored per axis as a multiple of the cell edge length, which
//! makes the same kernel usable in 2D and 3D.

pub mod grid_weight;
pub mod kind;
pub mod smoothing;
pub mod spline;
pub mod traits;

pub use grid_weight::GridWeightFunction;
pub use kind::KernelKind;
pub use smoothing::{GaussKernel, LaplacianKernel, SmoothKernel, SpikyKernel, StandardKernel};
pub use spline::{CubicKernel, QuadraticKernel, QuarticKernel};
pub use traits::WeightFunction;
