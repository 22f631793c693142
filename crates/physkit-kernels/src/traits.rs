//! Weight-function trait: the core kernel abstraction.
//!
//! Every kernel implements this trait, enabling the MPM driver to swap
//! interpolation strategies without changing its transfer logic.

use physkit_types::Scalar;

use crate::kind::KernelKind;

/// Trait for radial interpolation kernels.
///
/// `r` is a non-negative distance and `h > 0` the smoothing length.
/// Kernels return zero outside their support.
///
/// # Strategy Pattern
///
/// This trait enables runtime swapping of kernels:
/// - `StandardKernel`, `SpikyKernel`: classic SPH density/pressure kernels
/// - `CubicKernel`, `QuarticKernel`: smooth splines with wider support
/// - `GaussKernel`: unbounded support, truncated by grid users
pub trait WeightFunction: Send + Sync + std::fmt::Debug {
    /// Kernel value at distance `r`.
    fn weight(&self, r: Scalar, h: Scalar) -> Scalar;

    /// Derivative `dw/dr` at distance `r`.
    fn gradient(&self, r: Scalar, h: Scalar) -> Scalar;

    /// Support radius in units of `h`. `Scalar::INFINITY` when unbounded.
    fn support_radius(&self) -> Scalar;

    /// Catalog entry for this kernel.
    fn kind(&self) -> KernelKind;

    /// Returns the name of this kernel.
    fn name(&self) -> &'static str {
        self.kind().name()
    }
}
