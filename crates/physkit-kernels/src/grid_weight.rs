//! Grid-bound weight function, dimension-generic over `D`.
//!
//! The support radius along axis `a` is `radius_cell_scale[a] * dx[a]`.
//! Offsets are normalized per axis onto the kernel's own support and the
//! kernel is evaluated radially with `h = 1`:
//!
//! ```text
//! u_a = (x_p − x_i)_a / (scale_a · dx_a) · extent
//! w   = kernel.weight(|u|, 1)
//! ∇w_a = kernel.gradient(|u|, 1) · u_a / |u| · extent / (scale_a · dx_a)
//! ```

use physkit_types::constants::UNBOUNDED_KERNEL_CUTOFF;
use physkit_types::{PhysError, PhysResult, Scalar};

use crate::kind::KernelKind;
use crate::traits::WeightFunction;

/// A kernel bound to a per-axis support radius measured in grid cells.
#[derive(Debug)]
pub struct GridWeightFunction<const D: usize> {
    kernel: Box<dyn WeightFunction>,
    radius_cell_scale: [Scalar; D],
}

impl<const D: usize> GridWeightFunction<D> {
    /// Binds `kernel` to a support of `radius_cell_scale` cells per axis.
    pub fn new(kernel: Box<dyn WeightFunction>, radius_cell_scale: [Scalar; D]) -> PhysResult<Self> {
        if radius_cell_scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(PhysError::Config(format!(
                "Weight radius/cell scale must be positive, got {:?}",
                radius_cell_scale
            )));
        }
        Ok(Self {
            kernel,
            radius_cell_scale,
        })
    }

    /// Builds the kernel from the catalog.
    pub fn from_kind(kind: KernelKind, radius_cell_scale: [Scalar; D]) -> PhysResult<Self> {
        Self::new(kind.create(), radius_cell_scale)
    }

    pub fn kernel(&self) -> &dyn WeightFunction {
        self.kernel.as_ref()
    }

    pub fn kind(&self) -> KernelKind {
        self.kernel.kind()
    }

    pub fn radius_cell_scale(&self) -> [Scalar; D] {
        self.radius_cell_scale
    }

    /// Support radius in world units for cell size `dx`.
    pub fn support_radius(&self, dx: [Scalar; D]) -> [Scalar; D] {
        std::array::from_fn(|a| self.radius_cell_scale[a] * dx[a])
    }

    /// Weight of a node at `offset = x_particle − x_node`.
    pub fn weight(&self, offset: [Scalar; D], dx: [Scalar; D]) -> Scalar {
        let (_, r) = self.normalize(offset, dx);
        if r > self.extent() {
            return 0.0;
        }
        self.kernel.weight(r, 1.0)
    }

    /// Gradient of [`GridWeightFunction::weight`] with respect to the offset.
    pub fn gradient(&self, offset: [Scalar; D], dx: [Scalar; D]) -> [Scalar; D] {
        let extent = self.extent();
        let (u, r) = self.normalize(offset, dx);
        if r > extent || r == 0.0 {
            return [0.0; D];
        }
        let dw_dr = self.kernel.gradient(r, 1.0);
        std::array::from_fn(|a| {
            dw_dr * (u[a] / r) * extent / (self.radius_cell_scale[a] * dx[a])
        })
    }

    fn extent(&self) -> Scalar {
        let support = self.kernel.support_radius();
        if support.is_finite() {
            support
        } else {
            UNBOUNDED_KERNEL_CUTOFF
        }
    }

    fn normalize(&self, offset: [Scalar; D], dx: [Scalar; D]) -> ([Scalar; D], Scalar) {
        let extent = self.extent();
        let u: [Scalar; D] =
            std::array::from_fn(|a| offset[a] / (self.radius_cell_scale[a] * dx[a]) * extent);
        let r = u.iter().map(|c| c * c).sum::<Scalar>().sqrt();
        (u, r)
    }
}
