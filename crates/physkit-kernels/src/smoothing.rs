//! Unit-support SPH kernels and the Gauss kernel.
//!
//! All kernels here are written in `q = r / h`.

use std::f64::consts::PI;

use physkit_types::Scalar;

use crate::kind::KernelKind;
use crate::traits::WeightFunction;

/// Poly6-style kernel: `315 / (64 π h³) · (1 − q²)³` for `q² ≤ 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardKernel;

impl WeightFunction for StandardKernel {
    fn weight(&self, r: Scalar, h: Scalar) -> Scalar {
        let qq = r * r / (h * h);
        if qq > 1.0 {
            return 0.0;
        }
        let dd = 1.0 - qq;
        315.0 / (64.0 * PI * h * h * h) * dd * dd * dd
    }

    fn gradient(&self, r: Scalar, h: Scalar) -> Scalar {
        let q = r / h;
        if q > 1.0 {
            return 0.0;
        }
        let dd = 1.0 - q * q;
        // d/dr (1 - q²)³ = -6 q (1 - q²)² / h
        -945.0 / (32.0 * PI * h * h * h * h) * q * dd * dd
    }

    fn support_radius(&self) -> Scalar {
        1.0
    }

    fn kind(&self) -> KernelKind {
        KernelKind::Standard
    }
}

/// Unnormalized parabola: `1 − q²` for `q ≤ 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothKernel;

impl WeightFunction for SmoothKernel {
    fn weight(&self, r: Scalar, h: Scalar) -> Scalar {
        let q = r / h;
        if q > 1.0 {
            return 0.0;
        }
        1.0 - q * q
    }

    fn gradient(&self, r: Scalar, h: Scalar) -> Scalar {
        let q = r / h;
        if q > 1.0 {
            return 0.0;
        }
        -2.0 * q / h
    }

    fn support_radius(&self) -> Scalar {
        1.0
    }

    fn kind(&self) -> KernelKind {
        KernelKind::Smooth
    }
}

/// Spiky kernel: `15 / (π h³) · (1 − q)³` for `q ≤ 1`.
///
/// Its gradient does not vanish at the origin, which keeps particles
/// from clumping under pressure forces.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpikyKernel;

impl WeightFunction for SpikyKernel {
    fn weight(&self, r: Scalar, h: Scalar) -> Scalar {
        let q = r / h;
        if q > 1.0 {
            return 0.0;
        }
        let d = 1.0 - q;
        15.0 / (PI * h * h * h) * d * d * d
    }

    fn gradient(&self, r: Scalar, h: Scalar) -> Scalar {
        let q = r / h;
        if q > 1.0 {
            return 0.0;
        }
        let d = 1.0 - q;
        -45.0 / (PI * h * h * h * h) * d * d
    }

    fn support_radius(&self) -> Scalar {
        1.0
    }

    fn kind(&self) -> KernelKind {
        KernelKind::Spiky
    }
}

/// Viscosity kernel: `45 / (13 π h³) · (1 − q)` for `q ≤ 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaplacianKernel;

impl WeightFunction for LaplacianKernel {
    fn weight(&self, r: Scalar, h: Scalar) -> Scalar {
        let q = r / h;
        if q > 1.0 {
            return 0.0;
        }
        45.0 / (13.0 * PI * h * h * h) * (1.0 - q)
    }

    fn gradient(&self, r: Scalar, h: Scalar) -> Scalar {
        let q = r / h;
        if q > 1.0 {
            return 0.0;
        }
        -45.0 / (13.0 * PI * h * h * h * h)
    }

    fn support_radius(&self) -> Scalar {
        1.0
    }

    fn kind(&self) -> KernelKind {
        KernelKind::Laplacian
    }
}

/// Exponential falloff `e^(−q)`, defined for every `r`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussKernel;

impl WeightFunction for GaussKernel {
    fn weight(&self, r: Scalar, h: Scalar) -> Scalar {
        (-r / h).exp()
    }

    fn gradient(&self, r: Scalar, h: Scalar) -> Scalar {
        -(-r / h).exp() / h
    }

    fn support_radius(&self) -> Scalar {
        Scalar::INFINITY
    }

    fn kind(&self) -> KernelKind {
        KernelKind::Gauss
    }
}
