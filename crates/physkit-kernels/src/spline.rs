//! Piecewise polynomial spline kernels.

use std::f64::consts::PI;

use physkit_types::Scalar;

use crate::kind::KernelKind;
use crate::traits::WeightFunction;

/// Cubic B-spline with support `q ≤ 2`.
///
/// ```text
/// α (2/3 − q² + q³/2)   0 ≤ q < 1
/// α/6 (2 − q)³          1 ≤ q ≤ 2      α = 3 / (2 π h³)
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CubicKernel;

impl CubicKernel {
    fn alpha(h: Scalar) -> Scalar {
        3.0 / (2.0 * PI * h * h * h)
    }
}

impl WeightFunction for CubicKernel {
    fn weight(&self, r: Scalar, h: Scalar) -> Scalar {
        let q = r / h;
        let alpha = Self::alpha(h);
        if q > 2.0 {
            0.0
        } else if q >= 1.0 {
            let d = 2.0 - q;
            alpha / 6.0 * d * d * d
        } else {
            let qq = q * q;
            alpha * (2.0 / 3.0 - qq + 0.5 * qq * q)
        }
    }

    fn gradient(&self, r: Scalar, h: Scalar) -> Scalar {
        let q = r / h;
        let alpha = Self::alpha(h);
        let dw_dq = if q > 2.0 {
            0.0
        } else if q >= 1.0 {
            let d = 2.0 - q;
            -0.5 * alpha * d * d
        } else {
            alpha * (-2.0 * q + 1.5 * q * q)
        };
        dw_dq / h
    }

    fn support_radius(&self) -> Scalar {
        2.0
    }

    fn kind(&self) -> KernelKind {
        KernelKind::Cubic
    }
}

/// Quadratic falloff `15 / (2π) · (1 − q)²` for `q ≤ 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadraticKernel;

impl WeightFunction for QuadraticKernel {
    fn weight(&self, r: Scalar, h: Scalar) -> Scalar {
        let q = r / h;
        if q > 1.0 {
            return 0.0;
        }
        15.0 / (2.0 * PI) * (1.0 - q) * (1.0 - q)
    }

    fn gradient(&self, r: Scalar, h: Scalar) -> Scalar {
        let q = r / h;
        if q > 1.0 {
            return 0.0;
        }
        -15.0 / PI * (1.0 - q) / h
    }

    fn support_radius(&self) -> Scalar {
        1.0
    }

    fn kind(&self) -> KernelKind {
        KernelKind::Quadratic
    }
}

/// Quartic spline in `q = 2.5 r / h`, support `q ≤ 2.5` (that is `r ≤ h`).
///
/// Sum of the terms `(2.5 − q)⁴`, `−5 (1.5 − q)⁴`, `10 (0.5 − q)⁴`, each
/// active below its knot, scaled by `0.0255 / h²`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuarticKernel;

const QUARTIC_SCALE: Scalar = 0.0255;

impl WeightFunction for QuarticKernel {
    fn weight(&self, r: Scalar, h: Scalar) -> Scalar {
        let q = 2.5 * r / h;
        if q > 2.5 {
            return 0.0;
        }
        let mut sum = (2.5 - q).powi(4);
        if q <= 1.5 {
            sum -= 5.0 * (1.5 - q).powi(4);
        }
        if q <= 0.5 {
            sum += 10.0 * (0.5 - q).powi(4);
        }
        QUARTIC_SCALE * sum / (h * h)
    }

    fn gradient(&self, r: Scalar, h: Scalar) -> Scalar {
        let q = 2.5 * r / h;
        if q > 2.5 {
            return 0.0;
        }
        let mut sum = (2.5 - q).powi(3);
        if q <= 1.5 {
            sum -= 5.0 * (1.5 - q).powi(3);
        }
        if q <= 0.5 {
            sum += 10.0 * (0.5 - q).powi(3);
        }
        // dw/dq = -4 · 0.0255 · sum / h², dq/dr = 2.5 / h
        -4.0 * QUARTIC_SCALE * sum / (h * h) * 2.5 / h
    }

    fn support_radius(&self) -> Scalar {
        1.0
    }

    fn kind(&self) -> KernelKind {
        KernelKind::Quartic
    }
}
