//! Kernel catalog and factory.
//!
//! Kernels are selected by name in configuration files and on the
//! command line; [`KernelKind::create`] builds the boxed strategy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::smoothing::{GaussKernel, LaplacianKernel, SmoothKernel, SpikyKernel, StandardKernel};
use crate::spline::{CubicKernel, QuadraticKernel, QuarticKernel};
use crate::traits::WeightFunction;

/// The closed set of available kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    Standard,
    Smooth,
    Spiky,
    Laplacian,
    Cubic,
    Quadratic,
    Quartic,
    Gauss,
}

impl KernelKind {
    /// Returns all kernels in catalog order.
    pub fn all() -> &'static [KernelKind] {
        &[
            KernelKind::Standard,
            KernelKind::Smooth,
            KernelKind::Spiky,
            KernelKind::Laplacian,
            KernelKind::Cubic,
            KernelKind::Quadratic,
            KernelKind::Quartic,
            KernelKind::Gauss,
        ]
    }

    /// Returns the configuration name of this kernel.
    pub fn name(self) -> &'static str {
        match self {
            KernelKind::Standard => "standard",
            KernelKind::Smooth => "smooth",
            KernelKind::Spiky => "spiky",
            KernelKind::Laplacian => "laplacian",
            KernelKind::Cubic => "cubic",
            KernelKind::Quadratic => "quadratic",
            KernelKind::Quartic => "quartic",
            KernelKind::Gauss => "gauss",
        }
    }

    /// Builds a fresh kernel instance.
    pub fn create(self) -> Box<dyn WeightFunction> {
        match self {
            KernelKind::Standard => Box::new(StandardKernel),
            KernelKind::Smooth => Box::new(SmoothKernel),
            KernelKind::Spiky => Box::new(SpikyKernel),
            KernelKind::Laplacian => Box::new(LaplacianKernel),
            KernelKind::Cubic => Box::new(CubicKernel),
            KernelKind::Quadratic => Box::new(QuadraticKernel),
            KernelKind::Quartic => Box::new(QuarticKernel),
            KernelKind::Gauss => Box::new(GaussKernel),
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KernelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let kind = match lowered.as_str() {
            "standard" | "poly6" => KernelKind::Standard,
            "smooth" => KernelKind::Smooth,
            "spiky" => KernelKind::Spiky,
            "laplacian" | "viscosity" => KernelKind::Laplacian,
            "cubic" | "cubic_spline" => KernelKind::Cubic,
            "quadratic" => KernelKind::Quadratic,
            "quartic" | "quartic_spline" => KernelKind::Quartic,
            "gauss" | "gaussian" => KernelKind::Gauss,
            _ => {
                let available: Vec<&str> = Self::all().iter().map(|k| k.name()).collect();
                return Err(format!(
                    "Unknown kernel: '{s}'. Available: {}",
                    available.join(", ")
                ));
            }
        };
        Ok(kind)
    }
}
