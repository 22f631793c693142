//! Step-method strategy trait: the per-substep update operator.
//!
//! Every step method implements this trait, enabling an MPM driver to swap
//! integration schemes at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use physkit_kernels::GridWeightFunction;
use physkit_math::Grid;
use physkit_types::{PhysResult, Scalar};

use crate::euler::SymplecticEulerStep;
use crate::pic::PicTransferStep;
use crate::state::ParticleState;

/// Everything a step method may touch during one substep.
///
/// Borrowed from the driver for the duration of the call only.
pub struct MpmStepContext<'a, const D: usize> {
    pub grid: &'a Grid<D>,
    pub weight_function: &'a GridWeightFunction<D>,
    pub particles: &'a mut ParticleState<D>,
    pub gravity: [Scalar; D],
}

/// Result of a single substep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepResult {
    /// Particles updated.
    pub particles: usize,
    /// Grid nodes that received mass (0 for particle-only methods).
    pub active_nodes: usize,
    /// Mass transferred to the grid (0 for particle-only methods).
    pub grid_mass: Scalar,
    /// Particles pushed back into the domain.
    pub clamped: usize,
}

/// Trait for MPM substep operators.
///
/// The driver calls these methods in order:
///
/// ```text
/// method.bind(grid)?;              // once, when installed
/// loop {
///     method.perform_step(ctx, dt)?;
/// }
/// ```
pub trait StepMethod<const D: usize>: Send + fmt::Debug {
    /// Prepares the method for the driver's grid.
    fn bind(&mut self, grid: &Grid<D>) -> PhysResult<()> {
        let _ = grid;
        Ok(())
    }

    /// Advances particles by `dt`.
    fn perform_step(&mut self, ctx: MpmStepContext<'_, D>, dt: Scalar) -> PhysResult<StepResult>;

    fn kind(&self) -> StepMethodKind;

    /// Returns the method's name.
    fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// The available step methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMethodKind {
    SymplecticEuler,
    #[default]
    PicTransfer,
}

impl StepMethodKind {
    pub fn all() -> &'static [StepMethodKind] {
        &[StepMethodKind::SymplecticEuler, StepMethodKind::PicTransfer]
    }

    pub fn name(self) -> &'static str {
        match self {
            StepMethodKind::SymplecticEuler => "symplectic_euler",
            StepMethodKind::PicTransfer => "pic_transfer",
        }
    }

    /// Builds an unbound instance.
    pub fn create<const D: usize>(self) -> Box<dyn StepMethod<D>> {
        match self {
            StepMethodKind::SymplecticEuler => Box::new(SymplecticEulerStep),
            StepMethodKind::PicTransfer => Box::new(PicTransferStep::default()),
        }
    }
}

impl fmt::Display for StepMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StepMethodKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "symplectic_euler" | "euler" => Ok(StepMethodKind::SymplecticEuler),
            "pic_transfer" | "pic" => Ok(StepMethodKind::PicTransfer),
            other => Err(format!("unknown step method '{other}'")),
        }
    }
}

/// Clamps particle `i` into the grid domain, zeroing the velocity
/// components that pointed out of it. Returns true if it moved.
pub(crate) fn clamp_to_domain<const D: usize>(
    grid: &Grid<D>,
    particles: &mut ParticleState<D>,
    i: usize,
) -> bool {
    let x = particles.position(i);
    let clamped = grid.clamp_position(x);
    if clamped == x {
        return false;
    }
    let mut v = particles.velocity(i);
    for a in 0..D {
        if clamped[a] != x[a] {
            v[a] = 0.0;
        }
    }
    particles.set_position(i, clamped);
    particles.set_velocity(i, v);
    true
}
