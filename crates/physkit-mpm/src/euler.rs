//! Particle-only symplectic Euler step.

use physkit_types::{PhysResult, Scalar};

use crate::step_method::{clamp_to_domain, MpmStepContext, StepMethod, StepMethodKind, StepResult};

/// `v += g·dt; x += v·dt`, then clamp to the grid domain.
///
/// Ignores the grid transfer entirely; useful as a baseline and for
/// ballistic tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymplecticEulerStep;

impl<const D: usize> StepMethod<D> for SymplecticEulerStep {
    fn perform_step(&mut self, ctx: MpmStepContext<'_, D>, dt: Scalar) -> PhysResult<StepResult> {
        let MpmStepContext {
            grid,
            particles,
            gravity,
            ..
        } = ctx;

        let mut clamped = 0;
        for i in 0..particles.len() {
            let mut v = particles.velocity(i);
            let mut x = particles.position(i);
            for a in 0..D {
                v[a] += gravity[a] * dt;
                x[a] += v[a] * dt;
            }
            particles.set_velocity(i, v);
            particles.set_position(i, x);
            if clamp_to_domain(grid, particles, i) {
                clamped += 1;
            }
        }

        Ok(StepResult {
            particles: particles.len(),
            active_nodes: 0,
            grid_mass: 0.0,
            clamped,
        })
    }

    fn kind(&self) -> StepMethodKind {
        StepMethodKind::SymplecticEuler
    }
}
