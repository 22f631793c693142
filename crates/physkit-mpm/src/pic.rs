//! Particle-in-cell transfer step.
//!
//! ```text
//! P2G:  m_i = Σ_p ŵ_ip m_p          p_i = Σ_p ŵ_ip m_p v_p
//! grid: v_i = p_i / m_i + g·dt       (v_i = 0 on boundary nodes)
//! G2P:  v_p = Σ_i ŵ_ip v_i           x_p += v_p·dt
//! ```
//!
//! `ŵ_ip` are the kernel weights of particle `p` normalized to sum to one
//! over the nodes in its support, so mass is conserved exactly by the
//! transfer regardless of the kernel.

use physkit_kernels::GridWeightFunction;
use physkit_math::Grid;
use physkit_types::{PhysResult, Scalar};

use crate::state::ParticleState;
use crate::step_method::{clamp_to_domain, MpmStepContext, StepMethod, StepMethodKind, StepResult};

/// PIC step with reusable node buffers.
#[derive(Debug, Clone, Default)]
pub struct PicTransferStep {
    node_mass: Vec<Scalar>,
    /// Momentum after P2G, velocity after the grid update. Stride `D`.
    node_velocity: Vec<Scalar>,
    /// `(flat node index, normalized weight)` of the particle being processed.
    stencil: Vec<(usize, Scalar)>,
}

impl PicTransferStep {
    /// Node mass from the last step, indexed by flat node index.
    pub fn node_mass(&self) -> &[Scalar] {
        &self.node_mass
    }

    fn resize<const D: usize>(&mut self, grid: &Grid<D>) {
        let n = grid.node_count();
        if self.node_mass.len() != n {
            self.node_mass.resize(n, 0.0);
            self.node_velocity.resize(n * D, 0.0);
        }
    }
}

/// Fills `stencil` with the normalized weights of the nodes around `x`.
fn gather_stencil<const D: usize>(
    stencil: &mut Vec<(usize, Scalar)>,
    grid: &Grid<D>,
    weight_function: &GridWeightFunction<D>,
    x: [Scalar; D],
) -> PhysResult<()> {
    stencil.clear();
    let dx = grid.dx();
    let mut sum = 0.0;
    for idx in grid.nodes_near(x, weight_function.support_radius(dx)) {
        let node = grid.node(idx)?;
        let offset: [Scalar; D] = std::array::from_fn(|a| x[a] - node[a]);
        let w = weight_function.weight(offset, dx);
        if w > 0.0 {
            stencil.push((grid.flat_node_index(idx), w));
            sum += w;
        }
    }
    if sum > 0.0 {
        for (_, w) in stencil.iter_mut() {
            *w /= sum;
        }
    } else {
        stencil.clear();
    }
    Ok(())
}

impl<const D: usize> StepMethod<D> for PicTransferStep {
    fn bind(&mut self, grid: &Grid<D>) -> PhysResult<()> {
        self.resize(grid);
        Ok(())
    }

    fn perform_step(&mut self, ctx: MpmStepContext<'_, D>, dt: Scalar) -> PhysResult<StepResult> {
        let MpmStepContext {
            grid,
            weight_function,
            particles,
            gravity,
        } = ctx;

        self.resize(grid);
        self.node_mass.fill(0.0);
        self.node_velocity.fill(0.0);

        // P2G
        for p in 0..particles.len() {
            gather_stencil(&mut self.stencil, grid, weight_function, particles.position(p))?;
            let m = particles.mass(p);
            let v = particles.velocity(p);
            for &(node, w) in &self.stencil {
                self.node_mass[node] += w * m;
                for a in 0..D {
                    self.node_velocity[node * D + a] += w * m * v[a];
                }
            }
        }

        // Grid update
        let mut active_nodes = 0;
        let mut grid_mass = 0.0;
        for idx in grid.nodes() {
            let node = grid.flat_node_index(idx);
            let m = self.node_mass[node];
            if m <= 0.0 {
                continue;
            }
            active_nodes += 1;
            grid_mass += m;
            let boundary = grid.is_boundary_node(idx);
            for a in 0..D {
                let slot = &mut self.node_velocity[node * D + a];
                *slot = if boundary { 0.0 } else { *slot / m + gravity[a] * dt };
            }
        }

        // G2P + advection
        let mut clamped = 0;
        for p in 0..particles.len() {
            let x = particles.position(p);
            gather_stencil(&mut self.stencil, grid, weight_function, x)?;
            let v = if self.stencil.is_empty() {
                let v = particles.velocity(p);
                std::array::from_fn(|a| v[a] + gravity[a] * dt)
            } else {
                gather_velocity(&self.stencil, &self.node_velocity)
            };
            particles.set_velocity(p, v);
            particles.set_position(p, std::array::from_fn(|a| x[a] + v[a] * dt));
            if clamp_to_domain(grid, particles, p) {
                clamped += 1;
            }
        }

        Ok(StepResult {
            particles: particles.len(),
            active_nodes,
            grid_mass,
            clamped,
        })
    }

    fn kind(&self) -> StepMethodKind {
        StepMethodKind::PicTransfer
    }
}

fn gather_velocity<const D: usize>(stencil: &[(usize, Scalar)], node_velocity: &[Scalar]) -> [Scalar; D] {
    let mut v = [0.0; D];
    for &(node, w) in stencil {
        for a in 0..D {
            v[a] += w * node_velocity[node * D + a];
        }
    }
    v
}
