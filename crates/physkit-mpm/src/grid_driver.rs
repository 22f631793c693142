//! Grid-based MPM driver.
//!
//! Owns the background grid, the particles and gravity, seeds particles
//! from the configured blocks and checkpoints them with the driver clock.

use std::path::Path;

use physkit_driver::{Checkpoint, Driver, DriverBase, DriverConfig};
use physkit_math::{Grid, IndexBox};
use physkit_types::{PhysError, PhysResult, Scalar};

use crate::base::{MpmBase, MpmDriver};
use crate::config::{to_array, MpmConfig, ParticleBlock};
use crate::state::ParticleState;
use crate::step_method::MpmStepContext;

/// A `D`-dimensional MPM simulation on a uniform grid.
pub struct GridMpmDriver<const D: usize> {
    base: DriverBase<Self>,
    mpm: MpmBase<D>,
    grid: Grid<D>,
    particles: ParticleState<D>,
    gravity: [Scalar; D],
    blocks: Vec<ParticleBlock>,
}

impl<const D: usize> GridMpmDriver<D> {
    /// A driver with no strategies, no particle blocks and zero gravity.
    pub fn with_grid(config: DriverConfig, grid: Grid<D>) -> Self {
        Self {
            base: DriverBase::new(config),
            mpm: MpmBase::new(),
            grid,
            particles: ParticleState::new(),
            gravity: [0.0; D],
            blocks: Vec::new(),
        }
    }

    /// Builds a fully configured driver.
    pub fn new(config: &MpmConfig) -> PhysResult<Self> {
        let grid = build_grid(config)?;
        let mut driver = Self::with_grid(config.driver.clone(), grid);
        driver.apply_config(config)?;
        Ok(driver)
    }

    pub fn from_config_file<P: AsRef<Path>>(path: P) -> PhysResult<Self> {
        Self::new(&MpmConfig::load(path)?)
    }

    /// Reconfigures grid, strategies, gravity and blocks.
    ///
    /// Plugins stay registered; the clock rewinds to the new start frame.
    pub fn apply_config(&mut self, config: &MpmConfig) -> PhysResult<()> {
        self.grid = build_grid(config)?;
        self.base.set_config(config.driver.clone())?;
        self.mpm.set_cfl_constant(config.cfl)?;
        self.mpm.set_sound_speed(config.sound_speed)?;
        self.mpm.set_weight_function_kind(
            config.kernel,
            to_array(&config.radius_cell_scale, "radius_cell_scale", true)?,
        )?;
        self.install_step_method(config.step_method.create())?;
        self.gravity = to_array(&config.gravity, "gravity", false)?;
        self.blocks = config.blocks.clone();
        Ok(())
    }

    pub fn particles(&self) -> &ParticleState<D> {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleState<D> {
        &mut self.particles
    }

    pub fn gravity(&self) -> [Scalar; D] {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: [Scalar; D]) {
        self.gravity = gravity;
    }

    pub fn blocks(&self) -> &[ParticleBlock] {
        &self.blocks
    }

    /// Fills `block` (clipped to the grid) with particles.
    ///
    /// Particles sit at the centers of a sub-lattice with `per_cell`
    /// points per cell edge. Returns the number of particles added.
    pub fn seed_block(&mut self, block: &ParticleBlock) -> PhysResult<usize> {
        let min: [Scalar; D] = to_array(&block.min_corner, "block min_corner", false)?;
        let max: [Scalar; D] = to_array(&block.max_corner, "block max_corner", false)?;
        let velocity: [Scalar; D] = if block.velocity.is_empty() {
            [0.0; D]
        } else {
            to_array(&block.velocity, "block velocity", false)?
        };
        if block.per_cell == 0 {
            return Err(PhysError::Config("block per_cell must be positive".into()));
        }

        let grid_min = self.grid.min_corner();
        let grid_max = self.grid.max_corner();
        let dx = self.grid.dx();
        let mut lo = [0.0; D];
        let mut spacing = [0.0; D];
        let mut count = [0u32; D];
        for a in 0..D {
            lo[a] = min[a].max(grid_min[a]);
            let hi = max[a].min(grid_max[a]);
            spacing[a] = dx[a] / block.per_cell as Scalar;
            let n = ((hi - lo[a]) / spacing[a]).round();
            if n.is_nan() || n < 1.0 {
                return Ok(0);
            }
            count[a] = n as u32;
        }

        let volume: Scalar = spacing.iter().product();
        let mass = block.density * volume;
        let mut added = 0;
        for k in IndexBox::new([0; D], std::array::from_fn(|a| count[a] - 1)) {
            let x: [Scalar; D] =
                std::array::from_fn(|a| lo[a] + (k[a] as Scalar + 0.5) * spacing[a]);
            if self.grid.contains(x) {
                self.particles.add_particle(x, velocity, mass, volume);
                added += 1;
            }
        }
        Ok(added)
    }
}

fn build_grid<const D: usize>(config: &MpmConfig) -> PhysResult<Grid<D>> {
    config.validate()?;
    if config.dimension != D {
        return Err(PhysError::Config(format!(
            "configuration is {}-dimensional, driver is {}-dimensional",
            config.dimension, D
        )));
    }
    Grid::new(
        to_array(&config.grid.min_corner, "grid.min_corner", false)?,
        to_array(&config.grid.max_corner, "grid.max_corner", false)?,
        to_array(&config.grid.cells, "grid.cells", true)?,
    )
}

impl<const D: usize> Driver for GridMpmDriver<D> {
    fn base(&self) -> &DriverBase<Self> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DriverBase<Self> {
        &mut self.base
    }

    fn initialize(&mut self) -> PhysResult<()> {
        self.particles.clear();
        let blocks = self.blocks.clone();
        for block in &blocks {
            self.seed_block(block)?;
        }
        tracing::info!(
            particles = self.particles.len(),
            nodes = self.grid.node_count(),
            "MPM driver initialized"
        );
        Ok(())
    }

    fn compute_time_step(&self) -> Scalar {
        self.compute_mpm_time_step()
    }

    fn advance_step(&mut self, dt: Scalar) -> PhysResult<()> {
        let result = self.advance_mpm_step(dt)?;
        tracing::trace!(
            dt,
            active_nodes = result.active_nodes,
            clamped = result.clamped,
            "substep"
        );
        Ok(())
    }

    fn init_configuration(&mut self, path: &Path) -> PhysResult<()> {
        let config = MpmConfig::load(path)?;
        self.apply_config(&config)
    }

    fn with_restart_support(&self) -> bool {
        true
    }

    fn write(&self, path: &Path) -> PhysResult<()> {
        Checkpoint::new(self.base.clock(), &self.particles).save(path)
    }

    fn read(&mut self, path: &Path) -> PhysResult<()> {
        let checkpoint = Checkpoint::<ParticleState<D>>::load(path)?;
        checkpoint.payload.validate()?;
        self.base.restore_clock(&checkpoint.header)?;
        self.particles = checkpoint.payload;
        self.base.mark_initialized();
        tracing::debug!(
            frame = checkpoint.header.frame,
            particles = self.particles.len(),
            "checkpoint restored"
        );
        Ok(())
    }

    fn check_state(&self) -> PhysResult<()> {
        if self.particles.is_finite() {
            Ok(())
        } else {
            Err(PhysError::Numeric(format!(
                "non-finite particle state at frame {}",
                self.base.current_frame()
            )))
        }
    }
}

impl<const D: usize> MpmDriver<D> for GridMpmDriver<D> {
    fn mpm(&self) -> &MpmBase<D> {
        &self.mpm
    }

    fn mpm_mut(&mut self) -> &mut MpmBase<D> {
        &mut self.mpm
    }

    fn grid(&self) -> &Grid<D> {
        &self.grid
    }

    fn max_particle_velocity_norm(&self) -> Scalar {
        self.particles.max_velocity_norm()
    }

    fn step_context(&mut self) -> PhysResult<MpmStepContext<'_, D>> {
        Ok(MpmStepContext {
            grid: &self.grid,
            weight_function: self.mpm.weight_function()?,
            particles: &mut self.particles,
            gravity: self.gravity,
        })
    }
}
