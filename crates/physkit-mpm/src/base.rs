//! MPM driver base and the `MpmDriver` extension of [`Driver`].
//!
//! [`MpmBase`] owns the two strategies every MPM driver needs: the grid
//! weight function and the step method. Installing either one drops the
//! previous instance.

use physkit_driver::Driver;
use physkit_kernels::{GridWeightFunction, KernelKind, WeightFunction};
use physkit_math::Grid;
use physkit_types::constants::{DEFAULT_CFL_NUMBER, DEFAULT_SOUND_SPEED};
use physkit_types::{PhysError, PhysResult, Scalar};

use crate::cfl::cfl_time_step;
use crate::step_method::{MpmStepContext, StepMethod, StepMethodKind, StepResult};

/// Strategy slots and CFL parameters shared by MPM drivers.
#[derive(Debug)]
pub struct MpmBase<const D: usize> {
    weight_function: Option<GridWeightFunction<D>>,
    step_method: Option<Box<dyn StepMethod<D>>>,
    cfl_num: Scalar,
    sound_speed: Scalar,
}

impl<const D: usize> Default for MpmBase<D> {
    fn default() -> Self {
        Self {
            weight_function: None,
            step_method: None,
            cfl_num: DEFAULT_CFL_NUMBER,
            sound_speed: DEFAULT_SOUND_SPEED,
        }
    }
}

impl<const D: usize> MpmBase<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects kernel `K` with a support of `radius_cell_scale` cells per axis.
    pub fn set_weight_function<K>(&mut self, radius_cell_scale: [Scalar; D]) -> PhysResult<()>
    where
        K: WeightFunction + Default + 'static,
    {
        self.install_weight_function(GridWeightFunction::new(Box::new(K::default()), radius_cell_scale)?);
        Ok(())
    }

    /// Selects a kernel from the catalog.
    pub fn set_weight_function_kind(
        &mut self,
        kind: KernelKind,
        radius_cell_scale: [Scalar; D],
    ) -> PhysResult<()> {
        self.install_weight_function(GridWeightFunction::from_kind(kind, radius_cell_scale)?);
        Ok(())
    }

    pub fn install_weight_function(&mut self, weight_function: GridWeightFunction<D>) {
        if let Some(old) = self.weight_function.replace(weight_function) {
            tracing::debug!(old = old.kind().name(), "weight function replaced");
        }
    }

    /// The installed weight function.
    pub fn weight_function(&self) -> PhysResult<&GridWeightFunction<D>> {
        self.weight_function
            .as_ref()
            .ok_or_else(|| PhysError::Config("no weight function set".into()))
    }

    pub fn has_weight_function(&self) -> bool {
        self.weight_function.is_some()
    }

    /// Installs an already bound step method, dropping the previous one.
    pub fn replace_step_method(&mut self, method: Box<dyn StepMethod<D>>) {
        if let Some(old) = self.step_method.replace(method) {
            tracing::debug!(old = old.name(), "step method replaced");
        }
    }

    pub fn step_method(&self) -> Option<&dyn StepMethod<D>> {
        self.step_method.as_deref()
    }

    /// Kind of the installed step method, if any.
    pub fn step_method_kind(&self) -> Option<StepMethodKind> {
        self.step_method.as_ref().map(|m| m.kind())
    }

    /// Moves the step method out for the duration of a substep.
    pub fn take_step_method(&mut self) -> PhysResult<Box<dyn StepMethod<D>>> {
        self.step_method
            .take()
            .ok_or_else(|| PhysError::Config("no step method set".into()))
    }

    /// Puts back a method taken with [`MpmBase::take_step_method`].
    ///
    /// A method installed while it was out wins.
    pub fn restore_step_method(&mut self, method: Box<dyn StepMethod<D>>) {
        if self.step_method.is_none() {
            self.step_method = Some(method);
        }
    }

    pub fn cfl_constant(&self) -> Scalar {
        self.cfl_num
    }

    /// Sets the CFL number, which must lie in `(0, 1]`.
    pub fn set_cfl_constant(&mut self, cfl: Scalar) -> PhysResult<()> {
        if !(cfl > 0.0 && cfl <= 1.0) {
            return Err(PhysError::Config(format!(
                "CFL constant must be in (0, 1], got {cfl}"
            )));
        }
        self.cfl_num = cfl;
        Ok(())
    }

    pub fn sound_speed(&self) -> Scalar {
        self.sound_speed
    }

    pub fn set_sound_speed(&mut self, sound_speed: Scalar) -> PhysResult<()> {
        if !(sound_speed.is_finite() && sound_speed >= 0.0) {
            return Err(PhysError::Config(format!(
                "sound speed must be non-negative, got {sound_speed}"
            )));
        }
        self.sound_speed = sound_speed;
        Ok(())
    }

    /// CFL-bounded step for the given grid and particle extremes.
    pub fn compute_time_step(&self, max_dt: Scalar, min_cell_edge: Scalar, max_speed: Scalar) -> Scalar {
        cfl_time_step(max_dt, self.cfl_num, min_cell_edge, max_speed, self.sound_speed)
    }
}

/// A [`Driver`] that advances particles on a background grid.
///
/// Implementors expose their [`MpmBase`], grid and particle extremes; the
/// CFL time step and the delegation to the step method come for free.
/// A concrete driver typically forwards its [`Driver`] hooks:
///
/// ```text
/// fn compute_time_step(&self) -> Scalar { self.compute_mpm_time_step() }
/// fn advance_step(&mut self, dt)       { self.advance_mpm_step(dt)?; }
/// ```
pub trait MpmDriver<const D: usize>: Driver {
    fn mpm(&self) -> &MpmBase<D>;

    fn mpm_mut(&mut self) -> &mut MpmBase<D>;

    fn grid(&self) -> &Grid<D>;

    /// Shortest grid cell edge.
    fn min_cell_edge_length(&self) -> Scalar {
        self.grid().min_edge_length()
    }

    /// Largest particle speed.
    fn max_particle_velocity_norm(&self) -> Scalar;

    /// Borrows the state a step method mutates.
    fn step_context(&mut self) -> PhysResult<MpmStepContext<'_, D>>;

    fn set_weight_function<K>(&mut self, radius_cell_scale: [Scalar; D]) -> PhysResult<()>
    where
        K: WeightFunction + Default + 'static,
    {
        self.mpm_mut().set_weight_function::<K>(radius_cell_scale)
    }

    /// Installs step method `M`, bound to this driver's grid.
    fn set_step_method<M>(&mut self) -> PhysResult<()>
    where
        M: StepMethod<D> + Default + 'static,
    {
        self.install_step_method(Box::new(M::default()))
    }

    /// Binds `method` to this driver and installs it.
    fn install_step_method(&mut self, mut method: Box<dyn StepMethod<D>>) -> PhysResult<()> {
        method.bind(self.grid())?;
        tracing::debug!(method = method.name(), "step method bound");
        self.mpm_mut().replace_step_method(method);
        Ok(())
    }

    fn compute_mpm_time_step(&self) -> Scalar {
        self.mpm().compute_time_step(
            self.base().config().max_dt,
            self.min_cell_edge_length(),
            self.max_particle_velocity_norm(),
        )
    }

    /// Runs one substep through the installed step method.
    fn advance_mpm_step(&mut self, dt: Scalar) -> PhysResult<StepResult> {
        self.mpm().weight_function()?;
        let mut method = self.mpm_mut().take_step_method()?;
        let result = match self.step_context() {
            Ok(ctx) => method.perform_step(ctx, dt),
            Err(e) => Err(e),
        };
        self.mpm_mut().restore_step_method(method);
        result
    }
}
