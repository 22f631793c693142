//! MPM configuration.
//!
//! Everything needed to build a [`GridMpmDriver`](crate::GridMpmDriver):
//! the driver clock, the background grid, the strategies and the initial
//! particle blocks. Vector fields are lists so one file format serves
//! both 2D and 3D; their lengths are checked against `dimension`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use physkit_driver::DriverConfig;
use physkit_kernels::KernelKind;
use physkit_types::constants::{DEFAULT_CFL_NUMBER, DEFAULT_SOUND_SPEED, GRAVITY};
use physkit_types::{PhysError, PhysResult, Scalar};

use crate::step_method::StepMethodKind;

/// Background grid domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub min_corner: Vec<Scalar>,
    pub max_corner: Vec<Scalar>,
    /// Cells per axis; a single entry applies to every axis.
    pub cells: Vec<u32>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_corner: vec![0.0, 0.0],
            max_corner: vec![1.0, 1.0],
            cells: vec![32],
        }
    }
}

/// An axis-aligned box filled with particles on a regular lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleBlock {
    pub min_corner: Vec<Scalar>,
    pub max_corner: Vec<Scalar>,
    /// Particles per cell along each axis.
    pub per_cell: u32,
    pub density: Scalar,
    /// Initial velocity; empty means at rest.
    pub velocity: Vec<Scalar>,
}

impl Default for ParticleBlock {
    fn default() -> Self {
        Self {
            min_corner: vec![0.4, 0.4],
            max_corner: vec![0.6, 0.6],
            per_cell: 2,
            density: 1000.0,
            velocity: Vec::new(),
        }
    }
}

/// Complete MPM driver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MpmConfig {
    /// Spatial dimension, 2 or 3.
    pub dimension: usize,

    pub kernel: KernelKind,

    /// Kernel support in cells; a single entry applies to every axis.
    pub radius_cell_scale: Vec<Scalar>,

    pub step_method: StepMethodKind,

    /// CFL number in `(0, 1]`.
    pub cfl: Scalar,

    pub sound_speed: Scalar,

    pub gravity: Vec<Scalar>,

    pub driver: DriverConfig,

    pub grid: GridConfig,

    pub blocks: Vec<ParticleBlock>,
}

impl Default for MpmConfig {
    fn default() -> Self {
        Self {
            dimension: 2,
            kernel: KernelKind::Cubic,
            radius_cell_scale: vec![2.0],
            step_method: StepMethodKind::default(),
            cfl: DEFAULT_CFL_NUMBER,
            sound_speed: DEFAULT_SOUND_SPEED,
            gravity: vec![0.0, -GRAVITY],
            driver: DriverConfig::default(),
            grid: GridConfig::default(),
            blocks: vec![ParticleBlock::default()],
        }
    }
}

impl MpmConfig {
    /// Checks every field, including vector lengths against `dimension`.
    pub fn validate(&self) -> PhysResult<()> {
        if !(2..=3).contains(&self.dimension) {
            return Err(PhysError::Config(format!(
                "dimension must be 2 or 3, got {}",
                self.dimension
            )));
        }
        self.driver.validate()?;

        let dim = self.dimension;
        let min = axis_values(&self.grid.min_corner, dim, "grid.min_corner", false)?;
        let max = axis_values(&self.grid.max_corner, dim, "grid.max_corner", false)?;
        if (0..dim).any(|a| !(max[a] > min[a])) {
            return Err(PhysError::Config(format!(
                "grid domain is empty: {:?} .. {:?}",
                min, max
            )));
        }
        let cells = axis_values(&self.grid.cells, dim, "grid.cells", true)?;
        if cells.contains(&0) {
            return Err(PhysError::Config("grid.cells must be positive".into()));
        }

        let scale = axis_values(&self.radius_cell_scale, dim, "radius_cell_scale", true)?;
        if scale.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(PhysError::Config(format!(
                "radius_cell_scale must be positive, got {:?}",
                scale
            )));
        }
        if !(self.cfl > 0.0 && self.cfl <= 1.0) {
            return Err(PhysError::Config(format!(
                "cfl must be in (0, 1], got {}",
                self.cfl
            )));
        }
        if !(self.sound_speed.is_finite() && self.sound_speed >= 0.0) {
            return Err(PhysError::Config(format!(
                "sound_speed must be non-negative, got {}",
                self.sound_speed
            )));
        }
        axis_values(&self.gravity, dim, "gravity", false)?;

        for (i, block) in self.blocks.iter().enumerate() {
            axis_values(&block.min_corner, dim, &format!("blocks[{i}].min_corner"), false)?;
            axis_values(&block.max_corner, dim, &format!("blocks[{i}].max_corner"), false)?;
            if block.per_cell == 0 {
                return Err(PhysError::Config(format!("blocks[{i}].per_cell must be positive")));
            }
            if !(block.density.is_finite() && block.density > 0.0) {
                return Err(PhysError::Config(format!(
                    "blocks[{i}].density must be positive, got {}",
                    block.density
                )));
            }
            if !block.velocity.is_empty() {
                axis_values(&block.velocity, dim, &format!("blocks[{i}].velocity"), false)?;
            }
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> PhysResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| PhysError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> PhysResult<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Serializes to a TOML document.
    pub fn to_toml_string(&self) -> PhysResult<String> {
        toml::to_string(self).map_err(|e| PhysError::Config(e.to_string()))
    }
}

/// Returns `values` expanded to `dim` entries.
///
/// With `broadcast`, a single entry is repeated along every axis.
fn axis_values<T: Copy>(values: &[T], dim: usize, what: &str, broadcast: bool) -> PhysResult<Vec<T>> {
    match values.len() {
        n if n == dim => Ok(values.to_vec()),
        1 if broadcast => Ok(vec![values[0]; dim]),
        n => Err(PhysError::Config(format!(
            "{what} has {n} entries, expected {dim}"
        ))),
    }
}

/// Converts a validated list into a fixed-size array.
pub(crate) fn to_array<T: Copy + Default, const D: usize>(
    values: &[T],
    what: &str,
    broadcast: bool,
) -> PhysResult<[T; D]> {
    let values = axis_values(values, D, what, broadcast)?;
    let mut out = [T::default(); D];
    out.copy_from_slice(&values);
    Ok(out)
}
