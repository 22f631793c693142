//! # physkit-mpm
//!
//! Material-point-method drivers built on the frame loop of
//! `physkit-driver`.
//!
//! ## Key Types
//!
//! - [`MpmBase`]: Weight-function and step-method slots, CFL parameters
//! - [`MpmDriver`]: Extension of `Driver` with the CFL time step and step delegation
//! - [`StepMethod`]: Pluggable substep operator ([`SymplecticEulerStep`], [`PicTransferStep`])
//! - [`ParticleState`]: Flat per-particle buffers
//! - [`GridMpmDriver`]: Concrete driver on a uniform grid
//! - [`MpmConfig`]: TOML configuration for [`GridMpmDriver`]

pub mod base;
pub mod cfl;
pub mod config;
pub mod euler;
pub mod grid_driver;
pub mod pic;
pub mod state;
pub mod step_method;

pub use base::{MpmBase, MpmDriver};
pub use config::{GridConfig, MpmConfig, ParticleBlock};
pub use euler::SymplecticEulerStep;
pub use grid_driver::GridMpmDriver;
pub use pic::PicTransferStep;
pub use state::ParticleState;
pub use step_method::{MpmStepContext, StepMethod, StepMethodKind, StepResult};
