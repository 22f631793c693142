//! # physkit-driver
//!
//! Frame-paced simulation driver skeleton.
//!
//! ## Key Types
//!
//! - [`Driver`]: Trait implemented by concrete simulations; provides `run`.
//! - [`DriverBase`]: Clock, configuration and plugin list shared by all drivers.
//! - [`DriverConfig`]: Frame range, frame rate, `max_dt`, output settings.
//! - [`DriverPlugin`]: Observers notified around frames and substeps.
//! - [`Checkpoint`]: `bincode` envelope used by `write`/`read`.
//!
//! ```text
//! for frame in start..=end:
//!     plugins.on_begin_frame
//!     while time_within_frame < frame_duration:
//!         dt = min(compute_time_step(), max_dt, remaining)
//!         plugins.on_begin_substep
//!         advance_step(dt); check_state()
//!         plugins.on_end_substep
//!     write(frame artifact)   // when write_to_file
//!     plugins.on_end_frame
//! ```

pub mod checkpoint;
pub mod config;
pub mod driver;
pub mod plugin;

pub use checkpoint::{Checkpoint, CheckpointHeader};
pub use config::DriverConfig;
pub use driver::{Driver, DriverBase, FrameReport, RunSummary, SubstepContext};
pub use plugin::{DriverPlugin, PluginError, PluginResult, SubstepBudgetPlugin, TelemetryPlugin};
