//! Driver plugins.
//!
//! Plugins are injected into the driver loop and called at defined points
//! to capture metrics or enforce limits without modifying the driver
//! itself. They see the driver read-only.
//!
//! # Lifecycle
//!
//! ```text
//! for each frame:
//!   plugin.on_begin_frame(...)
//!   for each substep:
//!     plugin.on_begin_substep(...)
//!     plugin.on_end_substep(...)
//!   plugin.on_end_frame(...)
//! plugin.on_run_end(...)
//! ```

use std::sync::mpsc;

use thiserror::Error;
use physkit_telemetry::{EventBus, EventKind, SimulationEvent};

use crate::driver::{Driver, FrameReport, RunSummary, SubstepContext};

/// Error raised by a plugin.
///
/// A fatal error stops the run; any other error is logged and the run
/// continues.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct PluginError {
    pub message: String,
    pub fatal: bool,
}

impl PluginError {
    /// An error that is reported but does not stop the run.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fatal: false,
        }
    }

    /// An error that aborts the run.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fatal: true,
        }
    }
}

pub type PluginResult = Result<(), PluginError>;

/// Observer of a driver of type `D`.
pub trait DriverPlugin<D> {
    fn on_begin_frame(&mut self, driver: &D, frame: u32) -> PluginResult {
        let _ = (driver, frame);
        Ok(())
    }

    fn on_end_frame(&mut self, driver: &D, report: &FrameReport) -> PluginResult {
        let _ = (driver, report);
        Ok(())
    }

    fn on_begin_substep(&mut self, driver: &D, step: &SubstepContext) -> PluginResult {
        let _ = (driver, step);
        Ok(())
    }

    fn on_end_substep(&mut self, driver: &D, step: &SubstepContext) -> PluginResult {
        let _ = (driver, step);
        Ok(())
    }

    /// Called once after the last frame.
    fn on_run_end(&mut self, driver: &D, summary: &RunSummary) -> PluginResult {
        let _ = (driver, summary);
        Ok(())
    }

    /// Returns the plugin's name for logging.
    fn name(&self) -> &str;
}

/// Plugin that bridges to the telemetry event bus.
///
/// Translates driver lifecycle calls into telemetry events. Where they go
/// depends on the constructor: [`TelemetryPlugin::new`] keeps them for
/// [`TelemetryPlugin::drain_events`], [`TelemetryPlugin::with_sender`]
/// forwards them to a bus owned elsewhere, and [`TelemetryPlugin::with_bus`]
/// owns the bus and flushes it at the end of every frame.
#[derive(Default)]
pub struct TelemetryPlugin {
    target: EventTarget,
    collected: Vec<SimulationEvent>,
}

#[derive(Default)]
enum EventTarget {
    #[default]
    Collect,
    Forward(mpsc::Sender<SimulationEvent>),
    Bus(EventBus),
}

impl TelemetryPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards every event to `sender` instead of collecting it.
    pub fn with_sender(sender: mpsc::Sender<SimulationEvent>) -> Self {
        Self {
            target: EventTarget::Forward(sender),
            collected: Vec::new(),
        }
    }

    /// Feeds `bus` directly. Sinks see each frame's events once the frame
    /// ends and are finalized when the run ends.
    pub fn with_bus(bus: EventBus) -> Self {
        Self {
            target: EventTarget::Bus(bus),
            collected: Vec::new(),
        }
    }

    /// Takes the events collected so far. Always empty unless the plugin
    /// was built with [`TelemetryPlugin::new`].
    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        std::mem::take(&mut self.collected)
    }

    fn record(&mut self, frame: u32, kind: EventKind) -> PluginResult {
        match &mut self.target {
            EventTarget::Collect => self.collected.push(SimulationEvent::new(frame, kind)),
            EventTarget::Forward(sender) => sender
                .send(SimulationEvent::new(frame, kind))
                .map_err(|_| PluginError::warning("telemetry bus is gone"))?,
            EventTarget::Bus(bus) => bus.record(frame, kind),
        }
        Ok(())
    }
}

impl<D: Driver> DriverPlugin<D> for TelemetryPlugin {
    fn on_begin_frame(&mut self, driver: &D, frame: u32) -> PluginResult {
        let sim_time = driver.base().elapsed_time();
        self.record(frame, EventKind::FrameBegin { sim_time })
    }

    fn on_end_frame(&mut self, _driver: &D, report: &FrameReport) -> PluginResult {
        self.record(
            report.frame,
            EventKind::FrameEnd {
                substeps: report.substeps,
                wall_time: report.wall_time,
            },
        )?;
        if let Some(path) = &report.artifact {
            self.record(
                report.frame,
                EventKind::Checkpoint {
                    path: path.display().to_string(),
                },
            )?;
        }
        if let EventTarget::Bus(bus) = &mut self.target {
            bus.flush();
        }
        Ok(())
    }

    fn on_begin_substep(&mut self, _driver: &D, step: &SubstepContext) -> PluginResult {
        self.record(
            step.frame,
            EventKind::SubstepBegin {
                dt: step.dt,
                time_within_frame: step.time_within_frame,
            },
        )
    }

    fn on_end_substep(&mut self, _driver: &D, step: &SubstepContext) -> PluginResult {
        self.record(step.frame, EventKind::SubstepEnd { dt: step.dt })
    }

    fn on_run_end(&mut self, _driver: &D, _summary: &RunSummary) -> PluginResult {
        if let EventTarget::Bus(bus) = &mut self.target {
            bus.finalize();
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "telemetry_plugin"
    }
}

/// Stops the run when a frame needs more than `max_substeps` substeps.
pub struct SubstepBudgetPlugin {
    max_substeps: u32,
    taken: u32,
}

impl SubstepBudgetPlugin {
    pub fn new(max_substeps: u32) -> Self {
        Self {
            max_substeps,
            taken: 0,
        }
    }
}

impl<D> DriverPlugin<D> for SubstepBudgetPlugin {
    fn on_begin_frame(&mut self, _driver: &D, _frame: u32) -> PluginResult {
        self.taken = 0;
        Ok(())
    }

    fn on_end_substep(&mut self, _driver: &D, step: &SubstepContext) -> PluginResult {
        self.taken += 1;
        if self.taken > self.max_substeps {
            return Err(PluginError::fatal(format!(
                "frame {} exceeded {} substeps",
                step.frame, self.max_substeps
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "substep_budget"
    }
}
