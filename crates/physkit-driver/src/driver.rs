//! Driver trait and the frame/substep loop.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use physkit_types::constants::FRAME_TIME_EPSILON;
use physkit_types::{PhysError, PhysResult, Scalar};

use crate::checkpoint::CheckpointHeader;
use crate::config::DriverConfig;
use crate::plugin::{DriverPlugin, PluginResult};

/// Per-substep data handed to plugins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubstepContext {
    pub frame: u32,
    /// Index of the substep within its frame.
    pub substep: u32,
    pub dt: Scalar,
    /// Frame time covered before this substep.
    pub time_within_frame: Scalar,
    /// Simulation time at the start of this substep.
    pub sim_time: Scalar,
}

/// End-of-frame data handed to plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub frame: u32,
    pub substeps: u32,
    /// Simulation time at the end of the frame.
    pub sim_time: Scalar,
    /// Wall-clock seconds spent on the frame.
    pub wall_time: f64,
    /// Artifact written for this frame, if any.
    pub artifact: Option<PathBuf>,
}

/// Outcome of [`Driver::run`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub frames: u32,
    pub substeps: u64,
    /// Simulation time reached.
    pub sim_time: Scalar,
    /// Wall-clock seconds for the whole run.
    pub wall_time: f64,
}

/// State shared by every driver: configuration, clock and plugins.
pub struct DriverBase<D> {
    config: DriverConfig,
    plugins: Vec<Box<dyn DriverPlugin<D>>>,
    current_frame: u32,
    time_within_frame: Scalar,
    elapsed: Scalar,
    initialized: bool,
}

impl<D> DriverBase<D> {
    /// Creates a base positioned at `config.start_frame`.
    pub fn new(config: DriverConfig) -> Self {
        Self {
            current_frame: config.start_frame,
            config,
            plugins: Vec::new(),
            time_within_frame: 0.0,
            elapsed: 0.0,
            initialized: false,
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Replaces the configuration and rewinds the clock to its start frame.
    ///
    /// The next `run` initializes the driver again.
    pub fn set_config(&mut self, config: DriverConfig) -> PhysResult<()> {
        config.validate()?;
        self.current_frame = config.start_frame;
        self.time_within_frame = 0.0;
        self.elapsed = 0.0;
        self.initialized = false;
        self.config = config;
        Ok(())
    }

    /// Frame currently being simulated, or the next one between frames.
    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn time_within_frame(&self) -> Scalar {
        self.time_within_frame
    }

    /// Simulation time accumulated since the start frame.
    pub fn elapsed_time(&self) -> Scalar {
        self.elapsed
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Marks the driver as initialized so `run` skips `initialize`.
    ///
    /// Called after a checkpoint restore.
    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Clock snapshot for a checkpoint.
    pub fn clock(&self) -> CheckpointHeader {
        CheckpointHeader {
            frame: self.current_frame,
            time_within_frame: self.time_within_frame,
            elapsed: self.elapsed,
        }
    }

    /// Restores the clock from a checkpoint.
    pub fn restore_clock(&mut self, clock: &CheckpointHeader) -> PhysResult<()> {
        let duration = self.config.frame_duration();
        if !(0.0..duration).contains(&clock.time_within_frame) || !clock.elapsed.is_finite() {
            return Err(PhysError::Serialization(format!(
                "checkpoint clock out of range (time_within_frame = {})",
                clock.time_within_frame
            )));
        }
        self.current_frame = clock.frame;
        self.time_within_frame = clock.time_within_frame;
        self.elapsed = clock.elapsed;
        Ok(())
    }
}

/// A frame-paced simulation.
///
/// Implementors provide the state-specific hooks; the frame/substep loop,
/// plugin dispatch and artifact writing come from [`Driver::run`].
pub trait Driver: Sized {
    fn base(&self) -> &DriverBase<Self>;

    fn base_mut(&mut self) -> &mut DriverBase<Self>;

    /// Builds the initial simulation state. Called once by `run`.
    fn initialize(&mut self) -> PhysResult<()>;

    /// Largest stable step for the current state.
    fn compute_time_step(&self) -> Scalar;

    /// Integrates one substep of length `dt`.
    fn advance_step(&mut self, dt: Scalar) -> PhysResult<()>;

    /// Loads the driver configuration from a file.
    fn init_configuration(&mut self, path: &Path) -> PhysResult<()>;

    /// Whether `read` can resume a run mid-way.
    fn with_restart_support(&self) -> bool;

    /// Writes a checkpoint / frame artifact.
    fn write(&self, path: &Path) -> PhysResult<()>;

    /// Restores state written by [`Driver::write`].
    fn read(&mut self, path: &Path) -> PhysResult<()>;

    /// Rejects invalid state after a substep.
    fn check_state(&self) -> PhysResult<()> {
        Ok(())
    }

    /// Extension of frame artifacts.
    fn artifact_extension(&self) -> &str {
        "bin"
    }

    /// Registers a plugin. Notifications follow registration order.
    fn add_plugin(&mut self, plugin: Box<dyn DriverPlugin<Self>>) {
        tracing::debug!(plugin = plugin.name(), "plugin registered");
        self.base_mut().plugins.push(plugin);
    }

    /// Runs from the current frame through `end_frame`.
    fn run(&mut self) -> PhysResult<RunSummary> {
        run_frames(self)
    }
}

fn run_frames<D: Driver>(driver: &mut D) -> PhysResult<RunSummary> {
    let config = driver.base().config().clone();
    config.validate()?;

    if !driver.base().is_initialized() {
        driver.initialize()?;
        driver.base_mut().initialized = true;
    }

    let frame_duration = config.frame_duration();
    let first = driver.base().current_frame().max(config.start_frame);
    let run_start = Instant::now();
    let mut summary = RunSummary::default();

    tracing::info!(
        start = first,
        end = config.end_frame,
        frame_duration,
        "driver run started"
    );

    for frame in first..=config.end_frame {
        let frame_start = Instant::now();
        driver.base_mut().current_frame = frame;
        notify(driver, |p, d| p.on_begin_frame(d, frame))?;

        let mut substeps = 0u32;
        loop {
            let time_within_frame = driver.base().time_within_frame;
            let remaining = frame_duration - time_within_frame;
            if remaining <= FRAME_TIME_EPSILON {
                break;
            }

            let dt = substep_size(driver.compute_time_step(), config.max_dt, remaining)?;
            let ctx = SubstepContext {
                frame,
                substep: substeps,
                dt,
                time_within_frame,
                sim_time: driver.base().elapsed,
            };
            notify(driver, |p, d| p.on_begin_substep(d, &ctx))?;

            driver.advance_step(dt)?;
            driver.check_state()?;

            let base = driver.base_mut();
            base.time_within_frame += dt;
            base.elapsed += dt;
            substeps += 1;
            notify(driver, |p, d| p.on_end_substep(d, &ctx))?;
        }

        // The next checkpoint resumes at the following frame.
        let base = driver.base_mut();
        base.time_within_frame = 0.0;
        base.current_frame = frame + 1;

        let artifact = if config.write_to_file {
            std::fs::create_dir_all(&config.output_dir)?;
            let path = config.frame_artifact_path(frame, driver.artifact_extension());
            driver.write(&path)?;
            Some(path)
        } else {
            None
        };

        let report = FrameReport {
            frame,
            substeps,
            sim_time: driver.base().elapsed,
            wall_time: frame_start.elapsed().as_secs_f64(),
            artifact,
        };
        tracing::debug!(frame, substeps, sim_time = report.sim_time, "frame finished");
        notify(driver, |p, d| p.on_end_frame(d, &report))?;

        summary.frames += 1;
        summary.substeps += u64::from(substeps);
    }

    summary.sim_time = driver.base().elapsed;
    summary.wall_time = run_start.elapsed().as_secs_f64();
    notify(driver, |p, d| p.on_run_end(d, &summary))?;

    tracing::info!(
        frames = summary.frames,
        substeps = summary.substeps,
        wall_time = summary.wall_time,
        "driver run finished"
    );
    Ok(summary)
}

/// `min(candidate, max_dt, remaining)`, snapped to `remaining` when the
/// leftover would be below the frame epsilon.
fn substep_size(candidate: Scalar, max_dt: Scalar, remaining: Scalar) -> PhysResult<Scalar> {
    if !(candidate.is_finite() && candidate > 0.0) {
        return Err(PhysError::Numeric(format!(
            "time step must be positive and finite, got {candidate}"
        )));
    }
    let dt = candidate.min(max_dt).min(remaining);
    if remaining - dt <= FRAME_TIME_EPSILON {
        Ok(remaining)
    } else {
        Ok(dt)
    }
}

/// Calls `f` on every plugin in registration order.
///
/// Non-fatal plugin errors are logged; the first fatal one stops the
/// dispatch and aborts the run.
fn notify<D: Driver>(
    driver: &mut D,
    mut f: impl FnMut(&mut dyn DriverPlugin<D>, &D) -> PluginResult,
) -> PhysResult<()> {
    let mut plugins = std::mem::take(&mut driver.base_mut().plugins);
    let mut outcome = Ok(());
    for plugin in plugins.iter_mut() {
        if let Err(err) = f(plugin.as_mut(), driver) {
            if err.fatal {
                tracing::error!(plugin = plugin.name(), error = %err, "plugin aborted the run");
                outcome = Err(PhysError::PluginAbort {
                    plugin: plugin.name().to_string(),
                    message: err.message,
                });
                break;
            }
            tracing::warn!(plugin = plugin.name(), error = %err, "plugin reported an error");
        }
    }
    driver.base_mut().plugins = plugins;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substep_is_capped() {
        assert_eq!(substep_size(1.0, 0.1, 0.5).unwrap(), 0.1);
        assert_eq!(substep_size(0.05, 0.1, 0.5).unwrap(), 0.05);
        assert_eq!(substep_size(1.0, 1.0, 0.25).unwrap(), 0.25);
    }

    #[test]
    fn substep_snaps_to_frame_end() {
        let remaining = 0.1 + 1e-13;
        assert_eq!(substep_size(0.1, 1.0, remaining).unwrap(), remaining);
    }

    #[test]
    fn substep_rejects_bad_candidates() {
        assert!(substep_size(0.0, 1.0, 1.0).is_err());
        assert!(substep_size(-1.0, 1.0, 1.0).is_err());
        assert!(substep_size(Scalar::NAN, 1.0, 1.0).is_err());
    }
}
