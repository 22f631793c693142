//! Simulation event types.
//!
//! Structured events emitted by the driver loop at frame and substep
//! boundaries. Events are lightweight value types that carry just
//! enough data to be useful for monitoring and debugging.

use serde::{Deserialize, Serialize};

/// A simulation event emitted by the driver.
///
/// Events are tagged with the frame they belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Frame number.
    pub frame: u32,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Frame started.
    FrameBegin {
        /// Simulation time at the start of the frame.
        sim_time: f64,
    },

    /// Frame completed.
    FrameEnd {
        /// Substeps taken to cover the frame.
        substeps: u32,
        /// Wall-clock time spent on the frame (seconds).
        wall_time: f64,
    },

    /// Substep about to be integrated.
    SubstepBegin {
        /// Chosen step size.
        dt: f64,
        /// Time already covered within the current frame.
        time_within_frame: f64,
    },

    /// Substep integrated.
    SubstepEnd {
        dt: f64,
    },

    /// A frame artifact or checkpoint was written.
    Checkpoint {
        path: String,
    },

    /// Custom event for extensibility.
    Custom {
        /// Arbitrary label.
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl SimulationEvent {
    /// Creates a new event for the given frame.
    pub fn new(frame: u32, kind: EventKind) -> Self {
        Self { frame, kind }
    }

    /// Short label of the payload variant.
    pub fn label(&self) -> &str {
        match &self.kind {
            EventKind::FrameBegin { .. } => "frame_begin",
            EventKind::FrameEnd { .. } => "frame_end",
            EventKind::SubstepBegin { .. } => "substep_begin",
            EventKind::SubstepEnd { .. } => "substep_end",
            EventKind::Checkpoint { .. } => "checkpoint",
            EventKind::Custom { label, .. } => label,
        }
    }
}
