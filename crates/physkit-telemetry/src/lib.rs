//! # physkit-telemetry
//!
//! Event bus for simulation telemetry. The driver emits structured
//! lifecycle events (frame and substep boundaries, checkpoints) that are
//! consumed by pluggable sinks (in-memory log, `tracing`, JSON lines).

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventSink, JsonLinesSink, TracingSink, VecSink};
