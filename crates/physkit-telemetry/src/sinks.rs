//! Pluggable event sinks.
//!
//! Sinks consume events from the bus and process them
//! (collect in memory, forward to `tracing`, append to a file).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use physkit_types::PhysResult;

use crate::events::SimulationEvent;

/// Trait for event consumers.
///
/// Implement this to create custom telemetry outputs.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the simulation ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Shared, inspectable event log.
pub type EventLog = Arc<Mutex<Vec<SimulationEvent>>>;

/// A simple sink that records events for testing and inspection.
///
/// The log is shared, so it stays readable after the sink has been
/// boxed into a bus.
#[derive(Default)]
pub struct VecSink {
    events: EventLog,
}

impl VecSink {
    /// Creates an empty vec sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the recorded events.
    pub fn log(&self) -> EventLog {
        Arc::clone(&self.events)
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// A sink that logs events using the `tracing` crate.
pub struct TracingSink {
    level: tracing::Level,
}

impl TracingSink {
    /// Creates a new tracing sink at the given log level.
    pub fn new(level: tracing::Level) -> Self {
        Self { level }
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        let frame = event.frame;
        let kind = &event.kind;
        match self.level {
            tracing::Level::ERROR => tracing::error!(frame, event = ?kind, "simulation_event"),
            tracing::Level::WARN => tracing::warn!(frame, event = ?kind, "simulation_event"),
            tracing::Level::INFO => tracing::info!(frame, event = ?kind, "simulation_event"),
            tracing::Level::DEBUG => tracing::debug!(frame, event = ?kind, "simulation_event"),
            _ => tracing::trace!(frame, event = ?kind, "simulation_event"),
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}

/// Appends one JSON object per event to a file.
pub struct JsonLinesSink {
    out: BufWriter<File>,
    written: usize,
}

impl JsonLinesSink {
    /// Creates (truncating) the output file.
    pub fn create<P: AsRef<Path>>(path: P) -> PhysResult<Self> {
        Ok(Self {
            out: BufWriter::new(File::create(path)?),
            written: 0,
        })
    }

    /// Number of events written so far.
    pub fn written(&self) -> usize {
        self.written
    }
}

impl EventSink for JsonLinesSink {
    fn handle(&mut self, event: &SimulationEvent) {
        let result = serde_json::to_writer(&mut self.out, event)
            .map_err(std::io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"));
        match result {
            Ok(()) => self.written += 1,
            Err(err) => tracing::warn!(%err, "failed to write telemetry event"),
        }
    }

    fn finalize(&mut self) {
        if let Err(err) = self.out.flush() {
            tracing::warn!(%err, "failed to flush telemetry file");
        }
    }

    fn name(&self) -> &str {
        "json_lines_sink"
    }
}
