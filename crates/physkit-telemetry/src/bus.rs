//! Frame-scoped event queue with pluggable sinks.
//!
//! Lifecycle events pile up in an `mpsc` queue while a frame runs. The
//! owner calls [`EventBus::flush`] once the frame is over so sinks see a
//! whole frame at a time, and [`EventBus::finalize`] after the last one.

use std::sync::mpsc;

use crate::events::{EventKind, SimulationEvent};
use crate::sinks::EventSink;

/// Queue of frame and substep events plus the sinks that consume them.
///
/// Producers either call [`EventBus::emit`] directly or hold a
/// [`EventBus::sender`] handle. Nothing reaches a sink before `flush`.
pub struct EventBus {
    tx: mpsc::Sender<SimulationEvent>,
    rx: mpsc::Receiver<SimulationEvent>,
    sinks: Vec<Box<dyn EventSink>>,
    enabled: bool,
    dispatched: usize,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            sinks: Vec::new(),
            enabled: true,
            dispatched: 0,
        }
    }

    /// Sinks receive events in registration order.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// A muted bus still drains its queue on `flush` but hands nothing to
    /// the sinks.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Queues `event` for the next flush. Dropped while muted.
    pub fn emit(&self, event: SimulationEvent) {
        if self.enabled {
            // `rx` is owned by `self`, so the queue cannot be closed here.
            self.tx.send(event).ok();
        }
    }

    /// Queues a `kind` event stamped with `frame`.
    pub fn record(&self, frame: u32, kind: EventKind) {
        self.emit(SimulationEvent::new(frame, kind));
    }

    /// A handle for producers that cannot borrow the bus, such as a
    /// driver plugin. Its events are only checked against the mute switch
    /// at flush time.
    pub fn sender(&self) -> mpsc::Sender<SimulationEvent> {
        self.tx.clone()
    }

    /// Hands every queued event to the sinks and returns how many were
    /// delivered. Call it at each frame boundary.
    pub fn flush(&mut self) -> usize {
        let mut delivered = 0;
        for event in self.rx.try_iter() {
            if !self.enabled {
                continue;
            }
            for sink in &mut self.sinks {
                sink.handle(&event);
            }
            delivered += 1;
        }
        self.dispatched += delivered;
        delivered
    }

    /// Delivers what is still queued, then closes every sink.
    pub fn finalize(&mut self) {
        self.flush();
        for sink in &mut self.sinks {
            sink.finalize();
        }
    }

    /// Events delivered over the bus's lifetime.
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
