//! Integration tests for physkit-telemetry.

use physkit_telemetry::bus::EventBus;
use physkit_telemetry::events::{EventKind, SimulationEvent};
use physkit_telemetry::sinks::{EventSink, JsonLinesSink, TracingSink, VecSink};

fn begin(frame: u32) -> SimulationEvent {
    SimulationEvent::new(frame, EventKind::FrameBegin { sim_time: 0.0 })
}

#[test]
fn emit_and_flush() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    let log = sink.log();
    bus.add_sink(Box::new(sink));

    bus.emit(begin(0));
    bus.emit(SimulationEvent::new(
        0,
        EventKind::FrameEnd {
            substeps: 3,
            wall_time: 0.001,
        },
    ));
    assert!(log.lock().unwrap().is_empty());

    assert_eq!(bus.flush(), 2);
    let events = log.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].label(), "frame_begin");
    assert_eq!(events[1].label(), "frame_end");
}

#[test]
fn disabled_bus_drops_events() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    let log = sink.log();
    bus.add_sink(Box::new(sink));
    bus.set_enabled(false);
    bus.emit(begin(0));
    bus.flush();
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn sender_handle_feeds_bus() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    let log = sink.log();
    bus.add_sink(Box::new(sink));

    let tx = bus.sender();
    std::thread::spawn(move || {
        tx.send(begin(4)).unwrap();
    })
    .join()
    .unwrap();

    bus.flush();
    assert_eq!(log.lock().unwrap()[0].frame, 4);
}

#[test]
fn multiple_sinks() {
    let mut bus = EventBus::new();
    let a = VecSink::new();
    let b = VecSink::new();
    let (la, lb) = (a.log(), b.log());
    bus.add_sink(Box::new(a));
    bus.add_sink(Box::new(b));
    assert_eq!(bus.sink_count(), 2);

    bus.emit(begin(1));
    bus.flush();
    assert_eq!(la.lock().unwrap().len(), 1);
    assert_eq!(lb.lock().unwrap().len(), 1);
}

#[test]
fn per_frame_flush_counts_accumulate() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    let log = sink.log();
    bus.add_sink(Box::new(sink));

    bus.record(0, EventKind::FrameBegin { sim_time: 0.0 });
    bus.record(0, EventKind::SubstepEnd { dt: 0.5 });
    assert_eq!(bus.flush(), 2);

    bus.record(1, EventKind::FrameBegin { sim_time: 1.0 });
    assert_eq!(bus.flush(), 1);
    assert_eq!(bus.flush(), 0);

    assert_eq!(bus.dispatched(), 3);
    assert_eq!(log.lock().unwrap()[2].frame, 1);
}

#[test]
fn tracing_sink_accepts_events() {
    let mut sink = TracingSink::new(tracing::Level::DEBUG);
    sink.handle(&begin(0));
    assert_eq!(sink.name(), "tracing_sink");
}

#[test]
fn event_serialization() {
    let event = SimulationEvent::new(
        5,
        EventKind::SubstepBegin {
            dt: 0.01,
            time_within_frame: 0.02,
        },
    );
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"substep_begin\""));
    let recovered: SimulationEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, event);
}

#[test]
fn json_lines_sink_writes_one_object_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    let mut bus = EventBus::new();
    bus.add_sink(Box::new(JsonLinesSink::create(&path).unwrap()));
    bus.emit(begin(0));
    bus.emit(SimulationEvent::new(0, EventKind::SubstepEnd { dt: 0.5 }));
    bus.emit(SimulationEvent::new(
        0,
        EventKind::Checkpoint {
            path: "out/frame_0000.bin".into(),
        },
    ));
    bus.finalize();

    let text = std::fs::read_to_string(&path).unwrap();
    let events: Vec<SimulationEvent> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.len(), 3);
    assert_eq!(events[2].label(), "checkpoint");
}
