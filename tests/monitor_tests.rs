#![cfg(feature = "test-mock")]

use crossbeam::channel::unbounded;
use midiprobe::midi::{MidiError, MockMidiEngine, RawEvent};
use midiprobe::monitor::{run_monitor, Command, Direction, LogEntry, Monitor};
use midiprobe::SendError;
use std::error::Error;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

fn event(timestamp: u64, bytes: &[u8]) -> RawEvent {
    RawEvent {
        timestamp,
        bytes: bytes.to_vec(),
    }
}

#[test]
fn test_poll_logs_received_message() {
    let engine = MockMidiEngine::new(vec![event(1000, &[0x90, 0x3C, 0x40])]);
    let mut monitor = Monitor::new(engine, Vec::<LogEntry>::new());

    assert!(monitor.poll(Duration::from_millis(10)).unwrap());
    assert!(!monitor.poll(Duration::from_millis(10)).unwrap());

    let entries = monitor.into_sink();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].timestamp, 1000);
    assert_eq!(entries[0].direction, Direction::Received);
    assert!(entries[0].result.valid);
    assert_eq!(entries[0].result.status_description, "Note On, Channel 1");
}

#[test]
fn test_invalid_received_message_is_still_logged() {
    let engine = MockMidiEngine::new(vec![event(5, &[0xF0, 0x01])]);
    let mut monitor = Monitor::new(engine, Vec::<LogEntry>::new());
    monitor.poll(Duration::from_millis(10)).unwrap();

    let entries = monitor.into_sink();
    assert!(!entries[0].result.valid);
    assert_eq!(
        entries[0].result.status_description,
        "System Exclusive (end not found)"
    );
}

#[test]
fn test_send_text_transmits_and_logs() {
    let engine = MockMidiEngine::new(vec![]);
    let sent = engine.sent();
    let mut monitor = Monitor::new(engine, Vec::<LogEntry>::new());

    let entry = monitor.send_text("b0 7b 00").unwrap();
    assert_eq!(entry.direction, Direction::Sent);
    assert_eq!(entry.result.data_description, "Controller: All Notes Off, Value: 0");
    assert_eq!(*sent.lock().unwrap(), vec![vec![0xB0, 0x7B, 0x00]]);
    assert_eq!(monitor.sink().len(), 1);
}

#[test]
fn test_rejected_text_is_not_transmitted() {
    let engine = MockMidiEngine::new(vec![]);
    let sent = engine.sent();
    let mut monitor = Monitor::new(engine, Vec::<LogEntry>::new());

    assert!(matches!(
        monitor.send_text("c0 80"),
        Err(SendError::InvalidMessage(_))
    ));
    assert!(matches!(
        monitor.send_text("c0 xx"),
        Err(SendError::InvalidByte(_))
    ));
    assert!(sent.lock().unwrap().is_empty());
    assert!(monitor.sink().is_empty());
}

#[test]
fn test_send_without_output_port() {
    let engine = MockMidiEngine::without_output(vec![]);
    let mut monitor = Monitor::new(engine, Vec::<LogEntry>::new());

    match monitor.send_text("f8") {
        Err(SendError::Engine(MidiError::NotConnected(direction))) => {
            assert_eq!(direction, "output")
        }
        other => panic!("Expected NotConnected, got {:?}", other),
    }
}

#[test]
fn test_run_monitor_interleaves_commands_and_events() {
    let engine = MockMidiEngine::new(vec![event(1, &[0xF8]), event(2, &[0x05])]);
    let sent = engine.sent();
    let mut monitor = Monitor::new(engine, Vec::<LogEntry>::new());

    let (tx, rx) = unbounded();
    tx.send(Command::Send("c0 01".to_string())).unwrap();
    tx.send(Command::Quit).unwrap();
    let running = AtomicBool::new(true);

    run_monitor(&mut monitor, &rx, &running).unwrap();

    let entries = monitor.into_sink();
    let directions: Vec<Direction> = entries.iter().map(|e| e.direction).collect();
    assert_eq!(
        directions,
        vec![Direction::Received, Direction::Sent, Direction::Received]
    );
    assert_eq!(entries[0].result.status_description, "MIDI Clock");
    assert_eq!(entries[2].result.status_description, "05 (invalid status)");
    assert_eq!(sent.lock().unwrap().len(), 1);
}

#[test]
fn test_run_monitor_stops_when_flag_cleared() {
    let engine = MockMidiEngine::new(vec![event(1, &[0xF8])]);
    let mut monitor = Monitor::new(engine, Vec::<LogEntry>::new());
    let (_tx, rx) = unbounded();
    let running = AtomicBool::new(false);

    run_monitor(&mut monitor, &rx, &running).unwrap();
    assert!(monitor.sink().is_empty());
}

#[test]
fn test_midi_error_display() {
    let send_error = MidiError::SendError("Failed to send".to_string());
    let recv_error = MidiError::RecvError("Failed to receive".to_string());
    let conn_error = MidiError::ConnectionError("Failed to connect".to_string());

    assert_eq!(send_error.to_string(), "MIDI send error: Failed to send");
    assert_eq!(
        recv_error.to_string(),
        "MIDI receive error: Failed to receive"
    );
    assert_eq!(
        conn_error.to_string(),
        "MIDI connection error: Failed to connect"
    );
    let _: &dyn Error = &send_error;
}
