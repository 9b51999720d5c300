use crate::midi::{classify, MidiEngine, MidiError, ParseResult};
use crate::send::{prepare_message, SendError};
use crossbeam::channel::{Receiver, RecvTimeoutError, TryRecvError};
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Received,
    Sent,
}

/// One row of the message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub direction: Direction,
    pub result: ParseResult,
}

/// Consumer of log rows, e.g. the terminal view.
pub trait MessageSink {
    fn record(&mut self, entry: &LogEntry);

    /// Operator-facing errors such as a rejected send.
    fn report_error(&mut self, message: &str) {
        warn!("{}", message);
    }
}

impl MessageSink for Vec<LogEntry> {
    fn record(&mut self, entry: &LogEntry) {
        self.push(entry.clone());
    }
}

/// Requests from the operator to the monitor loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Hex text to validate and transmit
    Send(String),
    Quit,
}

pub struct Monitor<E: MidiEngine, S: MessageSink> {
    engine: E,
    sink: S,
}

impl<E: MidiEngine, S: MessageSink> Monitor<E, S> {
    pub fn new(engine: E, sink: S) -> Self {
        Self { engine, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Waits up to `timeout` for one inbound event and logs it.
    /// Returns whether an event was logged.
    pub fn poll(&mut self, timeout: Duration) -> Result<bool, MidiError> {
        match self.engine.recv_timeout(timeout)? {
            Some(event) => {
                let entry = LogEntry {
                    timestamp: event.timestamp,
                    direction: Direction::Received,
                    result: classify(&event.bytes),
                };
                debug!(
                    "Received {:02x?}: {}",
                    event.bytes, entry.result.status_description
                );
                self.sink.record(&entry);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Validates operator text, transmits it and logs the sent row.
    pub fn send_text(&mut self, text: &str) -> Result<LogEntry, SendError> {
        if !self.engine.can_send() {
            return Err(SendError::Engine(MidiError::NotConnected("output")));
        }
        let (bytes, result) = prepare_message(text)?;
        let timestamp = self.engine.send(&bytes)?;
        info!("Sent {:02x?}: {}", bytes, result.status_description);

        let entry = LogEntry {
            timestamp,
            direction: Direction::Sent,
            result,
        };
        self.sink.record(&entry);
        Ok(entry)
    }

    fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Send(text) => {
                if let Err(e) = self.send_text(&text) {
                    error!("Send failed: {}", e);
                    self.sink.report_error(&e.to_string());
                }
                true
            }
            Command::Quit => false,
        }
    }
}

/// Runs until `running` is cleared, a `Quit` command arrives, or the input
/// port goes away. With no input port open only commands are serviced.
pub fn run_monitor<E, S>(
    monitor: &mut Monitor<E, S>,
    commands: &Receiver<Command>,
    running: &AtomicBool,
) -> Result<(), MidiError>
where
    E: MidiEngine,
    S: MessageSink,
{
    info!("Monitor loop started");
    let mut listening = true;

    while running.load(Ordering::SeqCst) {
        if listening {
            match monitor.poll(POLL_INTERVAL) {
                Ok(_) => {}
                Err(MidiError::NotConnected(_)) => {
                    info!("No input port open, servicing send requests only");
                    listening = false;
                }
                Err(e) => {
                    error!("MIDI engine receive error: {}", e);
                    return Err(e);
                }
            }

            match commands.try_recv() {
                Ok(command) => {
                    if !monitor.handle_command(command) {
                        break;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
            }
        } else {
            match commands.recv_timeout(POLL_INTERVAL) {
                Ok(command) => {
                    if !monitor.handle_command(command) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    info!("Monitor loop stopped");
    Ok(())
}
