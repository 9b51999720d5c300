// ui.rs

use crate::monitor::{Direction, LogEntry, MessageSink};
use chrono::{Local, TimeZone};
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

const STATUS_WIDTH: usize = 36;

/// Local wall-clock time of a millisecond timestamp, `HH:MM:SS.mmm`.
pub fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|ms| Local.timestamp_millis_opt(ms).single())
        .map(|time| time.format("%H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// One log row: time, direction, invalid marker, status and data.
pub fn format_entry(entry: &LogEntry) -> String {
    let direction = match entry.direction {
        Direction::Received => "IN",
        Direction::Sent => "OUT",
    };
    let marker = if entry.result.valid { ' ' } else { '!' };
    let row = format!(
        "{}  {:<3} {} {:<width$} {}",
        format_timestamp(entry.timestamp),
        direction,
        marker,
        entry.result.status_description,
        entry.result.data_description,
        width = STATUS_WIDTH
    );
    row.trim_end().to_string()
}

const TICK: Duration = Duration::from_millis(120);

fn create_counter_spinner(label: &str, target: ProgressDrawTarget) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(None, target);
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix(label.to_string());
    pb
}

/// Spinner plus the rows held back while the send prompt owns the terminal.
struct Screen {
    spinner: ProgressBar,
    on_terminal: bool,
    paused: bool,
    held: Vec<String>,
}

impl Screen {
    fn show(&mut self, line: String) {
        if self.paused {
            self.held.push(line);
        } else {
            self.spinner.println(line);
        }
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.spinner.disable_steady_tick();
        self.spinner.set_draw_target(ProgressDrawTarget::hidden());
    }

    fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        if self.on_terminal {
            self.spinner.set_draw_target(ProgressDrawTarget::stderr());
            self.spinner.enable_steady_tick(TICK);
        }
        for line in self.held.drain(..) {
            self.spinner.println(line);
        }
    }
}

fn lock(screen: &Mutex<Screen>) -> MutexGuard<'_, Screen> {
    screen.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Prints log rows above a spinner that shows running totals.
pub struct TerminalLog {
    screen: Arc<Mutex<Screen>>,
    received: u64,
    sent: u64,
    invalid: u64,
}

impl TerminalLog {
    pub fn new(label: &str) -> Self {
        let log = Self::with_draw_target(label, ProgressDrawTarget::stderr(), true);
        lock(&log.screen).spinner.enable_steady_tick(TICK);
        log
    }

    fn with_draw_target(label: &str, target: ProgressDrawTarget, on_terminal: bool) -> Self {
        let log = TerminalLog {
            screen: Arc::new(Mutex::new(Screen {
                spinner: create_counter_spinner(label, target),
                on_terminal,
                paused: false,
                held: Vec::new(),
            })),
            received: 0,
            sent: 0,
            invalid: 0,
        };
        log.update_counters();
        log
    }

    /// Handle for reading messages on another thread without the spinner
    /// and incoming rows drawing over the input line.
    pub fn send_prompt(&self) -> SendPrompt {
        SendPrompt {
            screen: Arc::clone(&self.screen),
        }
    }

    fn update_counters(&self) {
        lock(&self.screen).spinner.set_message(format!(
            "Received: {}, Sent: {}, Invalid: {}",
            self.received, self.sent, self.invalid
        ));
    }

    pub fn finish(&self) {
        let mut screen = lock(&self.screen);
        screen.resume();
        screen.spinner.finish_and_clear();
    }
}

impl MessageSink for TerminalLog {
    fn record(&mut self, entry: &LogEntry) {
        match entry.direction {
            Direction::Received => self.received += 1,
            Direction::Sent => self.sent += 1,
        }
        if !entry.result.valid {
            self.invalid += 1;
        }
        lock(&self.screen).show(format_entry(entry));
        self.update_counters();
    }

    fn report_error(&mut self, message: &str) {
        log::warn!("{}", message);
        lock(&self.screen).show(format!("Error: {}", message));
    }
}

/// Pauses a [`TerminalLog`] while the operator types a message. Rows that
/// arrive meanwhile are printed once the prompt closes.
#[derive(Clone)]
pub struct SendPrompt {
    screen: Arc<Mutex<Screen>>,
}

impl SendPrompt {
    pub fn read_message(&self) -> Result<String, dialoguer::Error> {
        lock(&self.screen).pause();
        let text = prompt_message();
        lock(&self.screen).resume();
        text
    }
}

/// Asks the operator to pick one of `ports`. `None` when cancelled or empty.
pub fn select_port(prompt: &str, ports: &[String]) -> Result<Option<String>, dialoguer::Error> {
    if ports.is_empty() {
        return Ok(None);
    }
    let choice = Select::new()
        .with_prompt(prompt)
        .items(ports)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|index| ports[index].clone()))
}

fn prompt_message() -> Result<String, dialoguer::Error> {
    Input::<String>::new()
        .with_prompt("Message (hex bytes, empty to cancel)")
        .allow_empty(true)
        .interact_text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::classify;

    fn entry(direction: Direction, bytes: &[u8]) -> LogEntry {
        LogEntry {
            timestamp: 1_700_000_000_123,
            direction,
            result: classify(bytes),
        }
    }

    #[test]
    fn test_timestamp_keeps_milliseconds() {
        assert!(format_timestamp(1_700_000_000_123).ends_with(".123"));
    }

    #[test]
    fn test_valid_received_row() {
        let row = format_entry(&entry(Direction::Received, &[0x90, 0x3C, 0x40]));
        assert!(row.contains("  IN    Note On, Channel 1"));
        assert!(row.ends_with("Note: C4, Velocity: 64"));
    }

    #[test]
    fn test_invalid_row_is_marked() {
        let row = format_entry(&entry(Direction::Sent, &[0xC0, 0x80]));
        assert!(row.contains("OUT ! c0 (invalid data)"));
        assert!(row.ends_with("80 (1 byte)"));
    }

    #[test]
    fn test_rows_are_held_while_prompt_is_open() {
        let mut log = TerminalLog::with_draw_target("test", ProgressDrawTarget::hidden(), false);
        let prompt = log.send_prompt();

        lock(&prompt.screen).pause();
        log.record(&entry(Direction::Received, &[0xF8]));
        log.report_error("no output port");
        assert_eq!(lock(&log.screen).held.len(), 2);
        assert!(lock(&log.screen).held[0].ends_with("MIDI Clock"));

        lock(&prompt.screen).resume();
        assert!(lock(&log.screen).held.is_empty());
        assert_eq!(log.received, 1);
    }

    #[test]
    fn test_rows_pass_through_when_no_prompt_is_open() {
        let mut log = TerminalLog::with_draw_target("test", ProgressDrawTarget::hidden(), false);
        log.record(&entry(Direction::Sent, &[0xC0, 0x80]));
        assert!(lock(&log.screen).held.is_empty());
        assert_eq!((log.sent, log.invalid), (1, 1));
    }

    #[test]
    fn test_finish_releases_held_rows() {
        let mut log = TerminalLog::with_draw_target("test", ProgressDrawTarget::hidden(), false);
        lock(&log.send_prompt().screen).pause();
        log.record(&entry(Direction::Received, &[0xFE]));
        log.finish();
        assert!(lock(&log.screen).held.is_empty());
    }

    #[test]
    fn test_row_without_data_has_no_trailing_space() {
        let row = format_entry(&entry(Direction::Received, &[0xF8]));
        assert!(row.ends_with("MIDI Clock"));
    }
}
