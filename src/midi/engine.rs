use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Custom error type for MIDI operations
#[derive(Debug)]
pub enum MidiError {
    /// Error when sending a MIDI message
    SendError(String),
    /// Error when receiving a MIDI message
    RecvError(String),
    /// Error when connecting to a MIDI device
    ConnectionError(String),
    /// No port is open in the required direction
    NotConnected(&'static str),
}

impl fmt::Display for MidiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiError::SendError(msg) => write!(f, "MIDI send error: {}", msg),
            MidiError::RecvError(msg) => write!(f, "MIDI receive error: {}", msg),
            MidiError::ConnectionError(msg) => write!(f, "MIDI connection error: {}", msg),
            MidiError::NotConnected(direction) => write!(f, "no MIDI {} port is open", direction),
        }
    }
}

impl Error for MidiError {}

impl From<midir::InitError> for MidiError {
    fn from(e: midir::InitError) -> Self {
        MidiError::ConnectionError(e.to_string())
    }
}

impl<T> From<midir::ConnectError<T>> for MidiError {
    fn from(e: midir::ConnectError<T>) -> Self {
        MidiError::ConnectionError(e.to_string())
    }
}

impl From<midir::SendError> for MidiError {
    fn from(e: midir::SendError) -> Self {
        MidiError::SendError(e.to_string())
    }
}

/// Result type for MIDI operations
pub type Result<T> = std::result::Result<T, MidiError>;

/// Bytes received from a port together with the wall-clock time of receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub bytes: Vec<u8>,
}

/// Which inbound message classes the driver should drop before delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventFilter {
    pub ignore_system_exclusive: bool,
    /// Clock and MTC quarter frames
    pub ignore_time: bool,
    pub ignore_active_sensing: bool,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            ignore_system_exclusive: true,
            ignore_time: true,
            ignore_active_sensing: true,
        }
    }
}

impl EventFilter {
    pub fn to_midir(self) -> midir::Ignore {
        use midir::Ignore;
        match (
            self.ignore_system_exclusive,
            self.ignore_time,
            self.ignore_active_sensing,
        ) {
            (false, false, false) => Ignore::None,
            (true, false, false) => Ignore::Sysex,
            (false, true, false) => Ignore::Time,
            (true, true, false) => Ignore::SysexAndTime,
            (false, false, true) => Ignore::ActiveSense,
            (true, false, true) => Ignore::SysexAndActiveSense,
            (false, true, true) => Ignore::TimeAndActiveSense,
            (true, true, true) => Ignore::All,
        }
    }
}

/// Milliseconds since the Unix epoch, as stamped on received and sent rows.
pub fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

/// Trait defining the interface for MIDI engine implementations
pub trait MidiEngine: Send {
    /// Sends raw bytes to the output port and returns the send timestamp.
    fn send(&mut self, bytes: &[u8]) -> Result<u64>;

    /// Waits up to `timeout` for the next inbound event.
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<RawEvent>>;

    /// Whether an output port is open, i.e. sending is possible.
    fn can_send(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_ignores_everything() {
        assert!(matches!(
            EventFilter::default().to_midir(),
            midir::Ignore::All
        ));
    }

    #[test]
    fn test_filter_mapping() {
        let filter = EventFilter {
            ignore_system_exclusive: false,
            ignore_time: true,
            ignore_active_sensing: true,
        };
        assert!(matches!(
            filter.to_midir(),
            midir::Ignore::TimeAndActiveSense
        ));

        let filter = EventFilter {
            ignore_system_exclusive: false,
            ignore_time: false,
            ignore_active_sensing: false,
        };
        assert!(matches!(filter.to_midir(), midir::Ignore::None));
    }

    #[test]
    fn test_not_connected_message() {
        let err = MidiError::NotConnected("output");
        assert_eq!(err.to_string(), "no MIDI output port is open");
    }
}
