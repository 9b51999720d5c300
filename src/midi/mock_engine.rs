use crate::midi::{now_millis, MidiEngine, MidiError, RawEvent, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted engine: replays queued events and records sent bytes.
pub struct MockMidiEngine {
    incoming: VecDeque<RawEvent>,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
    output_open: bool,
}

impl MockMidiEngine {
    pub fn new(incoming: Vec<RawEvent>) -> Self {
        MockMidiEngine {
            incoming: incoming.into(),
            sent: Arc::new(Mutex::new(Vec::new())),
            output_open: true,
        }
    }

    /// An engine with no output port, so every send fails.
    pub fn without_output(incoming: Vec<RawEvent>) -> Self {
        MockMidiEngine {
            output_open: false,
            ..Self::new(incoming)
        }
    }

    /// Handle to the bytes sent so far, readable after the engine moves.
    pub fn sent(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        Arc::clone(&self.sent)
    }
}

impl MidiEngine for MockMidiEngine {
    fn send(&mut self, bytes: &[u8]) -> Result<u64> {
        if !self.output_open {
            return Err(MidiError::NotConnected("output"));
        }
        self.sent
            .lock()
            .map_err(|e| MidiError::SendError(e.to_string()))?
            .push(bytes.to_vec());
        Ok(now_millis())
    }

    fn recv_timeout(&mut self, _timeout: Duration) -> Result<Option<RawEvent>> {
        Ok(self.incoming.pop_front())
    }

    fn can_send(&self) -> bool {
        self.output_open
    }
}
