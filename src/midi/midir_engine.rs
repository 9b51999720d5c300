use crate::midi::{now_millis, EventFilter, MidiEngine, MidiError, RawEvent, Result};
use crossbeam::channel::{unbounded, Receiver, RecvTimeoutError};
use log::{debug, info};
use midir::{MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use std::time::Duration;

const CLIENT_NAME: &str = "midiprobe";

/// Device access through `midir`. Either direction may be left closed.
pub struct MidirEngine {
    #[allow(dead_code)]
    input: Option<MidiInputConnection<()>>,
    output: Option<MidiOutputConnection>,
    rx: Option<Receiver<RawEvent>>,
}

impl MidirEngine {
    pub fn new(
        input_device: Option<&str>,
        output_device: Option<&str>,
        filter: EventFilter,
    ) -> Result<Self> {
        let (input, rx) = match input_device {
            Some(name) => {
                let (connection, rx) = Self::open_input(name, filter)?;
                (Some(connection), Some(rx))
            }
            None => (None, None),
        };

        let output = match output_device {
            Some(name) => Some(Self::open_output(name)?),
            None => None,
        };

        Ok(MidirEngine { input, output, rx })
    }

    fn open_input(
        name: &str,
        filter: EventFilter,
    ) -> Result<(MidiInputConnection<()>, Receiver<RawEvent>)> {
        let mut midi_in = MidiInput::new(&format!("{}-in", CLIENT_NAME))?;
        midi_in.ignore(filter.to_midir());
        debug!("Input event filter: {:?}", filter);

        let in_ports = midi_in.ports();
        let in_port = in_ports
            .iter()
            .find(|p| midi_in.port_name(p).unwrap_or_default().contains(name))
            .ok_or_else(|| {
                MidiError::ConnectionError(format!("input device '{}' not found", name))
            })?;
        info!(
            "Opening MIDI input port: {}",
            midi_in.port_name(in_port).unwrap_or_default()
        );

        let (tx, rx) = unbounded();
        // The driver timestamp is replaced with the wall-clock time of receipt.
        let connection = midi_in.connect(
            in_port,
            "midiprobe-input",
            move |_stamp, message, _| {
                let _ = tx.send(RawEvent {
                    timestamp: now_millis(),
                    bytes: message.to_vec(),
                });
            },
            (),
        )?;
        Ok((connection, rx))
    }

    fn open_output(name: &str) -> Result<MidiOutputConnection> {
        let midi_out = MidiOutput::new(&format!("{}-out", CLIENT_NAME))?;

        let out_ports = midi_out.ports();
        let out_port = out_ports
            .iter()
            .find(|p| midi_out.port_name(p).unwrap_or_default().contains(name))
            .ok_or_else(|| {
                MidiError::ConnectionError(format!("output device '{}' not found", name))
            })?;
        info!(
            "Opening MIDI output port: {}",
            midi_out.port_name(out_port).unwrap_or_default()
        );
        Ok(midi_out.connect(out_port, "midiprobe-output")?)
    }

    pub fn input_port_names() -> Vec<String> {
        match MidiInput::new(&format!("{}-list", CLIENT_NAME)) {
            Ok(midi_in) => midi_in
                .ports()
                .iter()
                .filter_map(|p| midi_in.port_name(p).ok())
                .collect(),
            Err(_) => vec![],
        }
    }

    pub fn output_port_names() -> Vec<String> {
        match MidiOutput::new(&format!("{}-list", CLIENT_NAME)) {
            Ok(midi_out) => midi_out
                .ports()
                .iter()
                .filter_map(|p| midi_out.port_name(p).ok())
                .collect(),
            Err(_) => vec![],
        }
    }
}

impl MidiEngine for MidirEngine {
    fn send(&mut self, bytes: &[u8]) -> Result<u64> {
        let output = self
            .output
            .as_mut()
            .ok_or(MidiError::NotConnected("output"))?;
        output.send(bytes)?;
        Ok(now_millis())
    }

    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<RawEvent>> {
        let rx = self.rx.as_ref().ok_or(MidiError::NotConnected("input"))?;
        match rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(MidiError::RecvError(
                "input port callback disconnected".to_string(),
            )),
        }
    }

    fn can_send(&self) -> bool {
        self.output.is_some()
    }
}
