//! Classification of raw byte sequences as MIDI 1.0 messages.
//!
//! [`classify`] never fails: every input, including empty and truncated
//! sequences, maps to a [`ParseResult`] whose `valid` flag says whether the
//! bytes form exactly one well-framed message.

use super::message::{MidiMessage, QuarterFrame};
use log::debug;
use std::error::Error;
use std::fmt;

const END_OF_EXCLUSIVE: u8 = 0xF7;

/// Total message length implied by a status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLength {
    /// Reserved status, not defined by MIDI 1.0
    Undefined,
    /// System Exclusive, terminated by 0xF7
    Variable,
    /// Status byte plus data bytes
    Fixed(usize),
}

/// Expected lengths indexed by `status - 0x80`.
pub const STATUS_LENGTHS: [FrameLength; 0x80] = build_status_lengths();

const fn build_status_lengths() -> [FrameLength; 0x80] {
    // Note Off, Note On, Aftertouch and Controller (0x80-0xBF) keep the default.
    let mut table = [FrameLength::Fixed(3); 0x80];
    let mut i = 0x40;
    // Program Change and Channel Pressure
    while i < 0x60 {
        table[i] = FrameLength::Fixed(2);
        i += 1;
    }
    // 0x60-0x6F is Pitch Wheel, left at 3.
    table[0x70] = FrameLength::Variable;
    table[0x71] = FrameLength::Fixed(2);
    table[0x72] = FrameLength::Fixed(3);
    table[0x73] = FrameLength::Fixed(2);
    table[0x74] = FrameLength::Undefined;
    table[0x75] = FrameLength::Undefined;
    table[0x76] = FrameLength::Fixed(1);
    // End of Exclusive is only meaningful inside a SysEx frame.
    table[0x77] = FrameLength::Undefined;
    table[0x78] = FrameLength::Fixed(1);
    table[0x79] = FrameLength::Fixed(1);
    table[0x7A] = FrameLength::Fixed(1);
    table[0x7B] = FrameLength::Fixed(1);
    table[0x7C] = FrameLength::Fixed(1);
    table[0x7D] = FrameLength::Undefined;
    table[0x7E] = FrameLength::Fixed(1);
    table[0x7F] = FrameLength::Fixed(1);
    table
}

/// Reasons a byte sequence is not a valid MIDI message.
///
/// The `Display` output is the status description shown for the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    /// First byte is a data byte
    InvalidStatus(u8),
    UndefinedStatus(u8),
    /// 0xF0 with nothing after it
    SysExNoData,
    /// SysEx not terminated by 0xF7
    SysExEndNotFound,
    IncorrectLength(u8),
    /// A byte with the high bit set inside the data portion
    InvalidData(u8),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty message"),
            ParseError::InvalidStatus(status) => write!(f, "{:02x} (invalid status)", status),
            ParseError::UndefinedStatus(status) => write!(f, "{:02x} (undefined status)", status),
            ParseError::SysExNoData => write!(f, "System Exclusive (no data)"),
            ParseError::SysExEndNotFound => write!(f, "System Exclusive (end not found)"),
            ParseError::IncorrectLength(status) => write!(f, "{:02x} (incorrect length)", status),
            ParseError::InvalidData(status) => write!(f, "{:02x} (invalid data)", status),
        }
    }
}

impl Error for ParseError {}

/// Outcome of classifying one byte sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub valid: bool,
    pub status_description: String,
    pub data_description: String,
}

impl ParseResult {
    fn from_message(message: &MidiMessage) -> Self {
        ParseResult {
            valid: true,
            status_description: message.status_description(),
            data_description: message.data_description(),
        }
    }

    fn from_error(bytes: &[u8], error: ParseError) -> Self {
        let data_description = match error {
            ParseError::Empty | ParseError::SysExNoData => String::new(),
            _ => generic_data_description(bytes, bytes.len() - 1),
        };
        ParseResult {
            valid: false,
            status_description: error.to_string(),
            data_description,
        }
    }
}

/// Classifies `bytes` and renders the outcome as text.
pub fn classify(bytes: &[u8]) -> ParseResult {
    match parse(bytes) {
        Ok(message) => ParseResult::from_message(&message),
        Err(error) => {
            debug!("Rejected MIDI message {:02x?}: {}", bytes, error);
            ParseResult::from_error(bytes, error)
        }
    }
}

/// Validates the framing of `bytes` and decodes the message.
pub fn parse(bytes: &[u8]) -> Result<MidiMessage, ParseError> {
    let status = *bytes.first().ok_or(ParseError::Empty)?;
    if status < 0x80 {
        return Err(ParseError::InvalidStatus(status));
    }

    let length = bytes.len();
    let last_data_index = match STATUS_LENGTHS[usize::from(status - 0x80)] {
        FrameLength::Undefined => return Err(ParseError::UndefinedStatus(status)),
        FrameLength::Variable => {
            if length == 1 {
                return Err(ParseError::SysExNoData);
            }
            if bytes[length - 1] != END_OF_EXCLUSIVE {
                return Err(ParseError::SysExEndNotFound);
            }
            length - 2
        }
        FrameLength::Fixed(expected) => {
            if length != expected {
                return Err(ParseError::IncorrectLength(status));
            }
            length - 1
        }
    };

    if bytes[1..=last_data_index].iter().any(|&b| b >= 0x80) {
        return Err(ParseError::InvalidData(status));
    }

    Ok(decode(status, &bytes[1..=last_data_index]))
}

/// Decodes a structurally valid message. `data` excludes the status byte
/// and, for System Exclusive, the terminator.
fn decode(status: u8, data: &[u8]) -> MidiMessage {
    let channel = status & 0x0F;
    match status & 0xF0 {
        0x80 => MidiMessage::NoteOff {
            channel,
            note: data[0],
            velocity: data[1],
        },
        0x90 => MidiMessage::NoteOn {
            channel,
            note: data[0],
            velocity: data[1],
        },
        0xA0 => MidiMessage::Aftertouch {
            channel,
            note: data[0],
            pressure: data[1],
        },
        0xB0 => MidiMessage::Controller {
            channel,
            controller: data[0],
            value: data[1],
        },
        0xC0 => MidiMessage::ProgramChange {
            channel,
            program: data[0],
        },
        0xD0 => MidiMessage::ChannelPressure {
            channel,
            pressure: data[0],
        },
        0xE0 => MidiMessage::PitchWheel {
            channel,
            value: fourteen_bit(data[0], data[1]) as i16 - 0x2000,
        },
        0xF0 => match status & 0x0F {
            0x0 => MidiMessage::SystemExclusive {
                payload: data.to_vec(),
            },
            0x1 => MidiMessage::MtcQuarterFrame(QuarterFrame::from_data(data[0])),
            0x2 => MidiMessage::SongPositionPointer {
                beat: fourteen_bit(data[0], data[1]),
            },
            0x3 => MidiMessage::SongSelect { song: data[0] },
            0x6 => MidiMessage::TuneRequest,
            0x8 => MidiMessage::Clock,
            0x9 => MidiMessage::Tick,
            0xA => MidiMessage::Start,
            0xB => MidiMessage::Continue,
            0xC => MidiMessage::Stop,
            0xE => MidiMessage::ActiveSense,
            0xF => MidiMessage::Reset,
            _ => unreachable!("undefined system status {:02x} passed validation", status),
        },
        _ => unreachable!("data byte {:02x} passed status validation", status),
    }
}

fn fourteen_bit(lsb: u8, msb: u8) -> u16 {
    (u16::from(msb) << 7) | u16::from(lsb)
}

/// Renders `bytes[1..=last_index]` as space-separated hex followed by the
/// byte count. `last_index` is clamped to the end of `bytes`.
pub fn generic_data_description(bytes: &[u8], last_index: usize) -> String {
    let last = last_index.min(bytes.len().saturating_sub(1));
    describe_bytes(bytes.get(1..=last).unwrap_or(&[]))
}

pub(crate) fn describe_bytes(bytes: &[u8]) -> String {
    let mut parts: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    parts.push(match bytes.len() {
        1 => "(1 byte)".to_string(),
        n => format!("({} bytes)", n),
    });
    parts.join(" ")
}
