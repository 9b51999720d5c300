use super::names::{controller_name, note_name};
use super::parser::describe_bytes;

/// A structurally valid MIDI message decoded into its fields.
///
/// Channels are stored zero-based and rendered one-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note Off message with note number and velocity
    NoteOff { channel: u8, note: u8, velocity: u8 },
    /// Note On message with note number and velocity
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Polyphonic key pressure
    Aftertouch { channel: u8, note: u8, pressure: u8 },
    /// Control Change message with controller number and value
    Controller {
        channel: u8,
        controller: u8,
        value: u8,
    },
    /// Program Change message with program number
    ProgramChange { channel: u8, program: u8 },
    /// Channel-wide pressure
    ChannelPressure { channel: u8, pressure: u8 },
    /// Pitch wheel position, centred on zero (-8192..=8191)
    PitchWheel { channel: u8, value: i16 },
    /// System Exclusive payload, without the framing 0xF0 and 0xF7 bytes
    SystemExclusive { payload: Vec<u8> },
    /// MIDI Time Code quarter frame
    MtcQuarterFrame(QuarterFrame),
    /// Song position in MIDI beats (sixteenth notes)
    SongPositionPointer { beat: u16 },
    SongSelect { song: u8 },
    TuneRequest,
    /// MIDI Clock timing message
    Clock,
    Tick,
    /// MIDI Start message
    Start,
    /// MIDI Continue message
    Continue,
    /// MIDI Stop message
    Stop,
    ActiveSense,
    Reset,
}

/// One piece of an MTC quarter frame, selected by bits 4-6 of the data byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuarterFrame {
    FramesLow(u8),
    FramesHigh(u8),
    SecondsLow(u8),
    SecondsHigh(u8),
    MinutesLow(u8),
    MinutesHigh(u8),
    HoursLow(u8),
    /// Bit 0 is the hours high nibble, bits 1-2 the SMPTE rate.
    HoursHigh { value: u8, rate: SmpteRate },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmpteRate {
    Fps24,
    Fps25,
    Fps30DropFrame,
    Fps30,
}

impl QuarterFrame {
    /// Decodes the single data byte of an MTC quarter frame message.
    pub fn from_data(data: u8) -> Self {
        let value = data & 0x0F;
        match (data & 0x70) >> 4 {
            0 => QuarterFrame::FramesLow(value),
            1 => QuarterFrame::FramesHigh(value),
            2 => QuarterFrame::SecondsLow(value),
            3 => QuarterFrame::SecondsHigh(value),
            4 => QuarterFrame::MinutesLow(value),
            5 => QuarterFrame::MinutesHigh(value),
            6 => QuarterFrame::HoursLow(value),
            7 => QuarterFrame::HoursHigh {
                value: value & 0x01,
                rate: SmpteRate::from_bits((value & 0x06) >> 1),
            },
            _ => unreachable!("quarter frame piece is masked to three bits"),
        }
    }

    fn describe(&self) -> String {
        match self {
            QuarterFrame::FramesLow(v) => format!("Frames Low Nibble: {}", v),
            QuarterFrame::FramesHigh(v) => format!("Frames High Nibble: {}", v),
            QuarterFrame::SecondsLow(v) => format!("Seconds Low Nibble: {}", v),
            QuarterFrame::SecondsHigh(v) => format!("Seconds High Nibble: {}", v),
            QuarterFrame::MinutesLow(v) => format!("Minutes Low Nibble: {}", v),
            QuarterFrame::MinutesHigh(v) => format!("Minutes High Nibble: {}", v),
            QuarterFrame::HoursLow(v) => format!("Hours Low Nibble: {}", v),
            QuarterFrame::HoursHigh { value, rate } => {
                format!("Hours High Nibble: {}, SMPTE Type: {}", value, rate.label())
            }
        }
    }
}

impl SmpteRate {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => SmpteRate::Fps24,
            1 => SmpteRate::Fps25,
            2 => SmpteRate::Fps30DropFrame,
            3 => SmpteRate::Fps30,
            _ => unreachable!("SMPTE rate is masked to two bits"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SmpteRate::Fps24 => "24 fps",
            SmpteRate::Fps25 => "25 fps",
            SmpteRate::Fps30DropFrame => "30 fps (drop-frame)",
            SmpteRate::Fps30 => "30 fps",
        }
    }
}

impl MidiMessage {
    /// Returns the zero-based channel of a channel voice message.
    pub fn channel(&self) -> Option<u8> {
        match self {
            MidiMessage::NoteOff { channel, .. }
            | MidiMessage::NoteOn { channel, .. }
            | MidiMessage::Aftertouch { channel, .. }
            | MidiMessage::Controller { channel, .. }
            | MidiMessage::ProgramChange { channel, .. }
            | MidiMessage::ChannelPressure { channel, .. }
            | MidiMessage::PitchWheel { channel, .. } => Some(*channel),
            _ => None,
        }
    }

    /// Label for the status column, e.g. `Note On, Channel 1`.
    pub fn status_description(&self) -> String {
        let label = match self {
            MidiMessage::NoteOff { .. } => "Note Off",
            MidiMessage::NoteOn { .. } => "Note On",
            MidiMessage::Aftertouch { .. } => "Aftertouch",
            MidiMessage::Controller { .. } => "Controller",
            MidiMessage::ProgramChange { .. } => "Program Change",
            MidiMessage::ChannelPressure { .. } => "Channel Pressure",
            MidiMessage::PitchWheel { .. } => "Pitch Wheel",
            MidiMessage::SystemExclusive { .. } => "System Exclusive",
            MidiMessage::MtcQuarterFrame(_) => "MTC Quarter Frame",
            MidiMessage::SongPositionPointer { .. } => "Song Position Pointer",
            MidiMessage::SongSelect { .. } => "Song Select",
            MidiMessage::TuneRequest => "Tune Request",
            MidiMessage::Clock => "MIDI Clock",
            MidiMessage::Tick => "MIDI Tick",
            MidiMessage::Start => "MIDI Start",
            MidiMessage::Continue => "MIDI Continue",
            MidiMessage::Stop => "MIDI Stop",
            MidiMessage::ActiveSense => "Active Sense",
            MidiMessage::Reset => "Reset",
        };
        match self.channel() {
            Some(channel) => format!("{}, Channel {}", label, channel + 1),
            None => label.to_string(),
        }
    }

    /// Label for the data column. Empty for messages without data.
    pub fn data_description(&self) -> String {
        match self {
            MidiMessage::NoteOff { note, velocity, .. }
            | MidiMessage::NoteOn { note, velocity, .. } => {
                format!("Note: {}, Velocity: {}", note_name(*note), velocity)
            }
            MidiMessage::Aftertouch { note, pressure, .. } => {
                format!("Note: {}, Pressure: {}", note_name(*note), pressure)
            }
            MidiMessage::Controller {
                controller, value, ..
            } => format!(
                "Controller: {}, Value: {}",
                controller_name(*controller),
                value
            ),
            MidiMessage::ProgramChange { program, .. } => format!("Number: {}", program),
            MidiMessage::ChannelPressure { pressure, .. } => format!("Pressure: {}", pressure),
            MidiMessage::PitchWheel { value, .. } => format!("Value: {}", value),
            MidiMessage::SystemExclusive { payload } => describe_bytes(payload),
            MidiMessage::MtcQuarterFrame(frame) => frame.describe(),
            MidiMessage::SongPositionPointer { beat } => format!("MIDI Beat: {}", beat),
            MidiMessage::SongSelect { song } => format!("Song Number: {}", song),
            _ => String::new(),
        }
    }
}
