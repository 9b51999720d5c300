//! MIDI functionality for midiprobe
//!
//! This module provides:
//! - Classification of raw bytes as MIDI 1.0 messages ([`classify`], [`parse`])
//! - Structured decoded messages and their descriptions ([`MidiMessage`])
//! - Note and controller naming
//! - Real MIDI device communication via midir
//! - Mock implementations for testing
//!
mod engine;
mod message;
pub mod midir_engine;
pub mod mock_engine;
pub mod names;
mod parser;

pub use engine::{now_millis, EventFilter, MidiEngine, MidiError, RawEvent, Result};
pub use message::{MidiMessage, QuarterFrame, SmpteRate};
pub use parser::{
    classify, generic_data_description, parse, FrameLength, ParseError, ParseResult,
    STATUS_LENGTHS,
};

pub use midir_engine::MidirEngine;
pub use mock_engine::MockMidiEngine;

// Set default engine type
pub type DefaultMidiEngine = MidirEngine;
