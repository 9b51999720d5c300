//! Human-readable names for note and controller numbers.

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Returns the note name for a MIDI note number.
///
/// Note 60 (middle C) is `C4`, so note 0 is `C-1` and note 127 is `G9`.
pub fn note_name(note: u8) -> String {
    let octave = i32::from(note / 12) - 1;
    format!("{}{}", NOTE_NAMES[usize::from(note % 12)], octave)
}

/// Returns the standard name of a control change number, or
/// `Controller N` for numbers without an assigned function.
pub fn controller_name(controller: u8) -> String {
    let name = match controller {
        0 => "Bank Select (MSB)",
        1 => "Modulation Wheel (MSB)",
        2 => "Breath Controller (MSB)",
        4 => "Foot Controller (MSB)",
        5 => "Portamento Time (MSB)",
        6 => "Data Entry (MSB)",
        7 => "Channel Volume (MSB)",
        8 => "Balance (MSB)",
        10 => "Pan (MSB)",
        11 => "Expression Controller (MSB)",
        12 => "Effect Control 1 (MSB)",
        13 => "Effect Control 2 (MSB)",
        16 => "General Purpose Controller 1 (MSB)",
        17 => "General Purpose Controller 2 (MSB)",
        18 => "General Purpose Controller 3 (MSB)",
        19 => "General Purpose Controller 4 (MSB)",
        32 => "Bank Select (LSB)",
        33 => "Modulation Wheel (LSB)",
        34 => "Breath Controller (LSB)",
        36 => "Foot Controller (LSB)",
        37 => "Portamento Time (LSB)",
        38 => "Data Entry (LSB)",
        39 => "Channel Volume (LSB)",
        40 => "Balance (LSB)",
        42 => "Pan (LSB)",
        43 => "Expression Controller (LSB)",
        44 => "Effect Control 1 (LSB)",
        45 => "Effect Control 2 (LSB)",
        48 => "General Purpose Controller 1 (LSB)",
        49 => "General Purpose Controller 2 (LSB)",
        50 => "General Purpose Controller 3 (LSB)",
        51 => "General Purpose Controller 4 (LSB)",
        64 => "Sustain Pedal",
        65 => "Portamento On/Off",
        66 => "Sostenuto",
        67 => "Soft Pedal",
        68 => "Legato Footswitch",
        69 => "Hold 2",
        70 => "Sound Variation",
        71 => "Timbre/Harmonic Intensity",
        72 => "Release Time",
        73 => "Attack Time",
        74 => "Brightness",
        75 => "Decay Time",
        76 => "Vibrato Rate",
        77 => "Vibrato Depth",
        78 => "Vibrato Delay",
        79 => "Sound Controller 10",
        80 => "General Purpose Controller 5",
        81 => "General Purpose Controller 6",
        82 => "General Purpose Controller 7",
        83 => "General Purpose Controller 8",
        84 => "Portamento Control",
        88 => "High Resolution Velocity Prefix",
        91 => "Reverb Send Level",
        92 => "Tremolo Depth",
        93 => "Chorus Send Level",
        94 => "Celeste Depth",
        95 => "Phaser Depth",
        96 => "Data Increment",
        97 => "Data Decrement",
        98 => "NRPN (LSB)",
        99 => "NRPN (MSB)",
        100 => "RPN (LSB)",
        101 => "RPN (MSB)",
        120 => "All Sound Off",
        121 => "Reset All Controllers",
        122 => "Local Control",
        123 => "All Notes Off",
        124 => "Omni Mode Off",
        125 => "Omni Mode On",
        126 => "Mono Mode On",
        127 => "Poly Mode On",
        _ => return format!("Controller {}", controller),
    };
    name.to_string()
}
