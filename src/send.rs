//! Operator send path: typed hex text to validated message bytes.

use crate::midi::{classify, MidiError, ParseResult};
use log::debug;
use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum SendError {
    /// A token that is not a hexadecimal byte
    InvalidByte(String),
    /// Bytes parsed but do not form a valid message; holds the status description
    InvalidMessage(String),
    /// The engine refused or failed the transmission
    Engine(MidiError),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::InvalidByte(token) => {
                write!(f, "'{}' is not a valid hexadecimal MIDI byte", token)
            }
            SendError::InvalidMessage(status) => write!(
                f,
                "The given message is not a valid MIDI message: {}",
                status
            ),
            SendError::Engine(e) => write!(f, "{}", e),
        }
    }
}

impl Error for SendError {}

impl From<MidiError> for SendError {
    fn from(e: MidiError) -> Self {
        SendError::Engine(e)
    }
}

/// Parses whitespace-separated hex tokens into bytes.
///
/// Tokens are case-insensitive and may omit the leading zero; anything that
/// is not made of hex digits, or exceeds 0xff, rejects the whole text.
pub fn parse_hex_message(text: &str) -> Result<Vec<u8>, SendError> {
    text.split_whitespace()
        .map(|token| {
            if !token.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(SendError::InvalidByte(token.to_string()));
            }
            u8::from_str_radix(token, 16).map_err(|_| SendError::InvalidByte(token.to_string()))
        })
        .collect()
}

/// Parses and classifies operator text, accepting only valid messages.
pub fn prepare_message(text: &str) -> Result<(Vec<u8>, ParseResult), SendError> {
    let bytes = parse_hex_message(text)?;
    let result = classify(&bytes);
    if !result.valid {
        debug!("Refusing to send {:02x?}: {}", bytes, result.status_description);
        return Err(SendError::InvalidMessage(result.status_description));
    }
    Ok((bytes, result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_mixed_case_tokens() {
        assert_eq!(
            parse_hex_message("90 3c 7F").unwrap(),
            vec![0x90, 0x3C, 0x7F]
        );
    }

    #[test]
    fn test_any_whitespace_separates_tokens() {
        assert_eq!(
            parse_hex_message("  f0\t01\n02  f7 ").unwrap(),
            vec![0xF0, 0x01, 0x02, 0xF7]
        );
    }

    #[test]
    fn test_short_token_is_accepted() {
        assert_eq!(parse_hex_message("c0 5").unwrap(), vec![0xC0, 0x05]);
    }

    #[test]
    fn test_out_of_range_token_is_named() {
        let err = parse_hex_message("90 100 40").unwrap_err();
        assert_eq!(
            err.to_string(),
            "'100' is not a valid hexadecimal MIDI byte"
        );
    }

    #[test]
    fn test_sign_and_prefix_are_rejected() {
        assert!(matches!(
            parse_hex_message("+7f"),
            Err(SendError::InvalidByte(t)) if t == "+7f"
        ));
        assert!(matches!(
            parse_hex_message("0x90"),
            Err(SendError::InvalidByte(t)) if t == "0x90"
        ));
    }

    #[test]
    fn test_empty_text_is_not_a_valid_message() {
        assert!(matches!(
            prepare_message("   "),
            Err(SendError::InvalidMessage(s)) if s == "empty message"
        ));
    }
}
