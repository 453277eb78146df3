//! Hexadecimal armoring for text-mode envelopes
//!
//! Envelopes shown to or pasted by a user are rendered as lowercase hex
//! with no separators, two digits per byte. Whitespace anywhere in pasted
//! input (line wrapping, indentation, trailing newlines) is ignored.

use crate::error::{ErrorCategory, ErrorKind, GcmsealError, Result};

/// Wrap bytes in armor, returning lowercase hex
pub fn wrap(body: &[u8]) -> String {
    hex::encode(body)
}

/// Unwrap hex text, returning the original bytes
pub fn unwrap(armored: &str) -> Result<Vec<u8>> {
    let compact: String = armored.chars().filter(|c| !c.is_whitespace()).collect();

    hex::decode(&compact).map_err(|e| {
        let msg = match e {
            hex::FromHexError::OddLength => "invalid hex format: odd number of digits".to_string(),
            hex::FromHexError::InvalidHexCharacter { c, index } => {
                format!("invalid hex format: unexpected {:?} at position {}", c, index)
            }
            _ => format!("invalid hex format: {}", e),
        };
        GcmsealError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::InvalidHexEncoding,
            msg,
            e,
        )
    })
}
