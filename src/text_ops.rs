//! Text encryption/decryption operations
//!
//! Text mode carries the same envelope as file mode, rendered as hex so it
//! can be displayed, copied and pasted.

use crate::envelope;
use crate::error::{ErrorCategory, ErrorKind, GcmsealError, Result};
use crate::hexarmor;
use crate::passphrase::{PassphraseReader, decode_password};
use tracing::debug;

/// Encrypt UTF-8 text, returning the envelope as lowercase hex
pub fn encrypt_text(text: &str, passphrase_reader: &mut dyn PassphraseReader) -> Result<String> {
    if text.is_empty() {
        return Err(no_input("no text to encrypt"));
    }

    let passphrase = passphrase_reader.read_passphrase()?;
    let password = decode_password(&passphrase)?;

    debug!(bytes = text.len(), "encrypting text");
    let sealed = envelope::encrypt(text.as_bytes(), password)
        .map_err(|e| e.with_context("encryption failed"))?;

    Ok(hexarmor::wrap(&sealed))
}

/// Decrypt a hex-armored envelope, returning the plaintext bytes
///
/// Whitespace in `armored` is ignored. Invalid hex is rejected before the
/// password is read.
pub fn decrypt_text(
    armored: &str,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<Vec<u8>> {
    if armored.trim().is_empty() {
        return Err(no_input("no encrypted text to decrypt"));
    }

    let sealed = hexarmor::unwrap(armored).map_err(|e| e.with_context("failed to unarmor"))?;

    let passphrase = passphrase_reader.read_passphrase()?;
    let password = decode_password(&passphrase)?;

    debug!(bytes = sealed.len(), "decrypting text");
    envelope::decrypt(&sealed, password).map_err(|e| e.with_context("failed to decrypt"))
}

/// Render decrypted bytes for display: as text when they are valid UTF-8,
/// otherwise as hex.
pub fn render_plaintext(plaintext: &[u8]) -> String {
    match std::str::from_utf8(plaintext) {
        Ok(text) => text.to_string(),
        Err(_) => hexarmor::wrap(plaintext),
    }
}

fn no_input(msg: &str) -> GcmsealError {
    GcmsealError::with_kind(ErrorCategory::User, ErrorKind::InvalidInput, msg)
}
