//! Obtaining the password from the user
//!
//! Readers hand back raw bytes. [`decode_password`] turns them into the
//! password string the envelope layer expects.

use crate::error::{ErrorCategory, ErrorKind, GcmsealError, Result};
use std::io::{self, IsTerminal, Read, Write};
use zeroize::Zeroizing;

/// Trait for reading passphrases from various sources
pub trait PassphraseReader {
    /// Read a passphrase as raw bytes.
    ///
    /// Returns the passphrase wrapped in `Zeroizing` to ensure it is securely
    /// wiped from memory when dropped.
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>>;
}

/// Returns a fixed passphrase (for testing and embedding)
pub struct ConstantPassphraseReader {
    passphrase: Zeroizing<Vec<u8>>,
}

impl ConstantPassphraseReader {
    pub fn new(passphrase: impl Into<Vec<u8>>) -> Self {
        Self {
            passphrase: Zeroizing::new(passphrase.into()),
        }
    }
}

impl PassphraseReader for ConstantPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        Ok(self.passphrase.clone())
    }
}

/// Reads passphrase from any io::Read source until EOF
pub struct ReaderPassphraseReader {
    reader: Box<dyn Read>,
}

impl ReaderPassphraseReader {
    pub fn new(reader: Box<dyn Read>) -> Self {
        Self { reader }
    }
}

impl PassphraseReader for ReaderPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        let mut data = Zeroizing::new(Vec::new());
        self.reader.read_to_end(&mut data).map_err(|e| {
            GcmsealError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("error reading passphrase: {}", e),
                e,
            )
        })?;
        Ok(data)
    }
}

/// Reads passphrase from terminal with no echo
#[derive(Default)]
pub struct TerminalPassphraseReader;

impl TerminalPassphraseReader {
    pub fn new() -> Self {
        Self
    }
}

impl PassphraseReader for TerminalPassphraseReader {
    fn read_passphrase(&mut self) -> Result<Zeroizing<Vec<u8>>> {
        if !io::stdin().is_terminal() {
            return Err(GcmsealError::with_kind(
                ErrorCategory::User,
                ErrorKind::PassphraseUnavailable,
                "cannot read passphrase from terminal - stdin is not a terminal",
            ));
        }

        let mut stderr = io::stderr();
        stderr
            .write_all(b"Password (gcmseal): ")
            .and_then(|()| stderr.flush())
            .map_err(|e| {
                GcmsealError::with_kind_and_source(
                    ErrorCategory::Internal,
                    ErrorKind::Io,
                    format!("failed to write prompt: {}", e),
                    e,
                )
            })?;

        // rpassword hands back a plain String; move it into zeroizing storage right away
        let passphrase = rpassword::read_password().map_err(|e| {
            GcmsealError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::PassphraseUnavailable,
                format!("failure reading passphrase: {}", e),
                e,
            )
        })?;

        Ok(Zeroizing::new(passphrase.into_bytes()))
    }
}

/// Interpret raw passphrase bytes as the password string.
///
/// Surrounding whitespace is trimmed, so a trailing newline from a pipe
/// or a stray space from copy-paste does not become part of the password.
/// Emptiness is left for the envelope layer to reject.
pub fn decode_password(raw: &[u8]) -> Result<&str> {
    let password = std::str::from_utf8(raw).map_err(|e| {
        GcmsealError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::InvalidInput,
            "password is not valid UTF-8",
            e,
        )
    })?;
    Ok(password.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_reader() {
        let mut reader = ConstantPassphraseReader::new("test123");
        assert_eq!(&*reader.read_passphrase().unwrap(), b"test123");
        assert_eq!(&*reader.read_passphrase().unwrap(), b"test123");
    }

    /// Tests the terminal reader. This is ignored by default and must be run
    /// explicitly and with human input:
    ///
    /// cargo test test_terminal_reader_interactive -- --ignored --nocapture
    #[test]
    #[ignore]
    fn test_terminal_reader_interactive() {
        let mut reader = TerminalPassphraseReader::new();
        println!("\nPlease enter a test password:");
        let passphrase = reader.read_passphrase().unwrap();
        assert!(!passphrase.is_empty(), "Expected non-empty password");
    }

    #[test]
    fn test_reader_passphrase_reader() {
        let data = b"mypassword\n";
        let mut reader = ReaderPassphraseReader::new(Box::new(&data[..]));
        assert_eq!(&*reader.read_passphrase().unwrap(), b"mypassword\n");
    }

    #[test]
    fn test_reader_passphrase_reader_empty() {
        let data = b"";
        let mut reader = ReaderPassphraseReader::new(Box::new(&data[..]));
        assert_eq!(&*reader.read_passphrase().unwrap(), b"");
    }

    #[test]
    fn test_decode_password_trims() {
        assert_eq!(decode_password(b"  secret pass \r\n").unwrap(), "secret pass");
        assert_eq!(decode_password("пароль\n".as_bytes()).unwrap(), "пароль");
        assert_eq!(decode_password(b" \n").unwrap(), "");
    }

    #[test]
    fn test_decode_password_non_utf8() {
        let err = decode_password(&[0xff, 0xfe, 0x00]).expect_err("expected invalid input");
        assert_eq!(err.kind, Some(ErrorKind::InvalidInput));
    }
}
