//! File encryption/decryption operations
//!
//! An encrypted file holds exactly one envelope and nothing else: no
//! header, no armor. Every output is written to a tempfile next to its
//! target, synced and renamed into place, so the target either keeps its
//! previous contents or holds the complete result.

use crate::envelope;
use crate::error::{ErrorCategory, ErrorKind, GcmsealError, Result};
use crate::passphrase::{PassphraseReader, decode_password};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Encrypt a file with a password
///
/// Reads plaintext from `input_path`, encrypts it using a password from
/// `passphrase_reader`, and writes the envelope to `output_path`.
///
/// The output file ends up with mode 0o600 (read/write for owner only) on Unix systems.
pub fn encrypt_file(
    input_path: &Path,
    output_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<()> {
    let plaintext = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let passphrase = passphrase_reader.read_passphrase()?;
    let password = decode_password(&passphrase)?;

    debug!(input = %input_path.display(), bytes = plaintext.len(), "encrypting file");
    let sealed =
        envelope::encrypt(&plaintext, password).map_err(|e| e.with_context("encryption failed"))?;

    write_file_atomic(output_path, &sealed)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;
    debug!(output = %output_path.display(), bytes = sealed.len(), "wrote envelope");

    Ok(())
}

/// Decrypt a file with a password
///
/// Reads an envelope from `input_path`, decrypts it using a password from
/// `passphrase_reader`, and writes the plaintext to `output_path`.
///
/// The output file ends up with mode 0o600 (read/write for owner only) on Unix systems.
pub fn decrypt_file(
    input_path: &Path,
    output_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<()> {
    let sealed = fs::read(input_path).map_err(|e| read_error(input_path, e))?;
    let passphrase = passphrase_reader.read_passphrase()?;
    let password = decode_password(&passphrase)?;

    debug!(input = %input_path.display(), bytes = sealed.len(), "decrypting file");
    let plaintext =
        envelope::decrypt(&sealed, password).map_err(|e| e.with_context("failed to decrypt"))?;

    write_file_atomic(output_path, &plaintext)
        .map_err(|e| e.with_context(format!("failed to write to {}", output_path.display())))?;
    debug!(output = %output_path.display(), bytes = plaintext.len(), "wrote plaintext");

    Ok(())
}

/// Update an encrypted file with new plaintext using the same password
///
/// This function:
/// 1. Decrypts the existing file at `crypt_path` to validate the password
/// 2. Reads new plaintext from `plain_path`
/// 3. Encrypts the new plaintext with the validated password
/// 4. Atomically writes to `crypt_path` (tempfile + fsync + rename)
///
/// Either the old file or the new file exists afterwards, never a partial one.
pub fn update_file(
    plain_path: &Path,
    crypt_path: &Path,
    passphrase_reader: &mut dyn PassphraseReader,
) -> Result<()> {
    let existing = fs::read(crypt_path).map_err(|e| read_error(crypt_path, e))?;
    let passphrase = passphrase_reader.read_passphrase()?;
    let password = decode_password(&passphrase)?;

    // Validate password by decrypting existing file (discard plaintext)
    envelope::decrypt(&existing, password).map_err(|e| e.with_context("failed to decrypt"))?;
    debug!(crypt = %crypt_path.display(), "password matches existing envelope");

    let new_plaintext = fs::read(plain_path).map_err(|e| read_error(plain_path, e))?;
    let sealed = envelope::encrypt(&new_plaintext, password)
        .map_err(|e| e.with_context("failed to encrypt"))?;

    write_file_atomic(crypt_path, &sealed)?;
    debug!(crypt = %crypt_path.display(), bytes = sealed.len(), "replaced envelope");

    Ok(())
}

/// Replace `path` with `contents` (tempfile in the same directory + fsync +
/// rename), mode 0o600 on Unix.
fn write_file_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        io_error(
            category_of(&e),
            format!("failed to create tempfile in {}", dir.display()),
            e,
        )
    })?;

    temp_file
        .write_all(contents)
        .map_err(|e| io_error(ErrorCategory::Internal, "failed to write to tempfile", e))?;
    // Flush and fsync() such that the rename later, if it succeeds, will
    // always point to a valid file.
    temp_file
        .flush()
        .map_err(|e| io_error(ErrorCategory::Internal, "failed to flush tempfile", e))?;
    temp_file.as_file().sync_all().map_err(|e| {
        io_error(
            ErrorCategory::Internal,
            "failed to sync file prior to rename",
            e,
        )
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp_file
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(|e| {
                io_error(
                    ErrorCategory::Internal,
                    "failed to set tempfile permissions",
                    e,
                )
            })?;
    }

    temp_file.persist(path).map_err(|e| {
        io_error(
            ErrorCategory::Internal,
            format!("failed to rename to target file {}", path.display()),
            e.error,
        )
    })?;

    Ok(())
}

fn category_of(err: &io::Error) -> ErrorCategory {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => ErrorCategory::User,
        _ => ErrorCategory::Internal,
    }
}

fn read_error(path: &Path, err: io::Error) -> GcmsealError {
    io_error(
        category_of(&err),
        format!("failed to read from {}", path.display()),
        err,
    )
}

fn io_error(category: ErrorCategory, msg: impl Into<String>, err: io::Error) -> GcmsealError {
    GcmsealError::with_kind_and_source(category, ErrorKind::Io, msg, err)
}
