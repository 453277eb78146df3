//! Password-based authenticated encryption using PBKDF2 + AES-256-GCM
//!
//! Every call to [`encrypt`] draws a fresh random salt and nonce, derives a
//! key from the password with [`crate::kdf::derive_key`] and seals the
//! plaintext with AES-256-GCM. No associated data is authenticated.
//!
//! The binary format is:
//! - salt: 16 bytes
//! - nonce: 12 bytes
//! - ciphertext: same length as the plaintext
//! - tag: 16 bytes (GCM authentication tag)
//!
//! There is no header, version marker or length field; the envelope is
//! self-delimiting only as a whole.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::{ErrorCategory, ErrorKind, GcmsealError, Result};
use crate::kdf::{self, SALT_LEN};

/// Length of nonce in bytes
pub const NONCE_LEN: usize = 12;

/// Length of the GCM authentication tag in bytes
pub const TAG_LEN: usize = 16;

/// Smallest possible envelope: the encryption of an empty plaintext.
pub const MIN_ENVELOPE_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

const AUTH_FAILED_MSG: &str = "decryption failed - wrong password or corrupted data";

/// Size of the envelope produced for a plaintext of `plaintext_len` bytes.
pub const fn envelope_len(plaintext_len: usize) -> usize {
    MIN_ENVELOPE_LEN + plaintext_len
}

/// A read-only view of the components of an envelope.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    salt: &'a [u8; SALT_LEN],
    nonce: &'a [u8; NONCE_LEN],
    sealed: &'a [u8],
    ciphertext: &'a [u8],
    tag: &'a [u8; TAG_LEN],
}

impl<'a> Envelope<'a> {
    /// Split `bytes` into salt, nonce, ciphertext and tag without copying.
    ///
    /// Fails with [`ErrorKind::MalformedEnvelope`] if `bytes` is shorter than
    /// [`MIN_ENVELOPE_LEN`]. Nothing is authenticated at this point.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        if bytes.len() < MIN_ENVELOPE_LEN {
            return Err(GcmsealError::with_kind(
                ErrorCategory::User,
                ErrorKind::MalformedEnvelope,
                format!(
                    "encrypted data is too short ({} bytes, need at least {})",
                    bytes.len(),
                    MIN_ENVELOPE_LEN
                ),
            ));
        }

        let (salt, rest) = bytes
            .split_first_chunk::<SALT_LEN>()
            .ok_or_else(|| invariant("failed to read salt"))?;
        let (nonce, sealed) = rest
            .split_first_chunk::<NONCE_LEN>()
            .ok_or_else(|| invariant("failed to read nonce"))?;
        let (ciphertext, tag) = sealed
            .split_last_chunk::<TAG_LEN>()
            .ok_or_else(|| invariant("failed to read tag"))?;

        Ok(Self {
            salt,
            nonce,
            sealed,
            ciphertext,
            tag,
        })
    }

    /// The 16-byte PBKDF2 salt.
    pub fn salt(&self) -> &'a [u8; SALT_LEN] {
        self.salt
    }

    /// The 12-byte GCM nonce.
    pub fn nonce(&self) -> &'a [u8; NONCE_LEN] {
        self.nonce
    }

    /// Ciphertext followed by the tag, as consumed by AES-GCM.
    pub fn sealed(&self) -> &'a [u8] {
        self.sealed
    }

    /// Ciphertext without the tag; as long as the plaintext.
    pub fn ciphertext(&self) -> &'a [u8] {
        self.ciphertext
    }

    /// The 16-byte GCM authentication tag.
    pub fn tag(&self) -> &'a [u8; TAG_LEN] {
        self.tag
    }
}

/// Encrypt plaintext with a password using random salt and nonce
///
/// Returns the binary format: salt(16) + nonce(12) + ciphertext + tag(16)
pub fn encrypt(plaintext: &[u8], password: &str) -> Result<Vec<u8>> {
    check_password(password)?;

    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    encrypt_deterministic(plaintext, password, &salt, &nonce)
}

/// Encrypt plaintext with a password using provided salt and nonce
///
/// This function is ONLY for testing purposes to generate deterministic output.
/// NEVER use this in production - always use `encrypt()` which generates random salt/nonce.
pub fn encrypt_deterministic(
    plaintext: &[u8],
    password: &str,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>> {
    check_password(password)?;

    let key = kdf::derive_key(password.as_bytes(), salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));

    let sealed = cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| {
            GcmsealError::with_kind(
                ErrorCategory::Internal,
                ErrorKind::CipherFailure,
                "encryption failed",
            )
        })?;

    let mut output = Vec::with_capacity(SALT_LEN + NONCE_LEN + sealed.len());
    output.extend_from_slice(salt);
    output.extend_from_slice(nonce);
    output.extend_from_slice(&sealed);

    Ok(output)
}

/// Decrypt an envelope with a password
///
/// A wrong password and a corrupted or tampered-with envelope both fail
/// with [`ErrorKind::AuthenticationFailed`].
pub fn decrypt(envelope: &[u8], password: &str) -> Result<Vec<u8>> {
    check_password(password)?;

    let envelope = Envelope::parse(envelope)?;

    let key = kdf::derive_key(password.as_bytes(), envelope.salt());
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_slice()));

    let plaintext = cipher
        .decrypt(Nonce::from_slice(envelope.nonce()), envelope.sealed())
        .map_err(|_| {
            GcmsealError::with_kind(
                ErrorCategory::User,
                ErrorKind::AuthenticationFailed,
                AUTH_FAILED_MSG,
            )
        })?;

    Ok(plaintext)
}

fn check_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(GcmsealError::with_kind(
            ErrorCategory::User,
            ErrorKind::InvalidInput,
            "password cannot be empty",
        ));
    }
    Ok(())
}

fn invariant(msg: &str) -> GcmsealError {
    GcmsealError::with_kind(ErrorCategory::Internal, ErrorKind::InternalInvariant, msg)
}
