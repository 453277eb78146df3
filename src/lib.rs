//! gcmseal - Password-based encryption using PBKDF2-HMAC-SHA256 and AES-256-GCM
//!
//! The core is [`envelope::encrypt`] / [`envelope::decrypt`]: stateless,
//! free of I/O and safe to call from any number of threads at once. Key
//! derivation is CPU-bound by design, so interactive callers should run
//! these calls off their event loop.
//!
//! [`file_ops`] and [`text_ops`] are the caller layer: they obtain the
//! password, read and write files, and render envelopes as hex.

#![forbid(unsafe_code)]

pub mod envelope;
pub mod error;
pub mod file_ops;
pub mod hexarmor;
pub mod kdf;
pub mod passphrase;
pub mod text_ops;

pub use envelope::{decrypt, encrypt};
pub use error::{ErrorCategory, ErrorKind, GcmsealError, Result};
