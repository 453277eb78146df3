//! Password-based key derivation
//!
//! Keys are derived with PBKDF2 using HMAC-SHA256 as the PRF. The work
//! factor is fixed: every envelope ever produced was sealed under exactly
//! these parameters, so changing them breaks decryption of existing data.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

/// Length of salt in bytes
pub const SALT_LEN: usize = 16;

/// Length of derived key in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// PBKDF2 iteration count
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// A derived key. The buffer is zeroed when dropped.
pub type DerivedKey = Zeroizing<[u8; KEY_LEN]>;

/// Derive a 32-byte key from a password and salt using PBKDF2-HMAC-SHA256.
///
/// Deterministic: the same password and salt always yield the same key.
pub fn derive_key(password: &[u8], salt: &[u8; SALT_LEN]) -> DerivedKey {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, key.as_mut_slice());
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_key() {
        let key = derive_key(b"password", b"0123456789abcdef");

        #[rustfmt::skip]
        let expected: [u8; KEY_LEN] = [
            0xa7, 0x51, 0x90, 0xa7, 0x92, 0xcd, 0x59, 0xd6,
            0xd9, 0xc8, 0xc3, 0xa6, 0x3b, 0x11, 0xc2, 0x76,
            0xad, 0x44, 0x99, 0x72, 0xb7, 0x88, 0x6e, 0x1c,
            0x2d, 0x81, 0x9c, 0x28, 0x60, 0x53, 0x36, 0x6f,
        ];

        assert_eq!(*key, expected);
    }

    #[test]
    fn test_utf8_password_bytes() {
        let key = derive_key("пароль".as_bytes(), &[0x11u8; SALT_LEN]);

        #[rustfmt::skip]
        let expected: [u8; KEY_LEN] = [
            0xba, 0xde, 0xbd, 0xbc, 0x8c, 0x62, 0xf5, 0x26,
            0xb1, 0xf3, 0x73, 0x00, 0x44, 0x28, 0x7f, 0x39,
            0x11, 0x0d, 0x06, 0x2d, 0xb3, 0x7d, 0xaa, 0x60,
            0x95, 0xbf, 0xb9, 0xc3, 0xb3, 0x07, 0xfa, 0xf2,
        ];

        assert_eq!(*key, expected);
    }

    #[test]
    fn test_deterministic() {
        let salt = [7u8; SALT_LEN];
        assert_eq!(*derive_key(b"pw", &salt), *derive_key(b"pw", &salt));
    }

    #[test]
    fn test_salt_changes_key() {
        let k1 = derive_key(b"pw", &[1u8; SALT_LEN]);
        let k2 = derive_key(b"pw", &[2u8; SALT_LEN]);
        assert_ne!(*k1, *k2);
    }

    #[test]
    fn test_no_unicode_normalization() {
        // "é" precomposed vs. "e" + combining acute accent
        let salt = [3u8; SALT_LEN];
        let nfc = derive_key("caf\u{e9}".as_bytes(), &salt);
        let nfd = derive_key("cafe\u{301}".as_bytes(), &salt);
        assert_ne!(*nfc, *nfd);
    }
}
