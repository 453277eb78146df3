//! Golden test vector validation
//!
//! The vectors in testdata/golden-vectors.json were produced by an
//! independent PBKDF2-HMAC-SHA256 + AES-256-GCM implementation.

use gcmseal::ErrorKind;
use gcmseal::envelope::{self, Envelope, NONCE_LEN};
use gcmseal::hexarmor;
use gcmseal::kdf::SALT_LEN;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GoldenVector {
    plaintext: String,
    password: String,
    salt: String,
    nonce: String,
    envelope: String,
    comment: String,
}

fn load_golden_vectors() -> Vec<GoldenVector> {
    let json_data = include_str!("../testdata/golden-vectors.json");
    serde_json::from_str(json_data).expect("failed to parse golden vectors")
}

#[test]
fn test_golden_vectors_encrypt() {
    let vectors = load_golden_vectors();
    assert!(!vectors.is_empty(), "No golden vectors were tested");

    for (i, vector) in vectors.iter().enumerate() {
        let plaintext = hexarmor::unwrap(&vector.plaintext).expect("failed to decode plaintext");
        let salt: [u8; SALT_LEN] = hexarmor::unwrap(&vector.salt)
            .expect("failed to decode salt")
            .try_into()
            .expect("salt must be 16 bytes");
        let nonce: [u8; NONCE_LEN] = hexarmor::unwrap(&vector.nonce)
            .expect("failed to decode nonce")
            .try_into()
            .expect("nonce must be 12 bytes");

        let sealed =
            envelope::encrypt_deterministic(&plaintext, &vector.password, &salt, &nonce).unwrap();

        assert_eq!(
            hexarmor::wrap(&sealed),
            vector.envelope,
            "vector {} ({}): envelope mismatch",
            i,
            vector.comment
        );
        assert_eq!(sealed.len(), envelope::envelope_len(plaintext.len()));
    }
}

#[test]
fn test_golden_vectors_decrypt() {
    for (i, vector) in load_golden_vectors().iter().enumerate() {
        let expected = hexarmor::unwrap(&vector.plaintext).unwrap();
        let sealed = hexarmor::unwrap(&vector.envelope).unwrap();

        let parsed = Envelope::parse(&sealed).unwrap();
        assert_eq!(hexarmor::wrap(parsed.salt()), vector.salt, "vector {}", i);
        assert_eq!(hexarmor::wrap(parsed.nonce()), vector.nonce, "vector {}", i);

        let decrypted = envelope::decrypt(&sealed, &vector.password)
            .unwrap_or_else(|e| panic!("vector {} ({}): {}", i, vector.comment, e));
        assert_eq!(decrypted, expected, "vector {} ({})", i, vector.comment);
    }
}

#[test]
fn test_golden_vectors_reject_other_password() {
    for vector in load_golden_vectors() {
        let sealed = hexarmor::unwrap(&vector.envelope).unwrap();
        let wrong = format!("{}!", vector.password);

        let err = envelope::decrypt(&sealed, &wrong).unwrap_err();
        assert_eq!(err.kind, Some(ErrorKind::AuthenticationFailed), "{}", vector.comment);
    }
}
