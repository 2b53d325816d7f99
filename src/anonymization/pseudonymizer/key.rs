//! Key preparation for the pseudonymizer
//!
//! A secret is accepted in one of three forms, tried in order:
//!
//! 1. Base64 in either the standard or URL-safe alphabet, padded or not,
//!    decoding to exactly 32 bytes
//! 2. 64 hex characters
//! 3. A passphrase of at least 8 characters, stretched with PBKDF2-HMAC-SHA256

use crate::domain::PseudonymizationError;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use sha2::Sha256;
use zeroize::Zeroizing;

/// Length of the main key in bytes
pub const KEY_LEN: usize = 32;

/// PBKDF2 rounds for passphrase secrets
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Shortest accepted passphrase, in characters
pub const MIN_PASSPHRASE_LEN: usize = 8;

const KEY_SALT: &[u8] = b"warden.pseudonymization.v1";

/// Main key bytes, zeroed on drop
pub type MainKey = Zeroizing<[u8; KEY_LEN]>;

/// Turn a configured secret into a 32-byte key
pub fn prepare_key(secret: &str) -> Result<MainKey, PseudonymizationError> {
    if secret.is_empty() {
        return Err(PseudonymizationError::KeyFormat(
            "secret is empty".to_string(),
        ));
    }

    if let Some(key) = decode_base64(secret) {
        tracing::debug!("Pseudonymization key decoded from base64");
        return Ok(key);
    }

    if let Some(key) = decode_hex(secret) {
        tracing::debug!("Pseudonymization key decoded from hex");
        return Ok(key);
    }

    if secret.chars().count() < MIN_PASSPHRASE_LEN {
        return Err(PseudonymizationError::KeyFormat(format!(
            "secret is neither a 32-byte base64 or hex key nor a passphrase of at least {} characters",
            MIN_PASSPHRASE_LEN
        )));
    }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(secret.as_bytes(), KEY_SALT, PBKDF2_ITERATIONS, &mut key[..]);
    tracing::debug!(
        iterations = PBKDF2_ITERATIONS,
        "Pseudonymization key derived from passphrase"
    );
    Ok(key)
}

fn decode_base64(secret: &str) -> Option<MainKey> {
    let bytes = Zeroizing::new(
        URL_SAFE
            .decode(secret)
            .or_else(|_| URL_SAFE_NO_PAD.decode(secret))
            .or_else(|_| STANDARD.decode(secret))
            .or_else(|_| STANDARD_NO_PAD.decode(secret))
            .ok()?,
    );
    to_key(&bytes)
}

fn decode_hex(secret: &str) -> Option<MainKey> {
    if secret.len() != KEY_LEN * 2 {
        return None;
    }
    let bytes = Zeroizing::new(hex::decode(secret).ok()?);
    to_key(&bytes)
}

fn to_key(bytes: &[u8]) -> Option<MainKey> {
    if bytes.len() != KEY_LEN {
        return None;
    }
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    key.copy_from_slice(bytes);
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_key() {
        let raw = [7u8; KEY_LEN];
        let padded = URL_SAFE.encode(raw);
        let unpadded = URL_SAFE_NO_PAD.encode(raw);

        assert_eq!(*prepare_key(&padded).unwrap(), raw);
        assert_eq!(*prepare_key(&unpadded).unwrap(), raw);
    }

    #[test]
    fn test_standard_alphabet_base64_key() {
        // 0xFB bytes encode with '+' and '/' in the standard alphabet
        let raw = [0xFBu8; KEY_LEN];
        let padded = STANDARD.encode(raw);
        let unpadded = STANDARD_NO_PAD.encode(raw);
        assert!(padded.contains('+') || padded.contains('/'));

        assert_eq!(*prepare_key(&padded).unwrap(), raw);
        assert_eq!(*prepare_key(&unpadded).unwrap(), raw);
    }

    #[test]
    fn test_hex_key() {
        let raw = [0xABu8; KEY_LEN];
        assert_eq!(*prepare_key(&hex::encode(raw)).unwrap(), raw);
    }

    #[test]
    fn test_passphrase_is_stable() {
        let a = prepare_key("correct horse battery staple").unwrap();
        let b = prepare_key("correct horse battery staple").unwrap();
        let c = prepare_key("correct horse battery stapler").unwrap();
        assert_eq!(*a, *b);
        assert_ne!(*a, *c);
    }

    #[test]
    fn test_rejects_empty_and_short() {
        assert!(matches!(
            prepare_key(""),
            Err(PseudonymizationError::KeyFormat(_))
        ));
        assert!(matches!(
            prepare_key("short"),
            Err(PseudonymizationError::KeyFormat(_))
        ));
    }

    #[test]
    fn test_wrong_length_base64_falls_through_to_passphrase() {
        // 16 bytes of base64 is long enough to be a passphrase
        let secret = URL_SAFE.encode([1u8; 16]);
        let key = prepare_key(&secret).unwrap();
        assert_ne!(&key[..16], &[1u8; 16]);
    }
}
