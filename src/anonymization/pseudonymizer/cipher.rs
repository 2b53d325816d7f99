//! AES-256-GCM token cipher
//!
//! Tokens are URL-safe base64 (no padding) of
//! `version || nonce (12 bytes) || ciphertext || tag (16 bytes)`.
//! Random tokens use a fresh nonce per call. Deterministic tokens use a
//! synthetic nonce taken from HMAC-SHA256 over the value, so the same value
//! always yields the same token and the main key still decrypts it.

use super::key::{MainKey, KEY_LEN};
use crate::domain::PseudonymizationError;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

const VERSION_RANDOM: u8 = 0x01;
const VERSION_DETERMINISTIC: u8 = 0x02;
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const NONCE_KEY_LABEL: &[u8] = b"warden.pseudonymization.nonce";

pub(crate) struct TokenCipher {
    cipher: Aes256Gcm,
    nonce_key: Zeroizing<[u8; KEY_LEN]>,
}

impl TokenCipher {
    pub(crate) fn new(key: &MainKey) -> Result<Self, PseudonymizationError> {
        let cipher = Aes256Gcm::new_from_slice(&key[..])
            .map_err(|e| PseudonymizationError::KeyFormat(e.to_string()))?;

        let mut mac = <HmacSha256 as Mac>::new_from_slice(&key[..])
            .map_err(|e| PseudonymizationError::KeyFormat(e.to_string()))?;
        mac.update(NONCE_KEY_LABEL);
        let mut nonce_key = Zeroizing::new([0u8; KEY_LEN]);
        nonce_key.copy_from_slice(&mac.finalize().into_bytes());

        Ok(Self { cipher, nonce_key })
    }

    /// Encrypt under a fresh random nonce
    pub(crate) fn encrypt_random(&self, plaintext: &str) -> Result<String, PseudonymizationError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        self.seal(VERSION_RANDOM, &nonce, plaintext)
    }

    /// Encrypt under a nonce derived from the plaintext
    pub(crate) fn encrypt_deterministic(
        &self,
        plaintext: &str,
    ) -> Result<String, PseudonymizationError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.nonce_key[..])
            .map_err(|e| PseudonymizationError::Encryption(e.to_string()))?;
        mac.update(plaintext.as_bytes());
        let digest = mac.finalize().into_bytes();
        let nonce = Nonce::clone_from_slice(&digest[..NONCE_LEN]);
        self.seal(VERSION_DETERMINISTIC, &nonce, plaintext)
    }

    fn seal(
        &self,
        version: u8,
        nonce: &Nonce<<Aes256Gcm as AeadCore>::NonceSize>,
        plaintext: &str,
    ) -> Result<String, PseudonymizationError> {
        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| PseudonymizationError::Encryption(e.to_string()))?;

        let mut token = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
        token.push(version);
        token.extend_from_slice(nonce);
        token.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(token))
    }

    /// Decrypt a token produced by either encrypt method
    ///
    /// Returns `None` when the token is malformed or was sealed under another key.
    pub(crate) fn decrypt(&self, token: &str) -> Option<String> {
        let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
        if bytes.len() < 1 + NONCE_LEN + TAG_LEN {
            return None;
        }
        if bytes[0] != VERSION_RANDOM && bytes[0] != VERSION_DETERMINISTIC {
            return None;
        }

        let nonce = Nonce::from_slice(&bytes[1..1 + NONCE_LEN]);
        let plaintext = self.cipher.decrypt(nonce, &bytes[1 + NONCE_LEN..]).ok()?;
        String::from_utf8(plaintext).ok()
    }
}
