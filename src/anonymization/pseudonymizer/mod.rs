//! Reversible pseudonymization
//!
//! Values are replaced by AES-256-GCM tokens under a main key prepared from
//! the configured secret (see [`prepare_key`]). Deterministic tokens are
//! stable for a given key, so they can join across datasets; random tokens
//! are unlinkable. Both kinds are reversed with the same key.
//!
//! # Example
//!
//! ```rust
//! use warden::anonymization::pseudonymizer::Pseudonymizer;
//! use warden::config::secret_string;
//!
//! # fn example() -> warden::domain::Result<()> {
//! let mut p = Pseudonymizer::new(&secret_string("a long enough passphrase".to_string()))?;
//! let token = p.pseudonymize("ana@example.com", true)?;
//! assert_eq!(p.pseudonymize("ana@example.com", true)?, token);
//! assert_eq!(p.depseudonymize(&token)?, "ana@example.com");
//! # Ok(())
//! # }
//! ```

mod cipher;
pub mod column;
pub mod key;
pub mod store;

use crate::config::SecretString;
use crate::domain::{PseudonymizationError, Result};
use cipher::TokenCipher;
use secrecy::ExposeSecret;

pub use column::ReversalFailure;
pub use key::{prepare_key, MainKey, KEY_LEN, PBKDF2_ITERATIONS};
pub use store::{LruPseudonymStore, PseudonymStore, DEFAULT_CACHE_CAPACITY};

/// Pseudonymizer bound to one main key
///
/// Methods take `&mut self` because the pseudonym store is updated on
/// lookups; share an instance across threads behind a mutex.
pub struct Pseudonymizer {
    cipher: TokenCipher,
    store: Box<dyn PseudonymStore>,
}

impl std::fmt::Debug for Pseudonymizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pseudonymizer")
            .field("key", &"[REDACTED]")
            .field("stored_pairs", &self.store.len())
            .finish()
    }
}

impl Pseudonymizer {
    /// Create a pseudonymizer with the default bounded store
    ///
    /// Fails with [`PseudonymizationError::KeyFormat`] when the secret is not
    /// an accepted key form.
    pub fn new(secret: &SecretString) -> Result<Self> {
        Self::with_store(secret, Box::new(LruPseudonymStore::default()))
    }

    /// Create a pseudonymizer with a caller-supplied store
    pub fn with_store(secret: &SecretString, store: Box<dyn PseudonymStore>) -> Result<Self> {
        let key = prepare_key(secret.expose_secret().as_ref())?;
        Self::from_key(&key, store).map_err(Into::into)
    }

    /// Create a pseudonymizer from prepared key bytes
    pub fn from_key(
        key: &MainKey,
        store: Box<dyn PseudonymStore>,
    ) -> std::result::Result<Self, PseudonymizationError> {
        Ok(Self {
            cipher: TokenCipher::new(key)?,
            store,
        })
    }

    /// Replace `value` with a token
    ///
    /// Deterministic tokens are looked up in the store first and recorded
    /// there; random tokens are never stored. The empty string maps to itself.
    pub fn pseudonymize(&mut self, value: &str, deterministic: bool) -> Result<String> {
        if value.is_empty() {
            return Ok(String::new());
        }

        if !deterministic {
            return Ok(self.cipher.encrypt_random(value)?);
        }

        if let Some(token) = self.store.get(value) {
            return Ok(token);
        }
        let token = self.cipher.encrypt_deterministic(value)?;
        self.store.insert(value.to_string(), token.clone());
        Ok(token)
    }

    /// Recover the original value of `token`
    ///
    /// Tries the main key, then the store. Fails with
    /// [`PseudonymizationError::Reversal`] when neither knows the token.
    pub fn depseudonymize(&self, token: &str) -> Result<String> {
        if token.is_empty() {
            return Ok(String::new());
        }

        if let Some(original) = self.cipher.decrypt(token) {
            return Ok(original);
        }
        if let Some(original) = self.store.reverse(token) {
            tracing::debug!("Token reversed through pseudonym store");
            return Ok(original);
        }

        Err(PseudonymizationError::Reversal {
            token: token.to_string(),
        }
        .into())
    }

    /// Number of value ↔ token pairs currently stored
    pub fn stored_pairs(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::WardenError;

    fn pseudonymizer() -> Pseudonymizer {
        Pseudonymizer::new(&secret_string("a long enough passphrase".to_string())).unwrap()
    }

    #[test]
    fn test_deterministic_is_idempotent() {
        let mut p = pseudonymizer();
        let a = p.pseudonymize("ana@example.com", true).unwrap();
        let b = p.pseudonymize("ana@example.com", true).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, "ana@example.com");
        assert_eq!(p.stored_pairs(), 1);
    }

    #[test]
    fn test_deterministic_stable_across_instances() {
        let a = pseudonymizer().pseudonymize("4111 1111 1111 1111", true).unwrap();
        let b = pseudonymizer().pseudonymize("4111 1111 1111 1111", true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_tokens_differ_and_round_trip() {
        let mut p = pseudonymizer();
        let a = p.pseudonymize("ana@example.com", false).unwrap();
        let b = p.pseudonymize("ana@example.com", false).unwrap();
        assert_ne!(a, b);
        assert_eq!(p.stored_pairs(), 0);
        assert_eq!(p.depseudonymize(&a).unwrap(), "ana@example.com");
        assert_eq!(p.depseudonymize(&b).unwrap(), "ana@example.com");
    }

    #[test]
    fn test_deterministic_round_trip_with_fresh_instance() {
        let token = pseudonymizer().pseudonymize("Kari Nordmann", true).unwrap();
        assert_eq!(pseudonymizer().depseudonymize(&token).unwrap(), "Kari Nordmann");
    }

    #[test]
    fn test_store_fallback_for_foreign_tokens() {
        let mut store = LruPseudonymStore::new(8);
        store.insert("legacy value".to_string(), "LEGACY-0001".to_string());
        let p = Pseudonymizer::with_store(
            &secret_string("a long enough passphrase".to_string()),
            Box::new(store),
        )
        .unwrap();
        assert_eq!(p.depseudonymize("LEGACY-0001").unwrap(), "legacy value");
    }

    #[test]
    fn test_unknown_token_fails() {
        let err = pseudonymizer().depseudonymize("bm90LWEtdG9rZW4").unwrap_err();
        assert!(matches!(
            err,
            WardenError::Pseudonymization(PseudonymizationError::Reversal { .. })
        ));
        assert!(err.to_string().contains("bm90LWEtdG9rZW4"));
    }

    #[test]
    fn test_empty_string_maps_to_itself() {
        let mut p = pseudonymizer();
        assert_eq!(p.pseudonymize("", true).unwrap(), "");
        assert_eq!(p.pseudonymize("", false).unwrap(), "");
    }

    #[test]
    fn test_bad_secret_rejected() {
        let err = Pseudonymizer::new(&secret_string("short".to_string())).unwrap_err();
        assert!(matches!(
            err,
            WardenError::Pseudonymization(PseudonymizationError::KeyFormat(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", pseudonymizer());
        assert!(rendered.contains("[REDACTED]"));
    }
}
