//! Secure handling of the pseudonymization secret
//!
//! The configured secret is held in a `secrecy` container so it is zeroed on
//! drop, redacted from `Debug` output, and only readable through an explicit
//! `expose_secret()` call.
//!
//! # Example
//!
//! ```rust
//! use warden::config::{SecretString, SecretValue};
//! use secrecy::{Secret, ExposeSecret};
//!
//! let secret: SecretString = Secret::new(SecretValue::from("my-passphrase".to_string()));
//! let raw: &str = secret.expose_secret().as_ref();
//! assert_eq!(raw, "my-passphrase");
//!
//! // Debug output is redacted
//! assert!(!format!("{:?}", secret).contains("my-passphrase"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
pub type SecretString = Secret<SecretValue>;

/// Helper function to create a SecretString from a String
///
/// # Example
///
/// ```rust
/// use warden::config::secret_string;
///
/// let secret = secret_string("my-passphrase".to_string());
/// ```
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}
