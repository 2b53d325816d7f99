//! Configuration schema types
//!
//! This module defines the configuration structure for Warden.

use crate::config::SecretString;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main Warden configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardenConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// PII detection settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// K-anonymity settings
    #[serde(default)]
    pub k_anonymity: KAnonymityConfig,

    /// Pseudonymization settings (the secret is required)
    pub pseudonymization: PseudonymizationConfig,

    /// Data-quality settings
    #[serde(default)]
    pub quality: QualityConfig,

    /// Audit trail settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Dataset storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WardenConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.detection.validate()?;
        self.k_anonymity.validate()?;
        self.pseudonymization.validate()?;
        self.quality.validate()?;
        self.audit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// PII detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Minimum confidence for a classification to be reported
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Rows sampled per scan
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Custom pattern library replacing the built-in detectors
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            sample_size: default_sample_size(),
            pattern_library: None,
        }
    }
}

impl DetectionConfig {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(format!(
                "detection.min_confidence must be within [0, 1], got {}",
                self.min_confidence
            ));
        }
        if self.sample_size == 0 {
            return Err("detection.sample_size must be > 0".to_string());
        }
        if let Some(ref path) = self.pattern_library {
            if path.extension().and_then(|s| s.to_str()) != Some("toml") {
                return Err(format!(
                    "Pattern library must be a TOML file: {}",
                    path.display()
                ));
            }
        }
        Ok(())
    }
}

/// K-anonymity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KAnonymityConfig {
    /// Minimum group size
    #[serde(default = "default_k_threshold")]
    pub threshold: usize,

    /// Drop undersized groups when generalization is not enough
    #[serde(default = "default_true")]
    pub apply_suppression: bool,
}

impl Default for KAnonymityConfig {
    fn default() -> Self {
        Self {
            threshold: default_k_threshold(),
            apply_suppression: true,
        }
    }
}

impl KAnonymityConfig {
    fn validate(&self) -> Result<(), String> {
        if self.threshold == 0 {
            return Err("k_anonymity.threshold must be >= 1".to_string());
        }
        Ok(())
    }
}

/// Pseudonymization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PseudonymizationConfig {
    /// Base64 key, hex key or passphrase
    /// Stored securely in memory and automatically zeroized on drop
    pub secret: SecretString,

    /// Produce stable, joinable tokens
    #[serde(default = "default_true")]
    pub deterministic: bool,

    /// Maximum value ↔ token pairs kept in memory
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl PseudonymizationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.secret.expose_secret().is_empty() {
            return Err("pseudonymization.secret must not be empty".to_string());
        }
        if self.cache_capacity == 0 {
            return Err("pseudonymization.cache_capacity must be > 0".to_string());
        }
        Ok(())
    }
}

/// Data-quality configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Minimum share of passing rules
    #[serde(default = "default_min_quality_score")]
    pub min_quality_score: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_quality_score: default_min_quality_score(),
        }
    }
}

impl QualityConfig {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.min_quality_score) {
            return Err(format!(
                "quality.min_quality_score must be within [0, 1], got {}",
                self.min_quality_score
            ));
        }
        Ok(())
    }
}

/// Audit trail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// JSON-lines ledger path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Actor recorded on every event
    #[serde(default = "default_actor")]
    pub actor: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_path: default_audit_log_path(),
            actor: default_actor(),
        }
    }
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err("audit.log_path must be set when audit is enabled".to_string());
        }
        if self.actor.trim().is_empty() {
            return Err("audit.actor must not be empty".to_string());
        }
        Ok(())
    }
}

/// Dataset storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `<dataset>.json` files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_min_confidence() -> f64 {
    0.7
}

fn default_sample_size() -> usize {
    1000
}

fn default_k_threshold() -> usize {
    5
}

fn default_cache_capacity() -> usize {
    100_000
}

fn default_min_quality_score() -> f64 {
    0.8
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/warden-audit.jsonl")
}

fn default_actor() -> String {
    "warden".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_detection_config_validation() {
        let mut config = DetectionConfig::default();
        assert!(config.validate().is_ok());

        config.min_confidence = 1.5;
        assert!(config.validate().is_err());

        config.min_confidence = 0.7;
        config.sample_size = 0;
        assert!(config.validate().is_err());

        config.sample_size = 10;
        config.pattern_library = Some(PathBuf::from("patterns.json"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_k_anonymity_threshold_must_be_positive() {
        let config = KAnonymityConfig {
            threshold: 0,
            apply_suppression: true,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pseudonymization_config_validation() {
        let mut config = PseudonymizationConfig {
            secret: secret_string("a long enough passphrase".to_string()),
            deterministic: true,
            cache_capacity: 10,
        };
        assert!(config.validate().is_ok());

        config.cache_capacity = 0;
        assert!(config.validate().is_err());

        config.cache_capacity = 10;
        config.secret = secret_string(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "size".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: WardenConfig = toml::from_str(
            r#"
[pseudonymization]
secret = "a long enough passphrase"
"#,
        )
        .unwrap();

        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.detection.sample_size, 1000);
        assert_eq!(config.k_anonymity.threshold, 5);
        assert!(config.pseudonymization.deterministic);
        assert_eq!(config.pseudonymization.cache_capacity, 100_000);
        assert!((config.quality.min_quality_score - 0.8).abs() < f64::EPSILON);
        assert!(config.audit.enabled);
        assert!(!config.logging.local_enabled);
        assert!(config.validate().is_ok());
    }
}
