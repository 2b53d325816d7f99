//! Configuration management for Warden.
//!
//! TOML configuration with `${VAR_NAME}` substitution, `WARDEN_<SECTION>_<KEY>`
//! environment overrides, defaults for every optional setting and
//! validation on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use warden::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("warden.toml")?;
//! println!("k threshold: {}", config.k_anonymity.threshold);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`DetectionConfig`] - confidence floor, sample size, pattern library
//! - [`KAnonymityConfig`] - threshold and suppression
//! - [`PseudonymizationConfig`] - secret, token mode, store capacity
//! - [`QualityConfig`] - acceptance score
//! - [`AuditConfig`] - ledger path and actor
//! - [`StorageConfig`] - dataset directory
//! - [`LoggingConfig`] - local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [k_anonymity]
//! threshold = 5
//!
//! [pseudonymization]
//! secret = "${WARDEN_SECRET}"
//! deterministic = true
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, AuditConfig, DetectionConfig, KAnonymityConfig, LoggingConfig,
    PseudonymizationConfig, QualityConfig, StorageConfig, WardenConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
