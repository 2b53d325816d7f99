//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Warden configuration file.

use crate::anonymization::pseudonymizer::prepare_key;
use crate::config::load_config;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading also validates
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = prepare_key(config.pseudonymization.secret.expose_secret().as_ref()) {
            println!("❌ Pseudonymization secret is not usable");
            println!("   Error: {e}");
            return Ok(2);
        }

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Min Confidence: {}", config.detection.min_confidence);
        println!("  Sample Size: {}", config.detection.sample_size);
        match config.detection.pattern_library {
            Some(ref path) => println!("  Pattern Library: {}", path.display()),
            None => println!("  Pattern Library: built-in"),
        }
        println!("  K Threshold: {}", config.k_anonymity.threshold);
        println!("  Suppression: {}", config.k_anonymity.apply_suppression);
        println!(
            "  Token Mode: {}",
            if config.pseudonymization.deterministic {
                "deterministic"
            } else {
                "random"
            }
        );
        println!("  Min Quality Score: {}", config.quality.min_quality_score);
        if config.audit.enabled {
            println!("  Audit Log: {}", config.audit.log_path.display());
        } else {
            println!("  Audit Log: disabled");
        }
        println!("  Data Directory: {}", config.storage.data_dir.display());
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_reports_short_secret() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[pseudonymization]\nsecret = \"short\"\n").unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("does-not-exist-warden.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
