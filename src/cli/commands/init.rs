//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "warden.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Warden configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set WARDEN_SECRET in your environment or a .env file");
                println!("     (a 32-byte base64 or hex key, or a passphrase of 8+ characters)");
                println!("  3. Validate configuration: warden validate-config");
                println!("  4. Scan a dataset: warden scan <dataset>");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Warden Configuration File

[application]
log_level = "info"

[detection]
min_confidence = 0.7
sample_size = 1000

[k_anonymity]
threshold = 5
apply_suppression = true

[pseudonymization]
secret = "${WARDEN_SECRET}"
deterministic = true

[quality]
min_quality_score = 0.8

[audit]
enabled = true
log_path = "./audit/warden-audit.jsonl"

[storage]
data_dir = "./data"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Warden Configuration File
#
# This file contains all configuration options with examples and explanations.
# Any value can be overridden with WARDEN_<SECTION>_<KEY>, for example
# WARDEN_K_ANONYMITY_THRESHOLD=10.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# PII Detection
# ============================================================================
[detection]
# Minimum confidence (0.0 - 1.0) for a column classification to be reported
min_confidence = 0.7

# Rows sampled per scan; larger datasets are sampled uniformly
sample_size = 1000

# Optional: replace the built-in detectors with your own [[detector]] table
# pattern_library = "./patterns/custom_patterns.toml"

# ============================================================================
# K-Anonymity
# ============================================================================
[k_anonymity]
# Every quasi-identifier combination must be shared by at least this many rows
threshold = 5

# Drop rows in undersized groups when generalization is not enough
apply_suppression = true

# ============================================================================
# Pseudonymization
# ============================================================================
[pseudonymization]
# Main secret (use an environment variable). Accepted forms:
#   - 32 bytes, base64 encoded
#   - 32 bytes, hex encoded (64 characters)
#   - a passphrase of at least 8 characters (stretched with PBKDF2)
secret = "${WARDEN_SECRET}"

# Deterministic tokens are stable and joinable across datasets;
# random tokens are unlinkable. Both can be reversed with the secret.
deterministic = true

# Maximum value/token pairs kept in memory
cache_capacity = 100000

# ============================================================================
# Data Quality
# ============================================================================
[quality]
# Minimum share of passing rules (0.0 - 1.0)
min_quality_score = 0.8

# ============================================================================
# Audit Trail
# ============================================================================
[audit]
# Record every access, detection and transformation
enabled = true

# Append-only JSON lines file
log_path = "./audit/warden-audit.jsonl"

# Actor recorded on each event
actor = "warden"

# ============================================================================
# Dataset Storage
# ============================================================================
[storage]
# Directory holding <dataset>.json files
data_dir = "./data"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON log files
local_enabled = false

# Local log directory
local_path = "./logs"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}
