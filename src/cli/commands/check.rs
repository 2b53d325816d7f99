//! Check command implementation
//!
//! Measures k-anonymity over declared quasi-identifiers.

use super::load_config_or_report;
use crate::adapters::{BatchSource, JsonFileStore};
use crate::anonymization::k_anonymity::KAnonymityChecker;
use clap::Args;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Dataset name under the data directory
    pub dataset: String,

    /// Quasi-identifier columns (comma-separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub quasi_identifiers: Vec<String>,

    /// Minimum group size (overrides k_anonymity.threshold)
    #[arg(short = 'k', long)]
    pub threshold: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    /// Execute the check command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let Some(config) = load_config_or_report(config_path) else {
            return Ok(2);
        };
        let threshold = self.threshold.unwrap_or(config.k_anonymity.threshold);
        if threshold == 0 {
            eprintln!("❌ --threshold must be >= 1");
            return Ok(2);
        }

        let store = JsonFileStore::new(&config.storage.data_dir);
        let batch = store.read(&self.dataset, None).await?;
        let result = KAnonymityChecker::new(threshold).check(&batch, &self.quasi_identifiers);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            let status = if result.compliant { "✅" } else { "❌" };
            println!(
                "{status} {}: k = {} (threshold {}) over [{}]",
                self.dataset,
                result.k,
                result.threshold,
                self.quasi_identifiers.join(", ")
            );
            for group in &result.vulnerable_groups {
                let values: Vec<String> = group
                    .values
                    .iter()
                    .map(|(column, value)| format!("{column}={value}"))
                    .collect();
                println!("   {} rows: {}", group.count, values.join(", "));
            }
            for recommendation in &result.recommendations {
                println!("   • {recommendation}");
            }
        }

        Ok(if result.compliant { 0 } else { 1 })
    }
}
