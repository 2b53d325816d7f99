//! Scan command implementation
//!
//! Reports the PII found in a dataset without changing it.

use super::{load_config_or_report, open_ledger};
use crate::adapters::{BatchSource, JsonFileStore};
use crate::anonymization::audit::{AuditEvent, EventLedger};
use crate::anonymization::ComplianceEngine;
use clap::Args;

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Dataset name under the data directory
    pub dataset: String,

    /// Rows sampled per column (overrides detection.sample_size)
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Exit with code 1 when PII is found
    #[arg(long)]
    pub fail_on_pii: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ScanArgs {
    /// Execute the scan command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let Some(mut config) = load_config_or_report(config_path) else {
            return Ok(2);
        };
        if let Some(sample_size) = self.sample_size {
            if sample_size == 0 {
                eprintln!("❌ --sample-size must be > 0");
                return Ok(2);
            }
            config.detection.sample_size = sample_size;
        }

        tracing::info!(dataset = %self.dataset, "Scanning dataset for PII");

        let store = JsonFileStore::new(&config.storage.data_dir);
        let batch = store.read(&self.dataset, None).await?;
        let engine = ComplianceEngine::new(&config)?;
        let mut ledger = open_ledger(&config)?;

        ledger.append(AuditEvent::data_access(
            &self.dataset,
            &config.audit.actor,
            batch.num_rows(),
            &batch.column_names(),
        ))?;
        let report = engine.scan(&batch, &self.dataset, &mut ledger)?;
        ledger.flush()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("🔍 Scanned {} ({} rows)", self.dataset, batch.num_rows());
            println!();
            println!("{}", report.summary());
        }

        if self.fail_on_pii && report.has_pii() {
            return Ok(1);
        }
        Ok(0)
    }
}
