//! Process command implementation
//!
//! Runs the compliance pipeline over a dataset and publishes the result.

use super::{load_config_or_report, open_ledger, parse_generalization};
use crate::adapters::{BatchSink, BatchSource, JsonFileStore, WriteMode};
use crate::anonymization::audit::{AuditEvent, EventLedger};
use crate::anonymization::k_anonymity::GeneralizationLevel;
use crate::anonymization::quality::rules_from_toml;
use crate::anonymization::{ComplianceEngine, ProcessRequest};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Source dataset name under the data directory
    pub dataset: String,

    /// Target dataset name
    #[arg(short, long)]
    pub output: String,

    /// Columns to pseudonymize (comma-separated); detected when omitted
    #[arg(long, value_delimiter = ',')]
    pub pii_columns: Option<Vec<String>>,

    /// Quasi-identifier columns for k-anonymity (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub quasi_identifiers: Vec<String>,

    /// Generalize a column before the k-anonymity check, e.g. `zip=medium`
    #[arg(long = "generalize", value_name = "COLUMN=LEVEL", value_parser = parse_generalization)]
    pub generalization: Vec<(String, GeneralizationLevel)>,

    /// Quality rules file (TOML, `[[rule]]` entries)
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Abort when an error-severity quality rule fails
    #[arg(long)]
    pub fail_on_quality: bool,

    /// Produce unlinkable random tokens instead of deterministic ones
    #[arg(long)]
    pub random_tokens: bool,

    /// How to write the target dataset (overwrite or append)
    #[arg(long, default_value = "overwrite")]
    pub mode: WriteMode,

    /// Run the pipeline without writing the target dataset
    #[arg(long)]
    pub dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ProcessArgs {
    /// Execute the process command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let Some(config) = load_config_or_report(config_path) else {
            return Ok(2);
        };

        let quality_rules = match self.rules {
            Some(ref path) => {
                let content = match std::fs::read_to_string(path) {
                    Ok(c) => c,
                    Err(e) => {
                        eprintln!("❌ Failed to read rules file {}: {e}", path.display());
                        return Ok(2);
                    }
                };
                match rules_from_toml(&content) {
                    Ok(rules) => rules,
                    Err(e) => {
                        eprintln!("❌ Invalid rules file {}: {e}", path.display());
                        return Ok(2);
                    }
                }
            }
            None => Vec::new(),
        };

        tracing::info!(
            source = %self.dataset,
            target = %self.output,
            dry_run = self.dry_run,
            "Starting process command"
        );

        let store = JsonFileStore::new(&config.storage.data_dir);
        let batch = store.read(&self.dataset, None).await?;
        let mut engine = ComplianceEngine::new(&config)?;
        let mut ledger = open_ledger(&config)?;

        let mut request = ProcessRequest::new(self.dataset.as_str())
            .quasi_identifiers(self.quasi_identifiers.iter().cloned())
            .quality_rules(quality_rules)
            .escalate_quality(self.fail_on_quality);
        if let Some(ref columns) = self.pii_columns {
            request = request.pii_columns(columns.iter().cloned());
        }
        for (column, level) in &self.generalization {
            request = request.generalize(column.as_str(), *level);
        }
        if self.random_tokens {
            request = request.deterministic(false);
        }

        let (published, mut report) = match engine.process(&batch, &request, &mut ledger) {
            Ok(out) => out,
            Err(crate::domain::WardenError::Quality(e)) => {
                println!("❌ {e}");
                return Ok(1);
            }
            Err(e) => return Err(e.into()),
        };

        if self.dry_run {
            println!("🧪 Dry run: {} not written", self.output);
        } else {
            store.write(&self.output, &published, self.mode).await?;
            ledger.append(AuditEvent::export(
                &self.output,
                &config.audit.actor,
                &store.location(&self.output),
                published.num_rows(),
            ))?;
            ledger.flush()?;
            report.complete_step("write");
        }

        if self.json {
            println!("{}", report.format_json()?);
        } else {
            println!("{}", report.format_console());
        }

        Ok(if report.is_compliant() { 0 } else { 1 })
    }
}
