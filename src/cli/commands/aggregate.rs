//! Aggregate command implementation
//!
//! Publishes per-group statistics instead of individual rows.

use super::{load_config_or_report, open_ledger, parse_aggregation};
use crate::adapters::{BatchSink, BatchSource, JsonFileStore, WriteMode};
use crate::anonymization::audit::{AuditEvent, EventLedger};
use crate::anonymization::k_anonymity::{AggregateView, Aggregation, KAnonymityChecker};
use crate::domain::Batch;
use clap::Args;

/// Arguments for the aggregate command
#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Source dataset name under the data directory
    pub dataset: String,

    /// Grouping columns (comma-separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub group_by: Vec<String>,

    /// Aggregation per column, e.g. `spend=mean` (count, sum, mean, min, max)
    #[arg(short, long = "agg", value_name = "COLUMN=AGGREGATION", value_parser = parse_aggregation)]
    pub aggregations: Vec<(String, Aggregation)>,

    /// Drop groups smaller than this (defaults to k_anonymity.threshold)
    #[arg(long)]
    pub min_group_size: Option<usize>,

    /// Target dataset name; the view is printed when omitted
    #[arg(short, long)]
    pub output: Option<String>,
}

impl AggregateArgs {
    /// Execute the aggregate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let Some(config) = load_config_or_report(config_path) else {
            return Ok(2);
        };

        let store = JsonFileStore::new(&config.storage.data_dir);
        let batch = store.read(&self.dataset, None).await?;

        let mut view = AggregateView::new(self.group_by.iter().cloned())
            .min_group_size(self.min_group_size.unwrap_or(config.k_anonymity.threshold));
        for (column, aggregation) in &self.aggregations {
            view = view.aggregate(column.as_str(), aggregation.clone());
        }

        let checker = KAnonymityChecker::new(config.k_anonymity.threshold);
        let aggregated = checker.aggregate_view(&batch, &view);

        match self.output {
            Some(ref target) => {
                store.write(target, &aggregated, WriteMode::Overwrite).await?;
                let mut ledger = open_ledger(&config)?;
                ledger.append(AuditEvent::export(
                    target,
                    &config.audit.actor,
                    &store.location(target),
                    aggregated.num_rows(),
                ))?;
                ledger.flush()?;
                println!(
                    "✅ Wrote {} groups from {} to {}",
                    aggregated.num_rows(),
                    self.dataset,
                    target
                );
            }
            None => println!("{}", render_table(&aggregated)),
        }

        Ok(0)
    }
}

/// Plain-text table of a batch
fn render_table(batch: &Batch) -> String {
    let names = batch.column_names();
    let widths: Vec<usize> = batch
        .columns()
        .iter()
        .map(|c| {
            c.values()
                .iter()
                .map(|v| v.to_string().chars().count())
                .chain(std::iter::once(c.name().chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(batch.num_rows() + 2);
    lines.push(
        names
            .iter()
            .zip(widths.iter().copied())
            .map(|(n, w)| format!("{n:<w$}"))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in 0..batch.num_rows() {
        lines.push(
            batch
                .columns()
                .iter()
                .zip(widths.iter().copied())
                .map(|(c, w)| format!("{:<w$}", c.values()[row].to_string()))
                .collect::<Vec<_>>()
                .join("  "),
        );
    }
    lines.join("\n")
}
