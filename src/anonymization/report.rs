//! Reports produced by the compliance tooling
//!
//! [`PiiScanReport`] holds per-column detection results; [`ComplianceReport`]
//! collects the outcome of every pipeline step for one dataset.

use crate::anonymization::k_anonymity::KAnonymityResult;
use crate::anonymization::models::{PiiClassification, PiiType};
use crate::anonymization::quality::ValidationReport;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const RULE: &str = "───────────────────────────────────────────────────────────────";
const BANNER: &str = "═══════════════════════════════════════════════════════════════";

/// Column name → classifications, for columns with at least one finding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PiiScanReport {
    columns: BTreeMap<String, Vec<PiiClassification>>,
}

impl PiiScanReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the findings for a column; empty findings are not recorded
    pub fn insert(&mut self, column: impl Into<String>, classifications: Vec<PiiClassification>) {
        if !classifications.is_empty() {
            self.columns.insert(column.into(), classifications);
        }
    }

    pub fn has_pii(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Names of columns with findings, sorted
    pub fn pii_columns(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Every PII type found in any column
    pub fn pii_types(&self) -> BTreeSet<PiiType> {
        self.columns
            .values()
            .flatten()
            .map(|c| c.pii_type)
            .collect()
    }

    pub fn classifications_for(&self, column: &str) -> Option<&[PiiClassification]> {
        self.columns.get(column).map(Vec::as_slice)
    }

    pub fn total_classifications(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PiiClassification])> {
        self.columns
            .iter()
            .map(|(name, found)| (name.as_str(), found.as_slice()))
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        if !self.has_pii() {
            return "No PII detected.".to_string();
        }

        let mut output = String::from("PII Detection Summary:\n");
        output.push_str(&"=".repeat(50));
        output.push('\n');

        for (column, classifications) in &self.columns {
            output.push_str(&format!("\nColumn: {}\n", column));
            for c in classifications {
                output.push_str(&format!(
                    "  - {}: {} occurrences (confidence: {:.2}%)\n",
                    c.pii_type.label(),
                    c.row_count,
                    c.confidence * 100.0
                ));
            }
        }

        output
    }
}

/// Outcome of a compliance pipeline run over one dataset
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    pub dataset: String,

    /// Pipeline steps in the order they ran
    pub steps_completed: Vec<String>,

    /// Columns that were pseudonymized
    pub pii_columns: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<PiiScanReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_anonymity: Option<KAnonymityResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<ValidationReport>,

    /// Rows in the published batch
    pub output_rows: usize,
}

impl ComplianceReport {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            steps_completed: Vec::new(),
            pii_columns: Vec::new(),
            scan: None,
            k_anonymity: None,
            quality: None,
            output_rows: 0,
        }
    }

    pub(crate) fn complete_step(&mut self, step: &str) {
        self.steps_completed.push(step.to_string());
    }

    /// Whether every check that ran passed
    pub fn is_compliant(&self) -> bool {
        let k_ok = self.k_anonymity.as_ref().map_or(true, |k| k.compliant);
        let quality_ok = self.quality.as_ref().map_or(true, |q| q.overall_passed);
        k_ok && quality_ok
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str(BANNER);
        output.push('\n');
        output.push_str("                  WARDEN COMPLIANCE REPORT                     \n");
        output.push_str(BANNER);
        output.push_str("\n\n");

        output.push_str("📊 SUMMARY\n");
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!("  Dataset:              {}\n", self.dataset));
        output.push_str(&format!(
            "  Steps Completed:      {}\n",
            self.steps_completed.join(" → ")
        ));
        output.push_str(&format!("  Output Rows:          {}\n", self.output_rows));
        output.push_str(&format!(
            "  Compliant:            {}\n",
            if self.is_compliant() { "yes" } else { "no" }
        ));
        output.push('\n');

        if let Some(scan) = &self.scan {
            output.push_str("🔍 PII DETECTION\n");
            output.push_str(RULE);
            output.push('\n');
            if scan.has_pii() {
                for (column, found) in scan.iter() {
                    for c in found {
                        output.push_str(&format!(
                            "  {:30} {:>14} {:>7.2}%\n",
                            column,
                            c.pii_type.label(),
                            c.confidence * 100.0
                        ));
                    }
                }
            } else {
                output.push_str("  No PII detected\n");
            }
            if !self.pii_columns.is_empty() {
                output.push_str(&format!(
                    "  Pseudonymized:        {}\n",
                    self.pii_columns.join(", ")
                ));
            }
            output.push('\n');
        }

        if let Some(k) = &self.k_anonymity {
            output.push_str("🛡️  K-ANONYMITY\n");
            output.push_str(RULE);
            output.push('\n');
            output.push_str(&format!(
                "  k = {} (threshold {}): {}\n",
                k.k,
                k.threshold,
                if k.compliant { "compliant" } else { "NOT compliant" }
            ));
            for recommendation in &k.recommendations {
                output.push_str(&format!("  • {}\n", recommendation));
            }
            output.push('\n');
        }

        if let Some(quality) = &self.quality {
            output.push_str("✅ DATA QUALITY\n");
            output.push_str(RULE);
            output.push('\n');
            output.push_str(&format!(
                "  Quality Score:        {:.2}%\n",
                quality.quality_score * 100.0
            ));
            output.push_str(&format!(
                "  Errors / Warnings:    {} / {}\n",
                quality.error_count, quality.warning_count
            ));
            output.push('\n');
        }

        output.push_str(BANNER);
        output.push('\n');
        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
