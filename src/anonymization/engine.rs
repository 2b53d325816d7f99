//! Compliance pipeline
//!
//! [`ComplianceEngine`] wires the detector, k-anonymity checker,
//! pseudonymizer and quality validator together from a [`WardenConfig`] and
//! runs them over one in-memory batch, appending an audit event per step.
//!
//! # Examples
//!
//! ```no_run
//! use warden::anonymization::{ComplianceEngine, ProcessRequest, MemoryLedger};
//! use warden::config::load_config;
//! use warden::domain::{Batch, Column};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = load_config("warden.toml")?;
//! let mut engine = ComplianceEngine::new(&config)?;
//! let mut ledger = MemoryLedger::new();
//!
//! let batch = Batch::new(vec![
//!     Column::texts("email", [Some("ana@example.com"), Some("bo@example.com")]),
//!     Column::texts("zip", [Some("0150"), Some("0150")]),
//! ])?;
//! let request = ProcessRequest::new("customers").quasi_identifiers(["zip"]);
//! let (published, report) = engine.process(&batch, &request, &mut ledger)?;
//! println!("{}", report.format_console());
//! # let _ = published;
//! # Ok(())
//! # }
//! ```

use crate::anonymization::audit::{AuditEvent, EventLedger};
use crate::anonymization::detector::{DetectorRegistry, PiiDetector, RegistryDetector};
use crate::anonymization::k_anonymity::{EnsureOptions, GeneralizationLevel, KAnonymityChecker};
use crate::anonymization::pseudonymizer::{LruPseudonymStore, Pseudonymizer};
use crate::anonymization::quality::{QualityRule, QualityValidator};
use crate::anonymization::report::{ComplianceReport, PiiScanReport};
use crate::config::WardenConfig;
use crate::domain::{Batch, Result};
use std::sync::Arc;

/// What to do with one dataset in [`ComplianceEngine::process`]
#[derive(Debug, Clone, Default)]
pub struct ProcessRequest {
    pub dataset: String,
    /// Recorded on audit events; the configured actor when `None`
    pub actor: Option<String>,
    /// Columns to pseudonymize; detected by a PII scan when `None`
    pub pii_columns: Option<Vec<String>>,
    /// K-anonymity is enforced only when this is non-empty
    pub quasi_identifiers: Vec<String>,
    pub generalization: Vec<(String, GeneralizationLevel)>,
    /// Quality validation runs only when this is non-empty
    pub quality_rules: Vec<QualityRule>,
    /// Abort on error-severity quality failures
    pub escalate_quality: bool,
    /// Overrides the configured token mode
    pub deterministic: Option<bool>,
}

impl ProcessRequest {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            ..Self::default()
        }
    }

    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn pii_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pii_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn quasi_identifiers<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.quasi_identifiers = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn generalize(mut self, column: impl Into<String>, level: GeneralizationLevel) -> Self {
        self.generalization.push((column.into(), level));
        self
    }

    pub fn quality_rules<I: IntoIterator<Item = QualityRule>>(mut self, rules: I) -> Self {
        self.quality_rules.extend(rules);
        self
    }

    pub fn escalate_quality(mut self, escalate: bool) -> Self {
        self.escalate_quality = escalate;
        self
    }

    pub fn deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = Some(deterministic);
        self
    }
}

/// Configured compliance pipeline
pub struct ComplianceEngine {
    detector: Arc<dyn PiiDetector>,
    checker: KAnonymityChecker,
    pseudonymizer: Pseudonymizer,
    sample_size: usize,
    deterministic: bool,
    apply_suppression: bool,
    min_quality_score: f64,
    actor: String,
}

impl ComplianceEngine {
    /// Build every component from configuration
    ///
    /// # Errors
    ///
    /// Fails when the pattern library cannot be loaded or the
    /// pseudonymization secret is not an accepted key form.
    pub fn new(config: &WardenConfig) -> Result<Self> {
        let registry = match config.detection.pattern_library {
            Some(ref path) => DetectorRegistry::from_file(path)?,
            None => DetectorRegistry::default_detectors()?,
        };
        let detector = RegistryDetector::with_registry(registry)
            .with_min_confidence(config.detection.min_confidence);

        let store = LruPseudonymStore::new(config.pseudonymization.cache_capacity);
        let pseudonymizer =
            Pseudonymizer::with_store(&config.pseudonymization.secret, Box::new(store))?;

        tracing::debug!(
            k_threshold = config.k_anonymity.threshold,
            min_confidence = config.detection.min_confidence,
            custom_patterns = config.detection.pattern_library.is_some(),
            "Compliance engine initialized"
        );

        Ok(Self {
            detector: Arc::new(detector),
            checker: KAnonymityChecker::new(config.k_anonymity.threshold),
            pseudonymizer,
            sample_size: config.detection.sample_size,
            deterministic: config.pseudonymization.deterministic,
            apply_suppression: config.k_anonymity.apply_suppression,
            min_quality_score: config.quality.min_quality_score,
            actor: config.audit.actor.clone(),
        })
    }

    pub fn checker(&self) -> &KAnonymityChecker {
        &self.checker
    }

    pub fn pseudonymizer(&self) -> &Pseudonymizer {
        &self.pseudonymizer
    }

    /// Detection-only entry point
    ///
    /// Records a `pii_detected` event when anything is found.
    pub fn scan(
        &self,
        batch: &Batch,
        dataset: &str,
        ledger: &mut dyn EventLedger,
    ) -> Result<PiiScanReport> {
        let report = self.detector.scan_table(batch, self.sample_size);
        if report.has_pii() {
            ledger.append(AuditEvent::pii_detected(dataset, &self.actor, &report))?;
        }
        Ok(report)
    }

    /// Run the compliance pipeline over `batch`
    ///
    /// Steps run in order: quality validation (when rules are given), PII
    /// scan (unless columns are given), pseudonymization, then k-anonymity
    /// enforcement (when quasi-identifiers are declared). Detected columns
    /// that are also quasi-identifiers are left for generalization instead of
    /// being tokenized. The ledger is flushed before returning.
    ///
    /// # Errors
    ///
    /// Fails on ledger errors, on pseudonymization errors, and on
    /// error-severity quality failures when `escalate_quality` is set.
    pub fn process(
        &mut self,
        batch: &Batch,
        request: &ProcessRequest,
        ledger: &mut dyn EventLedger,
    ) -> Result<(Batch, ComplianceReport)> {
        let dataset = request.dataset.as_str();
        let actor = request.actor.as_deref().unwrap_or(&self.actor).to_string();
        let mut report = ComplianceReport::new(dataset);

        tracing::info!(
            dataset,
            rows = batch.num_rows(),
            columns = batch.num_columns(),
            "Processing dataset"
        );
        ledger.append(AuditEvent::data_access(
            dataset,
            &actor,
            batch.num_rows(),
            &batch.column_names(),
        ))?;

        if !request.quality_rules.is_empty() {
            let validator = QualityValidator::new(self.min_quality_score)
                .with_rules(request.quality_rules.iter().cloned());
            let quality = validator.validate(batch);
            ledger.append(AuditEvent::quality_check(dataset, &actor, &quality))?;
            report.complete_step("quality_validation");
            if request.escalate_quality {
                if let Err(e) = quality.escalate() {
                    ledger.flush()?;
                    return Err(e.into());
                }
            }
            report.quality = Some(quality);
        }

        let pii_columns = match request.pii_columns {
            Some(ref columns) => columns.clone(),
            None => {
                let scan = self.detector.scan_table(batch, self.sample_size);
                if scan.has_pii() {
                    ledger.append(AuditEvent::pii_detected(dataset, &actor, &scan))?;
                }
                report.complete_step("pii_scan");
                let columns = scan
                    .pii_columns()
                    .into_iter()
                    .filter(|c| !request.quasi_identifiers.iter().any(|q| q == c))
                    .map(str::to_string)
                    .collect();
                report.scan = Some(scan);
                columns
            }
        };

        let mut working = batch.clone();
        if !pii_columns.is_empty() {
            let deterministic = request.deterministic.unwrap_or(self.deterministic);
            working = self
                .pseudonymizer
                .pseudonymize_columns(&working, &pii_columns, deterministic)?;
            ledger.append(AuditEvent::pseudonymization(
                dataset,
                &actor,
                &pii_columns,
                working.num_rows(),
                deterministic,
            ))?;
            report.complete_step("pseudonymization");
        }
        report.pii_columns = pii_columns;

        if !request.quasi_identifiers.is_empty() {
            let options = EnsureOptions {
                generalization: request.generalization.clone(),
                apply_suppression: self.apply_suppression,
            };
            let rows_before = working.num_rows();
            let (anonymized, result) =
                self.checker
                    .ensure(&working, &request.quasi_identifiers, &options);
            ledger.append(AuditEvent::anonymization(
                dataset,
                &actor,
                &request.quasi_identifiers,
                rows_before,
                anonymized.num_rows(),
                &result,
            ))?;
            report.complete_step("k_anonymity");
            report.k_anonymity = Some(result);
            working = anonymized;
        }

        report.output_rows = working.num_rows();
        ledger.flush()?;

        tracing::info!(
            dataset,
            steps = ?report.steps_completed,
            output_rows = report.output_rows,
            compliant = report.is_compliant(),
            "Dataset processed"
        );

        Ok((working, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::audit::{AuditEventType, MemoryLedger};
    use crate::config::load_config_from_str;
    use crate::domain::{Column, Value, WardenError};

    fn engine(threshold: usize) -> ComplianceEngine {
        let config = load_config_from_str(&format!(
            r#"
[k_anonymity]
threshold = {threshold}

[pseudonymization]
secret = "engine test passphrase"
"#
        ))
        .unwrap();
        ComplianceEngine::new(&config).unwrap()
    }

    fn customers() -> Batch {
        let emails: Vec<String> = (0..6).map(|i| format!("customer{i}@example.com")).collect();
        Batch::new(vec![
            Column::texts("email", emails.iter().map(|e| Some(e.as_str()))),
            Column::texts(
                "zip",
                [Some("0150"), Some("0150"), Some("0150"), Some("5003"), Some("5003"), Some("9990")],
            ),
            Column::numbers("age", [34.0, 37.0, 31.0, 52.0, 58.0, 44.0].map(Some)),
        ])
        .unwrap()
    }

    #[test]
    fn test_full_pipeline() {
        let mut engine = engine(2);
        let mut ledger = MemoryLedger::new();
        let request = ProcessRequest::new("customers")
            .quasi_identifiers(["zip"])
            .quality_rules([QualityRule::not_null("email")]);

        let (out, report) = engine.process(&customers(), &request, &mut ledger).unwrap();

        assert_eq!(
            report.steps_completed,
            vec!["quality_validation", "pii_scan", "pseudonymization", "k_anonymity"]
        );
        assert_eq!(report.pii_columns, vec!["email".to_string()]);
        assert_eq!(out.num_rows(), 5);
        assert_eq!(report.output_rows, 5);
        assert!(report.is_compliant());
        assert_ne!(out.column("email").unwrap().values()[0], Value::text("customer0@example.com"));

        let types: Vec<AuditEventType> = ledger.events().iter().map(|e| e.event_type).collect();
        assert_eq!(
            types,
            vec![
                AuditEventType::DataAccess,
                AuditEventType::QualityCheck,
                AuditEventType::PiiDetected,
                AuditEventType::Pseudonymization,
                AuditEventType::Anonymization,
            ]
        );
    }

    #[test]
    fn test_explicit_columns_skip_scan() {
        let mut engine = engine(2);
        let mut ledger = MemoryLedger::new();
        let request = ProcessRequest::new("customers").pii_columns(["zip"]);

        let (out, report) = engine.process(&customers(), &request, &mut ledger).unwrap();

        assert!(report.scan.is_none());
        assert_eq!(report.steps_completed, vec!["pseudonymization"]);
        assert_eq!(out.column("email"), customers().column("email"));
    }

    #[test]
    fn test_quality_escalation_aborts() {
        let mut engine = engine(2);
        let mut ledger = MemoryLedger::new();
        let request = ProcessRequest::new("customers")
            .quality_rules([QualityRule::range("age", Some(0.0), Some(40.0))])
            .escalate_quality(true);

        let err = engine.process(&customers(), &request, &mut ledger).unwrap_err();
        assert!(matches!(err, WardenError::Quality(_)));
        assert_eq!(ledger.events().len(), 2);
    }

    #[test]
    fn test_scan_only_records_detection() {
        let engine = engine(2);
        let mut ledger = MemoryLedger::new();
        let report = engine.scan(&customers(), "customers", &mut ledger).unwrap();

        assert_eq!(report.pii_columns(), vec!["email"]);
        assert_eq!(ledger.events().len(), 1);
        assert_eq!(ledger.events()[0].event_type, AuditEventType::PiiDetected);
    }
}
