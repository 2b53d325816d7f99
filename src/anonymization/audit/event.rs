//! Audit event model

use crate::anonymization::k_anonymity::KAnonymityResult;
use crate::anonymization::quality::ValidationReport;
use crate::anonymization::report::PiiScanReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Kind of audited operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    DataAccess,
    PiiDetected,
    Pseudonymization,
    Anonymization,
    QualityCheck,
    Export,
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DataAccess => "data_access",
            Self::PiiDetected => "pii_detected",
            Self::Pseudonymization => "pseudonymization",
            Self::Anonymization => "anonymization",
            Self::QualityCheck => "quality_check",
            Self::Export => "export",
        };
        write!(f, "{}", s)
    }
}

/// One audited fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub audit_id: Uuid,
    pub event_type: AuditEventType,
    pub dataset: String,
    pub actor: String,
    pub timestamp: DateTime<Utc>,
    pub details: serde_json::Value,
}

/// SHA-256 hex digest of a value
pub fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}

impl AuditEvent {
    pub fn new(
        event_type: AuditEventType,
        dataset: impl Into<String>,
        actor: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            audit_id: Uuid::new_v4(),
            event_type,
            dataset: dataset.into(),
            actor: actor.into(),
            timestamp: Utc::now(),
            details,
        }
    }

    /// A batch was read
    pub fn data_access(dataset: &str, actor: &str, rows: usize, columns: &[&str]) -> Self {
        Self::new(
            AuditEventType::DataAccess,
            dataset,
            actor,
            json!({ "rows": rows, "columns": columns }),
        )
    }

    /// PII classifications were found; sample values are recorded as hashes
    pub fn pii_detected(dataset: &str, actor: &str, report: &PiiScanReport) -> Self {
        let columns: serde_json::Map<String, serde_json::Value> = report
            .iter()
            .map(|(column, found)| {
                let entries: Vec<serde_json::Value> = found
                    .iter()
                    .map(|c| {
                        let hashes: Vec<String> =
                            c.sample_values.iter().map(|v| hash_value(v)).collect();
                        json!({
                            "pii_type": c.pii_type,
                            "confidence": c.confidence,
                            "row_count": c.row_count,
                            "sample_hashes": hashes,
                        })
                    })
                    .collect();
                (column.to_string(), serde_json::Value::Array(entries))
            })
            .collect();

        Self::new(
            AuditEventType::PiiDetected,
            dataset,
            actor,
            json!({
                "pii_types": report.pii_types(),
                "columns": columns,
            }),
        )
    }

    /// Columns were pseudonymized
    pub fn pseudonymization(
        dataset: &str,
        actor: &str,
        columns: &[String],
        rows: usize,
        deterministic: bool,
    ) -> Self {
        Self::new(
            AuditEventType::Pseudonymization,
            dataset,
            actor,
            json!({
                "columns": columns,
                "rows": rows,
                "deterministic": deterministic,
            }),
        )
    }

    /// K-anonymity was enforced
    pub fn anonymization(
        dataset: &str,
        actor: &str,
        quasi_identifiers: &[String],
        rows_before: usize,
        rows_after: usize,
        result: &KAnonymityResult,
    ) -> Self {
        Self::new(
            AuditEventType::Anonymization,
            dataset,
            actor,
            json!({
                "quasi_identifiers": quasi_identifiers,
                "rows_before": rows_before,
                "rows_after": rows_after,
                "rows_suppressed": rows_before.saturating_sub(rows_after),
                "k": result.k,
                "threshold": result.threshold,
                "compliant": result.compliant,
                "vulnerable_groups": result.vulnerable_groups.len(),
            }),
        )
    }

    /// Quality rules were evaluated
    pub fn quality_check(dataset: &str, actor: &str, report: &ValidationReport) -> Self {
        let failed: Vec<&str> = report
            .results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.rule_name.as_str())
            .collect();
        Self::new(
            AuditEventType::QualityCheck,
            dataset,
            actor,
            json!({
                "overall_passed": report.overall_passed,
                "quality_score": report.quality_score,
                "error_count": report.error_count,
                "warning_count": report.warning_count,
                "failed_rules": failed,
            }),
        )
    }

    /// A batch was written
    pub fn export(dataset: &str, actor: &str, destination: &str, rows: usize) -> Self {
        Self::new(
            AuditEventType::Export,
            dataset,
            actor,
            json!({ "destination": destination, "rows": rows }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::{PiiClassification, PiiType};

    #[test]
    fn test_hash_value() {
        let a = hash_value("test@example.com");
        assert_eq!(a, hash_value("test@example.com"));
        assert_ne!(a, hash_value("different@example.com"));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_pii_event_hashes_samples() {
        let mut report = PiiScanReport::new();
        report.insert(
            "contact",
            vec![PiiClassification::new(
                PiiType::Email,
                "contact",
                10,
                vec!["ana@example.com".to_string()],
                0.96,
            )],
        );

        let event = AuditEvent::pii_detected("customers", "warden", &report);
        let rendered = serde_json::to_string(&event).unwrap();

        assert_eq!(event.event_type, AuditEventType::PiiDetected);
        assert!(!rendered.contains("ana@example.com"));
        assert!(rendered.contains(&hash_value("ana@example.com")));
        assert!(rendered.contains("\"event_type\":\"pii_detected\""));
    }

    #[test]
    fn test_events_have_unique_ids() {
        let a = AuditEvent::export("customers", "warden", "out", 3);
        let b = AuditEvent::export("customers", "warden", "out", 3);
        assert_ne!(a.audit_id, b.audit_id);
    }
}
