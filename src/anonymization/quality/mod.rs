//! Data-quality validation
//!
//! Every rule is evaluated and its outcome recorded; a failing or
//! inapplicable rule never stops the pass. Whether the batch is rejected is
//! decided once, after all rules have run.

pub mod rules;

use crate::domain::{Batch, QualityError};
use serde::{Deserialize, Serialize};

pub use rules::{rules_from_toml, QualityCheck, QualityRule, RuleDefinition, Severity};

/// Default minimum share of passing rules
pub const DEFAULT_MIN_QUALITY_SCORE: f64 = 0.8;

/// Outcome of one rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule_name: String,
    pub column: String,
    pub passed: bool,
    pub severity: Severity,
    pub message: String,
    pub affected_rows: usize,
}

/// Result of validating one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub overall_passed: bool,
    /// Share of passing rules; 0 when there are no rules
    pub quality_score: f64,
    pub total_rules: usize,
    pub passed_rules: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub results: Vec<RuleOutcome>,
    pub min_quality_score: f64,
}

impl ValidationReport {
    /// Failed error-severity outcomes as `rule: message`
    pub fn error_messages(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| !r.passed && r.severity == Severity::Error)
            .map(|r| format!("{}: {}", r.rule_name, r.message))
            .collect()
    }

    /// Turn a failed report with error-severity failures into an error
    ///
    /// Reports failing only on score or warnings are returned as `Ok`.
    pub fn escalate(&self) -> Result<(), QualityError> {
        if !self.overall_passed && self.error_count > 0 {
            return Err(QualityError::ValidationFailed {
                quality_score: self.quality_score,
                error_count: self.error_count,
                failures: self.error_messages(),
            });
        }
        Ok(())
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Data Quality Validation Summary".to_string(),
            "=".repeat(60),
            format!(
                "Overall Status: {}",
                if self.overall_passed { "PASSED" } else { "FAILED" }
            ),
            format!("Quality Score: {:.2}%", self.quality_score * 100.0),
            format!("Rules Passed: {}/{}", self.passed_rules, self.total_rules),
            format!("Errors: {}", self.error_count),
            format!("Warnings: {}", self.warning_count),
            "\nDetailed Results:".to_string(),
        ];

        for r in &self.results {
            lines.push(format!(
                "  {} [{}] {}: {}",
                if r.passed { "✓" } else { "✗" },
                r.severity.to_string().to_uppercase(),
                r.rule_name,
                r.message
            ));
        }

        lines.join("\n")
    }
}

/// Rule set with an acceptance threshold
#[derive(Debug, Clone)]
pub struct QualityValidator {
    min_quality_score: f64,
    rules: Vec<QualityRule>,
}

impl Default for QualityValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_QUALITY_SCORE)
    }
}

impl QualityValidator {
    pub fn new(min_quality_score: f64) -> Self {
        Self {
            min_quality_score: min_quality_score.clamp(0.0, 1.0),
            rules: Vec::new(),
        }
    }

    pub fn add_rule(&mut self, rule: QualityRule) {
        self.rules.push(rule);
    }

    pub fn with_rule(mut self, rule: QualityRule) -> Self {
        self.add_rule(rule);
        self
    }

    pub fn with_rules<I: IntoIterator<Item = QualityRule>>(mut self, rules: I) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn rules(&self) -> &[QualityRule] {
        &self.rules
    }

    /// Evaluate every rule against `batch`
    pub fn validate(&self, batch: &Batch) -> ValidationReport {
        let mut results = Vec::with_capacity(self.rules.len());
        let mut error_count = 0;
        let mut warning_count = 0;

        for rule in &self.rules {
            let outcome = match batch.column(&rule.column) {
                None => RuleOutcome {
                    rule_name: rule.name.clone(),
                    column: rule.column.clone(),
                    passed: false,
                    severity: Severity::Error,
                    message: format!("Column {} not found", rule.column),
                    affected_rows: 0,
                },
                Some(column) => {
                    let (passed, message, affected_rows) =
                        rule.evaluate(column.values(), column.kind());
                    RuleOutcome {
                        rule_name: rule.name.clone(),
                        column: rule.column.clone(),
                        passed,
                        severity: rule.severity,
                        message,
                        affected_rows,
                    }
                }
            };

            if !outcome.passed {
                match outcome.severity {
                    Severity::Error => error_count += 1,
                    Severity::Warning => warning_count += 1,
                    Severity::Info => {}
                }
                tracing::debug!(
                    rule = outcome.rule_name.as_str(),
                    severity = %outcome.severity,
                    affected_rows = outcome.affected_rows,
                    "Quality rule failed"
                );
            }
            results.push(outcome);
        }

        let total_rules = self.rules.len();
        let passed_rules = results.iter().filter(|r| r.passed).count();
        let quality_score = if total_rules > 0 {
            passed_rules as f64 / total_rules as f64
        } else {
            0.0
        };
        let overall_passed = quality_score >= self.min_quality_score && error_count == 0;

        tracing::info!(
            rules = total_rules,
            passed = passed_rules,
            errors = error_count,
            warnings = warning_count,
            quality_score,
            overall_passed,
            "Data quality validated"
        );

        ValidationReport {
            overall_passed,
            quality_score,
            total_rules,
            passed_rules,
            error_count,
            warning_count,
            results,
            min_quality_score: self.min_quality_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;

    fn customers() -> Batch {
        Batch::new(vec![
            Column::texts("email", [Some("a@example.com"), Some("b@example.com"), None]),
            Column::numbers("age", [Some(34.0), Some(150.0), Some(29.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_all_rules_evaluated() {
        let validator = QualityValidator::new(0.5)
            .with_rule(QualityRule::not_null("email"))
            .with_rule(QualityRule::range("age", Some(0.0), Some(120.0)).with_severity(Severity::Warning))
            .with_rule(QualityRule::unique("email"))
            .with_rule(QualityRule::not_null("phone"));

        let report = validator.validate(&customers());
        assert_eq!(report.total_rules, 4);
        assert_eq!(report.passed_rules, 1);
        assert_eq!(report.error_count, 2);
        assert_eq!(report.warning_count, 1);
        assert!((report.quality_score - 0.25).abs() < 1e-9);
        assert!(!report.overall_passed);
        assert_eq!(report.results[3].message, "Column phone not found");
    }

    #[test]
    fn test_warnings_never_escalate() {
        let validator = QualityValidator::new(0.0)
            .with_rule(QualityRule::range("age", Some(0.0), Some(120.0)).with_severity(Severity::Warning));
        let report = validator.validate(&customers());
        assert!(report.overall_passed);
        assert!(report.escalate().is_ok());

        let strict = QualityValidator::new(1.0)
            .with_rule(QualityRule::range("age", Some(0.0), Some(120.0)).with_severity(Severity::Warning));
        let report = strict.validate(&customers());
        assert!(!report.overall_passed);
        assert!(report.escalate().is_ok());
    }

    #[test]
    fn test_error_escalates() {
        let validator = QualityValidator::default().with_rule(QualityRule::not_null("email"));
        let report = validator.validate(&customers());
        let err = report.escalate().unwrap_err();
        let QualityError::ValidationFailed { failures, .. } = &err;
        assert_eq!(failures, &vec!["email_not_null: Found 1 null values in email".to_string()]);
        assert!(err.to_string().contains("Quality score: 0.00%"));
    }

    #[test]
    fn test_no_rules_scores_zero() {
        let report = QualityValidator::default().validate(&customers());
        assert_eq!(report.quality_score, 0.0);
        assert!(!report.overall_passed);
        assert!(report.escalate().is_ok());
    }

    #[test]
    fn test_summary() {
        let validator = QualityValidator::default().with_rule(QualityRule::not_null("age"));
        let summary = validator.validate(&customers()).summary();
        assert!(summary.contains("Overall Status: PASSED"));
        assert!(summary.contains("✓ [ERROR] age_not_null"));
    }
}
