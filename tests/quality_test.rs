//! Integration tests for data-quality validation

use warden::anonymization::quality::rules_from_toml;
use warden::anonymization::{QualityRule, QualityValidator, Severity};
use warden::domain::{Batch, Column, QualityError};

fn orders() -> Batch {
    Batch::new(vec![
        Column::texts("order_id", [Some("A-1"), Some("A-2"), Some("A-2"), Some("A-4")]),
        Column::texts("email", [Some("ana@example.com"), None, Some("bo@example.org"), Some("broken")]),
        Column::numbers("age", [Some(31.0), Some(150.0), Some(29.0), Some(44.0)]),
        Column::texts("country", [Some("NO"), Some("SE"), Some("DK"), Some("XX")]),
    ])
    .unwrap()
}

const RULES: &str = r#"
[[rule]]
column = "order_id"
check = "unique"

[[rule]]
column = "email"
check = "not_null"
severity = "warning"

[[rule]]
column = "email"
check = "format"
pattern = '[^@\s]+@[^@\s]+\.[a-z]+'
severity = "warning"

[[rule]]
column = "age"
check = "range"
min = 0
max = 120

[[rule]]
column = "country"
check = "referential_integrity"
allowed = ["NO", "SE", "DK", "FI"]
severity = "info"
"#;

#[test]
fn test_rules_from_toml() {
    let rules = rules_from_toml(RULES).unwrap();

    assert_eq!(rules.len(), 5);
    assert_eq!(rules[0].name, "order_id_unique");
    assert_eq!(rules[1].severity, Severity::Warning);
    assert_eq!(rules[4].severity, Severity::Info);
}

#[test]
fn test_validation_records_every_outcome() {
    let validator = QualityValidator::new(0.8).with_rules(rules_from_toml(RULES).unwrap());
    let report = validator.validate(&orders());

    assert_eq!(report.total_rules, 5);
    assert_eq!(report.passed_rules, 0);
    assert_eq!(report.error_count, 2);
    assert_eq!(report.warning_count, 2);
    assert!(!report.overall_passed);
    assert_eq!(report.quality_score, 0.0);

    let age = report.results.iter().find(|r| r.rule_name == "age_range").unwrap();
    assert_eq!(age.affected_rows, 1);
}

#[test]
fn test_escalation_lists_error_failures() {
    let validator = QualityValidator::new(0.8).with_rules(rules_from_toml(RULES).unwrap());
    let report = validator.validate(&orders());

    let QualityError::ValidationFailed {
        error_count,
        failures,
        ..
    } = report.escalate().unwrap_err();
    assert_eq!(error_count, 2);
    assert!(failures.iter().any(|f| f.starts_with("order_id_unique:")));
    assert!(failures.iter().any(|f| f.starts_with("age_range:")));
}

#[test]
fn test_warnings_only_do_not_escalate() {
    let validator = QualityValidator::new(0.0)
        .with_rule(QualityRule::not_null("email").with_severity(Severity::Warning))
        .with_rule(QualityRule::range("age", Some(0.0), Some(200.0)));
    let report = validator.validate(&orders());

    assert_eq!(report.error_count, 0);
    assert_eq!(report.warning_count, 1);
    assert!(report.overall_passed);
    assert!(report.escalate().is_ok());
}

#[test]
fn test_low_score_fails_without_errors() {
    let validator = QualityValidator::new(0.9)
        .with_rule(QualityRule::not_null("email").with_severity(Severity::Warning))
        .with_rule(QualityRule::range("age", Some(0.0), Some(200.0)));
    let report = validator.validate(&orders());

    assert_eq!(report.quality_score, 0.5);
    assert!(!report.overall_passed);
    // Score-only failures are reported, not escalated
    assert!(report.escalate().is_ok());
}

#[test]
fn test_missing_column_is_an_error() {
    let validator = QualityValidator::new(0.8).with_rule(QualityRule::not_null("phone"));
    let report = validator.validate(&orders());

    assert_eq!(report.error_count, 1);
    assert_eq!(report.results[0].message, "Column phone not found");
    assert!(report.summary().contains("phone"));
}

#[test]
fn test_invalid_rule_definitions() {
    let err = rules_from_toml(
        r#"
[[rule]]
column = "age"
check = "range"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("needs min or max"));

    let err = rules_from_toml(
        r#"
[[rule]]
column = "age"
check = "plausible"
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unknown quality check"));
}
