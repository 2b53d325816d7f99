//! Integration tests for PII detection over synthetic datasets

use fake::faker::internet::en::SafeEmail;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::SeedableRng;
use test_case::test_case;
use warden::anonymization::detector::scanner::scan_table_with_rng;
use warden::anonymization::detector::{
    ConfidenceRule, DetectorEntry, DetectorRegistry, PiiDetector, RegistryDetector,
};
use warden::anonymization::PiiType;
use warden::domain::{Batch, Column, Value};

fn texts(values: &[&str]) -> Vec<Value> {
    values.iter().map(|v| Value::text(*v)).collect()
}

fn synthetic_customers(rows: usize, seed: u64) -> Batch {
    let mut rng = StdRng::seed_from_u64(seed);
    let emails: Vec<String> = (0..rows).map(|_| SafeEmail().fake_with_rng(&mut rng)).collect();
    let plans = ["basic", "gold", "platinum"];

    Batch::new(vec![
        Column::texts("email", emails.iter().map(|e| Some(e.as_str()))),
        Column::texts(
            "ssn",
            (0..rows).map(|i| Some(format!("{:03}-{:02}-{:04}", 100 + i % 800, 10 + i % 80, 1000 + i))),
        ),
        Column::texts("plan", (0..rows).map(|i| Some(plans[i % plans.len()]))),
        Column::numbers("spend", (0..rows).map(|i| Some(10.0 * i as f64))),
    ])
    .unwrap()
}

#[test_case("email", &["ana@example.com", "bo@example.org", "kim@example.net"], PiiType::Email; "email")]
#[test_case("ssn", &["123-45-6789", "987-65-4321", "555-12-3456"], PiiType::NationalId; "ssn dashed")]
#[test_case("card", &["4111 1111 1111 1111", "5500-0000-0000-0004", "4012888888881881"], PiiType::CreditCard; "credit card")]
#[test_case("ip", &["192.168.0.1", "10.0.0.254", "172.16.4.2"], PiiType::IpAddress; "ipv4")]
#[test_case("born", &["1984-03-12", "1991-11-30", "2001-07-04"], PiiType::DateOfBirth; "iso dates")]
fn test_builtin_types_detected(column: &str, values: &[&str], expected: PiiType) {
    let detector = RegistryDetector::new().unwrap();
    let result = detector.classify(column, &texts(values), 3);

    let found = result.iter().find(|c| c.pii_type == expected).unwrap();
    assert_eq!(found.confidence, 1.0);
    assert_eq!(found.row_count, 3);
}

#[test]
fn test_name_detection_requires_column_name() {
    let detector = RegistryDetector::new().unwrap();
    let values = texts(&["John Smith", "Jane Brown", "Maria Garcia", "Peter Jones"]);

    let gated = detector.classify("customer_name", &values, 4);
    let name = gated.iter().find(|c| c.pii_type == PiiType::Name).unwrap();
    assert!((name.confidence - 0.9).abs() < 1e-9);

    let ungated = detector.classify("notes", &values, 4);
    assert!(ungated.iter().all(|c| c.pii_type != PiiType::Name));
}

#[test]
fn test_confidence_floor_filters_sparse_matches() {
    let detector = RegistryDetector::new().unwrap();
    let mut values = texts(&["ana@example.com"]);
    values.extend(texts(&["n/a"; 9]));

    assert!(detector.classify("contact", &values, 10).is_empty());

    let lenient = RegistryDetector::with_registry(detector.registry().clone()).with_min_confidence(0.1);
    let found = lenient.classify("contact", &values, 10);
    assert_eq!(found.len(), 1);
    assert!((found[0].confidence - 0.12).abs() < 1e-9);
}

#[test]
fn test_scan_synthetic_dataset() {
    let detector = RegistryDetector::new().unwrap();
    let batch = synthetic_customers(200, 42);
    let mut rng = StdRng::seed_from_u64(7);

    let report = scan_table_with_rng(&detector, &batch, 50, &mut rng);

    assert_eq!(report.pii_columns(), vec!["email", "ssn"]);
    let email = report
        .classifications_for("email")
        .unwrap()
        .iter()
        .find(|c| c.pii_type == PiiType::Email)
        .unwrap();
    assert_eq!(email.row_count, 200);
    assert!(email.sample_values.len() <= 5);
    assert!(report.summary().contains("Column: email"));
}

#[test]
fn test_fake_phone_numbers_detected() {
    let mut rng = StdRng::seed_from_u64(3);
    let phones: Vec<Value> = (0..20)
        .map(|_| {
            let raw: String = PhoneNumber().fake_with_rng(&mut rng);
            Value::text(raw)
        })
        .collect();

    let detector = RegistryDetector::new().unwrap().with_min_confidence(0.0);
    let result = detector.classify("phone", &phones, 20);
    assert!(result.iter().any(|c| c.pii_type == PiiType::Phone));
}

#[test]
fn test_custom_registry_entry() {
    let mut registry = DetectorRegistry::new();
    registry.register(
        DetectorEntry::pattern(PiiType::Passport, &[r"\b[A-Z]{2}\d{7}\b"], ConfidenceRule::new(1.0, 1.0))
            .unwrap(),
    );
    let detector = RegistryDetector::with_registry(registry);

    let result = detector.classify("document", &texts(&["NO1234567", "SE7654321"]), 2);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].pii_type, PiiType::Passport);
}

#[test]
fn test_pattern_library_from_toml() {
    let registry = DetectorRegistry::from_toml(
        r#"
[[detector]]
type = "bank_account"
patterns = ['\b\d{4}\.\d{2}\.\d{5}\b']
confidence_factor = 1.0
confidence_cap = 1.0
"#,
    )
    .unwrap();
    assert_eq!(registry.len(), 1);

    let err = DetectorRegistry::from_toml(
        r#"
[[detector]]
type = "email"
patterns = ['([unclosed']
confidence_factor = 1.0
confidence_cap = 1.0
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("Invalid regex"));
}

#[test]
fn test_empty_and_null_columns() {
    let detector = RegistryDetector::new().unwrap();
    assert!(detector.classify("email", &[], 0).is_empty());

    let batch = Batch::new(vec![Column::texts("email", [None::<&str>, None, None])]).unwrap();
    assert!(!detector.scan_table(&batch, 1000).has_pii());
}
