//! Registry-driven column classifier

use super::{patterns::DetectorRegistry, PiiDetector, DEFAULT_MIN_CONFIDENCE};
use crate::anonymization::models::{PiiClassification, MAX_SAMPLE_VALUES};
use crate::domain::{Result, Value};
use std::sync::Arc;

/// Column classifier backed by a [`DetectorRegistry`]
pub struct RegistryDetector {
    registry: Arc<DetectorRegistry>,
    min_confidence: f64,
}

impl RegistryDetector {
    /// Create a detector with the built-in detector table
    pub fn new() -> Result<Self> {
        let registry = DetectorRegistry::default_detectors()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a detector with a custom registry
    pub fn with_registry(registry: DetectorRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    /// Set the minimum confidence threshold
    pub fn with_min_confidence(mut self, threshold: f64) -> Self {
        self.min_confidence = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }
}

impl PiiDetector for RegistryDetector {
    fn classify(
        &self,
        column_name: &str,
        sample_values: &[Value],
        total_row_count: usize,
    ) -> Vec<PiiClassification> {
        let sample_size = sample_values.len();
        if sample_size == 0 {
            return Vec::new();
        }
        let row_count = if total_row_count == 0 {
            sample_size
        } else {
            total_row_count
        };

        let mut classifications: Vec<PiiClassification> = Vec::new();

        for entry in self.registry.entries() {
            if !entry.gate.admits(column_name) {
                continue;
            }

            let matches: Vec<&str> = sample_values
                .iter()
                .filter_map(Value::as_text)
                .filter(|text| !text.is_empty() && entry.matcher.is_match(text))
                .collect();
            if matches.is_empty() {
                continue;
            }

            let confidence = entry.confidence.score(matches.len(), sample_size);
            if confidence < self.min_confidence {
                tracing::debug!(
                    column = column_name,
                    pii_type = %entry.pii_type,
                    matches = matches.len(),
                    sample_size,
                    confidence,
                    "Below confidence threshold"
                );
                continue;
            }

            let samples = matches
                .iter()
                .take(MAX_SAMPLE_VALUES)
                .map(|s| s.to_string())
                .collect();
            let classification =
                PiiClassification::new(entry.pii_type, column_name, row_count, samples, confidence);

            // A type registered more than once keeps its strongest classification
            match classifications
                .iter_mut()
                .find(|c| c.pii_type == entry.pii_type)
            {
                Some(existing) if existing.confidence < confidence => *existing = classification,
                Some(_) => {}
                None => classifications.push(classification),
            }
        }

        classifications
    }

    fn min_confidence(&self) -> f64 {
        self.min_confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::PiiType;

    fn texts(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::text(*v)).collect()
    }

    #[test]
    fn test_classifies_email_column() {
        let detector = RegistryDetector::new().unwrap();
        let mut values: Vec<Value> = (0..8)
            .map(|i| Value::text(format!("user{i}@example.com")))
            .collect();
        values.extend(texts(&["n/a", "unknown"]));

        let result = detector.classify("contact", &values, 250);
        let email = result
            .iter()
            .find(|c| c.pii_type == PiiType::Email)
            .unwrap();

        assert!((email.confidence - 0.96).abs() < 1e-9);
        assert_eq!(email.sample_values.len(), 5);
        assert_eq!(email.row_count, 250);
    }

    #[test]
    fn test_low_match_ratio_not_reported() {
        let detector = RegistryDetector::new().unwrap();
        let mut values = texts(&["a@example.com", "b@example.com", "c@example.com"]);
        values.extend(texts(&["x"; 7]));

        let result = detector.classify("contact", &values, 10);
        assert!(result.iter().all(|c| c.pii_type != PiiType::Email));
    }

    #[test]
    fn test_empty_sample_yields_nothing() {
        let detector = RegistryDetector::new().unwrap();
        assert!(detector.classify("email", &[], 0).is_empty());
    }

    #[test]
    fn test_nulls_and_numbers_skipped_but_counted() {
        let detector = RegistryDetector::new().unwrap();
        let values = vec![
            Value::text("a@example.com"),
            Value::Null,
            Value::Number(3.0),
            Value::Null,
        ];
        // 1 / 4 * 1.2 = 0.3
        assert!(detector.classify("email", &values, 4).is_empty());
    }

    #[test]
    fn test_name_detection_requires_name_column() {
        let detector = RegistryDetector::new().unwrap();
        let values = texts(&["John Smith", "Jane Doe", "Maria Garcia", "Bob Brown"]);

        let by_name = detector.classify("customer_name", &values, 4);
        let name = by_name
            .iter()
            .find(|c| c.pii_type == PiiType::Name)
            .unwrap();
        assert!((name.confidence - 0.9).abs() < 1e-9);

        assert!(detector
            .classify("notes", &values, 4)
            .iter()
            .all(|c| c.pii_type != PiiType::Name));
    }

    #[test]
    fn test_custom_threshold() {
        let detector = RegistryDetector::new().unwrap().with_min_confidence(0.3);
        let mut values = texts(&["a@example.com", "b@example.com", "c@example.com"]);
        values.extend(texts(&["x"; 7]));

        let result = detector.classify("contact", &values, 10);
        assert!(result.iter().any(|c| c.pii_type == PiiType::Email));
    }
}
