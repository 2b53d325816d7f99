//! PII detection module
//!
//! Provides a trait-based column classification interface, the registry-driven
//! implementation, and table scanning over a row sample.

pub mod classifier;
pub mod patterns;
pub mod scanner;

use crate::anonymization::models::PiiClassification;
use crate::anonymization::report::PiiScanReport;
use crate::domain::{Batch, Value};

pub use classifier::RegistryDetector;
pub use patterns::{ColumnGate, ConfidenceRule, DetectorEntry, DetectorRegistry, Matcher};

/// Default minimum confidence for a classification to be reported
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.7;

/// Default number of rows sampled by [`PiiDetector::scan_table`]
pub const DEFAULT_SAMPLE_SIZE: usize = 1000;

/// Trait for column PII classifiers
///
/// Classification never fails: a column without matches simply yields no
/// classifications.
pub trait PiiDetector: Send + Sync {
    /// Classify one column from its sampled values
    ///
    /// Only text values are matched; nulls and other kinds are skipped but
    /// still count towards the sample size.
    fn classify(
        &self,
        column_name: &str,
        sample_values: &[Value],
        total_row_count: usize,
    ) -> Vec<PiiClassification>;

    /// Minimum confidence for a classification to be reported
    fn min_confidence(&self) -> f64;

    /// Classify every column of `batch`, sampling at most `sample_size` rows
    fn scan_table(&self, batch: &Batch, sample_size: usize) -> PiiScanReport {
        scanner::scan_table_with_rng(self, batch, sample_size, &mut rand::thread_rng())
    }
}
