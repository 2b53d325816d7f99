//! K-anonymity engine
//!
//! Measures and enforces k-anonymity over a set of quasi-identifier columns.
//! Every operation takes a batch by reference and returns a new one; the
//! input is never mutated and missing columns never abort an operation.
//!
//! # Example
//!
//! ```rust
//! use warden::anonymization::k_anonymity::KAnonymityChecker;
//! use warden::domain::{Batch, Column};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let batch = Batch::new(vec![
//!     Column::texts("zip", [Some("0150"), Some("0150"), Some("5003")]),
//! ])?;
//! let checker = KAnonymityChecker::new(2);
//! let result = checker.check(&batch, &["zip"]);
//! assert_eq!(result.k, 1);
//! assert!(!result.compliant);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod generalize;
mod grouping;
pub mod suppress;

use crate::domain::{Batch, Value};
use serde::Serialize;
use std::collections::BTreeMap;

pub use aggregate::{AggregateView, Aggregation, CustomAggregate};
pub use generalize::{generalize_value, GeneralizationLevel};
pub use suppress::EnsureOptions;

/// Default minimum group size
pub const DEFAULT_K_THRESHOLD: usize = 5;

/// One quasi-identifier combination shared by fewer than `threshold` rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VulnerableGroup {
    /// Quasi-identifier column → value
    pub values: BTreeMap<String, Value>,
    /// Rows sharing this combination
    pub count: usize,
}

/// Outcome of a k-anonymity check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KAnonymityResult {
    /// Smallest group size; 0 for an empty batch or missing columns
    pub k: usize,
    pub threshold: usize,
    pub compliant: bool,
    /// Groups below the threshold, smallest first
    pub vulnerable_groups: Vec<VulnerableGroup>,
    pub recommendations: Vec<String>,
}

impl KAnonymityResult {
    fn missing_columns(threshold: usize, missing: &[&str]) -> Self {
        Self {
            k: 0,
            threshold,
            compliant: false,
            vulnerable_groups: Vec::new(),
            recommendations: vec![format!("Missing columns: [{}]", missing.join(", "))],
        }
    }
}

/// K-anonymity checker and enforcer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KAnonymityChecker {
    threshold: usize,
}

impl Default for KAnonymityChecker {
    fn default() -> Self {
        Self::new(DEFAULT_K_THRESHOLD)
    }
}

impl KAnonymityChecker {
    /// Create a checker; a threshold of 0 is treated as 1
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(1),
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Measure k over `quasi_identifiers`
    pub fn check<S: AsRef<str>>(&self, batch: &Batch, quasi_identifiers: &[S]) -> KAnonymityResult {
        let missing = grouping::missing_columns(batch, quasi_identifiers);
        if !missing.is_empty() {
            tracing::warn!(
                missing = ?missing,
                "Quasi-identifier columns not found, k-anonymity cannot be measured"
            );
            return KAnonymityResult::missing_columns(self.threshold, &missing);
        }

        let groups = grouping::Groups::build(batch, quasi_identifiers);
        let k = groups.min_size();
        let compliant = k >= self.threshold;

        let mut vulnerable: Vec<(usize, usize)> = groups
            .sizes()
            .enumerate()
            .filter(|(_, size)| *size < self.threshold)
            .collect();
        // Stable sort keeps first-appearance order among equal counts
        vulnerable.sort_by_key(|(_, size)| *size);

        let vulnerable_groups: Vec<VulnerableGroup> = vulnerable
            .into_iter()
            .map(|(group, count)| VulnerableGroup {
                values: quasi_identifiers
                    .iter()
                    .map(|c| c.as_ref().to_string())
                    .zip(groups.key(group).iter().cloned())
                    .collect(),
                count,
            })
            .collect();

        let recommendations = if compliant {
            Vec::new()
        } else {
            vec![
                format!("Dataset has k={}, but threshold is {}", k, self.threshold),
                format!("Found {} vulnerable combinations", vulnerable_groups.len()),
                "Consider: Generalization, Suppression, or Sampling".to_string(),
            ]
        };

        tracing::debug!(
            groups = groups.len(),
            k,
            threshold = self.threshold,
            vulnerable = vulnerable_groups.len(),
            "K-anonymity measured"
        );

        KAnonymityResult {
            k,
            threshold: self.threshold,
            compliant,
            vulnerable_groups,
            recommendations,
        }
    }
}
