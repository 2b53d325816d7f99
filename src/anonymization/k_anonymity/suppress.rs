//! Suppression and k-anonymity enforcement

use super::grouping::{self, Groups};
use super::{GeneralizationLevel, KAnonymityChecker, KAnonymityResult};
use crate::domain::Batch;

/// Options for [`KAnonymityChecker::ensure`]
#[derive(Debug, Clone, PartialEq)]
pub struct EnsureOptions {
    /// Columns generalized, in order, before the first check
    pub generalization: Vec<(String, GeneralizationLevel)>,
    /// Drop undersized groups when the generalized batch is not compliant
    pub apply_suppression: bool,
}

impl Default for EnsureOptions {
    fn default() -> Self {
        Self {
            generalization: Vec::new(),
            apply_suppression: true,
        }
    }
}

impl EnsureOptions {
    pub fn generalize(mut self, column: impl Into<String>, level: GeneralizationLevel) -> Self {
        self.generalization.push((column.into(), level));
        self
    }

    pub fn apply_suppression(mut self, apply: bool) -> Self {
        self.apply_suppression = apply;
        self
    }
}

impl KAnonymityChecker {
    /// Keep only rows whose quasi-identifier group has at least
    /// `min_group_size` rows (the threshold when `None` or 0)
    ///
    /// Surviving rows keep their original order. Missing columns yield an
    /// empty batch with the input schema.
    pub fn suppress<S: AsRef<str>>(
        &self,
        batch: &Batch,
        quasi_identifiers: &[S],
        min_group_size: Option<usize>,
    ) -> Batch {
        let min_size = min_group_size
            .filter(|&n| n > 0)
            .unwrap_or(self.threshold());

        let missing = grouping::missing_columns(batch, quasi_identifiers);
        if !missing.is_empty() {
            tracing::warn!(missing = ?missing, "Quasi-identifier columns not found, suppressing all rows");
            return batch.empty_like();
        }

        let groups = Groups::build(batch, quasi_identifiers);
        let mut keep: Vec<usize> = (0..groups.len())
            .filter(|&g| groups.rows(g).len() >= min_size)
            .flat_map(|g| groups.rows(g).iter().copied())
            .collect();
        keep.sort_unstable();

        tracing::info!(
            rows_before = batch.num_rows(),
            rows_after = keep.len(),
            suppressed = batch.num_rows() - keep.len(),
            min_group_size = min_size,
            "Suppression applied"
        );

        batch.take_rows(&keep)
    }

    /// Generalize, check, and suppress until the batch meets the threshold
    ///
    /// Returns the transformed batch and the check result for it. A batch that
    /// is already compliant after generalization is returned without
    /// suppression, so applying `ensure` twice changes nothing further.
    pub fn ensure<S: AsRef<str>>(
        &self,
        batch: &Batch,
        quasi_identifiers: &[S],
        options: &EnsureOptions,
    ) -> (Batch, KAnonymityResult) {
        let mut working = batch.clone();
        for (column, level) in &options.generalization {
            working = self.generalize(&working, column, *level);
        }

        let result = self.check(&working, quasi_identifiers);
        if result.compliant || !options.apply_suppression {
            crate::log_k_anonymity_result!(result);
            return (working, result);
        }

        let suppressed = self.suppress(&working, quasi_identifiers, None);
        let result = self.check(&suppressed, quasi_identifiers);
        crate::log_k_anonymity_result!(result);
        (suppressed, result)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::grouped_batch;
    use super::*;
    use crate::domain::{Column, Value};

    #[test]
    fn test_suppress_drops_small_groups() {
        let checker = KAnonymityChecker::new(5);
        let batch = grouped_batch();
        let out = checker.suppress(&batch, &["zip", "age_band"], None);

        assert_eq!(out.num_rows(), 18);
        let result = checker.check(&out, &["zip", "age_band"]);
        assert_eq!(result.k, 5);
        assert!(result.compliant);
        assert_eq!(batch.num_rows(), 20);
    }

    #[test]
    fn test_suppress_preserves_row_order() {
        let checker = KAnonymityChecker::new(5);
        let out = checker.suppress(&grouped_batch(), &["zip", "age_band"], None);
        let spend: Vec<f64> = out
            .column("spend")
            .unwrap()
            .values()
            .iter()
            .filter_map(Value::as_number)
            .collect();
        let mut sorted = spend.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(spend, sorted);
        assert!(!spend.contains(&50.0));
    }

    #[test]
    fn test_suppress_custom_group_size() {
        let checker = KAnonymityChecker::new(5);
        let out = checker.suppress(&grouped_batch(), &["zip", "age_band"], Some(6));
        assert_eq!(out.num_rows(), 8);

        let out = checker.suppress(&grouped_batch(), &["zip", "age_band"], Some(0));
        assert_eq!(out.num_rows(), 18);
    }

    #[test]
    fn test_suppress_missing_columns_empties_batch() {
        let checker = KAnonymityChecker::new(5);
        let batch = grouped_batch();
        let out = checker.suppress(&batch, &["zip", "gender"], None);
        assert_eq!(out.num_rows(), 0);
        assert_eq!(out.column_names(), batch.column_names());
    }

    #[test]
    fn test_suppress_every_group_undersized_keeps_schema() {
        let checker = KAnonymityChecker::new(5);
        let batch = grouped_batch();
        let out = checker.suppress(&batch, &["zip", "age_band"], Some(9));

        assert_eq!(out.num_rows(), 0);
        assert_eq!(out.column_names(), batch.column_names());
        for name in batch.column_names() {
            assert_eq!(
                out.column(name).unwrap().kind(),
                batch.column(name).unwrap().kind()
            );
        }
    }

    #[test]
    fn test_ensure_with_no_qualifying_group_is_empty() {
        let checker = KAnonymityChecker::new(9);
        let batch = grouped_batch();
        let (out, result) = checker.ensure(&batch, &["zip", "age_band"], &EnsureOptions::default());

        assert_eq!(out.num_rows(), 0);
        assert_eq!(out.column_names(), batch.column_names());
        assert!(!result.compliant);
    }

    #[test]
    fn test_ensure_suppresses_when_needed() {
        let checker = KAnonymityChecker::new(5);
        let (out, result) = checker.ensure(
            &grouped_batch(),
            &["zip", "age_band"],
            &EnsureOptions::default(),
        );
        assert_eq!(out.num_rows(), 18);
        assert!(result.compliant);
    }

    #[test]
    fn test_ensure_generalization_can_avoid_suppression() {
        let batch = Batch::new(vec![Column::numbers(
            "age",
            [31.0, 34.0, 38.0, 42.0, 45.0, 47.0].map(Some),
        )])
        .unwrap();
        let checker = KAnonymityChecker::new(3);
        let options = EnsureOptions::default().generalize("age", GeneralizationLevel::Low);

        let (out, result) = checker.ensure(&batch, &["age"], &options);
        assert_eq!(out.num_rows(), 6);
        assert_eq!(result.k, 3);
    }

    #[test]
    fn test_ensure_is_a_fixpoint() {
        let checker = KAnonymityChecker::new(5);
        let options = EnsureOptions::default();
        let (once, _) = checker.ensure(&grouped_batch(), &["zip", "age_band"], &options);
        let (twice, result) = checker.ensure(&once, &["zip", "age_band"], &options);
        assert_eq!(once, twice);
        assert!(result.compliant);
    }

    #[test]
    fn test_ensure_without_suppression_reports_violation() {
        let checker = KAnonymityChecker::new(5);
        let options = EnsureOptions::default().apply_suppression(false);
        let (out, result) = checker.ensure(&grouped_batch(), &["zip", "age_band"], &options);
        assert_eq!(out.num_rows(), 20);
        assert!(!result.compliant);
    }
}
