//! Column-level pseudonymization helpers

use super::Pseudonymizer;
use crate::domain::{Batch, Column, PseudonymizationError, Result, Value, ValueKind, WardenError};
use serde::Serialize;

/// A cell that could not be reversed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReversalFailure {
    pub row: usize,
    pub error: String,
}

impl Pseudonymizer {
    /// Copy of `batch` with `column` replaced by tokens
    ///
    /// Nulls stay null and non-text values are tokenized from their text
    /// rendering, so the output column is always text. A missing column yields
    /// an unchanged copy.
    pub fn pseudonymize_column(
        &mut self,
        batch: &Batch,
        column: &str,
        deterministic: bool,
    ) -> Result<Batch> {
        let Some(source) = batch.column(column) else {
            tracing::warn!(column, "Column not found, skipping pseudonymization");
            return Ok(batch.clone());
        };

        let mut values = Vec::with_capacity(source.len());
        for value in source.values() {
            values.push(match value {
                Value::Null => Value::Null,
                Value::Text(s) => Value::Text(self.pseudonymize(s, deterministic)?),
                other => Value::Text(self.pseudonymize(&other.to_string(), deterministic)?),
            });
        }

        tracing::debug!(
            column,
            rows = source.len(),
            nulls = source.null_count(),
            deterministic,
            "Column pseudonymized"
        );

        Ok(batch.with_column(Column::from_parts(column, ValueKind::Text, values))?)
    }

    /// Pseudonymize several columns in order
    pub fn pseudonymize_columns<S: AsRef<str>>(
        &mut self,
        batch: &Batch,
        columns: &[S],
        deterministic: bool,
    ) -> Result<Batch> {
        let mut out = batch.clone();
        for column in columns {
            out = self.pseudonymize_column(&out, column.as_ref(), deterministic)?;
        }
        Ok(out)
    }

    /// Copy of `batch` with the tokens in `column` reversed
    ///
    /// Cells that cannot be reversed are left as they are and reported with
    /// their row; one bad cell never stops the rest of the column.
    pub fn depseudonymize_column(
        &self,
        batch: &Batch,
        column: &str,
    ) -> Result<(Batch, Vec<ReversalFailure>)> {
        let Some(source) = batch.column(column) else {
            tracing::warn!(column, "Column not found, skipping depseudonymization");
            return Ok((batch.clone(), Vec::new()));
        };

        let mut failures = Vec::new();
        let mut values = Vec::with_capacity(source.len());
        for (row, value) in source.values().iter().enumerate() {
            let token = match value {
                Value::Null => {
                    values.push(Value::Null);
                    continue;
                }
                Value::Text(s) => s.clone(),
                other => other.to_string(),
            };
            match self.depseudonymize(&token) {
                Ok(original) => values.push(Value::Text(original)),
                Err(WardenError::Pseudonymization(e @ PseudonymizationError::Reversal { .. })) => {
                    failures.push(ReversalFailure {
                        row,
                        error: e.to_string(),
                    });
                    values.push(Value::Text(token));
                }
                Err(e) => return Err(e),
            }
        }

        if !failures.is_empty() {
            tracing::warn!(
                column,
                failed = failures.len(),
                rows = source.len(),
                "Some values could not be depseudonymized"
            );
        }

        let out = batch.with_column(Column::from_parts(column, ValueKind::Text, values))?;
        Ok((out, failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn pseudonymizer() -> Pseudonymizer {
        Pseudonymizer::new(&secret_string("column helper passphrase".to_string())).unwrap()
    }

    fn customers() -> Batch {
        Batch::new(vec![
            Column::texts("email", [Some("ana@example.com"), None, Some("bo@example.com")]),
            Column::numbers("ssn", [Some(123456789.0), Some(987654321.0), None]),
            Column::texts("city", [Some("Oslo"), Some("Bergen"), Some("Oslo")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_pseudonymize_columns_keeps_shape() {
        let mut p = pseudonymizer();
        let batch = customers();
        let out = p.pseudonymize_columns(&batch, &["email", "ssn"], true).unwrap();

        assert_eq!(out.num_rows(), 3);
        assert_eq!(out.column_names(), batch.column_names());
        assert_eq!(out.column("city"), batch.column("city"));
        assert_eq!(out.column("ssn").unwrap().kind(), ValueKind::Text);

        let email = out.column("email").unwrap();
        assert!(email.values()[1].is_null());
        assert_ne!(email.values()[0], Value::text("ana@example.com"));
    }

    #[test]
    fn test_round_trip_numeric_column_as_text() {
        let mut p = pseudonymizer();
        let out = p.pseudonymize_column(&customers(), "ssn", false).unwrap();
        let (back, failures) = p.depseudonymize_column(&out, "ssn").unwrap();

        assert!(failures.is_empty());
        assert_eq!(back.column("ssn").unwrap().values()[0], Value::text("123456789"));
        assert!(back.column("ssn").unwrap().values()[2].is_null());
    }

    #[test]
    fn test_depseudonymize_collects_failures() {
        let mut p = pseudonymizer();
        let out = p.pseudonymize_column(&customers(), "city", true).unwrap();
        let (back, failures) = p.depseudonymize_column(&out, "email").unwrap();

        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].row, 0);
        assert_eq!(back.column("email").unwrap().values()[0], Value::text("ana@example.com"));
        assert_eq!(back.column("city").unwrap(), out.column("city").unwrap());
    }

    #[test]
    fn test_missing_column_is_skipped() {
        let mut p = pseudonymizer();
        let batch = customers();
        let out = p.pseudonymize_columns(&batch, &["phone"], true).unwrap();
        assert_eq!(out, batch);
    }
}
