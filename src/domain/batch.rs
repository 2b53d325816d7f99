//! Tabular batches
//!
//! A [`Batch`] is an ordered list of named, typed columns that all share the
//! same row count. Batches are value types: every transforming operation in
//! the crate returns a new batch and leaves its input untouched.

use crate::domain::errors::BatchError;
use crate::domain::value::{Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named column of values of one kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawColumn")]
pub struct Column {
    name: String,
    kind: ValueKind,
    values: Vec<Value>,
}

/// Serialized column form; values are decoded according to `kind`
#[derive(Debug, Deserialize)]
struct RawColumn {
    name: String,
    kind: ValueKind,
    values: Vec<serde_json::Value>,
}

impl TryFrom<RawColumn> for Column {
    type Error = BatchError;

    fn try_from(raw: RawColumn) -> Result<Self, Self::Error> {
        let values = raw
            .values
            .iter()
            .enumerate()
            .map(|(row, v)| {
                Value::from_json(raw.kind, v).map_err(|reason| BatchError::InvalidValue {
                    column: raw.name.clone(),
                    row,
                    reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Column::new(raw.name, raw.kind, values)
    }
}

impl Column {
    /// Create a column, checking every non-null value against `kind`
    pub fn new(
        name: impl Into<String>,
        kind: ValueKind,
        values: Vec<Value>,
    ) -> Result<Self, BatchError> {
        let name = name.into();
        for (row, value) in values.iter().enumerate() {
            if let Some(actual) = value.kind() {
                if actual != kind {
                    return Err(BatchError::KindMismatch {
                        column: name,
                        row,
                        expected: kind,
                        actual,
                    });
                }
            }
        }
        Ok(Self { name, kind, values })
    }

    /// Column whose values are known to match `kind`
    pub(crate) fn from_parts(name: impl Into<String>, kind: ValueKind, values: Vec<Value>) -> Self {
        debug_assert!(values.iter().all(|v| v.kind().map_or(true, |k| k == kind)));
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Text column from optional strings
    pub fn texts<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: ValueKind::Text,
            values: values
                .into_iter()
                .map(|v| v.map(|s| Value::Text(s.into())).unwrap_or(Value::Null))
                .collect(),
        }
    }

    /// Number column from optional floats
    pub fn numbers<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self {
            name: name.into(),
            kind: ValueKind::Number,
            values: values.into_iter().map(Value::from).collect(),
        }
    }

    /// Date column from optional dates
    pub fn dates<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<chrono::NaiveDate>>,
    {
        Self {
            name: name.into(),
            kind: ValueKind::Date,
            values: values.into_iter().map(Value::from).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of null cells
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Same name and kind, no rows
    pub fn empty_like(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            values: Vec::new(),
        }
    }

    /// Copy of the rows at `indices`, in that order
    pub fn take(&self, indices: &[usize]) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            values: indices.iter().map(|&i| self.values[i].clone()).collect(),
        }
    }
}

/// An ordered set of equally long columns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawBatch")]
pub struct Batch {
    columns: Vec<Column>,
}

#[derive(Debug, Deserialize)]
struct RawBatch {
    columns: Vec<Column>,
}

impl TryFrom<RawBatch> for Batch {
    type Error = BatchError;

    fn try_from(raw: RawBatch) -> Result<Self, Self::Error> {
        Batch::new(raw.columns)
    }
}

impl Batch {
    /// Create a batch, checking column lengths and name uniqueness
    pub fn new(columns: Vec<Column>) -> Result<Self, BatchError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(BatchError::DuplicateColumn(column.name.clone()));
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(BatchError::LengthMismatch {
                    column: bad.name.clone(),
                    expected,
                    actual: bad.len(),
                });
            }
        }

        Ok(Self { columns })
    }

    /// Batch whose columns are known to be unique and equally long
    pub(crate) fn from_parts(columns: Vec<Column>) -> Self {
        debug_assert!(Self::new(columns.clone()).is_ok());
        Self { columns }
    }

    /// Same schema, no rows
    pub fn empty_like(&self) -> Self {
        Self {
            columns: self.columns.iter().map(Column::empty_like).collect(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    /// Copy of the rows at `indices`, in that order
    pub fn take_rows(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
        }
    }

    /// Replace the column with the same name, keeping its position
    ///
    /// The replacement may change the column kind but not its length.
    pub fn with_column(&self, column: Column) -> Result<Self, BatchError> {
        let mut columns = self.columns.clone();
        match columns.iter().position(|c| c.name == column.name) {
            Some(idx) => columns[idx] = column,
            None => columns.push(column),
        }
        Self::new(columns)
    }

    /// Rows of `other` appended after the rows of `self`
    pub fn concat(&self, other: &Batch) -> Result<Self, BatchError> {
        if self.num_columns() == 0 {
            return Ok(other.clone());
        }
        let same_schema = self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(&other.columns)
                .all(|(a, b)| a.name == b.name && a.kind == b.kind);
        if !same_schema {
            return Err(BatchError::SchemaMismatch(format!(
                "cannot append [{}] to [{}]",
                other.column_names().join(", "),
                self.column_names().join(", ")
            )));
        }

        let columns = self
            .columns
            .iter()
            .zip(&other.columns)
            .map(|(a, b)| {
                let mut values = a.values.clone();
                values.extend(b.values.iter().cloned());
                Column {
                    name: a.name.clone(),
                    kind: a.kind,
                    values,
                }
            })
            .collect();
        Ok(Self { columns })
    }
}
