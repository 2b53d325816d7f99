//! Value generalization

use super::KAnonymityChecker;
use crate::domain::{Batch, Column, Value};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How coarse a generalized value is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneralizationLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl GeneralizationLevel {
    fn number_step(self) -> f64 {
        match self {
            Self::Low => 10.0,
            Self::Medium => 100.0,
            Self::High => 1000.0,
        }
    }
}

impl fmt::Display for GeneralizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for GeneralizationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "Unknown generalization level '{}' (expected low, medium or high)",
                other
            )),
        }
    }
}

/// Generalize a single value; the result has the same kind
///
/// | kind   | low              | medium           | high             |
/// |--------|------------------|------------------|------------------|
/// | number | floor to 10      | floor to 100     | floor to 1000    |
/// | date   | first of month   | first of year    | first of year    |
/// | text   | first 5 chars    | first 3 chars    | `***`            |
pub fn generalize_value(value: &Value, level: GeneralizationLevel) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Number(n) => {
            let step = level.number_step();
            Value::Number((n / step).floor() * step)
        }
        Value::Date(d) => {
            let month = match level {
                GeneralizationLevel::Low => d.month(),
                GeneralizationLevel::Medium | GeneralizationLevel::High => 1,
            };
            Value::Date(NaiveDate::from_ymd_opt(d.year(), month, 1).unwrap_or(*d))
        }
        Value::Text(s) => match level {
            GeneralizationLevel::Low => Value::Text(s.chars().take(5).collect()),
            GeneralizationLevel::Medium => Value::Text(s.chars().take(3).collect()),
            GeneralizationLevel::High => Value::Text("***".to_string()),
        },
    }
}

impl KAnonymityChecker {
    /// Copy of `batch` with `column` generalized to `level`
    ///
    /// A missing column yields an unchanged copy.
    pub fn generalize(&self, batch: &Batch, column: &str, level: GeneralizationLevel) -> Batch {
        let Some(source) = batch.column(column) else {
            tracing::warn!(column, "Column not found, skipping generalization");
            return batch.clone();
        };

        let values = source
            .values()
            .iter()
            .map(|v| generalize_value(v, level))
            .collect();
        let generalized = Column::from_parts(column, source.kind(), values);

        tracing::debug!(column, level = %level, "Column generalized");

        Batch::from_parts(
            batch
                .columns()
                .iter()
                .map(|c| {
                    if c.name() == column {
                        generalized.clone()
                    } else {
                        c.clone()
                    }
                })
                .collect(),
        )
    }
}
