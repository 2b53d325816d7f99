//! Scalar cell values
//!
//! A [`Value`] is one nullable cell of a tabular batch. Columns hold values of a
//! single [`ValueKind`]; `Null` is allowed in every column.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Date format used for serialized date values
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Logical type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Number,
    Date,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Number => write!(f, "number"),
            Self::Date => write!(f, "date"),
        }
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "string" => Ok(Self::Text),
            "number" | "numeric" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            _ => Err(format!("Unknown value kind: {s}")),
        }
    }
}

/// A nullable scalar cell
///
/// Equality and hashing are total so values can key quasi-identifier groups:
/// numbers compare by their normalized bit pattern (`0.0 == -0.0`, `NaN == NaN`).
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Value {
    /// Create a text value
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Kind of a non-null value
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Null => None,
            Self::Text(_) => Some(ValueKind::Text),
            Self::Number(_) => Some(ValueKind::Number),
            Self::Date(_) => Some(ValueKind::Date),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Compare two values of the same kind
    ///
    /// Returns `None` across kinds, for nulls, and for NaN.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Decode a JSON value as a cell of the given kind
    pub fn from_json(kind: ValueKind, raw: &serde_json::Value) -> Result<Self, String> {
        use serde_json::Value as Json;

        match (kind, raw) {
            (_, Json::Null) => Ok(Self::Null),
            (ValueKind::Text, Json::String(s)) => Ok(Self::Text(s.clone())),
            (ValueKind::Text, Json::Number(n)) => Ok(Self::Text(n.to_string())),
            (ValueKind::Text, Json::Bool(b)) => Ok(Self::Text(b.to_string())),
            (ValueKind::Number, Json::Number(n)) => n
                .as_f64()
                .map(Self::Number)
                .ok_or_else(|| format!("number out of range: {n}")),
            (ValueKind::Number, Json::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Self::Number)
                .map_err(|_| format!("not a number: {s:?}")),
            (ValueKind::Date, Json::String(s)) => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                .map(Self::Date)
                .map_err(|e| format!("invalid date {s:?}: {e}")),
            (kind, other) => Err(format!("expected {kind}, found {other}")),
        }
    }

    fn hash_bits(n: f64) -> u64 {
        if n == 0.0 {
            0.0f64.to_bits()
        } else if n.is_nan() {
            f64::NAN.to_bits()
        } else {
            n.to_bits()
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => Self::hash_bits(*a) == Self::hash_bits(*b),
            (Self::Date(a), Self::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Text(s) => s.hash(state),
            Self::Number(n) => Self::hash_bits(*n).hash(state),
            Self::Date(d) => d.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Date(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_zero_and_negative_zero_group_together() {
        let mut set = HashSet::new();
        set.insert(Value::Number(0.0));
        set.insert(Value::Number(-0.0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_display_integral_numbers_without_fraction() {
        assert_eq!(Value::Number(42.0).to_string(), "42");
        assert_eq!(Value::Number(4.5).to_string(), "4.5");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_from_json_by_kind() {
        assert_eq!(
            Value::from_json(ValueKind::Number, &json!(34)).unwrap(),
            Value::Number(34.0)
        );
        assert_eq!(
            Value::from_json(ValueKind::Date, &json!("1990-04-12")).unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(1990, 4, 12).unwrap())
        );
        assert!(Value::from_json(ValueKind::Date, &json!(12)).is_err());
        assert!(Value::from_json(ValueKind::Number, &json!(null))
            .unwrap()
            .is_null());
    }

    #[test]
    fn test_compare_within_kind_only() {
        assert_eq!(
            Value::Number(1.0).compare(&Value::Number(2.0)),
            Some(Ordering::Less)
        );
        assert_eq!(Value::Number(1.0).compare(&Value::text("1")), None);
    }

    #[test]
    fn test_serialize_date_as_iso_string() {
        let d = Value::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(serde_json::to_value(&d).unwrap(), json!("2024-01-05"));
    }
}
