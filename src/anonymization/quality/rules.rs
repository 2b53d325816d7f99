//! Data-quality rules

use crate::domain::{Result, Value, ValueKind, WardenError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How a failed rule affects the overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Rejects the batch
    #[default]
    Error,
    /// Flagged but allowed
    Warning,
    /// Informational only
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            other => Err(format!("Unknown severity '{}'", other)),
        }
    }
}

/// What a rule checks
#[derive(Debug, Clone)]
pub enum QualityCheck {
    NotNull,
    Unique,
    Range { min: Option<f64>, max: Option<f64> },
    /// Values must match `pattern` from their first character
    Format { pattern: String, regex: Regex },
    /// Values must be members of `allowed`
    ReferentialIntegrity { allowed: HashSet<Value> },
}

/// A named check against one column
#[derive(Debug, Clone)]
pub struct QualityRule {
    pub name: String,
    pub description: String,
    pub column: String,
    pub severity: Severity,
    pub check: QualityCheck,
}

impl QualityRule {
    fn build(column: &str, suffix: &str, description: String, check: QualityCheck) -> Self {
        Self {
            name: format!("{}_{}", column, suffix),
            description,
            column: column.to_string(),
            severity: Severity::Error,
            check,
        }
    }

    pub fn not_null(column: &str) -> Self {
        Self::build(
            column,
            "not_null",
            format!("Check that {} contains no null values", column),
            QualityCheck::NotNull,
        )
    }

    pub fn unique(column: &str) -> Self {
        Self::build(
            column,
            "unique",
            format!("Check that {} contains unique values", column),
            QualityCheck::Unique,
        )
    }

    pub fn range(column: &str, min: Option<f64>, max: Option<f64>) -> Self {
        let mut bounds = Vec::new();
        if let Some(min) = min {
            bounds.push(format!("min={}", min));
        }
        if let Some(max) = max {
            bounds.push(format!("max={}", max));
        }
        Self::build(
            column,
            "range",
            format!(
                "Check that {} values are within range [{}]",
                column,
                bounds.join(", ")
            ),
            QualityCheck::Range { min, max },
        )
    }

    /// Fails with a configuration error when `pattern` is not a valid regex
    pub fn format(column: &str, pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|e| {
            WardenError::Configuration(format!("Invalid format pattern for '{}': {}", column, e))
        })?;
        Ok(Self::build(
            column,
            "format",
            format!("Check that {} values match pattern {}", column, pattern),
            QualityCheck::Format {
                pattern: pattern.to_string(),
                regex,
            },
        ))
    }

    pub fn referential_integrity<I>(column: &str, allowed: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::build(
            column,
            "referential_integrity",
            format!("Check that {} values exist in reference set", column),
            QualityCheck::ReferentialIntegrity {
                allowed: allowed.into_iter().filter(|v| !v.is_null()).collect(),
            },
        )
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Evaluate against one column: `(passed, message, affected_rows)`
    pub(crate) fn evaluate(&self, values: &[Value], kind: ValueKind) -> (bool, String, usize) {
        let column = &self.column;
        match &self.check {
            QualityCheck::NotNull => {
                let nulls = values.iter().filter(|v| v.is_null()).count();
                if nulls == 0 {
                    (true, format!("All values in {} are non-null", column), 0)
                } else {
                    (false, format!("Found {} null values in {}", nulls, column), nulls)
                }
            }
            QualityCheck::Unique => {
                let mut seen = HashSet::new();
                let duplicates = values
                    .iter()
                    .filter(|v| !v.is_null())
                    .filter(|v| !seen.insert(*v))
                    .count();
                if duplicates == 0 {
                    (true, format!("All values in {} are unique", column), 0)
                } else {
                    (
                        false,
                        format!("Found {} duplicate values in {}", duplicates, column),
                        duplicates,
                    )
                }
            }
            QualityCheck::Range { min, max } => {
                if kind != ValueKind::Number {
                    return (
                        false,
                        format!("Column {} is {}, range checks need numbers", column, kind),
                        0,
                    );
                }
                let numbers: Vec<f64> = values.iter().filter_map(Value::as_number).collect();
                let below = min.map_or(0, |m| numbers.iter().filter(|&&n| n < m).count());
                let above = max.map_or(0, |m| numbers.iter().filter(|&&n| n > m).count());

                let mut errors = Vec::new();
                if below > 0 {
                    errors.push(format!("{} values below minimum {}", below, min.unwrap_or_default()));
                }
                if above > 0 {
                    errors.push(format!("{} values above maximum {}", above, max.unwrap_or_default()));
                }
                if errors.is_empty() {
                    (true, format!("All values in {} are within range", column), 0)
                } else {
                    (false, errors.join("; "), below + above)
                }
            }
            QualityCheck::Format { regex, .. } => {
                let invalid = values
                    .iter()
                    .filter(|v| !v.is_null())
                    .map(|v| v.to_string())
                    .filter(|s| !s.is_empty() && !regex.is_match(s))
                    .count();
                if invalid == 0 {
                    (true, format!("All values in {} match pattern", column), 0)
                } else {
                    (
                        false,
                        format!("Found {} values not matching pattern in {}", invalid, column),
                        invalid,
                    )
                }
            }
            QualityCheck::ReferentialIntegrity { allowed } => {
                let invalid = values
                    .iter()
                    .filter(|v| !v.is_null() && !allowed.contains(*v))
                    .count();
                if invalid == 0 {
                    (true, "All values satisfy referential integrity".to_string(), 0)
                } else {
                    (
                        false,
                        format!("Found {} values not in reference set", invalid),
                        invalid,
                    )
                }
            }
        }
    }
}

/// Serialized rule form used by rule files
///
/// ```toml
/// [[rule]]
/// column = "age"
/// check = "range"
/// min = 0
/// max = 120
/// severity = "warning"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDefinition {
    pub column: String,
    pub check: String,
    #[serde(default)]
    pub severity: Severity,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<String>,
    #[serde(default)]
    pub allowed: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default, rename = "rule")]
    rules: Vec<RuleDefinition>,
}

impl RuleDefinition {
    pub fn into_rule(self) -> Result<QualityRule> {
        let rule = match self.check.as_str() {
            "not_null" => QualityRule::not_null(&self.column),
            "unique" => QualityRule::unique(&self.column),
            "range" => {
                if self.min.is_none() && self.max.is_none() {
                    return Err(WardenError::Configuration(format!(
                        "Range rule on '{}' needs min or max",
                        self.column
                    )));
                }
                QualityRule::range(&self.column, self.min, self.max)
            }
            "format" => {
                let pattern = self.pattern.as_deref().ok_or_else(|| {
                    WardenError::Configuration(format!(
                        "Format rule on '{}' needs a pattern",
                        self.column
                    ))
                })?;
                QualityRule::format(&self.column, pattern)?
            }
            "referential_integrity" => {
                let allowed = self.allowed.iter().filter_map(|raw| match raw {
                    serde_json::Value::String(s) => Some(Value::text(s.as_str())),
                    serde_json::Value::Number(n) => n.as_f64().map(Value::Number),
                    _ => None,
                });
                QualityRule::referential_integrity(&self.column, allowed.collect::<Vec<_>>())
            }
            other => {
                return Err(WardenError::Configuration(format!(
                    "Unknown quality check '{}' on '{}'",
                    other, self.column
                )))
            }
        };
        Ok(rule.with_severity(self.severity))
    }
}

/// Parse `[[rule]]` tables from TOML content
pub fn rules_from_toml(content: &str) -> Result<Vec<QualityRule>> {
    let file: RuleFile = toml::from_str(content)
        .map_err(|e| WardenError::Configuration(format!("Failed to parse quality rules: {}", e)))?;
    file.rules.into_iter().map(RuleDefinition::into_rule).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[Option<f64>]) -> Vec<Value> {
        values.iter().map(|v| Value::from(*v)).collect()
    }

    #[test]
    fn test_not_null() {
        let rule = QualityRule::not_null("age");
        let (passed, message, affected) =
            rule.evaluate(&numbers(&[Some(1.0), None, None]), ValueKind::Number);
        assert!(!passed);
        assert_eq!(affected, 2);
        assert_eq!(message, "Found 2 null values in age");
    }

    #[test]
    fn test_unique_ignores_nulls() {
        let rule = QualityRule::unique("id");
        let values = numbers(&[Some(1.0), Some(2.0), Some(1.0), None, None]);
        let (passed, _, affected) = rule.evaluate(&values, ValueKind::Number);
        assert!(!passed);
        assert_eq!(affected, 1);
    }

    #[test]
    fn test_range() {
        let rule = QualityRule::range("age", Some(0.0), Some(120.0));
        let values = numbers(&[Some(-1.0), Some(40.0), Some(130.0), Some(150.0)]);
        let (passed, message, affected) = rule.evaluate(&values, ValueKind::Number);
        assert!(!passed);
        assert_eq!(affected, 3);
        assert_eq!(message, "1 values below minimum 0; 2 values above maximum 120");
        assert!(rule.description.contains("[min=0, max=120]"));
    }

    #[test]
    fn test_range_on_text_column_fails() {
        let rule = QualityRule::range("city", Some(0.0), None);
        let (passed, _, _) = rule.evaluate(&[Value::text("Oslo")], ValueKind::Text);
        assert!(!passed);
    }

    #[test]
    fn test_format_is_anchored_at_start() {
        let rule = QualityRule::format("zip", r"\d{4}").unwrap();
        let values = vec![Value::text("0150"), Value::text("NO-0150"), Value::text("")];
        let (passed, _, affected) = rule.evaluate(&values, ValueKind::Text);
        assert!(!passed);
        assert_eq!(affected, 1);
    }

    #[test]
    fn test_referential_integrity() {
        let rule = QualityRule::referential_integrity(
            "plan",
            [Value::text("gold"), Value::text("basic")],
        );
        let values = vec![Value::text("gold"), Value::text("platinum"), Value::Null];
        let (passed, _, affected) = rule.evaluate(&values, ValueKind::Text);
        assert!(!passed);
        assert_eq!(affected, 1);
    }

    #[test]
    fn test_rules_from_toml() {
        let toml = r#"
            [[rule]]
            column = "email"
            check = "not_null"

            [[rule]]
            column = "age"
            check = "range"
            min = 0
            max = 120
            severity = "warning"

            [[rule]]
            column = "plan"
            check = "referential_integrity"
            allowed = ["gold", "basic"]
        "#;
        let rules = rules_from_toml(toml).unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].severity, Severity::Error);
        assert_eq!(rules[1].severity, Severity::Warning);
        assert_eq!(rules[2].name, "plan_referential_integrity");
    }

    #[test]
    fn test_unknown_check_rejected() {
        let toml = r#"
            [[rule]]
            column = "age"
            check = "plausible"
        "#;
        assert!(rules_from_toml(toml).is_err());
    }
}
