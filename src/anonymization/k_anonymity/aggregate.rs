//! Grouped aggregate views with small-group suppression

use super::grouping::{self, Groups};
use super::KAnonymityChecker;
use crate::domain::{Batch, Column, Value, ValueKind};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Caller-supplied aggregation over the non-null and null values of a group
pub type CustomAggregate = Arc<dyn Fn(&[&Value]) -> Value + Send + Sync>;

/// Aggregation applied to one column of each group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Aggregation {
    /// Non-null values
    Count,
    /// Sum of numeric values
    Sum,
    /// Mean of numeric values
    Mean,
    Min,
    Max,
    /// A function registered on the [`AggregateView`] under this name
    ///
    /// The name is carried through unchanged. If no function is registered
    /// under it, every cell of the output column is null and a warning is
    /// logged when the view is built.
    Custom(String),
}

impl Aggregation {
    /// Resolve an aggregation name; unrecognized names become [`Aggregation::Custom`]
    pub fn resolve(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "count" => Self::Count,
            "sum" => Self::Sum,
            "mean" | "avg" | "average" => Self::Mean,
            "min" => Self::Min,
            "max" => Self::Max,
            _ => Self::Custom(name.trim().to_string()),
        }
    }

    fn output_kind(&self, source: ValueKind) -> ValueKind {
        match self {
            Self::Count | Self::Sum | Self::Mean => ValueKind::Number,
            Self::Min | Self::Max | Self::Custom(_) => source,
        }
    }

    fn apply(&self, values: &[&Value], custom: Option<&CustomAggregate>) -> Value {
        match self {
            Self::Count => Value::Number(values.iter().filter(|v| !v.is_null()).count() as f64),
            Self::Sum => {
                let numbers: Vec<f64> = values.iter().filter_map(|v| v.as_number()).collect();
                if numbers.is_empty() {
                    Value::Null
                } else {
                    Value::Number(numbers.iter().sum())
                }
            }
            Self::Mean => {
                let numbers: Vec<f64> = values.iter().filter_map(|v| v.as_number()).collect();
                if numbers.is_empty() {
                    Value::Null
                } else {
                    Value::Number(numbers.iter().sum::<f64>() / numbers.len() as f64)
                }
            }
            Self::Min => extreme(values, Ordering::Less),
            Self::Max => extreme(values, Ordering::Greater),
            Self::Custom(_) => custom.map_or(Value::Null, |f| f(values)),
        }
    }
}

impl From<&str> for Aggregation {
    fn from(name: &str) -> Self {
        Self::resolve(name)
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count => write!(f, "count"),
            Self::Sum => write!(f, "sum"),
            Self::Mean => write!(f, "mean"),
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
            Self::Custom(name) => write!(f, "{}", name),
        }
    }
}

fn extreme(values: &[&Value], wanted: Ordering) -> Value {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_null())
        .fold(None::<&Value>, |best, v| match best {
            Some(b) if v.compare(b) != Some(wanted) => Some(b),
            _ => Some(v),
        })
        .cloned()
        .unwrap_or(Value::Null)
}

/// Description of a grouped aggregate view
///
/// ```rust
/// use warden::anonymization::k_anonymity::{AggregateView, Aggregation};
///
/// let view = AggregateView::new(["region"])
///     .aggregate("income", Aggregation::Mean)
///     .aggregate("customer_id", "count")
///     .min_group_size(10);
/// ```
#[derive(Clone, Default)]
pub struct AggregateView {
    group_by: Vec<String>,
    aggregations: Vec<(String, Aggregation)>,
    min_group_size: Option<usize>,
    custom: HashMap<String, CustomAggregate>,
}

impl fmt::Debug for AggregateView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateView")
            .field("group_by", &self.group_by)
            .field("aggregations", &self.aggregations)
            .field("min_group_size", &self.min_group_size)
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AggregateView {
    pub fn new<I, S>(group_by: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            group_by: group_by.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Aggregate `column`; a later call for the same column replaces the earlier one
    pub fn aggregate(mut self, column: impl Into<String>, aggregation: impl Into<Aggregation>) -> Self {
        let column = column.into();
        let aggregation = aggregation.into();
        match self.aggregations.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = aggregation,
            None => self.aggregations.push((column, aggregation)),
        }
        self
    }

    /// Minimum group size to publish; the checker threshold when unset
    pub fn min_group_size(mut self, size: usize) -> Self {
        self.min_group_size = Some(size);
        self
    }

    /// Register a function for [`Aggregation::Custom`] lookups
    pub fn register_custom<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[&Value]) -> Value + Send + Sync + 'static,
    {
        self.custom.insert(name.into(), Arc::new(f));
        self
    }

    pub fn group_by(&self) -> &[String] {
        &self.group_by
    }

    pub fn aggregations(&self) -> &[(String, Aggregation)] {
        &self.aggregations
    }

    fn output_name(&self, column: &str, aggregation: &Aggregation) -> String {
        if self.group_by.iter().any(|g| g == column) {
            format!("{}_{}", column, aggregation)
        } else {
            column.to_string()
        }
    }
}

/// Output column plan: name, source column, aggregation
struct Planned<'a> {
    name: String,
    source: Option<&'a Column>,
    aggregation: Aggregation,
    kind: ValueKind,
}

impl KAnonymityChecker {
    /// Group `batch` and aggregate, publishing only groups of at least
    /// `min_group_size` rows
    ///
    /// Output rows are ordered by group key. Without aggregations the view has
    /// a `count` column of group sizes.
    pub fn aggregate_view(&self, batch: &Batch, view: &AggregateView) -> Batch {
        let min_size = view
            .min_group_size
            .filter(|&n| n > 0)
            .unwrap_or(self.threshold());

        let mut planned: Vec<Planned<'_>> = Vec::new();
        for (column, aggregation) in &view.aggregations {
            let source = batch.column(column);
            if source.is_none() {
                tracing::warn!(column = column.as_str(), "Aggregated column not found, skipping");
                continue;
            }
            if let Aggregation::Custom(name) = aggregation {
                if !view.custom.contains_key(name) {
                    tracing::warn!(
                        column = column.as_str(),
                        aggregation = name.as_str(),
                        "Unknown aggregation, cells will be null"
                    );
                }
            }
            planned.push(Planned {
                name: view.output_name(column, aggregation),
                source,
                aggregation: aggregation.clone(),
                kind: aggregation.output_kind(source.map_or(ValueKind::Text, Column::kind)),
            });
        }
        if view.aggregations.is_empty() {
            let name = if view.group_by.iter().any(|g| g == "count") {
                "group_count"
            } else {
                "count"
            };
            planned.push(Planned {
                name: name.to_string(),
                source: None,
                aggregation: Aggregation::Count,
                kind: ValueKind::Number,
            });
        }

        let missing = grouping::missing_columns(batch, &view.group_by);
        if !missing.is_empty() {
            tracing::warn!(missing = ?missing, "Group-by columns not found, view is empty");
            let mut columns: Vec<Column> = view
                .group_by
                .iter()
                .map(|g| {
                    let kind = batch.column(g).map_or(ValueKind::Text, Column::kind);
                    Column::from_parts(g.as_str(), kind, Vec::new())
                })
                .collect();
            columns.extend(
                planned
                    .iter()
                    .map(|p| Column::from_parts(p.name.as_str(), p.kind, Vec::new())),
            );
            return Batch::from_parts(dedupe(columns));
        }

        let groups = Groups::build(batch, &view.group_by);
        let published: Vec<usize> = groups
            .sorted_by_key()
            .into_iter()
            .filter(|&g| groups.rows(g).len() >= min_size)
            .collect();

        let mut columns: Vec<Column> = view
            .group_by
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                let source = batch.column(name)?;
                let values = published.iter().map(|&g| groups.key(g)[i].clone()).collect();
                Some(Column::from_parts(name.as_str(), source.kind(), values))
            })
            .collect();

        for plan in &planned {
            let custom = match &plan.aggregation {
                Aggregation::Custom(name) => view.custom.get(name),
                _ => None,
            };
            let values: Vec<Value> = published
                .iter()
                .map(|&g| {
                    let rows = groups.rows(g);
                    match plan.source {
                        Some(source) => {
                            let cells: Vec<&Value> =
                                rows.iter().map(|&r| &source.values()[r]).collect();
                            plan.aggregation.apply(&cells, custom)
                        }
                        None => Value::Number(rows.len() as f64),
                    }
                })
                .collect();
            columns.push(harmonize(&plan.name, plan.kind, values));
        }

        tracing::info!(
            groups = groups.len(),
            published = published.len(),
            suppressed = groups.len() - published.len(),
            min_group_size = min_size,
            "Aggregate view built"
        );

        Batch::from_parts(dedupe(columns))
    }
}

/// Build a column from aggregated cells, falling back to text when the
/// cells disagree on kind
fn harmonize(name: &str, expected: ValueKind, values: Vec<Value>) -> Column {
    let kind = values
        .iter()
        .find_map(Value::kind)
        .unwrap_or(expected);
    if values.iter().all(|v| v.kind().map_or(true, |k| k == kind)) {
        Column::from_parts(name, kind, values)
    } else {
        let values = values
            .into_iter()
            .map(|v| match v {
                Value::Null => Value::Null,
                other => Value::Text(other.to_string()),
            })
            .collect();
        Column::from_parts(name, ValueKind::Text, values)
    }
}

/// Drop later columns whose name repeats an earlier one
fn dedupe(columns: Vec<Column>) -> Vec<Column> {
    let mut seen = HashSet::new();
    columns
        .into_iter()
        .filter(|c| seen.insert(c.name().to_string()))
        .collect()
}
