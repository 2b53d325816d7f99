//! Table scanning over a row sample

use super::PiiDetector;
use crate::anonymization::report::PiiScanReport;
use crate::domain::{Batch, Value};
use rand::Rng;

/// Classify every column of `batch` using rows drawn from `rng`
///
/// When the batch has more than `sample_size` rows, one set of row indices is
/// drawn and shared by every column. Nulls are dropped from each column's
/// sample; numbers and dates are matched by their text rendering.
pub fn scan_table_with_rng<D, R>(
    detector: &D,
    batch: &Batch,
    sample_size: usize,
    rng: &mut R,
) -> PiiScanReport
where
    D: PiiDetector + ?Sized,
    R: Rng + ?Sized,
{
    let total_rows = batch.num_rows();
    let rows: Vec<usize> = if total_rows > sample_size {
        let mut rows = rand::seq::index::sample(rng, total_rows, sample_size).into_vec();
        rows.sort_unstable();
        rows
    } else {
        (0..total_rows).collect()
    };

    let mut report = PiiScanReport::new();

    for column in batch.columns() {
        let sample: Vec<Value> = rows
            .iter()
            .map(|&row| &column.values()[row])
            .filter(|v| !v.is_null())
            .map(|v| match v {
                Value::Text(_) => v.clone(),
                other => Value::Text(other.to_string()),
            })
            .collect();

        let classifications = detector.classify(column.name(), &sample, total_rows);
        tracing::debug!(
            column = column.name(),
            sampled = sample.len(),
            classifications = classifications.len(),
            "Column classified"
        );
        report.insert(column.name(), classifications);
    }

    crate::log_scan_complete!(total_rows, rows.len(), batch.num_columns(), report.pii_columns().len());

    report
}
