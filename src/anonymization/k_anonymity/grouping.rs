//! Row grouping by column values

use crate::domain::{Batch, Column, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Names from `columns` that `batch` does not have
pub(crate) fn missing_columns<'a, S: AsRef<str>>(batch: &Batch, columns: &'a [S]) -> Vec<&'a str> {
    columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !batch.has_column(name))
        .collect()
}

/// Rows partitioned by their values in a set of columns
///
/// Groups are numbered in order of first appearance and member rows are kept
/// in ascending order.
#[derive(Debug)]
pub(crate) struct Groups {
    keys: Vec<Vec<Value>>,
    members: Vec<Vec<usize>>,
}

impl Groups {
    /// Group the rows of `batch`; every name in `columns` must exist
    pub(crate) fn build<S: AsRef<str>>(batch: &Batch, columns: &[S]) -> Self {
        let columns: Vec<&Column> = columns
            .iter()
            .filter_map(|name| batch.column(name.as_ref()))
            .collect();

        let mut index: HashMap<Vec<Value>, usize> = HashMap::new();
        let mut keys = Vec::new();
        let mut members: Vec<Vec<usize>> = Vec::new();

        for row in 0..batch.num_rows() {
            let key: Vec<Value> = columns.iter().map(|c| c.values()[row].clone()).collect();
            match index.get(&key) {
                Some(&group) => members[group].push(row),
                None => {
                    index.insert(key.clone(), keys.len());
                    keys.push(key);
                    members.push(vec![row]);
                }
            }
        }

        Self { keys, members }
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn key(&self, group: usize) -> &[Value] {
        &self.keys[group]
    }

    pub(crate) fn rows(&self, group: usize) -> &[usize] {
        &self.members[group]
    }

    pub(crate) fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().map(Vec::len)
    }

    /// Size of the smallest group, 0 when there are no rows
    pub(crate) fn min_size(&self) -> usize {
        self.sizes().min().unwrap_or(0)
    }

    /// Group numbers ordered by key, nulls last
    pub(crate) fn sorted_by_key(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| compare_keys(&self.keys[a], &self.keys[b]));
        order
    }
}

fn compare_keys(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = match (x.is_null(), y.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => x.compare(y).unwrap_or(Ordering::Equal),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
