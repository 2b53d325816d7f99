//! Storage abstraction traits
//!
//! Adapters implement these to feed batches into the compliance pipeline and
//! publish the results.

use crate::domain::{Batch, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a sink treats an existing dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Replace the dataset
    #[default]
    Overwrite,
    /// Add rows; the schema must match
    Append,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Append => write!(f, "append"),
        }
    }
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "append" => Ok(Self::Append),
            other => Err(format!(
                "Invalid write mode '{}'. Must be one of: overwrite, append",
                other
            )),
        }
    }
}

/// Something batches can be read from
#[async_trait]
pub trait BatchSource: Send + Sync {
    /// Read `dataset`, keeping at most `limit` rows when given
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset does not exist or cannot be decoded.
    async fn read(&self, dataset: &str, limit: Option<usize>) -> Result<Batch>;

    /// Datasets available from this source, sorted by name
    async fn list(&self) -> Result<Vec<String>>;
}

/// Something batches can be written to
#[async_trait]
pub trait BatchSink: Send + Sync {
    /// Write `batch` as `dataset`
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failures, or when appending to a dataset with
    /// a different schema.
    async fn write(&self, dataset: &str, batch: &Batch, mode: WriteMode) -> Result<()>;

    /// Human-readable location of `dataset`, recorded on export events
    fn location(&self, dataset: &str) -> String;
}
