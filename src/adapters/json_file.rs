//! JSON file dataset store
//!
//! Each dataset is one `<dataset>.json` file under a root directory, holding
//! the column-oriented batch form. Writes go to a temporary sibling first and
//! are renamed into place.

use super::traits::{BatchSink, BatchSource, WriteMode};
use crate::domain::{Batch, Result, WardenError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Dataset store backed by a directory of JSON files
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding `dataset`
    ///
    /// Dataset names are plain file stems; separators and parent references
    /// are rejected.
    pub fn dataset_path(&self, dataset: &str) -> Result<PathBuf> {
        let valid = !dataset.is_empty()
            && dataset != "."
            && dataset != ".."
            && !dataset.contains(['/', '\\'])
            && !dataset.contains("..");
        if !valid {
            return Err(WardenError::Other(format!(
                "Invalid dataset name '{}'",
                dataset
            )));
        }
        Ok(self.root.join(format!("{dataset}.json")))
    }

    async fn load(&self, path: &Path, dataset: &str) -> Result<Batch> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                WardenError::Io(format!(
                    "Dataset '{}' not found at {}",
                    dataset,
                    path.display()
                ))
            } else {
                WardenError::Io(format!("Failed to read {}: {}", path.display(), e))
            }
        })?;
        let batch: Batch = serde_json::from_str(&contents).map_err(|e| {
            WardenError::Serialization(format!("Invalid dataset file {}: {}", path.display(), e))
        })?;
        Ok(batch)
    }
}

#[async_trait]
impl BatchSource for JsonFileStore {
    async fn read(&self, dataset: &str, limit: Option<usize>) -> Result<Batch> {
        let path = self.dataset_path(dataset)?;
        let batch = self.load(&path, dataset).await?;

        let batch = match limit {
            Some(limit) if limit < batch.num_rows() => {
                let rows: Vec<usize> = (0..limit).collect();
                batch.take_rows(&rows)
            }
            _ => batch,
        };

        tracing::debug!(
            dataset,
            path = %path.display(),
            rows = batch.num_rows(),
            columns = batch.num_columns(),
            "Dataset read"
        );
        Ok(batch)
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut datasets = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(datasets),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                datasets.push(stem.to_string());
            }
        }
        datasets.sort();
        Ok(datasets)
    }
}

#[async_trait]
impl BatchSink for JsonFileStore {
    async fn write(&self, dataset: &str, batch: &Batch, mode: WriteMode) -> Result<()> {
        let path = self.dataset_path(dataset)?;
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            WardenError::Io(format!(
                "Failed to create data directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let combined;
        let to_write = if mode == WriteMode::Append && tokio::fs::try_exists(&path).await? {
            let existing = self.load(&path, dataset).await?;
            combined = existing.concat(batch)?;
            &combined
        } else {
            batch
        };

        let json = serde_json::to_string_pretty(to_write)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::info!(
            dataset,
            path = %path.display(),
            mode = %mode,
            rows = to_write.num_rows(),
            "Dataset written"
        );
        Ok(())
    }

    fn location(&self, dataset: &str) -> String {
        self.root.join(format!("{dataset}.json")).display().to_string()
    }
}
