//! Event ledgers

use super::event::AuditEvent;
use crate::domain::{Result, WardenError};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only sink for audit events
pub trait EventLedger: Send {
    fn append(&mut self, event: AuditEvent) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}

/// Ledger writing one JSON object per line
pub struct JsonLinesLedger {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl JsonLinesLedger {
    /// Open (or create) the ledger file; a disabled ledger discards events
    pub fn new(path: impl AsRef<Path>, enabled: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !enabled {
            return Ok(Self { path, writer: None });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                WardenError::Audit(format!(
                    "Failed to create audit log directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                WardenError::Audit(format!("Failed to open audit log {}: {}", path.display(), e))
            })?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}

impl EventLedger for JsonLinesLedger {
    fn append(&mut self, event: AuditEvent) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        let line = serde_json::to_string(&event)
            .map_err(|e| WardenError::Audit(format!("Failed to serialize audit event: {}", e)))?;
        writeln!(writer, "{}", line)
            .map_err(|e| WardenError::Audit(format!("Failed to write audit event: {}", e)))?;
        tracing::debug!(
            audit_id = %event.audit_id,
            event_type = %event.event_type,
            dataset = event.dataset.as_str(),
            "Audit event recorded"
        );
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer
                .flush()
                .map_err(|e| WardenError::Audit(format!("Failed to flush audit log: {}", e)))?;
        }
        Ok(())
    }
}

impl Drop for JsonLinesLedger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "Audit log not flushed on drop");
        }
    }
}

/// Ledger keeping events in memory
#[derive(Debug, Default)]
pub struct MemoryLedger {
    events: Vec<AuditEvent>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }
}

impl EventLedger for MemoryLedger {
    fn append(&mut self, event: AuditEvent) -> Result<()> {
        self.events.push(event);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
