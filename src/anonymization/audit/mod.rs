//! Audit trail for compliance operations
//!
//! The core produces [`AuditEvent`] facts; an [`EventLedger`] persists them.
//! Event details carry column names, types, counts and SHA-256 hashes, never
//! raw values.

pub mod event;
pub mod ledger;

pub use event::{hash_value, AuditEvent, AuditEventType};
pub use ledger::{EventLedger, JsonLinesLedger, MemoryLedger};
