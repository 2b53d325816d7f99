//! Privacy anonymization for tabular datasets
//!
//! # Architecture
//!
//! - **Detection**: registry-driven PII classification over a row sample
//! - **K-anonymity**: measurement, generalization, suppression and aggregate views
//! - **Pseudonymization**: reversible AES-256-GCM tokens under a configured secret
//! - **Quality**: severity-tagged data-quality rules
//! - **Audit**: structured facts with hashed values, persisted by an [`EventLedger`]
//!
//! [`ComplianceEngine`] runs these as one pipeline.
//!
//! # Usage
//!
//! ```rust,ignore
//! use warden::anonymization::{ComplianceEngine, ProcessRequest, MemoryLedger};
//!
//! let mut engine = ComplianceEngine::new(&config)?;
//! let (published, report) = engine.process(&batch, &ProcessRequest::new("customers"), &mut MemoryLedger::new())?;
//! ```

pub mod audit;
pub mod detector;
pub mod engine;
pub mod k_anonymity;
pub mod models;
pub mod pseudonymizer;
pub mod quality;
pub mod report;

// Re-export main types
pub use audit::{AuditEvent, AuditEventType, EventLedger, JsonLinesLedger, MemoryLedger};
pub use detector::{DetectorRegistry, PiiDetector, RegistryDetector};
pub use engine::{ComplianceEngine, ProcessRequest};
pub use k_anonymity::{
    AggregateView, Aggregation, EnsureOptions, GeneralizationLevel, KAnonymityChecker,
    KAnonymityResult, VulnerableGroup,
};
pub use models::{PiiClassification, PiiType};
pub use pseudonymizer::{Pseudonymizer, ReversalFailure};
pub use quality::{QualityRule, QualityValidator, Severity, ValidationReport};
pub use report::{ComplianceReport, PiiScanReport};
