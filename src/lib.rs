// Warden - Privacy Anonymization Engine
// Copyright (c) 2025 Warden Contributors
// Licensed under the MIT License

//! # Warden - Privacy Anonymization Engine
//!
//! Warden prepares tabular datasets for sharing under data-protection rules.
//!
//! ## Overview
//!
//! This library provides:
//! - **Detecting** personally identifiable information column by column
//! - **Measuring and enforcing** k-anonymity over quasi-identifiers
//! - **Pseudonymizing** values with reversible, keyed tokens
//! - **Validating** data quality and **auditing** every step
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Detector, k-anonymity engine, pseudonymizer, quality, audit
//! - [`adapters`] - Dataset storage (JSON files)
//! - [`domain`] - Tabular data model and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use warden::adapters::{BatchSource, JsonFileStore};
//! use warden::anonymization::{ComplianceEngine, JsonLinesLedger, ProcessRequest};
//! use warden::config::load_config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("warden.toml")?;
//!     let store = JsonFileStore::new(&config.storage.data_dir);
//!     let batch = store.read("customers", None).await?;
//!
//!     let mut engine = ComplianceEngine::new(&config)?;
//!     let mut ledger = JsonLinesLedger::new(&config.audit.log_path, config.audit.enabled)?;
//!     let request = ProcessRequest::new("customers").quasi_identifiers(["zip", "age_band"]);
//!     let (published, report) = engine.process(&batch, &request, &mut ledger)?;
//!
//!     println!("{}", report.format_console());
//!     println!("{} rows ready to publish", published.num_rows());
//!     Ok(())
//! }
//! ```
//!
//! ## Pseudonymization
//!
//! ```rust
//! use warden::anonymization::Pseudonymizer;
//! use warden::config::secret_string;
//!
//! # fn example() -> warden::domain::Result<()> {
//! let mut p = Pseudonymizer::new(&secret_string("correct horse battery".to_string()))?;
//! let token = p.pseudonymize("ana@example.com", true)?;
//! assert_eq!(p.depseudonymize(&token)?, "ana@example.com");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], whose error type is
//! [`domain::WardenError`]. The CLI converts them into exit codes.

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
