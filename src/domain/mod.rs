//! Domain models and types for Warden.
//!
//! The domain layer provides:
//! - **Cell values** ([`Value`], [`ValueKind`])
//! - **Tabular batches** ([`Column`], [`Batch`])
//! - **Error types** ([`WardenError`], [`BatchError`], [`PseudonymizationError`], [`QualityError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use warden::domain::{Batch, Column};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let batch = Batch::new(vec![
//!     Column::texts("email", [Some("ana@example.com"), None]),
//!     Column::numbers("age", [Some(34.0), Some(51.0)]),
//! ])?;
//! assert_eq!(batch.num_rows(), 2);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod errors;
pub mod result;
pub mod value;

pub use batch::{Batch, Column};
pub use errors::{BatchError, PseudonymizationError, QualityError, WardenError};
pub use result::Result;
pub use value::{Value, ValueKind};
