//! External storage integrations for Warden.
//!
//! - [`traits`] - [`BatchSource`] / [`BatchSink`] capabilities
//! - [`json_file`] - JSON files under a data directory
//!
//! The core never touches storage; commands read a batch through a source,
//! run it through the engine, and hand the result to a sink.
//!
//! ```rust,no_run
//! use warden::adapters::{BatchSource, JsonFileStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = JsonFileStore::new("./data");
//! let batch = store.read("customers", Some(1000)).await?;
//! println!("{} rows", batch.num_rows());
//! # Ok(())
//! # }
//! ```

pub mod json_file;
pub mod traits;

pub use json_file::JsonFileStore;
pub use traits::{BatchSink, BatchSource, WriteMode};
