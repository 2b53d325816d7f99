//! Data models shared by the anonymization components

pub mod classification;

pub use classification::{PiiClassification, PiiType, MAX_SAMPLE_VALUES};
