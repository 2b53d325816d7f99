//! Logging and observability
//!
//! Structured logging with a console layer and optional rotating JSON files.
//!
//! # Example
//!
//! ```no_run
//! use warden::logging::init_logging;
//! use warden::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the completion of a PII scan
///
/// # Example
///
/// ```no_run
/// use warden::log_scan_complete;
///
/// log_scan_complete!(10_000, 1_000, 12, 3);
/// ```
#[macro_export]
macro_rules! log_scan_complete {
    ($rows:expr, $sampled_rows:expr, $columns:expr, $pii_columns:expr) => {
        tracing::info!(
            rows = $rows,
            sampled_rows = $sampled_rows,
            columns = $columns,
            pii_columns = $pii_columns,
            "PII scan complete"
        );
    };
}

/// Log a k-anonymity assessment
///
/// Compliant results log at info, the rest at warn.
#[macro_export]
macro_rules! log_k_anonymity_result {
    ($result:expr) => {{
        let result = &$result;
        if result.compliant {
            tracing::info!(
                k = result.k,
                threshold = result.threshold,
                "K-anonymity satisfied"
            );
        } else {
            tracing::warn!(
                k = result.k,
                threshold = result.threshold,
                vulnerable_groups = result.vulnerable_groups.len(),
                "K-anonymity violated"
            );
        }
    }};
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use warden::log_error_with_context;
/// use warden::domain::WardenError;
///
/// let error = WardenError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::anonymization::k_anonymity::KAnonymityChecker;
    use crate::domain::{Batch, Column, WardenError};

    #[test]
    fn test_macros_expand() {
        let batch = Batch::new(vec![Column::texts("zip", [Some("5000"), Some("5000")])]).unwrap();
        let result = KAnonymityChecker::new(2).check(&batch, &["zip"]);
        crate::log_k_anonymity_result!(result);
        crate::log_scan_complete!(2usize, 2usize, 1usize, 0usize);
        crate::log_error_with_context!(
            WardenError::Configuration("bad".to_string()),
            "loading"
        );
    }
}
