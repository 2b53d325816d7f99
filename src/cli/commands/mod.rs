//! CLI command implementations
//!
//! Every command returns an exit code: 0 success, 1 check failed,
//! 2 configuration error, 5 fatal error.

pub mod aggregate;
pub mod check;
pub mod init;
pub mod process;
pub mod scan;
pub mod validate;

use crate::anonymization::audit::JsonLinesLedger;
use crate::anonymization::k_anonymity::{Aggregation, GeneralizationLevel};
use crate::config::{load_config, WardenConfig};

/// Load configuration, printing the failure instead of propagating it
pub(crate) fn load_config_or_report(config_path: &str) -> Option<WardenConfig> {
    match load_config(config_path) {
        Ok(config) => Some(config),
        Err(e) => {
            crate::log_error_with_context!(&e, "Failed to load configuration");
            eprintln!("❌ Failed to load configuration: {e}");
            None
        }
    }
}

/// Audit ledger configured by `[audit]`
pub(crate) fn open_ledger(config: &WardenConfig) -> crate::domain::Result<JsonLinesLedger> {
    JsonLinesLedger::new(&config.audit.log_path, config.audit.enabled)
}

/// Parse `column=level`
pub(crate) fn parse_generalization(s: &str) -> Result<(String, GeneralizationLevel), String> {
    let (column, level) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=LEVEL, got '{s}'"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column in '{s}'"));
    }
    Ok((column.to_string(), level.trim().parse()?))
}

/// Parse `column=aggregation`
pub(crate) fn parse_aggregation(s: &str) -> Result<(String, Aggregation), String> {
    let (column, agg) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COLUMN=AGGREGATION, got '{s}'"))?;
    let (column, agg) = (column.trim(), agg.trim());
    if column.is_empty() || agg.is_empty() {
        return Err(format!("missing column or aggregation in '{s}'"));
    }
    Ok((column.to_string(), Aggregation::resolve(agg)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("zip=medium", "zip", GeneralizationLevel::Medium; "medium")]
    #[test_case(" age = high ", "age", GeneralizationLevel::High; "trimmed")]
    fn test_parse_generalization(input: &str, column: &str, level: GeneralizationLevel) {
        assert_eq!(
            parse_generalization(input).unwrap(),
            (column.to_string(), level)
        );
    }

    #[test_case("zip"; "no separator")]
    #[test_case("=low"; "no column")]
    #[test_case("zip=extreme"; "unknown level")]
    fn test_parse_generalization_invalid(input: &str) {
        assert!(parse_generalization(input).is_err());
    }

    #[test]
    fn test_parse_aggregation() {
        assert_eq!(
            parse_aggregation("spend=avg").unwrap(),
            ("spend".to_string(), Aggregation::Mean)
        );
        assert!(parse_aggregation("spend").is_err());
    }
}
