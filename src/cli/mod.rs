//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Warden using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Warden - privacy anonymization for tabular datasets
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(version, about, long_about = None)]
#[command(author = "Warden Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "warden.toml", env = "WARDEN_CONFIG", global = true)]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "WARDEN_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect PII in a dataset
    Scan(commands::scan::ScanArgs),

    /// Measure k-anonymity over quasi-identifiers
    Check(commands::check::CheckArgs),

    /// Validate, pseudonymize and anonymize a dataset, then publish it
    Process(commands::process::ProcessArgs),

    /// Publish per-group statistics of a dataset
    Aggregate(commands::aggregate::AggregateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Run the selected command, returning its exit code
    pub async fn execute(&self) -> anyhow::Result<i32> {
        match &self.command {
            Commands::Scan(args) => args.execute(&self.config).await,
            Commands::Check(args) => args.execute(&self.config).await,
            Commands::Process(args) => args.execute(&self.config).await,
            Commands::Aggregate(args) => args.execute(&self.config).await,
            Commands::ValidateConfig(args) => args.execute(&self.config).await,
            Commands::Init(args) => args.execute().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_scan() {
        let cli = Cli::parse_from(["warden", "scan", "customers"]);
        assert_eq!(cli.config, "warden.toml");
        assert!(matches!(cli.command, Commands::Scan(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["warden", "--config", "custom.toml", "scan", "customers"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["warden", "scan", "customers", "-l", "debug", "-c", "x.toml"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert_eq!(cli.config, "x.toml");
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["warden", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_aggregate() {
        let cli = Cli::parse_from([
            "warden", "aggregate", "customers", "-g", "zip", "--agg", "spend=sum",
        ]);
        let Commands::Aggregate(args) = cli.command else {
            panic!("expected aggregate command");
        };
        assert_eq!(args.group_by, vec!["zip"]);
        assert_eq!(args.aggregations.len(), 1);
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["warden", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
