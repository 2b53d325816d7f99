//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::WardenConfig;
use super::secret_string;
use crate::domain::errors::WardenError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into WardenConfig
/// 4. Applies environment variable overrides (WARDEN_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`WardenError::Configuration`] if the file cannot be read or
/// parsed, a referenced environment variable is unset, an override cannot be
/// parsed, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use warden::config::loader::load_config;
///
/// let config = load_config("warden.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<WardenConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(WardenError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        WardenError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text
///
/// Same pipeline as [`load_config`] minus the file read.
pub fn load_config_from_str(contents: &str) -> Result<WardenConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: WardenConfig = toml::from_str(&contents)
        .map_err(|e| WardenError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        WardenError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Every missing variable is reported in
/// one error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| WardenError::Configuration(format!("Invalid substitution pattern: {}", e)))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    cap[0].to_string()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(WardenError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    let mut result = lines.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

/// Parses `name` into `target` when the variable is set
fn override_from_env<T: FromStr>(name: &str, target: &mut T) -> Result<()> {
    if let Ok(val) = std::env::var(name) {
        *target = val.parse().map_err(|_| {
            WardenError::Configuration(format!("Invalid value for {}: '{}'", name, val))
        })?;
    }
    Ok(())
}

/// Applies environment variable overrides using WARDEN_* prefix
///
/// Environment variables follow the pattern: WARDEN_<SECTION>_<KEY>
/// For example: WARDEN_K_ANONYMITY_THRESHOLD, WARDEN_PSEUDONYMIZATION_SECRET
fn apply_env_overrides(config: &mut WardenConfig) -> Result<()> {
    // Application overrides
    override_from_env("WARDEN_APPLICATION_LOG_LEVEL", &mut config.application.log_level)?;

    // Detection overrides
    override_from_env(
        "WARDEN_DETECTION_MIN_CONFIDENCE",
        &mut config.detection.min_confidence,
    )?;
    override_from_env("WARDEN_DETECTION_SAMPLE_SIZE", &mut config.detection.sample_size)?;
    if let Ok(val) = std::env::var("WARDEN_DETECTION_PATTERN_LIBRARY") {
        config.detection.pattern_library = Some(PathBuf::from(val));
    }

    // K-anonymity overrides
    override_from_env("WARDEN_K_ANONYMITY_THRESHOLD", &mut config.k_anonymity.threshold)?;
    override_from_env(
        "WARDEN_K_ANONYMITY_APPLY_SUPPRESSION",
        &mut config.k_anonymity.apply_suppression,
    )?;

    // Pseudonymization overrides
    if let Ok(val) = std::env::var("WARDEN_PSEUDONYMIZATION_SECRET") {
        config.pseudonymization.secret = secret_string(val);
    }
    override_from_env(
        "WARDEN_PSEUDONYMIZATION_DETERMINISTIC",
        &mut config.pseudonymization.deterministic,
    )?;
    override_from_env(
        "WARDEN_PSEUDONYMIZATION_CACHE_CAPACITY",
        &mut config.pseudonymization.cache_capacity,
    )?;

    // Quality overrides
    override_from_env(
        "WARDEN_QUALITY_MIN_QUALITY_SCORE",
        &mut config.quality.min_quality_score,
    )?;

    // Audit overrides
    override_from_env("WARDEN_AUDIT_ENABLED", &mut config.audit.enabled)?;
    override_from_env("WARDEN_AUDIT_LOG_PATH", &mut config.audit.log_path)?;
    override_from_env("WARDEN_AUDIT_ACTOR", &mut config.audit.actor)?;

    // Storage overrides
    override_from_env("WARDEN_STORAGE_DATA_DIR", &mut config.storage.data_dir)?;

    // Logging overrides
    override_from_env("WARDEN_LOGGING_LOCAL_ENABLED", &mut config.logging.local_enabled)?;
    override_from_env("WARDEN_LOGGING_LOCAL_PATH", &mut config.logging.local_path)?;
    override_from_env(
        "WARDEN_LOGGING_LOCAL_ROTATION",
        &mut config.logging.local_rotation,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("WARDEN_LOADER_TEST_VAR", "test_value");
        let input = "secret = \"${WARDEN_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "secret = \"test_value\"");
        std::env::remove_var("WARDEN_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("WARDEN_LOADER_MISSING_VAR");
        let input = "secret = \"${WARDEN_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("WARDEN_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("WARDEN_LOADER_COMMENTED_VAR");
        let input = "# secret = \"${WARDEN_LOADER_COMMENTED_VAR}\"\n";
        assert_eq!(substitute_env_vars(input).unwrap(), input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-warden.toml");
        assert!(matches!(result, Err(WardenError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[detection]
min_confidence = 0.8
sample_size = 500

[k_anonymity]
threshold = 3

[pseudonymization]
secret = "a long enough passphrase"
deterministic = false
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.detection.sample_size, 500);
        assert_eq!(config.k_anonymity.threshold, 3);
        assert!(!config.pseudonymization.deterministic);
        assert_eq!(
            config.pseudonymization.secret.expose_secret().as_ref(),
            "a long enough passphrase"
        );
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let toml_content = r#"
[k_anonymity]
threshold = 0

[pseudonymization]
secret = "a long enough passphrase"
"#;
        let err = load_config_from_str(toml_content).unwrap_err();
        assert!(err.to_string().contains("k_anonymity.threshold"));
    }

    #[test]
    fn test_load_config_requires_secret() {
        let err = load_config_from_str("[application]\nlog_level = \"info\"\n").unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }
}
