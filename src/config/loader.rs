//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SyncConfig;
use super::secret::secret_string;
use crate::domain::errors::SyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Prefix of every override variable: `TABLESWAP_<SECTION>_<KEY>`
pub const ENV_PREFIX: &str = "TABLESWAP";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`SyncConfig`]
/// 4. Applies environment variable overrides (`TABLESWAP_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] if the file cannot be read, a referenced
/// variable is unset, the TOML is malformed, or validation fails. Validation
/// failures list every offending field.
///
/// # Examples
///
/// ```no_run
/// use tableswap::config::loader::load_config;
///
/// let config = load_config("tableswap.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Same as [`load_config`] for an in-memory document
pub fn load_config_str(contents: &str) -> Result<SyncConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: SyncConfig = toml::from_str(&contents)
        .map_err(|e| SyncError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    let mut issues = apply_env_overrides(&mut config);

    if let Err(e) = config.validate() {
        issues.push(e);
    }
    if !issues.is_empty() {
        return Err(SyncError::Configuration(format!(
            "Configuration validation failed: {}",
            issues.join("; ")
        )));
    }

    Ok(config)
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("static regex"))
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_regex();
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(SyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

/// Parses an override; a value that does not parse is recorded as an issue
fn env_parsed<T>(section: &str, key: &str, issues: &mut Vec<String>) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env(section, key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(e) => {
            issues.push(format!("{ENV_PREFIX}_{section}_{key}='{raw}': {e}"));
            None
        }
    }
}

fn env_argv(section: &str, key: &str) -> Option<Vec<String>> {
    env(section, key).map(|val| val.split_whitespace().map(str::to_string).collect())
}

/// Applies environment variable overrides using the `TABLESWAP_*` prefix
///
/// Variables follow the pattern `TABLESWAP_<SECTION>_<KEY>`, for example
/// `TABLESWAP_TARGET_CONNECTION_STRING` or `TABLESWAP_EXPORT_BATCH_SIZE`.
/// Numeric or boolean values that do not parse are returned as issues, and the
/// file value is left in place.
fn apply_env_overrides(config: &mut SyncConfig) -> Vec<String> {
    let mut issues = Vec::new();

    if let Some(val) = env("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Source overrides
    if let Some(val) = env("SOURCE", "SERVER") {
        config.source.server = val;
    }
    if let Some(val) = env("SOURCE", "DATABASE") {
        config.source.database = val;
    }
    if let Some(val) = env("SOURCE", "USERNAME") {
        config.source.username = val;
    }
    if let Some(val) = env("SOURCE", "PASSWORD") {
        config.source.password = Some(secret_string(val));
    }
    if let Some(val) = env("SOURCE", "EXPORT_QUERY") {
        config.source.export_query = val;
    }

    // Export overrides
    if let Some(val) = env("EXPORT", "ARTIFACT_PATH") {
        config.export.artifact_path = val;
    }
    if let Some(argv) = env_argv("EXPORT", "COMMAND") {
        config.export.command = argv;
    }
    if let Some(size) = env_parsed("EXPORT", "BATCH_SIZE", &mut issues) {
        config.export.batch_size = size;
    }

    // Target overrides
    if let Some(val) = env("TARGET", "CONNECTION_STRING") {
        config.target.connection_string = Some(secret_string(val));
    }
    if let Some(val) = env("TARGET", "BLUE_TABLE") {
        config.target.blue_table = val;
    }
    if let Some(val) = env("TARGET", "GREEN_TABLE") {
        config.target.green_table = val;
    }
    if let Some(val) = env("TARGET", "VIEW_NAME") {
        config.target.view_name = val;
    }
    if let Some(create) = env_parsed("TARGET", "CREATE_TABLES", &mut issues) {
        config.target.create_tables = create;
    }
    if let Some(max) = env_parsed("TARGET", "MAX_CONNECTIONS", &mut issues) {
        config.target.max_connections = max;
    }
    if let Some(secs) = env_parsed("TARGET", "CONNECTION_TIMEOUT_SECONDS", &mut issues) {
        config.target.connection_timeout_seconds = secs;
    }
    if let Some(secs) = env_parsed("TARGET", "STATEMENT_TIMEOUT_SECONDS", &mut issues) {
        config.target.statement_timeout_seconds = secs;
    }

    // Designation overrides
    if let Some(val) = env("DESIGNATION", "TABLE") {
        config.designation.table = val;
    }
    if let Some(val) = env("DESIGNATION", "KEY") {
        config.designation.key = val;
    }

    // Notification overrides
    if let Some(val) = env("NOTIFICATION", "WEBHOOK_URL") {
        config.notification.webhook_url = Some(val);
    }
    if let Some(secs) = env_parsed("NOTIFICATION", "TIMEOUT_SECONDS", &mut issues) {
        config.notification.timeout_seconds = secs;
    }

    if let Some(argv) = env_argv("LIFECYCLE", "TERMINATE_COMMAND") {
        config.lifecycle.terminate_command = argv;
    }

    // Logging overrides
    if let Some(enabled) = env_parsed("LOGGING", "LOCAL_ENABLED", &mut issues) {
        config.logging.local_enabled = enabled;
    }
    if let Some(val) = env("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env("LOGGING", "LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    issues
}
