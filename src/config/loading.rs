//! Configuration loading from files and environment variables
//!
//! TOML files provide the base configuration; a few environment variables take
//! precedence for container deployments.

use anyhow::{Context, Result};

use super::types::MetricsConfig;
use crate::constants::env;

/// Parse and validate a configuration from TOML text
pub fn load_config_from_str(content: &str) -> Result<MetricsConfig> {
    let config: MetricsConfig =
        toml::from_str(content).context("Failed to parse metrics configuration")?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a TOML file, with environment variable overrides
///
/// Environment variables take precedence over the file:
/// - `KCP_METRICS_PREFIX` - metric name prefix
/// - `KCP_METRICS_HOST` - endpoint bind host
/// - `KCP_METRICS_PORT` - endpoint port
pub fn load_config(config_path: &str) -> Result<MetricsConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file '{}'", config_path))?;

    let mut config: MetricsConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file '{}'", config_path))?;

    apply_env_overrides(&mut config);
    config.validate()?;

    tracing::info!(
        path = config_path,
        prefix = %config.name_prefix,
        "loaded metrics configuration"
    );
    Ok(config)
}

/// Apply `KCP_METRICS_*` overrides from the process environment
pub fn apply_env_overrides(config: &mut MetricsConfig) {
    apply_overrides_with(config, |key| std::env::var(key).ok());
}

/// Apply overrides from an arbitrary lookup (the environment in production)
///
/// Unparseable port values are ignored with a warning.
pub fn apply_overrides_with<F>(config: &mut MetricsConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(prefix) = lookup(env::PREFIX) {
        tracing::info!(prefix = %prefix, "metric name prefix overridden from environment");
        config.name_prefix = prefix;
    }

    if let Some(host) = lookup(env::HOST) {
        config.server.host = host;
    }

    if let Some(port) = lookup(env::PORT) {
        match port.parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(e) => tracing::warn!(
                "Ignoring {}='{}': {}",
                env::PORT,
                port,
                e
            ),
        }
    }
}
