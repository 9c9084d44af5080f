//! Core command utilities
//!
//! This module contains:
//! - `load_config` - Resolve client config from file and flags
//! - `connect` - Build the API service
//! - `resolve_period` - Pick the billing period for a command

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use fatura_core::{period, ApiService, ClientConfig};

/// Load config, then apply `--api-url` / `--timeout` on top
pub fn load_config(
    config_path: Option<&Path>,
    api_url: Option<&str>,
    timeout_secs: Option<u64>,
) -> Result<ClientConfig> {
    let mut config = ClientConfig::load(config_path).context("Failed to load config")?;

    if let Some(url) = api_url {
        config = config.with_base_url(url);
    }
    if let Some(secs) = timeout_secs {
        if secs == 0 {
            bail!("--timeout must be at least 1 second");
        }
        config = config.with_timeout(Duration::from_secs(secs));
    }

    tracing::debug!("API base URL: {}", config.base_url);
    Ok(config)
}

pub fn connect(config: &ClientConfig) -> Result<ApiService> {
    ApiService::from_config(config).context("Failed to create API client")
}

/// Explicit period, else the configured default, else the current month
pub fn resolve_period(explicit: Option<&str>, config: &ClientConfig) -> Result<String> {
    let chosen = match explicit.or(config.default_period.as_deref()) {
        Some(p) => p.to_string(),
        None => period::current_period(),
    };
    period::validate_period(&chosen).with_context(|| format!("Invalid period '{}'", chosen))?;
    Ok(chosen)
}
