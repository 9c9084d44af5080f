//! Client configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Override file (explicit path, else ~/.config/fatura/client.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Command-line flags are applied on top by the caller.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::period::validate_period;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/client.toml");

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for the billing API client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Period the dashboard opens on when none is given
    pub default_period: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            default_period: None,
        }
    }
}

impl ClientConfig {
    /// Load config, preferring the override file when it exists
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let path = override_path
            .map(Path::to_path_buf)
            .or_else(default_config_path);

        let content = match path {
            Some(ref p) if p.exists() => fs::read_to_string(p)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", p.display(), e)))?,
            _ => DEFAULT_CONFIG.to_string(),
        };

        parse_config(&content)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fatura").join("client.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    api: Option<RawApi>,
    session: Option<RawSession>,
}

#[derive(Debug, Deserialize)]
struct RawApi {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawSession {
    default_period: Option<String>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<ClientConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = ClientConfig::default();

    if let Some(api) = raw.api {
        if let Some(url) = api.base_url {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = api.timeout_secs {
            if secs == 0 {
                return Err(Error::Config("timeout_secs must be positive".into()));
            }
            config.timeout = Duration::from_secs(secs);
        }
    }

    if let Some(session) = raw.session {
        if let Some(period) = session.default_period {
            validate_period(&period).map_err(|e| Error::Config(e.to_string()))?;
            config.default_period = Some(period);
        }
    }

    Ok(config)
}
