//! Configuration for Vantage
//!
//! ## Resolution
//!
//! 1. Explicit path (`--config`), which must exist
//! 2. Override in the config dir (~/.config/vantage/config.toml)
//! 3. Embedded defaults (compiled into binary)
//!
//! Environment variables are applied on top: `VANTAGE_BACKEND_URL`,
//! `VANTAGE_API_TOKEN`, `VANTAGE_ASSISTANT`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/vantage.toml");

pub const ENV_BACKEND_URL: &str = "VANTAGE_BACKEND_URL";
pub const ENV_API_TOKEN: &str = "VANTAGE_API_TOKEN";
pub const ENV_ASSISTANT: &str = "VANTAGE_ASSISTANT";

/// Which answering service the assistant talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantBackend {
    Http,
    Mock,
}

impl AssistantBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for AssistantBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssistantBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" | "backend" => Ok(Self::Http),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown assistant backend: {} (valid: http, mock)", s)),
        }
    }
}

/// CMDB backend connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            token: None,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Query assistant settings
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    pub backend: AssistantBackend,
    pub welcome_message: String,
    pub fallback_message: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            backend: AssistantBackend::Http,
            welcome_message: "Hello! I'm your CMDB assistant. Ask me about servers, databases, applications and how they relate.".to_string(),
            fallback_message: "Sorry, something went wrong while answering your question. Please try again.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub backend: BackendConfig,
    pub assistant: AssistantConfig,
    /// File the config was read from (None for embedded defaults)
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load with file resolution, then apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)?
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::from_toml_str(DEFAULT_CONFIG)?,
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Reading config");
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(backend) = raw.backend {
            if let Some(url) = backend.url {
                config.backend.url = url;
            }
            if let Some(token) = backend.token.filter(|t| !t.trim().is_empty()) {
                config.backend.token = Some(token);
            }
            if let Some(timeout) = backend.timeout_secs {
                config.backend.timeout = Duration::from_secs(timeout);
            }
        }

        if let Some(assistant) = raw.assistant {
            if let Some(backend) = assistant.backend {
                config.assistant.backend = backend.parse().map_err(Error::Config)?;
            }
            if let Some(welcome) = assistant.welcome_message {
                config.assistant.welcome_message = welcome;
            }
            if let Some(fallback) = assistant.fallback_message {
                config.assistant.fallback_message = fallback;
            }
        }

        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
            self.backend.url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.backend.token = Some(token);
        }
        if let Some(raw) = lookup(ENV_ASSISTANT) {
            match raw.parse() {
                Ok(backend) => self.assistant.backend = backend,
                Err(e) => warn!(error = %e, "Ignoring {}", ENV_ASSISTANT),
            }
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vantage").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    backend: Option<RawBackend>,
    assistant: Option<RawAssistant>,
}

#[derive(Debug, Deserialize)]
struct RawBackend {
    url: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawAssistant {
    backend: Option<String>,
    welcome_message: Option<String>,
    fallback_message: Option<String>,
}
