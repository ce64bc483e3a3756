//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_config` - Resolve configuration plus the `--backend` override
//! - `load_snapshot` - Read statistics from `--snapshot` or the backend
//! - `cmd_config` - Print the resolved configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::debug;
use vantage_core::{BackendClient, Config, StatSnapshot};

use super::print_json;

/// Load the config, letting `--backend` win over file and environment
pub fn load_config(path: Option<&Path>, backend_url: Option<&str>) -> Result<Config> {
    let mut config = Config::load(path).context("Failed to load configuration")?;
    if let Some(url) = backend_url.map(str::trim).filter(|u| !u.is_empty()) {
        config.backend.url = url.to_string();
    }
    Ok(config)
}

/// Read the snapshot file when given, otherwise fetch from the backend
pub async fn load_snapshot(config: &Config, snapshot: Option<&Path>) -> Result<StatSnapshot> {
    if let Some(path) = snapshot {
        debug!(path = %path.display(), "Loading snapshot file");
        return StatSnapshot::load(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()));
    }

    let client = BackendClient::new(&config.backend).context("Invalid backend configuration")?;
    client
        .fetch_stats()
        .await
        .with_context(|| format!("Failed to fetch stats from {}", client.base_url()))
}

pub fn cmd_config(config: &Config, json: bool) -> Result<()> {
    let source = config
        .source
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string());
    let token = config.backend.token.as_deref().map(mask_token);

    if json {
        return print_json(&json!({
            "source": source,
            "backend": {
                "url": config.backend.url,
                "token": token,
                "timeout_secs": config.backend.timeout.as_secs(),
            },
            "assistant": {
                "backend": config.assistant.backend.as_str(),
                "welcome_message": config.assistant.welcome_message,
                "fallback_message": config.assistant.fallback_message,
            },
        }));
    }

    println!();
    println!("⚙️  Configuration ({})", source);
    println!("   ─────────────────────────────────────────────");
    println!("   Backend URL:   {}", config.backend.url);
    println!("   API token:     {}", token.as_deref().unwrap_or("(none)"));
    println!("   Timeout:       {}s", config.backend.timeout.as_secs());
    println!("   Assistant:     {}", config.assistant.backend);
    println!();

    Ok(())
}

/// Keep only the last four characters of a secret
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
