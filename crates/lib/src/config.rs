//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.lintra/config.json`) and
//! environment. A missing file means defaults; channel credentials can be
//! supplied via environment variables instead of the file.

use crate::classify::ClassifyPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Gateway server settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Channel settings (LINE Messaging API).
    #[serde(default)]
    pub channels: ChannelsConfig,

    /// Translation provider settings and the active classification policy.
    #[serde(default)]
    pub translate: TranslateConfig,
}

/// Gateway bind and port settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Listen port for the webhook and health endpoints (default 3000).
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0" — the platform must reach /webhook).
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

fn default_gateway_port() -> u16 {
    3000
}

fn default_gateway_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

/// Per-channel config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsConfig {
    #[serde(default)]
    pub line: LineChannelConfig,
}

/// LINE Messaging API channel config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChannelConfig {
    /// Channel access token from the LINE developers console. Overridden by
    /// LINE_CHANNEL_ACCESS_TOKEN env when set.
    pub channel_access_token: Option<String>,

    /// Channel secret used to verify the x-line-signature header. Overridden
    /// by LINE_CHANNEL_SECRET env when set. When absent, webhook signatures
    /// are not checked (local development only).
    pub channel_secret: Option<String>,

    /// Override the Messaging API base URL (e.g. for tests).
    pub api_base: Option<String>,
}

/// Translation provider config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateConfig {
    /// Override the provider base URL (default api.mymemory.translated.net).
    pub endpoint: Option<String>,

    /// Active classification policy: "binaryEnTh" (default) or
    /// "threeWayThMyEn". The policies request different language pairs;
    /// switching changes user-facing behavior.
    #[serde(default)]
    pub policy: ClassifyPolicy,
}

fn non_empty(s: String) -> Option<String> {
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

/// Resolve the channel access token: env LINE_CHANNEL_ACCESS_TOKEN overrides config.
pub fn resolve_channel_access_token(config: &Config) -> Option<String> {
    std::env::var("LINE_CHANNEL_ACCESS_TOKEN")
        .ok()
        .and_then(non_empty)
        .or_else(|| {
            config
                .channels
                .line
                .channel_access_token
                .clone()
                .and_then(non_empty)
        })
}

/// Resolve the channel secret: env LINE_CHANNEL_SECRET overrides config.
pub fn resolve_channel_secret(config: &Config) -> Option<String> {
    std::env::var("LINE_CHANNEL_SECRET")
        .ok()
        .and_then(non_empty)
        .or_else(|| config.channels.line.channel_secret.clone().and_then(non_empty))
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("LINTRA_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".lintra").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the default path (or LINTRA_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

/// Create the config directory and a default config file if they do not exist.
pub fn init_config_file(config_path: &Path) -> Result<()> {
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating config directory {}", config_dir.display()))?;
    if !config_path.exists() {
        std::fs::write(config_path, b"{}")
            .with_context(|| format!("writing default config to {}", config_path.display()))?;
        log::info!("created default config at {}", config_path.display());
    }
    Ok(())
}
