// src/core/config_manager.rs
//! Unified configuration: optional YAML file, then environment overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::extraction::GeneratorSettings;
use crate::logging::{LogFormat, LoggingSettings};
use crate::scraping::BrowserSettings;

const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigManager {
    pub server: ServerSettings,
    pub browser: BrowserSettings,
    pub generator: GeneratorSettings,
    pub logging: LoggingSettings,
    /// Files the configuration was read from, in load order.
    #[serde(skip)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
    pub port: u16,
    /// Value of `Access-Control-Allow-Origin`.
    pub frontend_url: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 3001,
            frontend_url: "*".to_string(),
        }
    }
}

impl ConfigManager {
    /// Load `.env`, then the YAML file (explicit path, or `config.yaml` when
    /// present), then environment overrides.
    /// Runs before logging is installed, so sources are kept for `log_sources`.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let dotenv = dotenvy::dotenv().ok();

        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Some(path) = dotenv {
            config.sources.insert(0, format!("environment file {}", path.display()));
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.sources.push(format!("configuration file {}", path.display()));
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply environment-style overrides. `lookup` returns the raw value for
    /// a variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT").or_else(|| get("ROCKET_PORT")) {
            self.server.port = port
                .trim()
                .parse()
                .context("PORT must be a valid port number")?;
        }
        if let Some(address) = get("BIND_ADDRESS") {
            self.server.address = address;
        }
        if let Some(origin) = get("FRONTEND_URL") {
            self.server.frontend_url = origin;
        }

        if let Some(path) = get("CHROME_PATH") {
            self.browser.executable_path = Some(PathBuf::from(path));
        }
        if let Some(secs) = get("BROWSER_LAUNCH_TIMEOUT_SECS") {
            self.browser.launch_timeout_ms = parse_secs_as_ms("BROWSER_LAUNCH_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = get("NAVIGATION_TIMEOUT_SECS") {
            self.browser.navigation_timeout_ms = parse_secs_as_ms("NAVIGATION_TIMEOUT_SECS", &secs)?;
        }
        if let Some(ms) = get("SETTLE_DELAY_MS") {
            self.browser.settle_delay_ms = parse_u64("SETTLE_DELAY_MS", &ms)?;
        }

        if let Some(key) = get("GEMINI_API_KEY") {
            self.generator.api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.generator.model = model;
        }
        if let Some(api_url) = get("GEMINI_API_URL") {
            self.generator.api_url = api_url;
        }
        if let Some(secs) = get("GEMINI_TIMEOUT_SECS") {
            self.generator.timeout_secs = parse_u64("GEMINI_TIMEOUT_SECS", &secs)?;
        }

        if let Some(format) = get("LOG_FORMAT") {
            self.logging.format = match format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            };
        }

        Ok(())
    }

    pub fn log_sources(&self) {
        if self.sources.is_empty() {
            info!("No configuration files found, using defaults and environment");
        }
        for source in &self.sources {
            info!("Loaded {}", source);
        }
    }

    /// Startup warnings for settings that will make every extraction degrade.
    pub fn report(&self) {
        info!("Server: http://{}:{}", self.server.address, self.server.port);
        info!("Gemini model: {}", self.generator.model);
        if self.generator.usable_api_key().is_none() {
            warn!("GEMINI_API_KEY not configured, every extraction will return fallback data");
        } else {
            info!("Gemini API key configured");
        }
        match &self.browser.executable_path {
            Some(path) => info!("Chrome executable: {}", path.display()),
            None => info!("Chrome executable: auto-detect"),
        }
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, value))
}

fn parse_secs_as_ms(key: &str, value: &str) -> Result<u64> {
    parse_u64(key, value)?
        .checked_mul(1000)
        .with_context(|| format!("{} is too large: {}", key, value.trim()))
}
