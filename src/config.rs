// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8082/api";
pub const DEFAULT_SCRAPER_BASE_URL: &str = "http://localhost:8082/api";
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

const API_URL_ENV: &str = "JOBCOMPASS_API_URL";
const SCRAPER_URL_ENV: &str = "JOBCOMPASS_SCRAPER_URL";
const PORT_ENV: &str = "JOBCOMPASS_PORT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewConfig {
    pub api_base_url: String,
    pub scraper_base_url: String,
    pub port: u16,
    pub default_day_range: u32,
    pub scrape: ScrapeSettings,
    pub timings: Timings,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrapeSettings {
    pub source: String,
    pub max_results: u32,
    pub max_job_age_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timings {
    pub search_debounce_ms: u64,
    pub reload_delay_ms: u64,
    pub stat_animation_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            scraper_base_url: DEFAULT_SCRAPER_BASE_URL.to_string(),
            port: 8000,
            default_day_range: 7,
            scrape: ScrapeSettings::default(),
            timings: Timings::default(),
            log_file: None,
        }
    }
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            source: "linkedin".to_string(),
            max_results: 10,
            max_job_age_days: 1,
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            reload_delay_ms: 2000,
            stat_animation_ms: 1000,
            request_timeout_secs: 30,
        }
    }
}

impl Timings {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }

    pub fn stat_animation(&self) -> Duration {
        Duration::from_millis(self.stat_animation_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl ViewConfig {
    /// Load configuration from an optional YAML file, then apply environment overrides.
    ///
    /// An explicitly requested file must exist; the default `config.yaml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from_file(&default_path)?
                } else {
                    info!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        base.with_overrides(|key| std::env::var(key).ok())?
            .validated()
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Invalid configuration YAML")
    }

    /// Apply environment-style overrides using the provided lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV) {
            self.api_base_url = url;
        }
        if let Some(url) = lookup(SCRAPER_URL_ENV) {
            self.scraper_base_url = url;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("{} must be a valid port number", PORT_ENV))?;
        }
        Ok(self)
    }

    /// Normalize base URLs and reject values the controller cannot work with.
    pub fn validated(mut self) -> Result<Self> {
        self.api_base_url = normalize_base_url(&self.api_base_url)
            .with_context(|| format!("Invalid apiBaseUrl: {}", self.api_base_url))?;
        self.scraper_base_url = normalize_base_url(&self.scraper_base_url)
            .with_context(|| format!("Invalid scraperBaseUrl: {}", self.scraper_base_url))?;

        if self.default_day_range == 0 {
            anyhow::bail!("defaultDayRange must be at least 1");
        }
        if self.scrape.source.trim().is_empty() {
            anyhow::bail!("scrape.source must not be empty");
        }

        Ok(self)
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed).context("Not an absolute URL")?;

    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => anyhow::bail!("Unsupported scheme: {}", other),
    }
}
