use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

pub const DEFAULT_BASE_URL: &str = "https://chicagoelections.com/en/";
pub const DEFAULT_CONFIG_FILE: &str = "precinct-results.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub base_url: Url,
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

impl SiteConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ScrapeError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn index_url(&self) -> Result<Url, ScrapeError> {
        self.join("election-results.html")
    }

    pub fn export_url(&self) -> Result<Url, ScrapeError> {
        self.join("data-export.asp")
    }

    pub fn join(&self, href: &str) -> Result<Url, ScrapeError> {
        self.base_url
            .join(href)
            .map_err(|err| ScrapeError::InvalidBaseUrl(format!("{href}: {err}")))
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            user_agent: default_user_agent(),
            timeout: None,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the site configuration. Without an explicit path, a missing
    /// default file means built-in defaults.
    pub fn resolve(path: Option<&str>) -> Result<SiteConfig, ScrapeError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(SiteConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| ScrapeError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| ScrapeError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<SiteConfig, ScrapeError> {
        let base_url = match config.base_url {
            Some(value) => parse_base_url(&value)?,
            None => SiteConfig::default().base_url,
        };

        Ok(SiteConfig {
            base_url,
            user_agent: config.user_agent.unwrap_or_else(default_user_agent),
            timeout: config.timeout_secs.map(Duration::from_secs),
        })
    }
}

/// Parses a base URL, forcing a trailing slash so relative hrefs join
/// under it instead of replacing the last segment.
pub fn parse_base_url(value: &str) -> Result<Url, ScrapeError> {
    let trimmed = value.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url =
        Url::parse(&normalized).map_err(|err| ScrapeError::InvalidBaseUrl(format!("{value}: {err}")))?;
    if url.cannot_be_a_base() {
        return Err(ScrapeError::InvalidBaseUrl(value.to_string()));
    }
    Ok(url)
}

fn default_user_agent() -> String {
    format!("precinct-results/{}", env!("CARGO_PKG_VERSION"))
}
