use crate::error::{PortfolioError, Result};
use crate::particles::Rgb;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_GITHUB_USERNAME: &str = "arijitrim";
pub const API_BASE_URL: &str = "https://api.github.com";

/// Everything the page components need, with the shipped defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub github_username: String,
    pub api_base_url: String,
    pub max_cards: usize,
    pub per_page: u32,
    pub error_style: ErrorStyle,
    pub fetch: FetchPolicy,
    pub particles: ParticleOptions,
    pub reveal: RevealOptions,
    pub dom: DomIds,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            github_username: DEFAULT_GITHUB_USERNAME.to_string(),
            api_base_url: API_BASE_URL.to_string(),
            max_cards: 6,
            per_page: 100,
            error_style: ErrorStyle::Detailed,
            fetch: FetchPolicy::default(),
            particles: ParticleOptions::default(),
            reveal: RevealOptions::default(),
            dom: DomIds::default(),
        }
    }
}

impl SiteConfig {
    /// Parse a JSON override document; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: SiteConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.github_username.trim().is_empty() {
            return Err(PortfolioError::ConfigError("github_username is empty".to_string()));
        }
        if self.per_page == 0 || self.per_page > 100 {
            return Err(PortfolioError::ConfigError(format!(
                "per_page must be between 1 and 100, got {}",
                self.per_page
            )));
        }
        url::Url::parse(&self.api_base_url)?;
        Ok(())
    }
}

/// How failures of the repository fetch are worded on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStyle {
    /// HTTP 403 gets its own rate-limit message.
    Detailed,
    /// One message for every failure.
    Generic,
}

/// Network behavior of the repository fetch. The defaults are a single
/// attempt with no timeout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchPolicy {
    pub timeout_ms: Option<u64>,
    pub retries: u32,
}

impl FetchPolicy {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorSource {
    /// Read `--color-primary` from the page once at start.
    Themed { fallback: Rgb },
    Fixed { color: Rgb },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleOptions {
    pub max_particles: usize,
    pub spacing: f64,
    pub connect_distance: f64,
    pub max_line_opacity: f64,
    pub line_width: f64,
    pub respect_reduced_motion: bool,
    pub pause_when_hidden: bool,
    pub color: ColorSource,
}

impl Default for ParticleOptions {
    fn default() -> Self {
        Self {
            max_particles: 100,
            spacing: 10.0,
            connect_distance: 100.0,
            max_line_opacity: 0.1,
            line_width: 0.5,
            respect_reduced_motion: true,
            pause_when_hidden: true,
            color: ColorSource::Themed {
                fallback: Rgb::new(0, 255, 136),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealOptions {
    pub threshold: f64,
    pub bottom_margin_px: f64,
    pub start_delay_ms: u32,
    pub selectors: Vec<String>,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin_px: 100.0,
            start_delay_ms: 100,
            selectors: vec![".social-btn".to_string(), ".repo-card".to_string()],
        }
    }
}

impl RevealOptions {
    /// Margin string in IntersectionObserver syntax.
    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.bottom_margin_px)
    }

    pub fn selector_list(&self) -> String {
        self.selectors.join(", ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DomIds {
    pub canvas: String,
    pub repos_list: String,
    pub theme_toggle: String,
}

impl Default for DomIds {
    fn default() -> Self {
        Self {
            canvas: "particles".to_string(),
            repos_list: "repos-list".to_string(),
            theme_toggle: "theme-toggle".to_string(),
        }
    }
}
