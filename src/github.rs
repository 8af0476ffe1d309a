use crate::config::{FetchPolicy, SiteConfig};
use crate::error::{PortfolioError, Result};
use crate::models::RateLimitState;
use crate::types::GitHubRepo;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

#[cfg(not(target_arch = "wasm32"))]
const USER_AGENT: &str = concat!("portfolio-site/", env!("CARGO_PKG_VERSION"));

pub const RETRY_BACKOFF: Duration = Duration::from_millis(500);

pub struct GitHubClient {
    client: Client,
    base_url: Url,
    per_page: u32,
    policy: FetchPolicy,
}

impl GitHubClient {
    pub fn new(base_url: &str, per_page: u32, policy: FetchPolicy) -> Result<Self> {
        let client = Self::build_http_client(&policy)?;
        let base_url = Url::parse(base_url)?;

        Ok(GitHubClient {
            client,
            base_url,
            per_page,
            policy,
        })
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Self::new(&config.api_base_url, config.per_page, config.fetch.clone())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn build_http_client(policy: &FetchPolicy) -> Result<Client> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = policy.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }

    // The browser supplies its own agent and the fetch API has no client timeout.
    #[cfg(target_arch = "wasm32")]
    fn build_http_client(_policy: &FetchPolicy) -> Result<Client> {
        Ok(Client::builder().build()?)
    }

    /// `{base}/users/{username}/repos?sort=updated&per_page={per_page}`
    pub fn repos_url(&self, username: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PortfolioError::ApiError(format!("Base URL cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["users", username, "repos"]);
        url.query_pairs_mut()
            .append_pair("sort", "updated")
            .append_pair("per_page", &self.per_page.to_string());
        Ok(url)
    }

    /// Fetch the most recently updated public repositories of `username`.
    pub async fn fetch_user_repos(&self, username: &str) -> Result<Vec<GitHubRepo>> {
        let url = self.repos_url(username)?;
        let mut retries = 0;

        loop {
            match self.request_repos(&url).await {
                Err(err) if retries < self.policy.retries && err.is_transient() => {
                    retries += 1;
                    warn!(%url, attempt = retries, error = %err, "Retrying repository fetch");
                    sleep(RETRY_BACKOFF * retries).await;
                }
                result => return result,
            }
        }
    }

    async fn request_repos(&self, url: &Url) -> Result<Vec<GitHubRepo>> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        debug!(%url, %status, "Repository list response");

        match status {
            status if status.is_success() => {
                let body = response.text().await?;
                let repos: Vec<GitHubRepo> = serde_json::from_str(&body)?;
                Ok(repos)
            }
            StatusCode::FORBIDDEN => {
                let rate_limit = rate_limit_state(response.headers());
                warn!(
                    remaining = rate_limit.remaining,
                    limit = rate_limit.limit,
                    reset = %rate_limit.reset_time,
                    "GitHub API refused the request"
                );
                Err(PortfolioError::RateLimitExceeded(format!(
                    "API rate limit exceeded. Reset at: {}",
                    rate_limit.reset_time
                )))
            }
            status if status.is_server_error() => {
                let error_text = response.text().await.unwrap_or_default();
                Err(PortfolioError::ServerError {
                    status: status.as_u16(),
                    message: error_text,
                })
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(PortfolioError::ApiError(format!(
                    "API request failed with status {}: {}",
                    status, error_text
                )))
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep(delay: Duration) {
    tokio::time::sleep(delay).await;
}

/// `setTimeout` wrapped in a promise. Resolves at once when there is no window.
#[cfg(target_arch = "wasm32")]
async fn sleep(delay: Duration) {
    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window().is_some_and(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
                .is_ok()
        });
        if !scheduled {
            let _ = resolve.call0(&wasm_bindgen::JsValue::UNDEFINED);
        }
    });
    if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
        debug!(error = ?err, "Retry delay interrupted");
    }
}

/// Parse the `X-RateLimit-*` headers of a response.
pub fn rate_limit_state(headers: &HeaderMap) -> RateLimitState {
    let remaining = headers
        .get("X-RateLimit-Remaining")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0);

    let limit = headers
        .get("X-RateLimit-Limit")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(60);

    let reset = headers
        .get("X-RateLimit-Reset")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
        .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));

    RateLimitState {
        remaining,
        limit,
        reset_time: reset,
        is_limited: remaining == 0,
    }
}
