use reqwest::{Client, Response};
use std::time::Duration;

pub(crate) const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP settings shared by every site scraper.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub timeout: Duration,
    /// Overrides the per-site default user agent when set.
    pub user_agent: Option<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

impl ScraperConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub(crate) fn build_client(&self, default_agent: Option<&str>) -> Result<Client, reqwest::Error> {
        let user_agent = match (&self.user_agent, default_agent) {
            (Some(agent), _) => agent.clone(),
            (None, Some(agent)) => agent.to_string(),
            (None, None) => format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        };

        Client::builder()
            .timeout(self.timeout)
            .user_agent(user_agent)
            .build()
    }
}

/// Fetches `url` as text. Every failure, including 4xx/5xx statuses and timeouts, is logged here.
pub(crate) async fn get_text(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    client
        .get(url)
        .send()
        .await
        .and_then(Response::error_for_status)
        .inspect_err(|e| log_http_error(url, e))?
        .text()
        .await
        .inspect_err(|e| log_http_error(url, e))
}

fn log_http_error(url: &str, e: &reqwest::Error) {
    if e.is_timeout() {
        log::error!("Timed out waiting for {}", url);
    } else if let Some(status) = e.status() {
        log::error!("{} returned {}", url, status);
    } else {
        log::error!("HTTP error for {}: {e:?}", url);
    }
}

/// Joins a site-relative path onto `base`, leaving absolute URLs untouched.
pub(crate) fn absolute_url(base: &str, url_or_path: &str) -> String {
    if url_or_path.starts_with("http") {
        url_or_path.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            url_or_path.trim_start_matches('/')
        )
    }
}
