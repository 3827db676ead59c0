use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use std::time::Duration;

use crate::config::{Config, DEFAULT_GRAPHQL_URL};
use crate::error::{Error, Result};
use crate::github::query::{extract_user, SnapshotRequest};
use crate::github::source::SnapshotSource;
use crate::models::UserNode;

pub struct GitHubClient {
    client: Client,
    endpoint: String,
}

impl GitHubClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_endpoint(token, DEFAULT_GRAPHQL_URL, Duration::from_secs(30))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_endpoint(
            config.require_token()?,
            &config.graphql_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn with_endpoint(token: &str, endpoint: &str, timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("gitwrapped/0.1"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub async fn get_user_snapshot(&self, request: &SnapshotRequest) -> Result<UserNode> {
        let body = request.to_body()?;
        tracing::info!("Fetching {} activity for: {}", request.year, request.login);

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let response = check_status(response).await?;

        let text = response.text().await?;
        tracing::debug!("Received {} bytes from {}", text.len(), self.endpoint);

        extract_user(&text, &request.login)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(Error::Unauthorized);
    }

    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        if let Some(wait) = rate_limit_wait(response.headers()) {
            tracing::warn!("Rate limited, reset in {}s", wait);
            return Err(Error::RateLimited(wait));
        }
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::GitHubApi(format!("{} - {}", status, body)))
}

/// Seconds until the rate limit resets, if the headers say it is exhausted.
fn rate_limit_wait(headers: &header::HeaderMap) -> Option<u64> {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
    };

    if let Some(retry_after) = read("retry-after") {
        return Some(retry_after);
    }

    if read("x-ratelimit-remaining")? > 0 {
        return None;
    }

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Some(read("x-ratelimit-reset").map_or(0, |reset| reset.saturating_sub(now)))
}

#[async_trait]
impl SnapshotSource for GitHubClient {
    async fn fetch_snapshot(&self, request: &SnapshotRequest) -> Result<UserNode> {
        self.get_user_snapshot(request).await
    }

    fn name(&self) -> &str {
        "github-graphql"
    }
}
