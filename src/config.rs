use crate::error::{Error, Result};
use std::env;

pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub graphql_url: String,
    pub year: Option<i32>,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let github_token = lookup("GITHUB_TOKEN").filter(|t| !t.trim().is_empty());

        let graphql_url = lookup("GITHUB_GRAPHQL_URL")
            .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string());

        let year = match lookup("WRAPPED_YEAR") {
            Some(raw) => Some(raw.trim().parse::<i32>().map_err(|_| {
                Error::Config(format!("WRAPPED_YEAR is not a valid year: {}", raw))
            })?),
            None => None,
        };

        let request_timeout_secs = lookup("HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            github_token,
            graphql_url,
            year,
            request_timeout_secs,
        })
    }

    pub fn require_token(&self) -> Result<&str> {
        self.github_token
            .as_deref()
            .ok_or_else(|| Error::Config("GITHUB_TOKEN environment variable not set".to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
        }
    }
}
