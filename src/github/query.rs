use chrono::{SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::UserNode;

pub const WRAPPED_QUERY: &str = r#"
query($username: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $username) {
    name
    login
    avatarUrl
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            contributionCount
            date
          }
        }
      }
      totalCommitContributions
      totalIssueContributions
      totalPullRequestContributions
      totalPullRequestReviewContributions
      totalRepositoryContributions
    }
    repositories(
      first: 100
      ownerAffiliations: OWNER
      orderBy: {field: STARGAZERS, direction: DESC}
    ) {
      totalCount
      nodes {
        name
        stargazerCount
        forkCount
        primaryLanguage {
          name
          color
        }
        languages(first: 10, orderBy: {field: SIZE, direction: DESC}) {
          edges {
            size
            node {
              name
              color
            }
          }
        }
      }
    }
    followers {
      totalCount
    }
  }
}
"#;

/// Which user and year to summarize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub login: String,
    pub year: i32,
}

impl SnapshotRequest {
    pub fn new(login: impl Into<String>, year: i32) -> Self {
        Self {
            login: login.into(),
            year,
        }
    }

    /// Inclusive UTC window covering the whole calendar year.
    pub fn window(&self) -> Result<(String, String)> {
        let from = Utc.with_ymd_and_hms(self.year, 1, 1, 0, 0, 0).single();
        let to = Utc.with_ymd_and_hms(self.year, 12, 31, 23, 59, 59).single();
        match (from, to) {
            (Some(from), Some(to)) => Ok((
                from.to_rfc3339_opts(SecondsFormat::Secs, true),
                to.to_rfc3339_opts(SecondsFormat::Secs, true),
            )),
            _ => Err(Error::Config(format!("Unsupported year: {}", self.year))),
        }
    }

    pub fn to_body(&self) -> Result<GraphQlRequest> {
        let (from, to) = self.window()?;
        Ok(GraphQlRequest {
            query: WRAPPED_QUERY,
            variables: Variables {
                username: self.login.clone(),
                from,
                to,
            },
        })
    }
}

#[derive(Debug, Serialize)]
pub struct GraphQlRequest {
    pub query: &'static str,
    pub variables: Variables,
}

#[derive(Debug, Serialize)]
pub struct Variables {
    pub username: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserData {
    pub user: Option<serde_json::Value>,
}

/// Pulls the `user` node out of a GraphQL response body.
pub fn extract_user(body: &str, login: &str) -> Result<UserNode> {
    let response: GraphQlResponse<UserData> = serde_json::from_str(body)?;

    if let Some(error) = response.errors.and_then(|errors| errors.into_iter().next()) {
        if error.error_type.as_deref() == Some("NOT_FOUND") {
            return Err(Error::UserNotFound(login.to_string()));
        }
        return Err(Error::GraphQl(error.message));
    }

    let user = response
        .data
        .and_then(|data| data.user)
        .ok_or_else(|| Error::UserNotFound(login.to_string()))?;
    UserNode::from_value(user)
}

/// Reads a saved response: either the full GraphQL envelope or a bare
/// `user` node.
pub fn parse_saved_snapshot(body: &str) -> Result<UserNode> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let is_envelope = value
        .as_object()
        .map(|obj| obj.contains_key("data") || obj.contains_key("errors"))
        .unwrap_or(false);

    if is_envelope {
        extract_user(body, "<saved snapshot>")
    } else {
        UserNode::from_value(value)
    }
}
