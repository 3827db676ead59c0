use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::snapshot::Repository;

/// Presentation-ready statistics derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedStats {
    pub total_contributions: u64,
    pub total_commits: u64,
    #[serde(rename = "totalPRs")]
    pub total_prs: u64,
    pub total_issues: u64,
    pub total_reviews: u64,
    pub total_repos: u64,
    pub followers: u64,
    pub top_languages: Vec<LanguageShare>,
    pub most_productive_day: Option<ProductivePeriod>,
    pub most_productive_month: Option<ProductivePeriod>,
    pub current_streak: u32,
    pub max_streak: u32,
    pub top_repos: Vec<Repository>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degenerate: Vec<DegenerateAggregation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub name: String,
    pub color: Option<String>,
    pub size: u64,
    /// Share of all language bytes, rounded to one decimal place.
    pub percentage: f64,
}

impl LanguageShare {
    pub fn percentage_label(&self) -> String {
        format!("{:.1}", self.percentage)
    }
}

/// A weekday or month name with its summed contribution count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductivePeriod {
    pub name: String,
    pub contributions: u64,
}

/// Legitimate data states where an aggregate has nothing to rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateAggregation {
    NoLanguageData,
    NoContributionDays,
}

impl std::fmt::Display for DegenerateAggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegenerateAggregation::NoLanguageData => {
                write!(f, "no language data, language breakdown is empty")
            }
            DegenerateAggregation::NoContributionDays => {
                write!(f, "no contribution days, most productive day/month are absent")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedReport {
    pub login: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub year: i32,
    pub stats: WrappedStats,
    pub generated_at: DateTime<Utc>,
}
