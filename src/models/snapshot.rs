use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// Wire shape of the GraphQL `user` node. Every field is optional here;
// `Snapshot::try_from` decides what is actually required.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNode {
    pub name: Option<String>,
    pub login: Option<String>,
    pub avatar_url: Option<String>,
    pub contributions_collection: Option<ContributionsCollectionNode>,
    pub repositories: Option<RepositoryConnection>,
    pub followers: Option<CountNode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollectionNode {
    pub contribution_calendar: Option<CalendarNode>,
    pub total_commit_contributions: Option<i64>,
    pub total_issue_contributions: Option<i64>,
    pub total_pull_request_contributions: Option<i64>,
    pub total_pull_request_review_contributions: Option<i64>,
    pub total_repository_contributions: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarNode {
    pub total_contributions: Option<i64>,
    pub weeks: Option<Vec<WeekNode>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekNode {
    pub contribution_days: Option<Vec<DayNode>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayNode {
    pub contribution_count: Option<i64>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryConnection {
    pub total_count: Option<i64>,
    pub nodes: Option<Vec<Option<RepositoryNode>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    pub name: Option<String>,
    pub stargazer_count: Option<i64>,
    pub fork_count: Option<i64>,
    pub primary_language: Option<LanguageNode>,
    pub languages: Option<LanguageConnection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageConnection {
    pub edges: Option<Vec<LanguageEdge>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageEdge {
    pub size: Option<i64>,
    pub node: Option<LanguageNode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageNode {
    pub name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountNode {
    pub total_count: Option<i64>,
}

impl UserNode {
    /// Decodes a `user` node. Fields of the wrong JSON type are reported as a
    /// malformed snapshot, like missing ones.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::MalformedSnapshot(format!("user node has the wrong shape: {}", e)))
    }
}

/// One user's activity for the queried year, validated and owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub display_name: Option<String>,
    pub login: String,
    pub avatar_url: Option<String>,
    pub calendar: ContributionCalendar,
    pub counts: AggregateCounts,
    pub total_repositories: u64,
    pub repositories: Vec<Repository>,
    pub followers: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u64,
    pub weeks: Vec<ContributionWeek>,
}

impl ContributionCalendar {
    /// Days in delivery order: weeks oldest to newest, days within each week.
    pub fn days(&self) -> impl DoubleEndedIterator<Item = &ContributionDay> + '_ {
        self.weeks.iter().flat_map(|week| week.days.iter())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributionWeek {
    pub days: Vec<ContributionDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub contribution_count: u64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateCounts {
    pub commits: u64,
    pub issues: u64,
    pub pull_requests: u64,
    pub pull_request_reviews: u64,
    pub repositories: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub name: String,
    pub stargazer_count: u64,
    pub fork_count: u64,
    pub primary_language: Option<Language>,
    pub languages: Vec<LanguageSize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageSize {
    pub language: Language,
    pub size: u64,
}

impl Snapshot {
    /// Name to greet the user with: display name when set, login otherwise.
    pub fn greeting_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.login)
    }
}

fn required<T>(value: Option<T>, path: &str) -> Result<T> {
    value.ok_or_else(|| Error::missing(path))
}

fn count(value: Option<i64>, path: &str) -> Result<u64> {
    let raw = required(value, path)?;
    u64::try_from(raw)
        .map_err(|_| Error::MalformedSnapshot(format!("`{}` is negative: {}", path, raw)))
}

fn language(node: LanguageNode, path: &str) -> Result<Language> {
    Ok(Language {
        name: required(node.name, &format!("{}.name", path))?,
        color: node.color,
    })
}

impl TryFrom<UserNode> for Snapshot {
    type Error = Error;

    fn try_from(user: UserNode) -> Result<Self> {
        let login = required(user.login, "user.login")?;

        let collection = required(user.contributions_collection, "user.contributionsCollection")?;
        let calendar = convert_calendar(required(
            collection.contribution_calendar,
            "contributionsCollection.contributionCalendar",
        )?)?;

        let counts = AggregateCounts {
            commits: count(
                collection.total_commit_contributions,
                "contributionsCollection.totalCommitContributions",
            )?,
            issues: count(
                collection.total_issue_contributions,
                "contributionsCollection.totalIssueContributions",
            )?,
            pull_requests: count(
                collection.total_pull_request_contributions,
                "contributionsCollection.totalPullRequestContributions",
            )?,
            pull_request_reviews: count(
                collection.total_pull_request_review_contributions,
                "contributionsCollection.totalPullRequestReviewContributions",
            )?,
            repositories: count(
                collection.total_repository_contributions,
                "contributionsCollection.totalRepositoryContributions",
            )?,
        };

        let connection = required(user.repositories, "user.repositories")?;
        let total_repositories = count(connection.total_count, "repositories.totalCount")?;
        let repositories = required(connection.nodes, "repositories.nodes")?
            .into_iter()
            .enumerate()
            .map(|(i, node)| -> Result<Repository> {
                let path = format!("repositories.nodes[{}]", i);
                convert_repository(required(node, &path)?, &path)
            })
            .collect::<Result<Vec<_>>>()?;

        let followers = count(
            required(user.followers, "user.followers")?.total_count,
            "followers.totalCount",
        )?;

        Ok(Snapshot {
            display_name: user.name,
            login,
            avatar_url: user.avatar_url,
            calendar,
            counts,
            total_repositories,
            repositories,
            followers,
        })
    }
}

fn convert_calendar(node: CalendarNode) -> Result<ContributionCalendar> {
    let total_contributions = count(
        node.total_contributions,
        "contributionCalendar.totalContributions",
    )?;

    let weeks = required(node.weeks, "contributionCalendar.weeks")?
        .into_iter()
        .enumerate()
        .map(|(w, week)| -> Result<ContributionWeek> {
            let days = required(
                week.contribution_days,
                &format!("contributionCalendar.weeks[{}].contributionDays", w),
            )?
            .into_iter()
            .enumerate()
            .map(|(d, day)| -> Result<ContributionDay> {
                let path = format!("contributionCalendar.weeks[{}].contributionDays[{}]", w, d);
                let raw_date = required(day.date, &format!("{}.date", path))?;
                let date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d").map_err(|_| {
                    Error::MalformedSnapshot(format!("`{}.date` is not a date: {}", path, raw_date))
                })?;
                Ok(ContributionDay {
                    contribution_count: count(
                        day.contribution_count,
                        &format!("{}.contributionCount", path),
                    )?,
                    date,
                })
            })
            .collect::<Result<Vec<_>>>()?;
            Ok(ContributionWeek { days })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ContributionCalendar {
        total_contributions,
        weeks,
    })
}

fn convert_repository(node: RepositoryNode, path: &str) -> Result<Repository> {
    let name = required(node.name, &format!("{}.name", path))?;
    let stargazer_count = count(node.stargazer_count, &format!("{}.stargazerCount", path))?;
    let fork_count = count(node.fork_count, &format!("{}.forkCount", path))?;

    let primary_language = node
        .primary_language
        .map(|lang| language(lang, &format!("{}.primaryLanguage", path)))
        .transpose()?;

    let edges = required(node.languages, &format!("{}.languages", path))?.edges;
    let languages = required(edges, &format!("{}.languages.edges", path))?
        .into_iter()
        .enumerate()
        .map(|(i, edge)| -> Result<LanguageSize> {
            let edge_path = format!("{}.languages.edges[{}]", path, i);
            Ok(LanguageSize {
                size: count(edge.size, &format!("{}.size", edge_path))?,
                language: language(
                    required(edge.node, &format!("{}.node", edge_path))?,
                    &format!("{}.node", edge_path),
                )?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Repository {
        name,
        stargazer_count,
        fork_count,
        primary_language,
        languages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_JSON: &str = r##"{
        "name": "Octo Cat",
        "login": "octocat",
        "avatarUrl": "https://avatars.githubusercontent.com/u/583231",
        "contributionsCollection": {
            "contributionCalendar": {
                "totalContributions": 5,
                "weeks": [
                    {"contributionDays": [
                        {"contributionCount": 2, "date": "2024-12-29"},
                        {"contributionCount": 0, "date": "2024-12-30"}
                    ]},
                    {"contributionDays": [
                        {"contributionCount": 3, "date": "2025-01-05"}
                    ]}
                ]
            },
            "totalCommitContributions": 4,
            "totalIssueContributions": 1,
            "totalPullRequestContributions": 0,
            "totalPullRequestReviewContributions": 0,
            "totalRepositoryContributions": 2
        },
        "repositories": {
            "totalCount": 8,
            "nodes": [
                {
                    "name": "hello-world",
                    "stargazerCount": 12,
                    "forkCount": 3,
                    "primaryLanguage": {"name": "Rust", "color": "#dea584"},
                    "languages": {"edges": [
                        {"size": 1200, "node": {"name": "Rust", "color": "#dea584"}},
                        {"size": 80, "node": {"name": "Shell", "color": null}}
                    ]}
                }
            ]
        },
        "followers": {"totalCount": 42}
    }"##;

    fn user_node() -> UserNode {
        serde_json::from_str(USER_JSON).unwrap()
    }

    #[test]
    fn test_convert_full_user() {
        let snapshot = Snapshot::try_from(user_node()).unwrap();

        assert_eq!(snapshot.login, "octocat");
        assert_eq!(snapshot.greeting_name(), "Octo Cat");
        assert_eq!(snapshot.calendar.total_contributions, 5);
        assert_eq!(snapshot.calendar.days().count(), 3);
        assert_eq!(
            snapshot.calendar.days().last().unwrap().date,
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
        );
        assert_eq!(snapshot.counts.commits, 4);
        assert_eq!(snapshot.counts.repositories, 2);
        assert_eq!(snapshot.total_repositories, 8);
        assert_eq!(snapshot.followers, 42);

        let repo = &snapshot.repositories[0];
        assert_eq!(repo.name, "hello-world");
        assert_eq!(repo.stargazer_count, 12);
        assert_eq!(repo.primary_language.as_ref().unwrap().name, "Rust");
        assert_eq!(repo.languages.len(), 2);
        assert_eq!(repo.languages[1].language.color, None);
    }

    #[test]
    fn test_greeting_falls_back_to_login() {
        let mut node = user_node();
        node.name = Some(String::new());
        let snapshot = Snapshot::try_from(node).unwrap();
        assert_eq!(snapshot.greeting_name(), "octocat");
    }

    #[test]
    fn test_missing_repository_nodes() {
        let mut node = user_node();
        node.repositories.as_mut().unwrap().nodes = None;

        let err = Snapshot::try_from(node).unwrap_err();
        assert!(
            matches!(err, Error::MalformedSnapshot(ref msg) if msg.contains("repositories.nodes"))
        );
    }

    #[test]
    fn test_null_repository_entry() {
        let mut node = user_node();
        node.repositories.as_mut().unwrap().nodes.as_mut().unwrap().push(None);

        let err = Snapshot::try_from(node).unwrap_err();
        assert!(err.to_string().contains("repositories.nodes[1]"));
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut node = user_node();
        node.followers = Some(CountNode {
            total_count: Some(-1),
        });

        let err = Snapshot::try_from(node).unwrap_err();
        assert!(err.to_string().contains("followers.totalCount"));
    }

    #[test]
    fn test_wrong_field_type_rejected() {
        let value = serde_json::json!({
            "login": "octocat",
            "followers": {"totalCount": "many"}
        });

        let err = UserNode::from_value(value).unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot(ref msg) if msg.contains("expected i64")));
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut node = user_node();
        let calendar = node
            .contributions_collection
            .as_mut()
            .unwrap()
            .contribution_calendar
            .as_mut()
            .unwrap();
        calendar.weeks.as_mut().unwrap()[1]
            .contribution_days
            .as_mut()
            .unwrap()[0]
            .date = Some("05/01/2025".to_string());

        let err = Snapshot::try_from(node).unwrap_err();
        assert!(err.to_string().contains("weeks[1].contributionDays[0].date"));
    }

    #[test]
    fn test_missing_contributions_collection() {
        let node = UserNode {
            login: Some("ghost".to_string()),
            ..Default::default()
        };
        let err = Snapshot::try_from(node).unwrap_err();
        assert!(err.to_string().contains("user.contributionsCollection"));
    }
}
