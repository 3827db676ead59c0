use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::engine::StatsEngine;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::github::{SnapshotRequest, SnapshotSource};
use crate::models::{Snapshot, UserNode, WrappedReport};

pub struct WrappedPipeline {
    source: Arc<dyn SnapshotSource>,
    engine: StatsEngine,
    config: PipelineConfig,
}

impl WrappedPipeline {
    pub fn new(
        source: impl SnapshotSource + 'static,
        engine: StatsEngine,
        config: PipelineConfig,
    ) -> Self {
        Self {
            source: Arc::new(source),
            engine,
            config,
        }
    }

    pub async fn run(&self, request: &SnapshotRequest) -> Result<WrappedReport> {
        // Step 1: Fetch the raw activity record
        tracing::info!(
            "Building {} wrapped for {} via {}",
            request.year,
            request.login,
            self.source.name()
        );
        let spinner = self.spinner(&format!(
            "Fetching {}'s {} activity",
            request.login, request.year
        ));
        let fetched = self.source.fetch_snapshot(request).await;
        spinner.finish_and_clear();

        // Step 2: Validate and derive
        self.summarize(fetched?, request.year)
    }

    /// Validates a raw record and derives its report without fetching.
    pub fn summarize(&self, user: UserNode, year: i32) -> Result<WrappedReport> {
        let snapshot = Snapshot::try_from(user)?;
        tracing::info!(
            "Snapshot has {} repositories and {} calendar weeks",
            snapshot.repositories.len(),
            snapshot.calendar.weeks.len()
        );

        let stats = self.engine.derive(&snapshot);
        for state in &stats.degenerate {
            tracing::warn!("{}: {}", snapshot.login, state);
        }

        Ok(WrappedReport {
            name: snapshot.greeting_name().to_string(),
            login: snapshot.login,
            avatar_url: snapshot.avatar_url,
            year,
            stats,
            generated_at: Utc::now(),
        })
    }

    fn spinner(&self, message: &str) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::github::parse_saved_snapshot;
    use crate::models::DegenerateAggregation;
    use async_trait::async_trait;

    const SAVED: &str = r##"{"data": {"user": {
        "name": null,
        "login": "octocat",
        "avatarUrl": null,
        "contributionsCollection": {
            "contributionCalendar": {
                "totalContributions": 6,
                "weeks": [{"contributionDays": [
                    {"contributionCount": 1, "date": "2025-06-02"},
                    {"contributionCount": 0, "date": "2025-06-03"},
                    {"contributionCount": 2, "date": "2025-06-04"},
                    {"contributionCount": 3, "date": "2025-06-05"}
                ]}]
            },
            "totalCommitContributions": 6,
            "totalIssueContributions": 0,
            "totalPullRequestContributions": 1,
            "totalPullRequestReviewContributions": 0,
            "totalRepositoryContributions": 0
        },
        "repositories": {"totalCount": 1, "nodes": [{
            "name": "spoon-knife",
            "stargazerCount": 4,
            "forkCount": 1,
            "primaryLanguage": {"name": "HTML", "color": "#e34c26"},
            "languages": {"edges": [{"size": 500, "node": {"name": "HTML", "color": "#e34c26"}}]}
        }]},
        "followers": {"totalCount": 7}
    }}}"##;

    struct FixtureSource {
        body: &'static str,
    }

    #[async_trait]
    impl SnapshotSource for FixtureSource {
        async fn fetch_snapshot(&self, _request: &SnapshotRequest) -> Result<UserNode> {
            parse_saved_snapshot(self.body)
        }

        fn name(&self) -> &str {
            "fixture"
        }
    }

    struct FailingSource;

    #[async_trait]
    impl SnapshotSource for FailingSource {
        async fn fetch_snapshot(&self, request: &SnapshotRequest) -> Result<UserNode> {
            Err(Error::UserNotFound(request.login.clone()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn quiet() -> PipelineConfig {
        PipelineConfig {
            show_progress: false,
        }
    }

    #[tokio::test]
    async fn test_run_builds_report() {
        let pipeline =
            WrappedPipeline::new(FixtureSource { body: SAVED }, StatsEngine::new(), quiet());
        let report = pipeline.run(&SnapshotRequest::new("octocat", 2025)).await.unwrap();

        assert_eq!(report.login, "octocat");
        assert_eq!(report.name, "octocat");
        assert_eq!(report.year, 2025);
        assert_eq!(report.stats.total_contributions, 6);
        assert_eq!(report.stats.total_prs, 1);
        assert_eq!(report.stats.followers, 7);
        assert_eq!(report.stats.top_languages[0].percentage_label(), "100.0");
        assert_eq!(report.stats.most_productive_day.as_ref().unwrap().name, "Thursday");
        assert_eq!(report.stats.most_productive_month.as_ref().unwrap().name, "June");
        assert_eq!(report.stats.max_streak, 2);
        assert_eq!(report.stats.current_streak, 2);
        assert_eq!(report.stats.top_repos[0].name, "spoon-knife");
        assert!(report.stats.degenerate.is_empty());
    }

    #[tokio::test]
    async fn test_run_propagates_source_errors() {
        let pipeline = WrappedPipeline::new(FailingSource, StatsEngine::new(), quiet());
        let err = pipeline.run(&SnapshotRequest::new("ghost", 2025)).await.unwrap_err();
        assert!(matches!(err, Error::UserNotFound(ref login) if login == "ghost"));
    }

    #[tokio::test]
    async fn test_run_rejects_malformed_snapshot() {
        let body = r#"{"login": "octocat", "followers": {"totalCount": 1}}"#;
        let pipeline = WrappedPipeline::new(FixtureSource { body }, StatsEngine::new(), quiet());
        let err = pipeline.run(&SnapshotRequest::new("octocat", 2025)).await.unwrap_err();
        assert!(matches!(err, Error::MalformedSnapshot(_)));
    }

    #[test]
    fn test_summarize_empty_year() {
        let body = r#"{
            "login": "newbie",
            "contributionsCollection": {
                "contributionCalendar": {"totalContributions": 0, "weeks": []},
                "totalCommitContributions": 0,
                "totalIssueContributions": 0,
                "totalPullRequestContributions": 0,
                "totalPullRequestReviewContributions": 0,
                "totalRepositoryContributions": 0
            },
            "repositories": {"totalCount": 0, "nodes": []},
            "followers": {"totalCount": 0}
        }"#;
        let pipeline = WrappedPipeline::new(FailingSource, StatsEngine::new(), quiet());
        let report = pipeline
            .summarize(parse_saved_snapshot(body).unwrap(), 2025)
            .unwrap();

        assert!(report.stats.top_languages.is_empty());
        assert!(report.stats.most_productive_day.is_none());
        assert_eq!(
            report.stats.degenerate,
            vec![
                DegenerateAggregation::NoLanguageData,
                DegenerateAggregation::NoContributionDays
            ]
        );
    }
}
