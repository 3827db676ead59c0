use crate::analysis::calendar::CalendarTotals;
use crate::analysis::languages::rank_languages;
use crate::analysis::streaks::compute_streaks;
use crate::models::{ContributionDay, DegenerateAggregation, Repository, Snapshot, WrappedStats};

#[derive(Debug, Clone)]
pub struct StatsLimits {
    pub top_languages: usize,
    pub top_repositories: usize,
}

impl Default for StatsLimits {
    fn default() -> Self {
        Self {
            top_languages: 5,
            top_repositories: 5,
        }
    }
}

/// Turns a snapshot into wrapped statistics. Holds no state between calls.
pub struct StatsEngine {
    limits: StatsLimits,
}

impl StatsEngine {
    pub fn new() -> Self {
        Self {
            limits: StatsLimits::default(),
        }
    }

    pub fn with_limits(limits: StatsLimits) -> Self {
        Self { limits }
    }

    pub fn derive(&self, snapshot: &Snapshot) -> WrappedStats {
        let mut top_languages = rank_languages(&snapshot.repositories);
        let has_language_data = !top_languages.is_empty();
        top_languages.truncate(self.limits.top_languages);

        let days: Vec<&ContributionDay> = snapshot.calendar.days().collect();
        let calendar = CalendarTotals::collect(days.iter().copied());
        let streaks = compute_streaks(&days);

        let mut degenerate = Vec::new();
        if !has_language_data {
            degenerate.push(DegenerateAggregation::NoLanguageData);
        }
        if days.is_empty() {
            degenerate.push(DegenerateAggregation::NoContributionDays);
        }

        WrappedStats {
            total_contributions: snapshot.calendar.total_contributions,
            total_commits: snapshot.counts.commits,
            total_prs: snapshot.counts.pull_requests,
            total_issues: snapshot.counts.issues,
            total_reviews: snapshot.counts.pull_request_reviews,
            total_repos: snapshot.total_repositories,
            followers: snapshot.followers,
            top_languages,
            most_productive_day: calendar.most_productive_day(),
            most_productive_month: calendar.most_productive_month(),
            current_streak: streaks.current,
            max_streak: streaks.max,
            top_repos: starred_repositories(&snapshot.repositories, self.limits.top_repositories),
            degenerate,
        }
    }
}

impl Default for StatsEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Starred repositories in their fetched order (the query already sorts by
/// stars), capped at `limit`.
pub fn starred_repositories(repositories: &[Repository], limit: usize) -> Vec<Repository> {
    repositories
        .iter()
        .filter(|repo| repo.stargazer_count > 0)
        .take(limit)
        .cloned()
        .collect()
}
