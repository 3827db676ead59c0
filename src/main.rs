use std::path::PathBuf;

use chrono::{Datelike, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gitwrapped::models::WrappedReport;
use gitwrapped::{
    Config, GitHubClient, PipelineConfig, SavedSnapshotSource, SnapshotRequest, StatsEngine,
    WrappedPipeline,
};

#[derive(Parser, Debug)]
#[command(name = "gitwrapped")]
#[command(version = "0.1.0")]
#[command(about = "Your year on GitHub, summarized")]
struct Args {
    /// GitHub username to summarize
    #[arg(short, long)]
    username: String,

    /// Calendar year (defaults to WRAPPED_YEAR, then the current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// Output format (json, text, markdown)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Derive from a saved GraphQL response instead of calling the API
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Hide the progress spinner
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gitwrapped=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    let year = args
        .year
        .or(config.year)
        .unwrap_or_else(|| Utc::now().year());
    let request = SnapshotRequest::new(args.username.trim(), year);

    let pipeline_config = PipelineConfig {
        show_progress: !args.quiet,
    };

    let pipeline = match args.snapshot {
        Some(ref path) => {
            tracing::info!("Using saved snapshot: {}", path.display());
            WrappedPipeline::new(
                SavedSnapshotSource::new(path),
                StatsEngine::new(),
                pipeline_config,
            )
        }
        None => WrappedPipeline::new(
            GitHubClient::from_config(&config)?,
            StatsEngine::new(),
            pipeline_config,
        ),
    };

    let report = pipeline.run(&request).await?;
    output_report(&report, &args)?;

    Ok(())
}

fn output_report(report: &WrappedReport, args: &Args) -> anyhow::Result<()> {
    let output = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(report)?,
        "markdown" => format_markdown(report),
        _ => format_text(report),
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_text(report: &WrappedReport) -> String {
    let stats = &report.stats;
    let mut output = String::new();

    output.push_str(&format!(
        "\n=== {}'s GitHub Wrapped {} ===\n\n",
        report.name, report.year
    ));

    output.push_str(&format!(
        "You made {} contributions this year. That's dedication!\n",
        stats.total_contributions
    ));
    output.push_str(&format!(
        "You committed {} times. Building the future, one commit at a time.\n",
        stats.total_commits
    ));
    output.push_str(&format!(
        "Issues: {}  Reviews: {}  Repositories: {}  Followers: {}\n",
        stats.total_issues, stats.total_reviews, stats.total_repos, stats.followers
    ));

    // Languages
    if let Some(top) = stats.top_languages.first() {
        output.push_str(&format!(
            "\nYour top language: {} ({}% of your code)\n",
            top.name,
            top.percentage_label()
        ));
        output.push_str("\nLanguage breakdown:\n");
        for lang in &stats.top_languages {
            output.push_str(&format!(
                "  - {:<16} {:>5}%  {}\n",
                lang.name,
                lang.percentage_label(),
                lang.color.as_deref().unwrap_or("")
            ));
        }
    }

    if let Some(ref day) = stats.most_productive_day {
        output.push_str(&format!(
            "\nMost productive on {}s: {} contributions\n",
            day.name, day.contributions
        ));
    }
    if let Some(ref month) = stats.most_productive_month {
        output.push_str(&format!(
            "Best month: {} ({} contributions)\n",
            month.name, month.contributions
        ));
    }

    output.push_str(&format!(
        "\nYou opened {} pull requests. Collaboration at its finest.\n",
        stats.total_prs
    ));
    output.push_str(&format!(
        "Longest streak: {} days in a row (current: {}). Consistency is key!\n",
        stats.max_streak, stats.current_streak
    ));

    if !stats.top_repos.is_empty() {
        output.push_str("\nYour starred repos:\n");
        for repo in stats.top_repos.iter().take(3) {
            output.push_str(&format!("  * {} ({} stars)\n", repo.name, repo.stargazer_count));
        }
    }

    output.push_str(&format!(
        "\nWhat a year! Keep building amazing things in {}.\n",
        report.year
    ));

    output
}

fn format_markdown(report: &WrappedReport) -> String {
    let stats = &report.stats;
    let mut output = String::new();

    output.push_str(&format!(
        "# {}'s GitHub Wrapped {}\n\n",
        report.name, report.year
    ));

    output.push_str("| Metric | Value |\n|--------|-------|\n");
    output.push_str(&format!("| Contributions | {} |\n", stats.total_contributions));
    output.push_str(&format!("| Commits | {} |\n", stats.total_commits));
    output.push_str(&format!("| Pull Requests | {} |\n", stats.total_prs));
    output.push_str(&format!("| Issues | {} |\n", stats.total_issues));
    output.push_str(&format!("| Reviews | {} |\n", stats.total_reviews));
    output.push_str(&format!("| Repositories | {} |\n", stats.total_repos));
    output.push_str(&format!("| Followers | {} |\n", stats.followers));
    output.push_str(&format!("| Longest Streak | {} days |\n", stats.max_streak));
    output.push_str(&format!("| Current Streak | {} days |\n", stats.current_streak));

    if let Some(ref day) = stats.most_productive_day {
        output.push_str(&format!(
            "| Most Productive Day | {} ({}) |\n",
            day.name, day.contributions
        ));
    }
    if let Some(ref month) = stats.most_productive_month {
        output.push_str(&format!(
            "| Most Productive Month | {} ({}) |\n",
            month.name, month.contributions
        ));
    }

    if !stats.top_languages.is_empty() {
        output.push_str("\n## Languages\n\n");
        output.push_str("| Language | Share | Bytes |\n");
        output.push_str("|----------|-------|-------|\n");
        for lang in &stats.top_languages {
            output.push_str(&format!(
                "| {} | {}% | {} |\n",
                lang.name,
                lang.percentage_label(),
                lang.size
            ));
        }
    }

    if !stats.top_repos.is_empty() {
        output.push_str("\n## Starred Repositories\n\n");
        for repo in stats.top_repos.iter().take(3) {
            output.push_str(&format!(
                "- **{}**: {} stars, {} forks\n",
                repo.name, repo.stargazer_count, repo.fork_count
            ));
        }
    }

    output.push_str(&format!(
        "\n---\n*Generated on {}*\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output
}
