mod analyze;
mod github;
mod model;
mod report;
mod utils;

use crate::analyze::{RankingQuery, TimeWindow, WeightMethod};
use crate::github::{GithubClient, PullRequestState};
use crate::model::{Config, Repository, Result, DEFAULT_API_URL};
use crate::report::{write_list_item, MarkdownReport, TerminalReport};
use crate::utils::fetch_progress;
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::MultiProgress;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Review and authorship statistics for GitHub pull requests
#[derive(Parser, Debug)]
#[command(name = "review-metrics", version, about)]
struct Args {
    /// GitHub access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,
    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Display reviewers stats for given repository
    Show {
        /// Repository as `owner/name`
        name: Repository,
        /// Select method of calculating weights of pull requests
        #[arg(short, long, value_enum, default_value_t = WeightMethod::Changes)]
        weight_method: WeightMethod,
        /// Only count pull requests carrying this label (repeatable)
        #[arg(short, long = "label")]
        labels: Vec<String>,
        #[arg(long, value_enum, default_value_t = PullRequestState::Open)]
        state: PullRequestState,
        /// Take into account only pull requests younger than
        #[arg(short, long, value_enum, default_value_t = TimeWindow::Month)]
        younger_than: TimeWindow,
        /// Also write the rankings as Markdown to this file
        #[arg(long, value_name = "FILE")]
        markdown: Option<PathBuf>,
    },
    /// Display list of labels for given repository
    Labels { name: Repository },
    /// Show list of your repos
    Repos,
    /// Display number of review comments per user for a given repository
    Comments {
        name: Repository,
        /// Select which category of pull requests you want to retrieve comments from
        #[arg(short, long, value_enum, default_value_t = PullRequestState::Open)]
        state: PullRequestState,
        /// Also write the table as Markdown to this file
        #[arg(long, value_name = "FILE")]
        markdown: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(err) = run(args).await {
        eprintln!("{} {err}", "Error:".red().bold());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let config = Config::new(args.token, &args.api_url)?;
    let github = GithubClient::new(&config)?;
    info!(api_url = %config.api_url, "Configured GitHub client");

    match args.command {
        Command::Show {
            name,
            weight_method,
            labels,
            state,
            younger_than,
            markdown,
        } => {
            let query = RankingQuery::new(weight_method, younger_than, labels);
            show(&github, &name, state, &query, markdown).await
        }
        Command::Labels { name } => list_labels(&github, &name).await,
        Command::Repos => list_repos(&github).await,
        Command::Comments {
            name,
            state,
            markdown,
        } => comments(&github, &name, state, markdown).await,
    }
}

async fn show(
    github: &GithubClient,
    repo: &Repository,
    state: PullRequestState,
    query: &RankingQuery,
    markdown: Option<PathBuf>,
) -> Result<()> {
    let multi_progress = MultiProgress::new();
    let (pages_pb, pulls_pb) = fetch_progress(&multi_progress);
    let rankings = analyze::collect_rankings(
        github,
        repo,
        state,
        query,
        Utc::now(),
        &pages_pb,
        &pulls_pb,
    )
    .await?;

    let mut stdout = io::stdout().lock();
    rankings.write_terminal(&mut stdout)?;
    stdout.flush()?;

    if let Some(path) = markdown {
        rankings.report_create(&path, &format!("Review statistics for {repo}"))?;
    }
    Ok(())
}

async fn comments(
    github: &GithubClient,
    repo: &Repository,
    state: PullRequestState,
    markdown: Option<PathBuf>,
) -> Result<()> {
    let multi_progress = MultiProgress::new();
    let (pages_pb, pulls_pb) = fetch_progress(&multi_progress);
    let counts =
        analyze::collect_comment_counts(github, repo, state, &pages_pb, &pulls_pb).await?;

    let mut stdout = io::stdout().lock();
    counts.write_terminal(&mut stdout)?;
    stdout.flush()?;

    if let Some(path) = markdown {
        counts.report_create(&path, &format!("Review comments for {repo}"))?;
    }
    Ok(())
}

async fn list_labels(github: &GithubClient, repo: &Repository) -> Result<()> {
    let labels = github.labels(repo).await?;
    let mut stdout = io::stdout().lock();
    for label in labels {
        write_list_item(&mut stdout, &label)?;
    }
    Ok(())
}

async fn list_repos(github: &GithubClient) -> Result<()> {
    let repos = github.owned_repositories().await?;
    let mut stdout = io::stdout().lock();
    for repo in repos {
        write_list_item(&mut stdout, &repo)?;
    }
    Ok(())
}
