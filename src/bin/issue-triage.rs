//! issue-triage - one-shot triage run for a single issue event.
//!
//! Reads the webhook payload the CI runner materialized on disk, infers
//! priority and impacted plugins/platforms from the issue body, applies the
//! corresponding labels, and mirrors the priority onto the configured
//! project board.
//!
//! # Environment Variables
//!
//! - `GITHUB_TOKEN` - automation token for the label endpoints (required)
//! - `TRIAGE_PROJECT_TOKEN` - token with project scopes for the board (required)
//! - `TRIAGE_PROJECT_URL` - project board URL (required)
//! - `GITHUB_EVENT_PATH` - path to the event payload JSON (required)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use triage::webhook::IssueEvent;
use triage::{config, Config, Outcome, Triage};

/// One-shot issue triage run.
#[derive(Parser)]
#[command(name = "issue-triage")]
#[command(about = "Infer priority from an issue event, apply labels, sync the project board")]
#[command(version)]
struct Cli {
    /// Automation token for the label endpoints (or set `GITHUB_TOKEN`)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Token with project scopes for the board (or set `TRIAGE_PROJECT_TOKEN`)
    #[arg(long, env = "TRIAGE_PROJECT_TOKEN", hide_env_values = true)]
    project_token: Option<String>,

    /// URL of the project board mirroring triage priority (or set `TRIAGE_PROJECT_URL`)
    #[arg(long, env = "TRIAGE_PROJECT_URL")]
    project_url: Option<String>,

    /// Path to the event payload JSON (or set `GITHUB_EVENT_PATH`)
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,

    /// REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = config::DEFAULT_API_BASE)]
    api_url: String,

    /// GraphQL endpoint URL
    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = config::DEFAULT_GRAPHQL_URL)]
    graphql_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let event = IssueEvent::load(&cli.event_path).with_context(|| {
        format!("Failed to load event payload from {}", cli.event_path.display())
    })?;
    info!(
        action = ?event.action,
        issue = event.number,
        owner = %event.owner,
        repo = %event.repo,
        "Loaded issue event"
    );

    let config = Config::new(cli.token, cli.project_token, cli.project_url)
        .with_endpoints(cli.api_url, cli.graphql_url);

    let outcome = Triage::new(config)
        .run(&event)
        .await
        .context("Triage run failed")?;

    match outcome {
        Outcome::Success => info!(issue = event.number, "Triage complete"),
        Outcome::Skipped { reason } => {
            warn!(reason = %reason, "Triage skipped");
        }
        Outcome::PartialFailure { reason } => {
            warn!(
                reason = %reason,
                "Triage completed partially: labels applied, board sync failed"
            );
        }
    }
    Ok(())
}
