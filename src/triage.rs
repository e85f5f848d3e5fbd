//! Per-event triage pipeline.
//!
//! Sequences parse → decide → board sync (best effort) → label
//! reconciliation for one issue event. Board-chain failures never prevent
//! labels from being applied; label-endpoint failures abort the run, since
//! those writes are idempotent and safe to retry on the next event.

use tracing::{debug, info, warn};

use crate::board::{BoardClient, BoardLink};
use crate::client::GitHubClient;
use crate::config::Config;
use crate::error::Error;
use crate::labels;
use crate::priority::{self, PriorityTier};
use crate::template;
use crate::webhook::{Action, IssueEvent};

/// Terminal report of one triage run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Labels reconciled and board field synced (or legitimately skipped).
    Success,
    /// Required configuration is missing; nothing was attempted.
    Skipped {
        /// The missing input
        reason: String,
    },
    /// Board sync failed but labels were applied.
    PartialFailure {
        /// The board-chain failure
        reason: String,
    },
}

/// Orchestrates one issue event end to end.
pub struct Triage {
    config: Config,
}

impl Triage {
    /// Create an orchestrator over the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the triage pipeline for one event.
    pub async fn run(&self, event: &IssueEvent) -> Result<Outcome, Error> {
        let (github_token, project_token, board_url) = match self.config.require() {
            Ok(required) => required,
            Err(Error::Configuration(missing)) => {
                warn!(missing, "Skipping triage: required configuration is absent");
                return Ok(Outcome::Skipped {
                    reason: missing.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        match event.action {
            Action::Opened | Action::Reopened => {
                self.triage_new_issue(event, github_token, project_token, board_url)
                    .await
            }
            Action::Labeled => {
                self.refresh_from_label(event, github_token, project_token, board_url)
                    .await
            }
            Action::Edited | Action::Closed | Action::Other => {
                debug!(action = ?event.action, issue = event.number, "Action is out of triage scope");
                Ok(Outcome::Success)
            }
        }
    }

    /// Full pipeline for `opened`/`reopened` events.
    async fn triage_new_issue(
        &self,
        event: &IssueEvent,
        github_token: &str,
        project_token: &str,
        board_url: &str,
    ) -> Result<Outcome, Error> {
        let gh = GitHubClient::new(github_token, &self.config.api_base, &self.config.graphql_url)?;

        let plugins = template::parse_plugins(&event.body);
        let platforms = template::parse_platforms(&event.body);
        let signal = template::parse_impact_signal(&event.body);
        let tier = priority::decide(signal.as_ref());
        info!(
            issue = event.number,
            tier = %tier,
            plugins = plugins.len(),
            platforms = platforms.len(),
            "Computed triage decision"
        );

        // Fresh snapshot; the event payload can be stale relative to
        // concurrent edits.
        let current = gh.list_labels(&event.owner, &event.repo, event.number).await?;
        debug!(
            fresh = current.len(),
            payload = event.current_labels.len(),
            "Fetched issue labels"
        );

        let event_label = event.event_label.as_deref();
        let existing_priority = labels::priority_labels(&current, event.action, event_label);
        let escalated = labels::is_escalated(&current, event.action, event_label);
        let bug = labels::is_bug(&current, event.action, event_label);

        let board_result = self
            .sync_board(project_token, board_url, &event.issue_node_id, tier)
            .await;

        let mut to_add = plugins;
        to_add.extend(platforms);
        if bug && existing_priority.is_empty() && !escalated {
            to_add.push(tier.label());
        } else if !existing_priority.is_empty() {
            debug!(existing = ?existing_priority, "Issue already carries a priority label");
        }
        gh.add_labels(&event.owner, &event.repo, event.number, &to_add)
            .await?;

        match board_result {
            Ok(()) => Ok(Outcome::Success),
            Err(e) => {
                warn!(error = %e, issue = event.number, "Board sync failed; labels were still applied");
                Ok(Outcome::PartialFailure {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// `labeled` events re-evaluate state only: no labels are written, but a
    /// carried priority label is mirrored onto the board.
    async fn refresh_from_label(
        &self,
        event: &IssueEvent,
        github_token: &str,
        project_token: &str,
        board_url: &str,
    ) -> Result<Outcome, Error> {
        let Some(event_label) = event.event_label.as_deref() else {
            debug!(issue = event.number, "labeled event carried no label payload");
            return Ok(Outcome::Success);
        };
        let relevant = event_label.starts_with(labels::PRIORITY_PREFIX)
            || event_label.starts_with(labels::ESCALATED_PREFIX)
            || event_label == labels::TYPE_BUG;
        if !relevant {
            debug!(label = event_label, "Label is outside triage's families");
            return Ok(Outcome::Success);
        }

        let gh = GitHubClient::new(github_token, &self.config.api_base, &self.config.graphql_url)?;
        let current = gh.list_labels(&event.owner, &event.repo, event.number).await?;

        let priority = labels::priority_labels(&current, event.action, Some(event_label));
        let escalated = labels::is_escalated(&current, event.action, Some(event_label));
        info!(
            issue = event.number,
            escalated,
            priority = ?priority,
            "Re-evaluated label state"
        );

        // Most severe tier carried by the merged label set; without one
        // there is nothing to mirror.
        let Some(tier) = priority
            .iter()
            .filter_map(|label| PriorityTier::from_label(label))
            .min()
        else {
            return Ok(Outcome::Success);
        };

        match self
            .sync_board(project_token, board_url, &event.issue_node_id, tier)
            .await
        {
            Ok(()) => Ok(Outcome::Success),
            Err(e) => {
                warn!(error = %e, issue = event.number, "Board sync failed");
                Ok(Outcome::PartialFailure {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// The full board chain: resolve the schema, locate the item, write the
    /// field. Best-effort from the caller's perspective; every early return
    /// here is a legitimate no-op, not a failure.
    async fn sync_board(
        &self,
        project_token: &str,
        board_url: &str,
        issue_node_id: &str,
        tier: PriorityTier,
    ) -> Result<(), Error> {
        let link = BoardLink::parse(board_url)?;
        let gh = GitHubClient::new(project_token, &self.config.api_base, &self.config.graphql_url)?;
        let board = BoardClient::new(gh);

        let board_info = board.resolve_board(&link).await?;
        let Some(field) = board_info.priority_field else {
            return Ok(());
        };
        let Some(option_id) = field.options.get(tier.option_name()) else {
            debug!(tier = %tier, "Board schema has no option for the computed tier; skipping field write");
            return Ok(());
        };
        let Some(item) = board
            .find_board_item(issue_node_id, &board_info.project_id)
            .await?
        else {
            debug!("Issue is not tracked on the configured board");
            return Ok(());
        };

        board
            .set_priority(&board_info.project_id, &item.item_id, &field.field_id, option_id)
            .await
    }
}
