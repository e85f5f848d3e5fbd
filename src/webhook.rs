//! Inbound `issues` webhook payload models.
//!
//! The CI runner materializes the event payload as a JSON file; this module
//! deserializes it and flattens the pieces triage needs into an
//! [`IssueEvent`].

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

/// Action carried by the `issues` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Opened,
    Reopened,
    Labeled,
    Edited,
    Closed,
    /// Any action this bot does not act on. Kept as a catch-all so new
    /// platform actions never fail deserialization.
    #[serde(other)]
    Other,
}

/// GitHub `issues` webhook payload (simplified).
#[derive(Debug, Clone, Deserialize)]
pub struct IssuesPayload {
    /// Action type (opened, labeled, closed, ...)
    pub action: Action,
    /// The issue the event concerns
    pub issue: Issue,
    /// Label involved in a `labeled`/`unlabeled` action
    #[serde(default)]
    pub label: Option<Label>,
    /// Repository info
    pub repository: Repository,
}

/// Issue fields triage reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// Issue body/description
    #[serde(default)]
    pub body: Option<String>,
    /// GraphQL node id of the issue
    pub node_id: String,
    /// Labels on the issue at event time
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// A label reference.
#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    /// Label name
    pub name: String,
}

/// Repository info.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    /// Repository name
    pub name: String,
    /// Repository owner
    pub owner: Owner,
}

/// Repository owner.
#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    /// Owner login
    pub login: String,
}

/// One issue event as consumed by the orchestrator. Immutable once built.
#[derive(Debug, Clone)]
pub struct IssueEvent {
    /// Action that fired the event
    pub action: Action,
    /// Issue number
    pub number: u64,
    /// Issue body (empty when the issue has none)
    pub body: String,
    /// Label names carried by the event payload. A point-in-time snapshot;
    /// decisions use a fresh listing instead (payloads can be stale).
    pub current_labels: Vec<String>,
    /// Label name involved in a `labeled` action
    pub event_label: Option<String>,
    /// Repository owner login
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// GraphQL node id of the issue
    pub issue_node_id: String,
}

impl IssueEvent {
    /// Flatten a webhook payload into the event form triage consumes.
    #[must_use]
    pub fn from_payload(payload: IssuesPayload) -> Self {
        Self {
            action: payload.action,
            number: payload.issue.number,
            body: payload.issue.body.unwrap_or_default(),
            current_labels: payload.issue.labels.into_iter().map(|l| l.name).collect(),
            event_label: payload.label.map(|l| l.name),
            owner: payload.repository.owner.login,
            repo: payload.repository.name,
            issue_node_id: payload.issue.node_id,
        }
    }

    /// Load and flatten the event payload from `path`.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path)?;
        let payload: IssuesPayload = serde_json::from_str(&raw)?;
        Ok(Self::from_payload(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(action: &str) -> String {
        format!(
            r####"{{
                "action": "{action}",
                "issue": {{
                    "number": 42,
                    "body": "### Impacted plugin\n\nAlpha\n",
                    "node_id": "I_abc123",
                    "labels": [{{"name": "[Type] Bug"}}]
                }},
                "label": {{"name": "[Pri] High"}},
                "repository": {{"name": "widgets", "owner": {{"login": "acme"}}}}
            }}"####
        )
    }

    #[test]
    fn flattens_payload_fields() {
        let payload: IssuesPayload = serde_json::from_str(&sample("labeled")).unwrap();
        let event = IssueEvent::from_payload(payload);

        assert_eq!(event.action, Action::Labeled);
        assert_eq!(event.number, 42);
        assert_eq!(event.owner, "acme");
        assert_eq!(event.repo, "widgets");
        assert_eq!(event.issue_node_id, "I_abc123");
        assert_eq!(event.current_labels, vec!["[Type] Bug".to_string()]);
        assert_eq!(event.event_label.as_deref(), Some("[Pri] High"));
    }

    #[test]
    fn unknown_action_maps_to_other() {
        let payload: IssuesPayload = serde_json::from_str(&sample("transferred")).unwrap();
        assert_eq!(payload.action, Action::Other);
    }

    #[test]
    fn missing_body_flattens_to_empty() {
        let raw = r#"{
            "action": "opened",
            "issue": {"number": 7, "node_id": "I_x"},
            "repository": {"name": "widgets", "owner": {"login": "acme"}}
        }"#;
        let payload: IssuesPayload = serde_json::from_str(raw).unwrap();
        let event = IssueEvent::from_payload(payload);
        assert_eq!(event.body, "");
        assert!(event.current_labels.is_empty());
        assert!(event.event_label.is_none());
    }
}
