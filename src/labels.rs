//! Label-set semantics: the label families triage reads and writes.
//!
//! Each check merges two sources of truth: the label list fetched fresh from
//! the API and the label carried by the current event when the action is
//! `labeled`. A `labeled` webhook can fire before the listing endpoint
//! reflects the new label; matching on the event payload directly closes
//! that race.

use crate::webhook::Action;

/// Prefix shared by all priority labels.
pub const PRIORITY_PREFIX: &str = "[Pri] ";
/// Prefix matching the escalation label, current name and legacy alias.
pub const ESCALATED_PREFIX: &str = "[Status] Escalated";
/// Label marking an issue as a bug report.
pub const TYPE_BUG: &str = "[Type] Bug";

/// Priority labels currently in effect for the issue.
#[must_use]
pub fn priority_labels(labels: &[String], action: Action, event_label: Option<&str>) -> Vec<String> {
    let mut found: Vec<String> = labels
        .iter()
        .filter(|label| label.starts_with(PRIORITY_PREFIX))
        .cloned()
        .collect();
    if action == Action::Labeled {
        if let Some(label) = event_label {
            if label.starts_with(PRIORITY_PREFIX) && !found.iter().any(|known| known == label) {
                found.push(label.to_string());
            }
        }
    }
    found
}

/// Whether the issue carries an escalation label.
#[must_use]
pub fn is_escalated(labels: &[String], action: Action, event_label: Option<&str>) -> bool {
    labels.iter().any(|label| label.starts_with(ESCALATED_PREFIX))
        || matches_event(action, event_label, |label| label.starts_with(ESCALATED_PREFIX))
}

/// Whether the issue is typed as a bug report.
#[must_use]
pub fn is_bug(labels: &[String], action: Action, event_label: Option<&str>) -> bool {
    labels.iter().any(|label| label == TYPE_BUG)
        || matches_event(action, event_label, |label| label == TYPE_BUG)
}

fn matches_event(action: Action, event_label: Option<&str>, pred: impl Fn(&str) -> bool) -> bool {
    action == Action::Labeled && event_label.is_some_and(pred)
}
