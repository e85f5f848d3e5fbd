//! Issue-template section parsing.
//!
//! Extracts structured answers from the free-form issue body using the fixed
//! section headers of the bug-report template. Bodies are not guaranteed to
//! match the template (issues can be filed without it), so every extractor
//! degrades to empty/absent instead of failing.

use regex::Regex;
use tracing::debug;

/// Section header preceding the comma-separated impacted plugin list.
const PLUGIN_SECTION: &str = "### Impacted plugin";
/// Section header preceding the comma-separated platform list.
const PLATFORM_SECTION: &str = "### Platform";
/// Platform value that is not triageable and is dropped from the list.
const SELF_HOSTED: &str = "Self-hosted";

/// Pattern capturing the "Impact" answer followed by the
/// "Available workarounds?" answer.
const IMPACT_PATTERN: &str =
    r"(?s)### Impact\s*\n+(.*?)\n+### Available workarounds\?\s*\n+(.*?)(?:\n+###|\s*$)";

/// Impact/workaround answers extracted from the issue body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactSignal {
    /// Raw answer to the "Impact" question
    pub impact: String,
    /// Raw answer to the "Available workarounds?" question
    pub workaround: String,
}

/// Impacted plugins listed in the issue body.
#[must_use]
pub fn parse_plugins(body: &str) -> Vec<String> {
    parse_section_list(body, PLUGIN_SECTION)
}

/// Platforms listed in the issue body, minus `Self-hosted`.
#[must_use]
pub fn parse_platforms(body: &str) -> Vec<String> {
    parse_section_list(body, PLATFORM_SECTION)
        .into_iter()
        .filter(|platform| platform != SELF_HOSTED)
        .collect()
}

/// Impact/workaround answers, when the template sections are present.
#[must_use]
pub fn parse_impact_signal(body: &str) -> Option<ImpactSignal> {
    let re = Regex::new(IMPACT_PATTERN).unwrap();
    let Some(caps) = re.captures(body) else {
        debug!("Impact/workaround markers not found in issue body");
        return None;
    };
    Some(ImpactSignal {
        impact: caps[1].trim().to_string(),
        workaround: caps[2].trim().to_string(),
    })
}

/// Capture the comma-separated line following `header`, trimmed, empties
/// dropped.
fn parse_section_list(body: &str, header: &str) -> Vec<String> {
    let pattern = format!(r"(?m)^{}\s*\n+([^\n]+)", regex::escape(header));
    let re = Regex::new(&pattern).unwrap();
    let Some(caps) = re.captures(body) else {
        debug!(section = header, "Section marker not found in issue body");
        return Vec::new();
    };
    caps[1]
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugins_are_split_and_trimmed() {
        let body = "### Impacted plugin\n\nAlpha, Beta\n\n";
        assert_eq!(parse_plugins(body), vec!["Alpha", "Beta"]);
    }

    #[test]
    fn plugin_list_drops_empty_entries() {
        let body = "### Impacted plugin\n\n Alpha ,, Beta , \n";
        assert_eq!(parse_plugins(body), vec!["Alpha", "Beta"]);
    }

    #[test]
    fn missing_plugin_section_yields_empty() {
        assert!(parse_plugins("just a freeform report").is_empty());
        assert!(parse_plugins("").is_empty());
    }

    #[test]
    fn platforms_drop_self_hosted_among_others() {
        let body = "### Platform\n\nCloud, Self-hosted, Desktop\n";
        assert_eq!(parse_platforms(body), vec!["Cloud", "Desktop"]);
    }

    #[test]
    fn self_hosted_alone_yields_empty() {
        let body = "### Platform\n\nSelf-hosted\n";
        assert!(parse_platforms(body).is_empty());
    }

    #[test]
    fn impact_signal_captures_both_answers() {
        let body =
            "### Impact\n\nAll\n\n### Available workarounds?\n\nNo and the platform is unusable\n";
        let signal = parse_impact_signal(body).expect("template sections present");
        assert_eq!(signal.impact, "All");
        assert_eq!(signal.workaround, "No and the platform is unusable");
    }

    #[test]
    fn impact_signal_stops_at_next_section() {
        let body = "### Impact\n\nOne\n\n### Available workarounds?\n\nYes, easy\n\n### Extra\n\nmore text\n";
        let signal = parse_impact_signal(body).expect("template sections present");
        assert_eq!(signal.impact, "One");
        assert_eq!(signal.workaround, "Yes, easy");
    }

    #[test]
    fn impact_signal_absent_without_markers() {
        assert!(parse_impact_signal("no template here").is_none());
        assert!(parse_impact_signal("### Impact\n\nAll\n").is_none());
    }

    #[test]
    fn unanswered_workaround_captures_empty() {
        let body = "### Impact\n\nAll\n\n### Available workarounds?\n\n";
        let signal = parse_impact_signal(body).expect("sections present");
        assert_eq!(signal.impact, "All");
        assert_eq!(signal.workaround, "");
    }
}
