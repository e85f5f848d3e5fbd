//! Priority tiers and the decision table mapping issue-template answers to a
//! tier.

use std::fmt;

use crate::labels::PRIORITY_PREFIX;
use crate::template::ImpactSignal;

/// Workaround answer: no workaround and the platform is unusable.
const WORKAROUND_NONE_UNUSABLE: &str = "No and the platform is unusable";
/// Workaround answer: no workaround but the platform still works.
const WORKAROUND_NONE_USABLE: &str = "No but the platform is still usable";
/// Workaround answer: a workaround exists but is hard to apply.
const WORKAROUND_DIFFICULT: &str = "Yes but it is difficult";
/// Sentinel the issue form records when a question was left unanswered.
const NO_RESPONSE: &str = "No response";

/// Impact answer: a single user is affected.
const IMPACT_ONE: &str = "One";
/// Impact answer: more than half of users are affected.
const IMPACT_MOST: &str = "Most (>50%)";
/// Impact answer: every user is affected.
const IMPACT_ALL: &str = "All";

/// Priority tier. Variants are declared most severe first, so the most
/// severe tier in a set is its minimum under the derived ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PriorityTier {
    Blocker,
    High,
    Normal,
    Low,
    Tbd,
}

impl PriorityTier {
    /// Name of the board's single-select option for this tier.
    #[must_use]
    pub fn option_name(self) -> &'static str {
        match self {
            Self::Blocker => "BLOCKER",
            Self::High => "High",
            Self::Normal => "Normal",
            Self::Low => "Low",
            Self::Tbd => "TBD",
        }
    }

    /// Label form applied to issues.
    #[must_use]
    pub fn label(self) -> String {
        format!("{PRIORITY_PREFIX}{}", self.option_name())
    }

    /// Parse a `[Pri] *` label back into its tier.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.strip_prefix(PRIORITY_PREFIX)? {
            "BLOCKER" => Some(Self::Blocker),
            "High" => Some(Self::High),
            "Normal" => Some(Self::Normal),
            "Low" => Some(Self::Low),
            "TBD" => Some(Self::Tbd),
            _ => None,
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.option_name())
    }
}

/// Map the extracted impact/workaround answers to a priority tier.
///
/// First-match decision table over the template's multiple-choice literals.
/// Absent or unanswered input resolves to [`PriorityTier::Tbd`], never an
/// error. The table is asymmetric on purpose: "no workaround, platform
/// unusable" is BLOCKER unless only one user is impacted, while "no
/// workaround but still usable" is High regardless of impact breadth.
#[must_use]
pub fn decide(signal: Option<&ImpactSignal>) -> PriorityTier {
    let Some(signal) = signal else {
        return PriorityTier::Tbd;
    };
    let impact = signal.impact.trim();
    let workaround = signal.workaround.trim();

    if workaround == WORKAROUND_NONE_UNUSABLE {
        return if impact == IMPACT_ONE {
            PriorityTier::High
        } else {
            PriorityTier::Blocker
        };
    }
    if workaround == WORKAROUND_NONE_USABLE {
        return PriorityTier::High;
    }
    if workaround == WORKAROUND_DIFFICULT {
        return if impact == IMPACT_ALL {
            PriorityTier::High
        } else {
            PriorityTier::Normal
        };
    }
    if !workaround.is_empty() && workaround != NO_RESPONSE {
        return if impact == IMPACT_ALL || impact == IMPACT_MOST {
            PriorityTier::Normal
        } else {
            PriorityTier::Low
        };
    }
    PriorityTier::Tbd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::parse_impact_signal;

    fn signal(impact: &str, workaround: &str) -> ImpactSignal {
        ImpactSignal {
            impact: impact.to_string(),
            workaround: workaround.to_string(),
        }
    }

    fn tier(impact: &str, workaround: &str) -> PriorityTier {
        decide(Some(&signal(impact, workaround)))
    }

    #[test]
    fn no_workaround_unusable_is_blocker_unless_one_user() {
        assert_eq!(tier("All", WORKAROUND_NONE_UNUSABLE), PriorityTier::Blocker);
        assert_eq!(tier("Most (>50%)", WORKAROUND_NONE_UNUSABLE), PriorityTier::Blocker);
        assert_eq!(tier("Some (<50%)", WORKAROUND_NONE_UNUSABLE), PriorityTier::Blocker);
        assert_eq!(tier("One", WORKAROUND_NONE_UNUSABLE), PriorityTier::High);
    }

    #[test]
    fn no_workaround_but_usable_is_high_regardless_of_impact() {
        assert_eq!(tier("All", WORKAROUND_NONE_USABLE), PriorityTier::High);
        assert_eq!(tier("One", WORKAROUND_NONE_USABLE), PriorityTier::High);
        assert_eq!(tier("", WORKAROUND_NONE_USABLE), PriorityTier::High);
    }

    #[test]
    fn difficult_workaround_is_high_only_when_all_impacted() {
        assert_eq!(tier("All", WORKAROUND_DIFFICULT), PriorityTier::High);
        assert_eq!(tier("Most (>50%)", WORKAROUND_DIFFICULT), PriorityTier::Normal);
        assert_eq!(tier("One", WORKAROUND_DIFFICULT), PriorityTier::Normal);
    }

    #[test]
    fn easy_workaround_scales_with_impact_breadth() {
        assert_eq!(tier("All", "Yes, easy"), PriorityTier::Normal);
        assert_eq!(tier("Most (>50%)", "Yes, easy"), PriorityTier::Normal);
        assert_eq!(tier("Some (<50%)", "Yes, easy"), PriorityTier::Low);
        assert_eq!(tier("One", "Yes, easy"), PriorityTier::Low);
    }

    #[test]
    fn unanswered_workaround_is_tbd() {
        assert_eq!(tier("All", ""), PriorityTier::Tbd);
        assert_eq!(tier("All", NO_RESPONSE), PriorityTier::Tbd);
        assert_eq!(tier("", ""), PriorityTier::Tbd);
        assert_eq!(decide(None), PriorityTier::Tbd);
    }

    #[test]
    fn decision_from_template_body() {
        let blocker =
            "### Impact\n\nAll\n\n### Available workarounds?\n\nNo and the platform is unusable\n";
        assert_eq!(
            decide(parse_impact_signal(blocker).as_ref()),
            PriorityTier::Blocker
        );

        let high =
            "### Impact\n\nOne\n\n### Available workarounds?\n\nNo and the platform is unusable\n";
        assert_eq!(decide(parse_impact_signal(high).as_ref()), PriorityTier::High);
    }

    #[test]
    fn labels_round_trip() {
        for tier in [
            PriorityTier::Blocker,
            PriorityTier::High,
            PriorityTier::Normal,
            PriorityTier::Low,
            PriorityTier::Tbd,
        ] {
            assert_eq!(PriorityTier::from_label(&tier.label()), Some(tier));
        }
        assert_eq!(PriorityTier::Blocker.label(), "[Pri] BLOCKER");
        assert_eq!(PriorityTier::from_label("[Status] Escalated"), None);
        assert_eq!(PriorityTier::from_label("[Pri] Urgent"), None);
    }

    #[test]
    fn most_severe_tier_is_the_minimum() {
        let tiers = [PriorityTier::Low, PriorityTier::Blocker, PriorityTier::Normal];
        assert_eq!(tiers.iter().min(), Some(&PriorityTier::Blocker));
    }
}
