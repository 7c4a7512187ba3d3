//! Per-report configuration: which records a report reads, its known states,
//! funnel milestones and cohort dimensions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::models::{Dimension, InterviewResult, RecordKind, TrackedRecord};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Jobs,
    Interviews,
    Networking,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Jobs => "jobs",
            ReportKind::Interviews => "interviews",
            ReportKind::Networking => "networking",
        }
    }

    pub fn profile(self) -> &'static ReportProfile {
        match self {
            ReportKind::Jobs => &JOBS,
            ReportKind::Interviews => &INTERVIEWS,
            ReportKind::Networking => &NETWORKING,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jobs" => Ok(ReportKind::Jobs),
            "interviews" => Ok(ReportKind::Interviews),
            "networking" => Ok(ReportKind::Networking),
            other => Err(format!("unknown report kind '{other}'")),
        }
    }
}

/// A condition a record either has or has not met at some point.
#[derive(Debug, Clone, Copy)]
pub enum Milestone {
    /// Every record meets it.
    Any,
    /// Currently in, or historically passed through, any of these states.
    Reached(&'static [&'static str]),
    /// Interview outcome is one of these results.
    Outcome(&'static [InterviewResult]),
}

impl Milestone {
    pub fn is_met(&self, record: &TrackedRecord) -> bool {
        match self {
            Milestone::Any => true,
            Milestone::Reached(states) => record.has_reached_any(states),
            Milestone::Outcome(results) => record
                .outcome
                .as_ref()
                .is_some_and(|o| results.contains(&o.result)),
        }
    }
}

/// What counts as acting on a record before its deadline.
#[derive(Debug, Clone, Copy)]
pub enum DeadlineAction {
    /// The key date (e.g. application date) is on or before the deadline.
    KeyDate,
    /// The history entered one of these states on or before the deadline.
    Reached(&'static [&'static str]),
}

impl DeadlineAction {
    pub fn met_by(&self, record: &TrackedRecord, deadline: DateTime<Utc>) -> bool {
        let acted = match self {
            DeadlineAction::KeyDate => record.key_date,
            DeadlineAction::Reached(states) => record.reached_at(states),
        };
        acted.is_some_and(|at| at <= deadline)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FunnelStage {
    pub name: &'static str,
    pub milestone: Milestone,
}

#[derive(Debug)]
pub struct ReportProfile {
    pub kind: ReportKind,
    pub record_kinds: &'static [RecordKind],
    /// Known states, in lifecycle order. Always present in `distribution`.
    pub states: &'static [&'static str],
    pub funnel: &'static [FunnelStage],
    pub success: Milestone,
    pub response: Option<Milestone>,
    pub interview: Option<Milestone>,
    pub offer: Option<Milestone>,
    pub completion: Option<Milestone>,
    pub deadline_action: DeadlineAction,
    /// State whose exit time is reported as `avgResponseDays` per cohort.
    pub response_from: &'static str,
    pub dimensions: &'static [Dimension],
}

impl ReportProfile {
    pub fn includes(&self, record: &TrackedRecord) -> bool {
        self.record_kinds.contains(&record.kind)
    }

    /// Canonical spelling of `state` if it belongs to this profile.
    pub fn canonical_state(&self, state: &str) -> Option<&'static str> {
        self.states
            .iter()
            .copied()
            .find(|known| crate::analytics::models::same_state(known, state))
    }
}

pub const OTHER_STATE: &str = "Other";

const JOB_APPLIED: &[&str] = &["Applied", "Phone Screen", "Interview", "Offer", "Rejected"];
const JOB_RESPONDED: &[&str] = &["Phone Screen", "Interview", "Offer", "Rejected"];
const JOB_INTERVIEWED: &[&str] = &["Interview", "Offer"];
const JOB_OFFER: &[&str] = &["Offer"];

static JOBS: ReportProfile = ReportProfile {
    kind: ReportKind::Jobs,
    record_kinds: &[RecordKind::Job],
    states: &[
        "Interested",
        "Applied",
        "Phone Screen",
        "Interview",
        "Offer",
        "Rejected",
        "Withdrawn",
    ],
    funnel: &[
        FunnelStage {
            name: "Applied",
            milestone: Milestone::Reached(JOB_APPLIED),
        },
        FunnelStage {
            name: "Interview",
            milestone: Milestone::Reached(JOB_INTERVIEWED),
        },
        FunnelStage {
            name: "Offer",
            milestone: Milestone::Reached(JOB_OFFER),
        },
    ],
    success: Milestone::Reached(JOB_INTERVIEWED),
    response: Some(Milestone::Reached(JOB_RESPONDED)),
    interview: Some(Milestone::Reached(JOB_INTERVIEWED)),
    offer: Some(Milestone::Reached(JOB_OFFER)),
    completion: None,
    deadline_action: DeadlineAction::KeyDate,
    response_from: "Applied",
    dimensions: &[Dimension::Company, Dimension::Industry, Dimension::WorkMode],
};

const INTERVIEW_SUCCESS: &[InterviewResult] = &[InterviewResult::Passed, InterviewResult::Offer];

static INTERVIEWS: ReportProfile = ReportProfile {
    kind: ReportKind::Interviews,
    record_kinds: &[RecordKind::Interview],
    states: &["Scheduled", "Completed", "Cancelled", "No Show"],
    funnel: &[
        FunnelStage {
            name: "Scheduled",
            milestone: Milestone::Any,
        },
        FunnelStage {
            name: "Completed",
            milestone: Milestone::Reached(&["Completed"]),
        },
        FunnelStage {
            name: "Successful",
            milestone: Milestone::Outcome(INTERVIEW_SUCCESS),
        },
        FunnelStage {
            name: "Offer",
            milestone: Milestone::Outcome(&[InterviewResult::Offer]),
        },
    ],
    success: Milestone::Outcome(INTERVIEW_SUCCESS),
    response: None,
    interview: None,
    offer: Some(Milestone::Outcome(&[InterviewResult::Offer])),
    completion: Some(Milestone::Reached(&["Completed"])),
    deadline_action: DeadlineAction::KeyDate,
    response_from: "Scheduled",
    dimensions: &[Dimension::InterviewType, Dimension::Company],
};

const NETWORK_FOLLOWED_UP: &[&str] = &["Followed Up", "Connected"];

static NETWORKING: ReportProfile = ReportProfile {
    kind: ReportKind::Networking,
    record_kinds: &[RecordKind::NetworkingEvent, RecordKind::RelationshipActivity],
    states: &["Planned", "Attended", "Followed Up", "Connected", "Skipped"],
    funnel: &[
        FunnelStage {
            name: "Planned",
            milestone: Milestone::Any,
        },
        FunnelStage {
            name: "Attended",
            milestone: Milestone::Reached(&["Attended", "Followed Up", "Connected"]),
        },
        FunnelStage {
            name: "Followed Up",
            milestone: Milestone::Reached(NETWORK_FOLLOWED_UP),
        },
        FunnelStage {
            name: "Connected",
            milestone: Milestone::Reached(&["Connected"]),
        },
    ],
    success: Milestone::Reached(NETWORK_FOLLOWED_UP),
    response: Some(Milestone::Reached(NETWORK_FOLLOWED_UP)),
    interview: None,
    offer: None,
    completion: Some(Milestone::Reached(&["Attended", "Followed Up", "Connected"])),
    // `deadline` on networking records is the follow-up due date.
    deadline_action: DeadlineAction::Reached(NETWORK_FOLLOWED_UP),
    response_from: "Attended",
    dimensions: &[Dimension::Industry, Dimension::Company],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::models::fixtures::{days_ago, job, record};
    use crate::analytics::models::{InterviewOutcome, StatusHistory};

    #[test]
    fn test_kind_round_trips_through_path_segment() {
        for kind in [ReportKind::Jobs, ReportKind::Interviews, ReportKind::Networking] {
            assert_eq!(kind.as_str().parse::<ReportKind>(), Ok(kind));
            assert_eq!(kind.profile().kind, kind);
        }
        assert!("offers".parse::<ReportKind>().is_err());
    }

    #[test]
    fn test_canonical_state_lookup() {
        let jobs = ReportKind::Jobs.profile();
        assert_eq!(jobs.canonical_state("phone screen"), Some("Phone Screen"));
        assert_eq!(jobs.canonical_state("Ghosted"), None);
    }

    #[test]
    fn test_outcome_milestone() {
        let mut interview = record(RecordKind::Interview, "i1", "Completed", &[("Scheduled", 3)]);
        let success = ReportKind::Interviews.profile().success;
        assert!(!success.is_met(&interview));
        interview.outcome = Some(InterviewOutcome {
            result: InterviewResult::Passed,
            rating: Some(4.0),
        });
        assert!(success.is_met(&interview));
    }

    #[test]
    fn test_follow_up_deadline_needs_the_follow_up_state() {
        let action = ReportKind::Networking.profile().deadline_action;
        let mut late = record(
            RecordKind::NetworkingEvent,
            "n1",
            "Followed Up",
            &[("Planned", 30), ("Attended", 20), ("Followed Up", 5)],
        );
        late.key_date = Some(days_ago(20));
        assert!(!action.met_by(&late, days_ago(10)));
        assert!(action.met_by(&late, days_ago(5)));

        let mut ignored = late.clone();
        ignored.status_history = StatusHistory::Malformed;
        assert!(!action.met_by(&ignored, days_ago(1)));
    }

    #[test]
    fn test_profile_filters_record_kinds() {
        let j = job("j", "Applied", &[("Applied", 1)]);
        assert!(ReportKind::Jobs.profile().includes(&j));
        assert!(!ReportKind::Networking.profile().includes(&j));
    }
}
