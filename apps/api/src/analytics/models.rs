//! Record shapes consumed by the analytics engine.
//!
//! The persistence layer owns jobs, interviews and networking activity; the
//! engine only sees them as `TrackedRecord`s. Optional fields are explicit so
//! that a missing value is a branch, not a silent zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::analytics::errors::RecordDefect;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Job,
    Interview,
    NetworkingEvent,
    RelationshipActivity,
}

/// One entry of a record's status history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChange {
    pub state: String,
    pub timestamp: DateTime<Utc>,
}

/// Status history as stored by the collaborator. Anything that does not parse
/// as a list of `{state, timestamp}` is kept as `Malformed` so one bad row
/// never fails deserialization of the whole collection.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusHistory {
    Recorded(Vec<StatusChange>),
    Malformed,
}

impl Default for StatusHistory {
    fn default() -> Self {
        StatusHistory::Recorded(Vec::new())
    }
}

impl StatusHistory {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => StatusHistory::default(),
            other => serde_json::from_value::<Vec<StatusChange>>(other)
                .map(StatusHistory::Recorded)
                .unwrap_or(StatusHistory::Malformed),
        }
    }
}

impl Serialize for StatusHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StatusHistory::Recorded(entries) => entries.serialize(serializer),
            StatusHistory::Malformed => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for StatusHistory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(StatusHistory::from_json(value))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InterviewResult {
    Pending,
    Passed,
    Failed,
    Offer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewOutcome {
    pub result: InterviewResult,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl InterviewOutcome {
    /// Returns the rating if present; ratings outside 1..=5 are a defect.
    pub fn valid_rating(&self) -> Result<Option<f64>, RecordDefect> {
        match self.rating {
            Some(r) if !(1.0..=5.0).contains(&r) => Err(RecordDefect::RatingOutOfRange(r)),
            other => Ok(other),
        }
    }
}

/// Categorical attribute a cohort breakdown groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Company,
    Industry,
    WorkMode,
    InterviewType,
}

impl Dimension {
    pub fn name(self) -> &'static str {
        match self {
            Dimension::Company => "company",
            Dimension::Industry => "industry",
            Dimension::WorkMode => "workMode",
            Dimension::InterviewType => "interviewType",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedRecord {
    pub id: String,
    pub kind: RecordKind,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub work_mode: Option<String>,
    #[serde(default)]
    pub interview_type: Option<String>,
    pub current_state: String,
    #[serde(default)]
    pub status_history: StatusHistory,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub key_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub outcome: Option<InterviewOutcome>,
}

/// Stage names are compared trimmed and ASCII case-insensitively.
pub fn same_state(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

impl TrackedRecord {
    /// Status history, checked for the non-decreasing timestamp invariant.
    pub fn history(&self) -> Result<&[StatusChange], RecordDefect> {
        let entries = match &self.status_history {
            StatusHistory::Recorded(entries) => entries.as_slice(),
            StatusHistory::Malformed => return Err(RecordDefect::MalformedHistory),
        };
        if let Some(pos) = entries
            .windows(2)
            .position(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(RecordDefect::UnorderedHistory(pos + 1));
        }
        Ok(entries)
    }

    /// True if the record is in `state` now or ever passed through it.
    /// A broken history falls back to the current state alone.
    pub fn has_reached(&self, state: &str) -> bool {
        if same_state(&self.current_state, state) {
            return true;
        }
        match &self.status_history {
            StatusHistory::Recorded(entries) => entries.iter().any(|e| same_state(&e.state, state)),
            StatusHistory::Malformed => false,
        }
    }

    pub fn has_reached_any(&self, states: &[&str]) -> bool {
        states.iter().any(|s| self.has_reached(s))
    }

    /// When the history first entered any of `states`.
    pub fn reached_at(&self, states: &[&str]) -> Option<DateTime<Utc>> {
        self.history()
            .ok()?
            .iter()
            .find(|e| states.iter().any(|s| same_state(&e.state, s)))
            .map(|e| e.timestamp)
    }

    /// Date used for volume bucketing: the key date (e.g. application date),
    /// falling back to creation.
    pub fn reference_date(&self) -> Option<DateTime<Utc>> {
        self.key_date.or(self.created_at)
    }

    /// Non-empty, trimmed value of a categorical attribute.
    pub fn category(&self, dimension: Dimension) -> Option<&str> {
        let raw = match dimension {
            Dimension::Company => self.company.as_deref(),
            Dimension::Industry => self.industry.as_deref(),
            Dimension::WorkMode => self.work_mode.as_deref(),
            Dimension::InterviewType => self.interview_type.as_deref(),
        };
        raw.map(str::trim).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::{Duration, TimeZone};

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    pub fn days_ago(days: i64) -> DateTime<Utc> {
        now() - Duration::days(days)
    }

    pub fn job(id: &str, current: &str, path: &[(&str, i64)]) -> TrackedRecord {
        record(RecordKind::Job, id, current, path)
    }

    /// Builds a record whose history is `path`, each step given as
    /// `(state, days before now)`.
    pub fn record(
        kind: RecordKind,
        id: &str,
        current: &str,
        path: &[(&str, i64)],
    ) -> TrackedRecord {
        let history: Vec<StatusChange> = path
            .iter()
            .map(|(state, ago)| StatusChange {
                state: state.to_string(),
                timestamp: days_ago(*ago),
            })
            .collect();
        let created_at = history.first().map(|e| e.timestamp);
        TrackedRecord {
            id: id.to_string(),
            kind,
            company: None,
            industry: None,
            work_mode: None,
            interview_type: None,
            current_state: current.to_string(),
            status_history: StatusHistory::Recorded(history),
            created_at,
            key_date: None,
            deadline: None,
            archived: false,
            outcome: None,
        }
    }
}
