//! Row types for the tracker tables and their conversion into engine records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

use crate::analytics::models::{
    InterviewOutcome, InterviewResult, RecordKind, StatusHistory, TrackedRecord,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub work_mode: Option<String>,
    pub status: String,
    pub status_history: Value,
    pub application_date: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Option<Uuid>,
    pub company: Option<String>,
    pub interview_type: Option<String>,
    pub status: String,
    pub status_history: Value,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub outcome_result: Option<String>,
    pub outcome_rating: Option<f64>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

/// Shared shape of `networking_events` and `relationship_activities`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NetworkingRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub status: String,
    pub status_history: Value,
    pub occurred_at: Option<DateTime<Utc>>,
    pub follow_up_by: Option<DateTime<Utc>>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

impl From<JobRow> for TrackedRecord {
    fn from(row: JobRow) -> Self {
        TrackedRecord {
            id: row.id.to_string(),
            kind: RecordKind::Job,
            company: row.company,
            industry: row.industry,
            work_mode: row.work_mode,
            interview_type: None,
            current_state: row.status,
            status_history: StatusHistory::from_json(row.status_history),
            created_at: Some(row.created_at),
            key_date: row.application_date,
            deadline: row.deadline,
            archived: row.archived,
            outcome: None,
        }
    }
}

impl From<InterviewRow> for TrackedRecord {
    fn from(row: InterviewRow) -> Self {
        let outcome = row
            .outcome_result
            .as_deref()
            .and_then(|raw| parse_result(&row.id, raw))
            .map(|result| InterviewOutcome {
                result,
                rating: row.outcome_rating,
            });
        TrackedRecord {
            id: row.id.to_string(),
            kind: RecordKind::Interview,
            company: row.company,
            industry: None,
            work_mode: None,
            interview_type: row.interview_type,
            current_state: row.status,
            status_history: StatusHistory::from_json(row.status_history),
            created_at: Some(row.created_at),
            key_date: row.scheduled_at,
            deadline: None,
            archived: row.archived,
            outcome,
        }
    }
}

impl NetworkingRow {
    pub fn into_record(self, kind: RecordKind) -> TrackedRecord {
        TrackedRecord {
            id: self.id.to_string(),
            kind,
            company: self.company,
            industry: self.industry,
            work_mode: None,
            interview_type: None,
            current_state: self.status,
            status_history: StatusHistory::from_json(self.status_history),
            created_at: Some(self.created_at),
            key_date: self.occurred_at,
            deadline: self.follow_up_by,
            archived: self.archived,
            outcome: None,
        }
    }
}

fn parse_result(id: &Uuid, raw: &str) -> Option<InterviewResult> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pending" => Some(InterviewResult::Pending),
        "passed" | "pass" => Some(InterviewResult::Passed),
        "failed" | "fail" => Some(InterviewResult::Failed),
        "offer" => Some(InterviewResult::Offer),
        other => {
            warn!(interview_id = %id, "ignoring unknown interview result '{other}'");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn interview_row(result: Option<&str>) -> InterviewRow {
        InterviewRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            job_id: None,
            company: Some("Acme".to_string()),
            interview_type: Some("Technical".to_string()),
            status: "Completed".to_string(),
            status_history: json!([
                {"state": "Scheduled", "timestamp": "2026-05-01T10:00:00Z"},
                {"state": "Completed", "timestamp": "2026-05-08T10:00:00Z"}
            ]),
            scheduled_at: None,
            outcome_result: result.map(str::to_string),
            outcome_rating: Some(4.0),
            archived: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_interview_row_conversion() {
        let record: TrackedRecord = interview_row(Some("Passed")).into();
        assert_eq!(record.kind, RecordKind::Interview);
        assert_eq!(record.history().unwrap().len(), 2);
        let outcome = record.outcome.unwrap();
        assert_eq!(outcome.result, InterviewResult::Passed);
        assert_eq!(outcome.rating, Some(4.0));
    }

    #[test]
    fn test_unknown_result_drops_outcome() {
        let record: TrackedRecord = interview_row(Some("maybe")).into();
        assert!(record.outcome.is_none());
    }

    #[test]
    fn test_job_row_with_bad_history_is_kept() {
        let row = JobRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            company: None,
            industry: None,
            work_mode: Some("Remote".to_string()),
            status: "Applied".to_string(),
            status_history: json!({"oops": true}),
            application_date: None,
            deadline: None,
            archived: true,
            created_at: Utc::now(),
        };
        let record: TrackedRecord = row.into();
        assert_eq!(record.status_history, StatusHistory::Malformed);
        assert!(record.archived);
    }
}
