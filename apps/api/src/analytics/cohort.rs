use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analytics::models::TrackedRecord;
use crate::analytics::profile::Milestone;
use crate::analytics::rates::{rate, round1};
use crate::analytics::stage_duration::average_days_after;

/// Key for records that carry no value for the grouped dimension.
pub const UNKNOWN_COHORT: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CohortEntry {
    pub key: String,
    pub total: usize,
    pub success_count: usize,
    pub success_rate: f64,
    /// `None` when no record in the cohort has left the response stage yet.
    pub avg_response_days: Option<f64>,
    /// `None` when the cohort has no valid interview ratings.
    pub avg_rating: Option<f64>,
}

/// What to measure inside each cohort.
pub struct CohortMetrics<'p> {
    pub success: &'p Milestone,
    pub response_from: &'p str,
}

/// Groups `records` by `dimension` and computes per-group metrics. Sorted by
/// total descending, then key ascending.
pub fn group_by<'a, F>(
    records: &[&'a TrackedRecord],
    dimension: F,
    metrics: &CohortMetrics<'_>,
) -> Vec<CohortEntry>
where
    F: Fn(&'a TrackedRecord) -> Option<&'a str>,
{
    let mut groups: HashMap<&'a str, Vec<&'a TrackedRecord>> = HashMap::new();
    for record in records.iter().copied() {
        let key = dimension(record)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(UNKNOWN_COHORT);
        groups.entry(key).or_default().push(record);
    }

    let mut entries: Vec<CohortEntry> = groups
        .into_iter()
        .map(|(key, members)| summarize(key, &members, metrics))
        .collect();
    entries.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
    entries
}

fn summarize(key: &str, members: &[&TrackedRecord], metrics: &CohortMetrics<'_>) -> CohortEntry {
    let success_count = members.iter().filter(|r| metrics.success.is_met(r)).count();
    CohortEntry {
        key: key.to_string(),
        total: members.len(),
        success_count,
        success_rate: rate(success_count, members.len()),
        avg_response_days: average_days_after(members.iter().copied(), metrics.response_from),
        avg_rating: average_rating(members),
    }
}

/// Mean of valid outcome ratings; out-of-range ratings are skipped.
pub fn average_rating(records: &[&TrackedRecord]) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for record in records {
        let Some(outcome) = &record.outcome else {
            continue;
        };
        match outcome.valid_rating() {
            Ok(Some(r)) => {
                sum += r;
                n += 1;
            }
            Ok(None) => {}
            Err(defect) => warn!(record_id = %record.id, "skipping rating: {defect}"),
        }
    }
    (n > 0).then(|| round1(sum / n as f64))
}
