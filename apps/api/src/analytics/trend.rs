use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::errors::AnalyticsError;
use crate::analytics::models::TrackedRecord;
use crate::analytics::profile::Milestone;
use crate::analytics::rates::{milestone_rate, round1};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendWindow {
    pub records: usize,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub recent_window: TrendWindow,
    pub prior_window: TrendWindow,
    pub improvement_score: f64,
    pub direction: TrendDirection,
}

/// Compares the success rate of records created in the last three months
/// against those created three to six months ago.
///
/// `direction` is `Improving` above `+threshold`, `Declining` below
/// `-threshold`, and `Stable` otherwise or whenever either window is empty.
pub fn compare_trend(
    records: &[&TrackedRecord],
    success: &Milestone,
    now: DateTime<Utc>,
    threshold: f64,
) -> Result<TrendReport, AnalyticsError> {
    let three_ago = now
        .checked_sub_months(Months::new(3))
        .ok_or(AnalyticsError::InvalidNow(now))?;
    let six_ago = now
        .checked_sub_months(Months::new(6))
        .ok_or(AnalyticsError::InvalidNow(now))?;

    let mut recent = Vec::new();
    let mut prior = Vec::new();
    for record in records.iter().copied() {
        match record.created_at {
            Some(ts) if ts > three_ago && ts <= now => recent.push(record),
            Some(ts) if ts > six_ago && ts <= three_ago => prior.push(record),
            _ => {}
        }
    }

    let recent_window = TrendWindow {
        records: recent.len(),
        success_rate: milestone_rate(&recent, success),
    };
    let prior_window = TrendWindow {
        records: prior.len(),
        success_rate: milestone_rate(&prior, success),
    };
    let improvement_score = round1(recent_window.success_rate - prior_window.success_rate);

    let direction = if recent.is_empty() || prior.is_empty() {
        TrendDirection::Stable
    } else if improvement_score > threshold {
        TrendDirection::Improving
    } else if improvement_score < -threshold {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    Ok(TrendReport {
        recent_window,
        prior_window,
        improvement_score,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::models::fixtures::{job, now};
    use crate::analytics::profile::ReportKind;

    fn trend(records: &[TrackedRecord]) -> TrendReport {
        let refs: Vec<&TrackedRecord> = records.iter().collect();
        compare_trend(&refs, &ReportKind::Jobs.profile().success, now(), 5.0).unwrap()
    }

    #[test]
    fn test_improving_trend() {
        let records = vec![
            job("r1", "Interview", &[("Applied", 20), ("Interview", 5)]),
            job("r2", "Applied", &[("Applied", 30)]),
            job("p1", "Applied", &[("Applied", 120)]),
            job("p2", "Rejected", &[("Applied", 130), ("Rejected", 100)]),
        ];
        let report = trend(&records);
        assert_eq!(report.recent_window.records, 2);
        assert_eq!(report.prior_window.records, 2);
        assert_eq!(report.improvement_score, 50.0);
        assert_eq!(report.direction, TrendDirection::Improving);
    }

    #[test]
    fn test_declining_trend() {
        let records = vec![
            job("r1", "Applied", &[("Applied", 10)]),
            job("p1", "Interview", &[("Applied", 150), ("Interview", 140)]),
        ];
        let report = trend(&records);
        assert_eq!(report.improvement_score, -100.0);
        assert_eq!(report.direction, TrendDirection::Declining);
    }

    #[test]
    fn test_empty_window_is_stable() {
        let records = vec![job("r1", "Interview", &[("Applied", 10), ("Interview", 2)])];
        let report = trend(&records);
        assert_eq!(report.prior_window.success_rate, 0.0);
        assert_eq!(report.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_records_older_than_six_months_ignored() {
        let records = vec![job("old", "Interview", &[("Applied", 400), ("Interview", 390)])];
        let report = trend(&records);
        assert_eq!(report.recent_window.records, 0);
        assert_eq!(report.prior_window.records, 0);
        assert_eq!(report.improvement_score, 0.0);
    }

    #[test]
    fn test_small_change_is_stable() {
        let mut records = Vec::new();
        for i in 0..10 {
            let path: &[(&str, i64)] = if i < 3 {
                &[("Applied", 20), ("Interview", 5)]
            } else {
                &[("Applied", 20)]
            };
            records.push(job(&format!("r{i}"), "Applied", path));
        }
        for i in 0..10 {
            let path: &[(&str, i64)] = if i < 3 {
                &[("Applied", 120), ("Interview", 110)]
            } else {
                &[("Applied", 120)]
            };
            records.push(job(&format!("p{i}"), "Applied", path));
        }
        let report = trend(&records);
        assert_eq!(report.improvement_score, 0.0);
        assert_eq!(report.direction, TrendDirection::Stable);
    }

    /// `hits` of `total` recent records and `prior_hits` of `prior_total`
    /// older records reached an interview.
    fn windows(hits: usize, total: usize, prior_hits: usize, prior_total: usize) -> Vec<TrackedRecord> {
        let mut records = Vec::new();
        for i in 0..total {
            let path: &[(&str, i64)] = if i < hits {
                &[("Applied", 20), ("Interview", 5)]
            } else {
                &[("Applied", 20)]
            };
            records.push(job(&format!("r{i}"), "Applied", path));
        }
        for i in 0..prior_total {
            let path: &[(&str, i64)] = if i < prior_hits {
                &[("Applied", 120), ("Interview", 110)]
            } else {
                &[("Applied", 120)]
            };
            records.push(job(&format!("p{i}"), "Applied", path));
        }
        records
    }

    #[test]
    fn test_change_equal_to_threshold_is_stable() {
        let up = trend(&windows(11, 20, 10, 20));
        assert_eq!(up.improvement_score, 5.0);
        assert_eq!(up.direction, TrendDirection::Stable);

        let down = trend(&windows(10, 20, 11, 20));
        assert_eq!(down.improvement_score, -5.0);
        assert_eq!(down.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_change_just_past_threshold_flips_direction() {
        let up = trend(&windows(27, 49, 10, 20));
        assert_eq!(up.improvement_score, 5.1);
        assert_eq!(up.direction, TrendDirection::Improving);

        let down = trend(&windows(10, 20, 27, 49));
        assert_eq!(down.improvement_score, -5.1);
        assert_eq!(down.direction, TrendDirection::Declining);
    }

    #[test]
    fn test_empty_prior_window_keeps_score_but_is_stable() {
        let report = trend(&windows(1, 2, 0, 0));
        assert_eq!(report.prior_window.records, 0);
        assert_eq!(report.improvement_score, 50.0);
        assert_eq!(report.direction, TrendDirection::Stable);
    }
}
