use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::errors::AnalyticsError;

pub const MONTHS_IN_SERIES: u32 = 12;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BucketLabel {
    Upcoming,
    Last30Days,
    Last31To90Days,
    Older,
    Unbucketed,
}

/// Places a timestamp relative to `now`. Missing timestamps are `Unbucketed`.
pub fn bucket_of(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> BucketLabel {
    let Some(ts) = timestamp else {
        return BucketLabel::Unbucketed;
    };
    if ts > now {
        return BucketLabel::Upcoming;
    }
    let age = now - ts;
    if age <= Duration::days(30) {
        BucketLabel::Last30Days
    } else if age <= Duration::days(90) {
        BucketLabel::Last31To90Days
    } else {
        BucketLabel::Older
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    pub month: String,
    pub count: usize,
    pub timestamp: DateTime<Utc>,
}

/// Cumulative counts over trailing windows ending at `now`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityVolume {
    pub last30_days: usize,
    pub last60_days: usize,
    pub last90_days: usize,
}

/// First instant of each of the trailing 12 calendar months, oldest first,
/// ending with the month containing `now`.
pub fn month_starts(now: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>, AnalyticsError> {
    let anchor = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .ok_or(AnalyticsError::InvalidNow(now))?;
    (0..MONTHS_IN_SERIES)
        .rev()
        .map(|back| {
            anchor
                .checked_sub_months(Months::new(back))
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| d.and_utc())
                .ok_or(AnalyticsError::InvalidNow(now))
        })
        .collect()
}

fn month_index(ts: DateTime<Utc>) -> i64 {
    ts.year() as i64 * 12 + ts.month0() as i64
}

/// Zero-filled monthly counts for the trailing 12 months. Timestamps that are
/// missing or fall outside the series are left out of every month.
pub fn monthly_volume<I>(timestamps: I, now: DateTime<Utc>) -> Result<Vec<MonthlyCount>, AnalyticsError>
where
    I: IntoIterator<Item = Option<DateTime<Utc>>>,
{
    let starts = month_starts(now)?;
    let mut counts = vec![0usize; starts.len()];
    let last = month_index(now);
    let first = last - (MONTHS_IN_SERIES as i64 - 1);

    for ts in timestamps.into_iter().flatten() {
        let idx = month_index(ts);
        if (first..=last).contains(&idx) {
            counts[(idx - first) as usize] += 1;
        }
    }

    Ok(starts
        .into_iter()
        .zip(counts)
        .map(|(timestamp, count)| MonthlyCount {
            month: timestamp.format("%b %Y").to_string(),
            count,
            timestamp,
        })
        .collect())
}

pub fn activity_volume<I>(timestamps: I, now: DateTime<Utc>) -> ActivityVolume
where
    I: IntoIterator<Item = Option<DateTime<Utc>>>,
{
    let mut volume = ActivityVolume::default();
    for ts in timestamps.into_iter().flatten() {
        if ts > now {
            continue;
        }
        let age = now - ts;
        if age <= Duration::days(30) {
            volume.last30_days += 1;
        }
        if age <= Duration::days(60) {
            volume.last60_days += 1;
        }
        if age <= Duration::days(90) {
            volume.last90_days += 1;
        }
    }
    volume
}
