//! Elapsed time between consecutive stage transitions.
//!
//! A transition is only counted when the state actually changes. Repeated
//! entries for the same state extend the run that started with the first one,
//! so the elapsed time into the next state is measured from when the previous
//! state was first entered.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::analytics::models::{same_state, StatusChange, TrackedRecord};
use crate::analytics::rates::round1;

const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / SECONDS_PER_DAY
}

/// Yields `(previous, next)` pairs for every real state change.
pub fn transitions(history: &[StatusChange]) -> Vec<(&StatusChange, &StatusChange)> {
    let mut pairs = Vec::new();
    let mut iter = history.iter();
    let Some(mut anchor) = iter.next() else {
        return pairs;
    };
    for entry in iter {
        if !same_state(&anchor.state, &entry.state) {
            pairs.push((anchor, entry));
            anchor = entry;
        }
    }
    pairs
}

#[derive(Default)]
struct Accumulator {
    total_days: f64,
    samples: usize,
}

/// Average days spent reaching each state, keyed by the state name as first
/// seen. States never transitioned into are absent; the caller zero-fills.
pub fn durations_by_stage<'a, I>(records: I) -> HashMap<String, f64>
where
    I: IntoIterator<Item = &'a TrackedRecord>,
{
    let mut acc: HashMap<String, Accumulator> = HashMap::new();

    for record in records {
        let history = match record.history() {
            Ok(h) => h,
            Err(defect) => {
                warn!(record_id = %record.id, "skipping record in stage durations: {defect}");
                continue;
            }
        };
        for (prev, next) in transitions(history) {
            let existing = acc.keys().find(|k| same_state(k, &next.state)).cloned();
            let key = existing.unwrap_or_else(|| next.state.trim().to_string());
            let stat = acc.entry(key).or_default();
            stat.total_days += days_between(prev.timestamp, next.timestamp);
            stat.samples += 1;
        }
    }

    acc.into_iter()
        .map(|(state, stat)| (state, round1(stat.total_days / stat.samples as f64)))
        .collect()
}

/// Days from first entering `from_state` until the next different state.
/// `None` when the record never left `from_state` or its history is unusable.
pub fn days_until_next_stage(record: &TrackedRecord, from_state: &str) -> Option<f64> {
    let history = record.history().ok()?;
    transitions(history)
        .into_iter()
        .find(|(prev, _)| same_state(&prev.state, from_state))
        .map(|(prev, next)| days_between(prev.timestamp, next.timestamp))
}

/// Mean of `days_until_next_stage` over the records that have one.
pub fn average_days_after<'a, I>(records: I, from_state: &str) -> Option<f64>
where
    I: IntoIterator<Item = &'a TrackedRecord>,
{
    let (sum, n) = records
        .into_iter()
        .filter_map(|r| days_until_next_stage(r, from_state))
        .fold((0.0, 0usize), |(sum, n), d| (sum + d, n + 1));
    (n > 0).then(|| round1(sum / n as f64))
}
