//! Ratio helpers. Every rate is a percentage in `[0, 100]`, rounded to one
//! decimal and carried as `f64` throughout a report.

use chrono::{DateTime, Utc};

use crate::analytics::models::TrackedRecord;
use crate::analytics::profile::{DeadlineAction, Milestone};

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `numerator / denominator * 100`, or `0` when the denominator is zero.
pub fn rate(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    round1(numerator as f64 / denominator as f64 * 100.0).clamp(0.0, 100.0)
}

/// Share of `population` that meets `milestone`.
pub fn milestone_rate(population: &[&TrackedRecord], milestone: &Milestone) -> f64 {
    let hits = population.iter().filter(|r| milestone.is_met(r)).count();
    rate(hits, population.len())
}

/// Records the company answered, out of those that were applied to.
pub fn response_rate(applied: &[&TrackedRecord], response: &Milestone) -> f64 {
    milestone_rate(applied, response)
}

pub fn interview_rate(applied: &[&TrackedRecord], interview: &Milestone) -> f64 {
    milestone_rate(applied, interview)
}

pub fn offer_rate(applied: &[&TrackedRecord], offer: &Milestone) -> f64 {
    milestone_rate(applied, offer)
}

/// Of the records whose key date has passed, the share that met `completed`.
pub fn completion_rate(
    population: &[&TrackedRecord],
    completed: &Milestone,
    now: DateTime<Utc>,
) -> f64 {
    let due: Vec<&TrackedRecord> = population
        .iter()
        .copied()
        .filter(|r| r.key_date.is_some_and(|d| d <= now))
        .collect();
    milestone_rate(&due, completed)
}

/// Of the records whose deadline is already past, the share acted on no later
/// than the deadline.
pub fn deadline_adherence_rate(
    population: &[&TrackedRecord],
    action: &DeadlineAction,
    now: DateTime<Utc>,
) -> f64 {
    let mut due = 0;
    let mut met = 0;
    for record in population {
        let Some(deadline) = record.deadline.filter(|d| *d < now) else {
            continue;
        };
        due += 1;
        if action.met_by(record, deadline) {
            met += 1;
        }
    }
    rate(met, due)
}
