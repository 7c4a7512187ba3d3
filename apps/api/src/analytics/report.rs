//! Report assembly: one immutable `AnalyticsReport` per request.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analytics::benchmarks::Benchmarks;
use crate::analytics::cohort::{average_rating, group_by, CohortEntry, CohortMetrics};
use crate::analytics::errors::AnalyticsError;
use crate::analytics::funnel::{build_funnel, FunnelEntry};
use crate::analytics::models::TrackedRecord;
use crate::analytics::profile::{ReportKind, ReportProfile, OTHER_STATE};
use crate::analytics::rates;
use crate::analytics::recommendations::{generate_recommendations, Recommendation};
use crate::analytics::stage_duration::durations_by_stage;
use crate::analytics::time_bucket::{
    activity_volume, bucket_of, monthly_volume, ActivityVolume, BucketLabel, MonthlyCount,
};
use crate::analytics::trend::{compare_trend, TrendReport};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateSummary {
    pub response_rate: f64,
    pub interview_rate: f64,
    pub offer_rate: f64,
    pub deadline_adherence_rate: f64,
    pub success_rate: f64,
    pub completion_rate: f64,
    /// Mean interview rating on a 1-5 scale, `0` when nothing is rated.
    pub average_rating: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    #[serde(rename = "totalApplications")]
    pub total: usize,
    #[serde(rename = "activeApplications")]
    pub active: usize,
    #[serde(rename = "archivedApplications")]
    pub archived: usize,
    /// Records whose key date is still ahead.
    pub upcoming: usize,
    /// Records whose deadline has already passed.
    pub deadlines_passed: usize,
    pub rates: RateSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub kind: ReportKind,
    pub generated_at: DateTime<Utc>,
    pub overview: Overview,
    pub distribution: BTreeMap<String, usize>,
    /// Average days into each state; `0` means no observed transition.
    pub avg_time_by_stage: BTreeMap<String, f64>,
    pub monthly_volume: Vec<MonthlyCount>,
    pub activity_volume: ActivityVolume,
    pub funnel: Vec<FunnelEntry>,
    pub cohort_breakdowns: BTreeMap<String, Vec<CohortEntry>>,
    pub trend: TrendReport,
    pub recommendations: Vec<Recommendation>,
}

impl AnalyticsReport {
    /// Records that entered the top of the funnel.
    pub fn funnel_top(&self) -> usize {
        self.funnel.first().map(|e| e.count).unwrap_or(0)
    }

    pub fn funnel_count(&self, stage: usize) -> usize {
        self.funnel.get(stage).map(|e| e.count).unwrap_or(0)
    }
}

/// Builds the report of `kind` from a snapshot of records.
///
/// Records of other kinds are ignored. Malformed records drop out of the
/// sub-computations that need the broken field. An empty snapshot yields a
/// fully zero-filled report.
pub fn assemble_report(
    records: &[TrackedRecord],
    kind: ReportKind,
    now: DateTime<Utc>,
    benchmarks: &Benchmarks,
) -> Result<AnalyticsReport, AnalyticsError> {
    benchmarks.validate()?;
    let profile = kind.profile();
    let population: Vec<&TrackedRecord> = records.iter().filter(|r| profile.includes(r)).collect();

    let entered = funnel_entrants(&population, profile);

    let funnel = build_funnel(&population, profile.funnel);
    let overview = build_overview(&population, &entered, profile, now);
    let distribution = build_distribution(&population, profile);
    let avg_time_by_stage = build_stage_averages(&population, profile);
    let monthly_volume = monthly_volume(population.iter().map(|r| r.reference_date()), now)?;
    let activity_volume = activity_volume(population.iter().map(|r| r.reference_date()), now);
    let cohort_breakdowns = build_cohorts(&population, profile);
    let trend = compare_trend(&entered, &profile.success, now, benchmarks.trend_threshold)?;

    let mut report = AnalyticsReport {
        kind,
        generated_at: now,
        overview,
        distribution,
        avg_time_by_stage,
        monthly_volume,
        activity_volume,
        funnel,
        cohort_breakdowns,
        trend,
        recommendations: Vec::new(),
    };
    report.recommendations = generate_recommendations(&report, benchmarks);

    debug!(
        kind = %kind,
        records = population.len(),
        recommendations = report.recommendations.len(),
        "assembled analytics report"
    );
    Ok(report)
}

/// Records that reached the first funnel stage. Rates and the trend use these
/// as their denominator.
fn funnel_entrants<'a>(population: &[&'a TrackedRecord], profile: &ReportProfile) -> Vec<&'a TrackedRecord> {
    match profile.funnel.first() {
        Some(stage) => population
            .iter()
            .copied()
            .filter(|r| stage.milestone.is_met(r))
            .collect(),
        None => population.to_vec(),
    }
}

fn build_overview(
    population: &[&TrackedRecord],
    entered: &[&TrackedRecord],
    profile: &ReportProfile,
    now: DateTime<Utc>,
) -> Overview {
    let archived = population.iter().filter(|r| r.archived).count();
    let upcoming = population
        .iter()
        .filter(|r| bucket_of(r.key_date, now) == BucketLabel::Upcoming)
        .count();
    let deadlines_passed = population
        .iter()
        .filter(|r| r.deadline.is_some_and(|d| d < now))
        .count();

    let rates = RateSummary {
        response_rate: profile
            .response
            .map(|m| rates::response_rate(entered, &m))
            .unwrap_or(0.0),
        interview_rate: profile
            .interview
            .map(|m| rates::interview_rate(entered, &m))
            .unwrap_or(0.0),
        offer_rate: profile
            .offer
            .map(|m| rates::offer_rate(entered, &m))
            .unwrap_or(0.0),
        deadline_adherence_rate: rates::deadline_adherence_rate(
            population,
            &profile.deadline_action,
            now,
        ),
        success_rate: rates::milestone_rate(entered, &profile.success),
        completion_rate: profile
            .completion
            .map(|m| rates::completion_rate(entered, &m, now))
            .unwrap_or(0.0),
        average_rating: average_rating(population).unwrap_or(0.0),
    };

    Overview {
        total: population.len(),
        active: population.len() - archived,
        archived,
        upcoming,
        deadlines_passed,
        rates,
    }
}

/// Every known state is present; unrecognised states collect under `Other`.
fn build_distribution(population: &[&TrackedRecord], profile: &ReportProfile) -> BTreeMap<String, usize> {
    let mut distribution: BTreeMap<String, usize> =
        profile.states.iter().map(|s| (s.to_string(), 0)).collect();
    for record in population {
        let key = profile
            .canonical_state(&record.current_state)
            .unwrap_or(OTHER_STATE);
        *distribution.entry(key.to_string()).or_insert(0) += 1;
    }
    distribution
}

fn build_stage_averages(population: &[&TrackedRecord], profile: &ReportProfile) -> BTreeMap<String, f64> {
    let mut averages: BTreeMap<String, f64> =
        profile.states.iter().map(|s| (s.to_string(), 0.0)).collect();
    for (state, days) in durations_by_stage(population.iter().copied()) {
        let key = profile.canonical_state(&state).map(str::to_string).unwrap_or(state);
        averages.insert(key, days);
    }
    averages
}

fn build_cohorts(
    population: &[&TrackedRecord],
    profile: &ReportProfile,
) -> BTreeMap<String, Vec<CohortEntry>> {
    let metrics = CohortMetrics {
        success: &profile.success,
        response_from: profile.response_from,
    };
    profile
        .dimensions
        .iter()
        .map(|dim| {
            let entries = group_by(population, |r| r.category(*dim), &metrics);
            (dim.name().to_string(), entries)
        })
        .collect()
}
