//! Rule-based recommendations.
//!
//! Each rule is a row in `RULES`: metadata plus a check that either produces
//! a finding or nothing. All rules applicable to a report are evaluated; the
//! matches are ordered by priority, then by their position in the table.

use serde::{Deserialize, Serialize};

use crate::analytics::benchmarks::Benchmarks;
use crate::analytics::cohort::UNKNOWN_COHORT;
use crate::analytics::profile::ReportKind;
use crate::analytics::rates::rate;
use crate::analytics::report::AnalyticsReport;
use crate::analytics::trend::TrendDirection;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub rule: String,
    pub priority: Priority,
    pub title: String,
    pub rationale: String,
}

pub struct RuleInput<'a> {
    pub report: &'a AnalyticsReport,
    pub benchmarks: &'a Benchmarks,
}

pub struct Finding {
    pub title: String,
    pub rationale: String,
}

pub struct Rule {
    pub id: &'static str,
    pub priority: Priority,
    pub kinds: &'static [ReportKind],
    pub check: fn(&RuleInput<'_>) -> Option<Finding>,
}

const ALL: &[ReportKind] = &[ReportKind::Jobs, ReportKind::Interviews, ReportKind::Networking];
const JOBS: &[ReportKind] = &[ReportKind::Jobs];
const INTERVIEWS: &[ReportKind] = &[ReportKind::Interviews];
const NETWORKING: &[ReportKind] = &[ReportKind::Networking];

pub static RULES: &[Rule] = &[
    Rule {
        id: "low-response-rate",
        priority: Priority::High,
        kinds: JOBS,
        check: low_response_rate,
    },
    Rule {
        id: "declining-trend",
        priority: Priority::High,
        kinds: ALL,
        check: declining_trend,
    },
    Rule {
        id: "low-interview-success",
        priority: Priority::High,
        kinds: INTERVIEWS,
        check: low_interview_success,
    },
    Rule {
        id: "low-offer-conversion",
        priority: Priority::Medium,
        kinds: JOBS,
        check: low_offer_conversion,
    },
    Rule {
        id: "low-volume",
        priority: Priority::Medium,
        kinds: JOBS,
        check: low_volume,
    },
    Rule {
        id: "low-interview-rating",
        priority: Priority::Medium,
        kinds: INTERVIEWS,
        check: low_interview_rating,
    },
    Rule {
        id: "low-completion",
        priority: Priority::Medium,
        kinds: &[ReportKind::Interviews, ReportKind::Networking],
        check: low_completion,
    },
    Rule {
        id: "low-follow-up",
        priority: Priority::Medium,
        kinds: NETWORKING,
        check: low_follow_up,
    },
    Rule {
        id: "missed-deadlines",
        priority: Priority::Low,
        kinds: JOBS,
        check: missed_deadlines,
    },
    Rule {
        id: "standout-cohort",
        priority: Priority::Info,
        kinds: ALL,
        check: standout_cohort,
    },
    Rule {
        id: "above-benchmark",
        priority: Priority::Info,
        kinds: JOBS,
        check: above_benchmark,
    },
    Rule {
        id: "get-started",
        priority: Priority::Info,
        kinds: ALL,
        check: get_started,
    },
];

pub fn generate_recommendations(report: &AnalyticsReport, benchmarks: &Benchmarks) -> Vec<Recommendation> {
    evaluate(RULES, report, benchmarks)
}

pub fn evaluate(rules: &[Rule], report: &AnalyticsReport, benchmarks: &Benchmarks) -> Vec<Recommendation> {
    let input = RuleInput { report, benchmarks };
    let mut matches: Vec<Recommendation> = rules
        .iter()
        .filter(|rule| rule.kinds.contains(&report.kind))
        .filter_map(|rule| {
            (rule.check)(&input).map(|finding| Recommendation {
                rule: rule.id.to_string(),
                priority: rule.priority,
                title: finding.title,
                rationale: finding.rationale,
            })
        })
        .collect();
    // Stable sort keeps table order within a priority.
    matches.sort_by_key(|r| r.priority);
    matches
}

fn low_response_rate(input: &RuleInput<'_>) -> Option<Finding> {
    let applied = input.report.funnel_top();
    let response = input.report.overview.rates.response_rate;
    (applied >= input.benchmarks.min_sample && response < input.benchmarks.low_response_rate).then(|| Finding {
        title: "Improve your application materials".to_string(),
        rationale: format!(
            "Only {response}% of your {applied} applications received a response (target: {}%). Tailor your resume and cover letter to each role.",
            input.benchmarks.low_response_rate
        ),
    })
}

fn declining_trend(input: &RuleInput<'_>) -> Option<Finding> {
    let trend = &input.report.trend;
    (trend.direction == TrendDirection::Declining).then(|| Finding {
        title: "Your success rate is declining".to_string(),
        rationale: format!(
            "Success rate fell from {}% to {}% compared with the previous three months. Revisit what changed in your approach.",
            trend.prior_window.success_rate, trend.recent_window.success_rate
        ),
    })
}

fn low_interview_success(input: &RuleInput<'_>) -> Option<Finding> {
    let total = input.report.overview.total;
    let success = input.report.overview.rates.success_rate;
    (total >= input.benchmarks.min_sample && success < input.benchmarks.industry_success_rate).then(|| Finding {
        title: "Prepare more deliberately for interviews".to_string(),
        rationale: format!(
            "{success}% of your interviews were successful, below the {}% benchmark. Practice with mock interviews and research each company.",
            input.benchmarks.industry_success_rate
        ),
    })
}

fn low_offer_conversion(input: &RuleInput<'_>) -> Option<Finding> {
    let interviewed = input.report.funnel_count(1);
    let offer = input.report.overview.rates.offer_rate;
    (interviewed >= input.benchmarks.min_cohort_size && offer < input.benchmarks.industry_offer_rate).then(|| {
        Finding {
            title: "Work on converting interviews into offers".to_string(),
            rationale: format!(
                "You reached {interviewed} interviews but your offer rate is {offer}% (industry average: {}%).",
                input.benchmarks.industry_offer_rate
            ),
        }
    })
}

fn low_volume(input: &RuleInput<'_>) -> Option<Finding> {
    let recent = input.report.activity_volume.last30_days;
    let target = input.benchmarks.min_monthly_applications;
    (input.report.overview.total > 0 && recent < target).then(|| Finding {
        title: "Increase your application volume".to_string(),
        rationale: format!("You logged {recent} applications in the last 30 days. Aim for at least {target} per month."),
    })
}

fn low_interview_rating(input: &RuleInput<'_>) -> Option<Finding> {
    let rating = input.report.overview.rates.average_rating;
    (rating > 0.0 && rating < input.benchmarks.low_rating).then(|| Finding {
        title: "Review how your interviews are going".to_string(),
        rationale: format!(
            "Your average self-rating is {rating}/5. Write down questions that went poorly and rehearse answers."
        ),
    })
}

fn low_completion(input: &RuleInput<'_>) -> Option<Finding> {
    let completion = input.report.overview.rates.completion_rate;
    let total = input.report.overview.total;
    (total >= input.benchmarks.min_sample && completion < input.benchmarks.min_completion_rate).then(|| Finding {
        title: "Follow through on scheduled commitments".to_string(),
        rationale: format!(
            "Only {completion}% of past scheduled items were completed (target: {}%).",
            input.benchmarks.min_completion_rate
        ),
    })
}

fn low_follow_up(input: &RuleInput<'_>) -> Option<Finding> {
    let attended = input.report.funnel_count(1);
    let followed = input.report.funnel_count(2);
    let follow_up = rate(followed, attended);
    (attended >= input.benchmarks.min_cohort_size && follow_up < input.benchmarks.min_follow_up_rate).then(|| {
        Finding {
            title: "Follow up after networking".to_string(),
            rationale: format!(
                "You followed up after {follow_up}% of {attended} attended events. A short note within a few days keeps contacts warm."
            ),
        }
    })
}

fn missed_deadlines(input: &RuleInput<'_>) -> Option<Finding> {
    let due = input.report.overview.deadlines_passed;
    let adherence = input.report.overview.rates.deadline_adherence_rate;
    (due > 0 && adherence < input.benchmarks.deadline_adherence).then(|| Finding {
        title: "Apply before deadlines".to_string(),
        rationale: format!(
            "You applied on time for {adherence}% of {due} roles whose deadline has passed. Set reminders for upcoming deadlines."
        ),
    })
}

fn standout_cohort(input: &RuleInput<'_>) -> Option<Finding> {
    let overall = input.report.overview.rates.success_rate;
    let min_size = input.benchmarks.min_cohort_size;
    let mut best: Option<(&str, &crate::analytics::cohort::CohortEntry)> = None;
    for (dimension, cohorts) in &input.report.cohort_breakdowns {
        for cohort in cohorts {
            if cohort.key == UNKNOWN_COHORT || cohort.total < min_size {
                continue;
            }
            if cohort.success_rate <= overall * 2.0 {
                continue;
            }
            if best.map_or(true, |(_, b)| cohort.success_rate > b.success_rate) {
                best = Some((dimension.as_str(), cohort));
            }
        }
    }
    best.map(|(dimension, cohort)| Finding {
        title: format!("Double down on {}", cohort.key),
        rationale: format!(
            "Your success rate for {dimension} '{}' is {}% across {} records, more than twice your overall {overall}%.",
            cohort.key, cohort.success_rate, cohort.total
        ),
    })
}

fn above_benchmark(input: &RuleInput<'_>) -> Option<Finding> {
    let success = input.report.overview.rates.success_rate;
    let applied = input.report.funnel_top();
    (applied >= input.benchmarks.min_sample && success >= input.benchmarks.industry_success_rate).then(|| Finding {
        title: "You are ahead of the industry average".to_string(),
        rationale: format!(
            "{success}% of your applications reached an interview, compared with a {}% benchmark.",
            input.benchmarks.industry_success_rate
        ),
    })
}

fn get_started(input: &RuleInput<'_>) -> Option<Finding> {
    (input.report.overview.total == 0).then(|| Finding {
        title: "Start tracking".to_string(),
        rationale: format!(
            "No {} records yet. Add a few to see your progress here.",
            input.report.kind
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::cohort::CohortEntry;
    use crate::analytics::funnel::FunnelEntry;
    use crate::analytics::models::fixtures::now;
    use crate::analytics::report::{assemble_report, Overview};
    use crate::analytics::trend::TrendWindow;

    fn base_report(kind: ReportKind) -> AnalyticsReport {
        assemble_report(&[], kind, now(), &Benchmarks::default()).unwrap()
    }

    fn with_funnel(mut report: AnalyticsReport, counts: &[usize]) -> AnalyticsReport {
        report.funnel = counts
            .iter()
            .enumerate()
            .map(|(i, c)| FunnelEntry {
                stage: format!("stage{i}"),
                count: *c,
                percentage_of_first: 0,
            })
            .collect();
        report
    }

    fn ids(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.rule.as_str()).collect()
    }

    fn run(rule_id: &str, report: &AnalyticsReport) -> Option<Finding> {
        let rule = RULES.iter().find(|r| r.id == rule_id).unwrap();
        (rule.check)(&RuleInput {
            report,
            benchmarks: &Benchmarks::default(),
        })
    }

    #[test]
    fn test_empty_report_only_suggests_getting_started() {
        let recs = generate_recommendations(&base_report(ReportKind::Jobs), &Benchmarks::default());
        assert_eq!(ids(&recs), vec!["get-started"]);
        assert_eq!(recs[0].priority, Priority::Info);
    }

    #[test]
    fn test_low_response_rate_needs_sample() {
        let mut report = with_funnel(base_report(ReportKind::Jobs), &[4, 0, 0]);
        report.overview.total = 4;
        assert!(run("low-response-rate", &report).is_none());
        report = with_funnel(report, &[10, 0, 0]);
        report.overview.rates.response_rate = 10.0;
        let finding = run("low-response-rate", &report).unwrap();
        assert!(finding.rationale.contains("10%"));
    }

    #[test]
    fn test_declining_trend_rule() {
        let mut report = base_report(ReportKind::Networking);
        report.trend.direction = TrendDirection::Declining;
        report.trend.prior_window = TrendWindow {
            records: 4,
            success_rate: 50.0,
        };
        let finding = run("declining-trend", &report).unwrap();
        assert!(finding.rationale.contains("50%"));
    }

    #[test]
    fn test_standout_cohort_requires_size_and_double_rate() {
        let mut report = base_report(ReportKind::Jobs);
        report.overview.rates.success_rate = 20.0;
        let cohort = |key: &str, total, success_rate| CohortEntry {
            key: key.to_string(),
            total,
            success_count: 0,
            success_rate,
            avg_response_days: None,
            avg_rating: None,
        };
        report.cohort_breakdowns.insert(
            "company".to_string(),
            vec![
                cohort(UNKNOWN_COHORT, 10, 90.0),
                cohort("Tiny", 2, 100.0),
                cohort("Acme", 5, 60.0),
                cohort("Globex", 5, 40.0),
            ],
        );
        let finding = run("standout-cohort", &report).unwrap();
        assert_eq!(finding.title, "Double down on Acme");
    }

    #[test]
    fn test_matches_ordered_by_priority_then_table_order() {
        let mut report = with_funnel(base_report(ReportKind::Jobs), &[10, 4, 0]);
        report.overview = Overview {
            total: 10,
            active: 10,
            deadlines_passed: 2,
            ..Overview::default()
        };
        report.overview.rates.response_rate = 5.0;
        report.overview.rates.success_rate = 10.0;
        report.trend.direction = TrendDirection::Declining;

        let recs = generate_recommendations(&report, &Benchmarks::default());
        assert_eq!(
            ids(&recs),
            vec![
                "low-response-rate",
                "declining-trend",
                "low-offer-conversion",
                "low-volume",
                "missed-deadlines",
            ]
        );
        assert!(recs.windows(2).all(|w| w[0].priority <= w[1].priority));
    }

    #[test]
    fn test_rules_scoped_to_report_kind() {
        let mut report = base_report(ReportKind::Interviews);
        report.overview.total = 6;
        report.overview.rates.response_rate = 0.0;
        report = with_funnel(report, &[6, 6, 1, 0]);
        let recs = generate_recommendations(&report, &Benchmarks::default());
        assert!(!ids(&recs).contains(&"low-response-rate"));
        assert!(ids(&recs).contains(&"low-interview-success"));
    }

    #[test]
    fn test_benchmarks_drive_thresholds() {
        let mut report = with_funnel(base_report(ReportKind::Jobs), &[10, 0, 0]);
        report.overview.total = 10;
        report.overview.rates.success_rate = 30.0;
        let lenient = Benchmarks {
            industry_success_rate: 25.0,
            ..Benchmarks::default()
        };
        let recs = generate_recommendations(&report, &lenient);
        assert!(ids(&recs).contains(&"above-benchmark"));
        let recs = generate_recommendations(&report, &Benchmarks::default());
        assert!(!ids(&recs).contains(&"above-benchmark"));
    }
}
