use serde::{Deserialize, Serialize};

use crate::analytics::errors::AnalyticsError;

/// Reference constants the recommendation rules and trend comparator read.
///
/// The defaults are product heuristics, not derived figures. They are loaded
/// from configuration so they can be tuned without touching rule code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Benchmarks {
    /// Industry average share of applications that reach an interview (%).
    pub industry_success_rate: f64,
    /// Industry average offer rate (%).
    pub industry_offer_rate: f64,
    /// Response rate below which materials should be reworked (%).
    pub low_response_rate: f64,
    /// Percentage points a trend must move before it is called a change.
    pub trend_threshold: f64,
    /// Adherence rate below which deadlines are flagged (%).
    pub deadline_adherence: f64,
    /// Average interview rating considered weak (1-5 scale).
    pub low_rating: f64,
    /// Share of due interviews or events that should actually happen (%).
    pub min_completion_rate: f64,
    /// Share of attended networking events that should get a follow-up (%).
    pub min_follow_up_rate: f64,
    pub min_cohort_size: usize,
    pub min_monthly_applications: usize,
    /// Records needed before rate-based rules fire.
    pub min_sample: usize,
}

impl Default for Benchmarks {
    fn default() -> Self {
        Self {
            industry_success_rate: 40.0,
            industry_offer_rate: 10.0,
            low_response_rate: 20.0,
            trend_threshold: 5.0,
            deadline_adherence: 80.0,
            low_rating: 3.0,
            min_completion_rate: 80.0,
            min_follow_up_rate: 50.0,
            min_cohort_size: 3,
            min_monthly_applications: 10,
            min_sample: 5,
        }
    }
}

impl Benchmarks {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        let percentages = [
            ("industry_success_rate", self.industry_success_rate),
            ("industry_offer_rate", self.industry_offer_rate),
            ("low_response_rate", self.low_response_rate),
            ("trend_threshold", self.trend_threshold),
            ("deadline_adherence", self.deadline_adherence),
            ("min_completion_rate", self.min_completion_rate),
            ("min_follow_up_rate", self.min_follow_up_rate),
        ];
        for (name, value) in percentages {
            if !(0.0..=100.0).contains(&value) {
                return Err(AnalyticsError::InvalidBenchmark { name, value });
            }
        }
        if !(0.0..=5.0).contains(&self.low_rating) {
            return Err(AnalyticsError::InvalidBenchmark {
                name: "low_rating",
                value: self.low_rating,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Benchmarks::default().validate().is_ok());
    }

    #[test]
    fn test_nan_is_rejected() {
        let b = Benchmarks {
            industry_offer_rate: f64::NAN,
            ..Benchmarks::default()
        };
        assert!(matches!(
            b.validate(),
            Err(AnalyticsError::InvalidBenchmark {
                name: "industry_offer_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_rating_scale_enforced() {
        let b = Benchmarks {
            low_rating: 9.0,
            ..Benchmarks::default()
        };
        assert!(b.validate().is_err());
    }
}
