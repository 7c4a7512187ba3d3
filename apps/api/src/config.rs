use std::str::FromStr;

use anyhow::{Context, Result};

use crate::analytics::Benchmarks;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or unparseable.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub benchmarks: Benchmarks,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: optional_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            benchmarks: benchmarks_from_env()?,
        })
    }
}

/// Benchmark defaults, each overridable through a `BENCHMARK_*` variable.
pub fn benchmarks_from_env() -> Result<Benchmarks> {
    let d = Benchmarks::default();
    let benchmarks = Benchmarks {
        industry_success_rate: optional_env("BENCHMARK_INDUSTRY_SUCCESS_RATE", d.industry_success_rate)?,
        industry_offer_rate: optional_env("BENCHMARK_INDUSTRY_OFFER_RATE", d.industry_offer_rate)?,
        low_response_rate: optional_env("BENCHMARK_LOW_RESPONSE_RATE", d.low_response_rate)?,
        trend_threshold: optional_env("BENCHMARK_TREND_THRESHOLD", d.trend_threshold)?,
        deadline_adherence: optional_env("BENCHMARK_DEADLINE_ADHERENCE", d.deadline_adherence)?,
        low_rating: optional_env("BENCHMARK_LOW_RATING", d.low_rating)?,
        min_completion_rate: optional_env("BENCHMARK_MIN_COMPLETION_RATE", d.min_completion_rate)?,
        min_follow_up_rate: optional_env("BENCHMARK_MIN_FOLLOW_UP_RATE", d.min_follow_up_rate)?,
        min_cohort_size: optional_env("BENCHMARK_MIN_COHORT_SIZE", d.min_cohort_size)?,
        min_monthly_applications: optional_env(
            "BENCHMARK_MIN_MONTHLY_APPLICATIONS",
            d.min_monthly_applications,
        )?,
        min_sample: optional_env("BENCHMARK_MIN_SAMPLE", d.min_sample)?,
    };
    benchmarks
        .validate()
        .context("Benchmark configuration is invalid")?;
    Ok(benchmarks)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
