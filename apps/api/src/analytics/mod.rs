// Analytics engine: pure, synchronous transformations from tracked records
// to dashboard reports. No I/O and no ambient clock; `now` is always passed in.

pub mod benchmarks;
pub mod cohort;
pub mod errors;
pub mod funnel;
pub mod models;
pub mod profile;
pub mod rates;
pub mod recommendations;
pub mod report;
pub mod stage_duration;
pub mod time_bucket;
pub mod trend;

pub use benchmarks::Benchmarks;
pub use errors::AnalyticsError;
pub use models::TrackedRecord;
pub use profile::ReportKind;
pub use report::{assemble_report, AnalyticsReport};
