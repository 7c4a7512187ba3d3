use serde::{Deserialize, Serialize};

use crate::analytics::models::TrackedRecord;
use crate::analytics::profile::FunnelStage;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunnelEntry {
    pub stage: String,
    pub count: usize,
    pub percentage_of_first: u32,
}

/// Counts records passing each stage. A record passes stage `k` only if it
/// meets every stage up to and including `k`, so counts never increase down
/// the funnel.
pub fn build_funnel(records: &[&TrackedRecord], stages: &[FunnelStage]) -> Vec<FunnelEntry> {
    let mut counts = vec![0usize; stages.len()];

    for record in records {
        let depth = stages
            .iter()
            .take_while(|stage| stage.milestone.is_met(record))
            .count();
        for slot in counts.iter_mut().take(depth) {
            *slot += 1;
        }
    }

    let first = counts.first().copied().unwrap_or(0);
    stages
        .iter()
        .zip(counts)
        .map(|(stage, count)| FunnelEntry {
            stage: stage.name.to_string(),
            count,
            percentage_of_first: if first == 0 {
                0
            } else {
                (count as f64 / first as f64 * 100.0).round() as u32
            },
        })
        .collect()
}
