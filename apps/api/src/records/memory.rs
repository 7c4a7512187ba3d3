use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::analytics::{ReportKind, TrackedRecord};
use crate::errors::AppError;
use crate::records::RecordStore;

/// Per-user record lists held in memory. Each fetch returns a clone, so a
/// report never observes later inserts.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<Uuid, Vec<TrackedRecord>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user_id: Uuid, record: TrackedRecord) -> Result<(), AppError> {
        self.records
            .write()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("record store lock poisoned")))?
            .entry(user_id)
            .or_default()
            .push(record);
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch_records(&self, user_id: Uuid, kind: ReportKind) -> Result<Vec<TrackedRecord>, AppError> {
        let profile = kind.profile();
        let guard = self
            .records
            .read()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("record store lock poisoned")))?;
        Ok(guard
            .get(&user_id)
            .map(|records| records.iter().filter(|r| profile.includes(r)).cloned().collect())
            .unwrap_or_default())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.records
            .read()
            .map(|_| ())
            .map_err(|_| AppError::Internal(anyhow::anyhow!("record store lock poisoned")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::models::fixtures::{job, record};
    use crate::analytics::models::RecordKind;

    #[tokio::test]
    async fn test_fetch_filters_by_user_and_kind() {
        let store = InMemoryRecordStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.insert(alice, job("a1", "Applied", &[("Applied", 2)])).unwrap();
        store
            .insert(alice, record(RecordKind::NetworkingEvent, "n1", "Attended", &[("Planned", 4)]))
            .unwrap();
        store.insert(bob, job("b1", "Applied", &[("Applied", 2)])).unwrap();

        let jobs = store.fetch_records(alice, ReportKind::Jobs).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "a1");
        let networking = store.fetch_records(alice, ReportKind::Networking).await.unwrap();
        assert_eq!(networking.len(), 1);
        assert!(store
            .fetch_records(Uuid::new_v4(), ReportKind::Jobs)
            .await
            .unwrap()
            .is_empty());
    }
}
