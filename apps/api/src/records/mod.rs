//! Record sources for the analytics endpoints.
//!
//! `AppState` holds an `Arc<dyn RecordStore>`: Postgres in production, the
//! in-memory store in tests.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::analytics::{ReportKind, TrackedRecord};
use crate::errors::AppError;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Loads a snapshot of every record the `kind` report reads for a user.
    async fn fetch_records(&self, user_id: Uuid, kind: ReportKind) -> Result<Vec<TrackedRecord>, AppError>;

    /// Cheap reachability check used by `/health`.
    async fn ping(&self) -> Result<(), AppError>;
}

#[cfg(test)]
pub use memory::InMemoryRecordStore;
pub use postgres::PgRecordStore;
