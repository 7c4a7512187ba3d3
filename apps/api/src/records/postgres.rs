use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::analytics::models::RecordKind;
use crate::analytics::{ReportKind, TrackedRecord};
use crate::errors::AppError;
use crate::models::tracker::{InterviewRow, JobRow, NetworkingRow};
use crate::records::RecordStore;

pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    /// Opens a small pool and applies pending migrations. Report requests
    /// only issue short reads.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("Failed to connect to PostgreSQL")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run tracker migrations")?;
        info!("PostgreSQL record store ready");
        Ok(Self { pool })
    }

    async fn jobs(&self, user_id: Uuid) -> Result<Vec<TrackedRecord>, AppError> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(TrackedRecord::from).collect())
    }

    async fn interviews(&self, user_id: Uuid) -> Result<Vec<TrackedRecord>, AppError> {
        let rows = sqlx::query_as::<_, InterviewRow>(
            "SELECT * FROM interviews WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(TrackedRecord::from).collect())
    }

    async fn networking(&self, user_id: Uuid) -> Result<Vec<TrackedRecord>, AppError> {
        let events = sqlx::query_as::<_, NetworkingRow>(
            "SELECT * FROM networking_events WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        let activities = sqlx::query_as::<_, NetworkingRow>(
            "SELECT * FROM relationship_activities WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events
            .into_iter()
            .map(|r| r.into_record(RecordKind::NetworkingEvent))
            .chain(
                activities
                    .into_iter()
                    .map(|r| r.into_record(RecordKind::RelationshipActivity)),
            )
            .collect())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn fetch_records(&self, user_id: Uuid, kind: ReportKind) -> Result<Vec<TrackedRecord>, AppError> {
        let records = match kind {
            ReportKind::Jobs => self.jobs(user_id).await?,
            ReportKind::Interviews => self.interviews(user_id).await?,
            ReportKind::Networking => self.networking(user_id).await?,
        };
        info!("Loaded {} {kind} records for user {user_id}", records.len());
        Ok(records)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
