use std::sync::Arc;

use crate::config::Config;
use crate::records::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable record source. Default: PgRecordStore.
    pub store: Arc<dyn RecordStore>,
    pub config: Config,
}
