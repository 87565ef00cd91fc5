//! Shared HTTP application state.
//!
//! All request-scoped data flows through this object; there is no
//! process-global mutable table.

use std::path::PathBuf;
use std::sync::Arc;

use crate::adapter::sqlite::SqliteRecordStore;
use crate::config::Config;

/// State shared by all handlers.
pub struct State {
    /// Processed-record store backing uploads and listings.
    pub store: SqliteRecordStore,
    /// Directory holding the trained model artifact and schema sidecar.
    pub artifact_dir: PathBuf,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
}

pub type AppState = Arc<State>;

impl State {
    /// Assemble state from configuration and a ready store.
    #[must_use]
    pub fn new(config: &Config, store: SqliteRecordStore) -> Self {
        Self {
            store,
            artifact_dir: PathBuf::from(&config.model.artifact_dir),
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }
}
