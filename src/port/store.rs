//! Persistence port for processed demand records.

use std::future::Future;

use crate::domain::ProcessedRecord;
use crate::error::Result;

/// Storage operations for the processed-records table.
///
/// Records are insert-only; `replace_all` (whole-table delete plus insert)
/// is the only bulk mutation.
pub trait RecordStore: Send + Sync {
    /// Atomically replace the table contents with a new batch.
    ///
    /// Callers must never observe a half-written table: either the previous
    /// contents or the whole new batch.
    fn replace_all(
        &self,
        records: &[ProcessedRecord],
    ) -> impl Future<Output = Result<usize>> + Send;

    /// First `limit` records ordered by date ascending.
    fn list(&self, limit: i64) -> impl Future<Output = Result<Vec<ProcessedRecord>>> + Send;

    /// Every record ordered by date ascending, for training runs.
    fn load_all(&self) -> impl Future<Output = Result<Vec<ProcessedRecord>>> + Send;

    /// Number of stored records.
    fn count(&self) -> impl Future<Output = Result<i64>> + Send;
}
