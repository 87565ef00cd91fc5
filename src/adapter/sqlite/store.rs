//! SQLite record store implementation.
//!
//! Implements the [`RecordStore`] port on top of Diesel and a connection
//! pool. Replacement is delete-then-insert inside one immediate transaction,
//! so readers see either the previous batch or the new one.

use diesel::prelude::*;

use crate::adapter::sqlite::connection::DbPool;
use crate::adapter::sqlite::model::{NewProcessedRecordRow, ProcessedRecordRow};
use crate::adapter::sqlite::schema::processed_records;
use crate::domain::ProcessedRecord;
use crate::error::{Error, Result};
use crate::port::RecordStore;

/// SQLite-backed processed-record store.
#[derive(Clone)]
pub struct SqliteRecordStore {
    pool: DbPool,
}

impl SqliteRecordStore {
    /// Create a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>> {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }
}

impl RecordStore for SqliteRecordStore {
    async fn replace_all(&self, records: &[ProcessedRecord]) -> Result<usize> {
        // Row construction happens up front so a non-castable value aborts
        // the batch before any mutation.
        let rows: Vec<NewProcessedRecordRow> = records
            .iter()
            .map(NewProcessedRecordRow::from_record)
            .collect::<Result<_>>()?;

        let mut conn = self.conn()?;
        let inserted = conn
            .immediate_transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::delete(processed_records::table).execute(conn)?;
                diesel::insert_into(processed_records::table)
                    .values(&rows)
                    .execute(conn)
            })
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(inserted)
    }

    async fn list(&self, limit: i64) -> Result<Vec<ProcessedRecord>> {
        let mut conn = self.conn()?;
        let rows: Vec<ProcessedRecordRow> = processed_records::table
            .order(processed_records::date.asc())
            .limit(limit)
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(rows.into_iter().map(ProcessedRecord::from).collect())
    }

    async fn load_all(&self) -> Result<Vec<ProcessedRecord>> {
        let mut conn = self.conn()?;
        let rows: Vec<ProcessedRecordRow> = processed_records::table
            .order(processed_records::date.asc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(rows.into_iter().map(ProcessedRecord::from).collect())
    }

    async fn count(&self) -> Result<i64> {
        let mut conn = self.conn()?;
        processed_records::table
            .count()
            .get_result(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::sqlite::connection::{create_pool, run_migrations};
    use crate::testkit::records::sample_batch;

    fn memory_store() -> SqliteRecordStore {
        let pool = create_pool(":memory:").unwrap();
        run_migrations(&pool).unwrap();
        SqliteRecordStore::new(pool)
    }

    #[tokio::test]
    async fn replace_all_inserts_every_row() {
        let store = memory_store();
        let batch = sample_batch(4);

        let inserted = store.replace_all(&batch).await.unwrap();
        assert_eq!(inserted, 4);
        assert_eq!(store.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn replace_all_discards_previous_batch() {
        let store = memory_store();
        store.replace_all(&sample_batch(5)).await.unwrap();
        store.replace_all(&sample_batch(2)).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn round_trip_preserves_field_values() {
        let store = memory_store();
        let batch = sample_batch(3);
        store.replace_all(&batch).await.unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded, batch);
    }

    #[tokio::test]
    async fn list_is_date_ordered_and_limited() {
        let store = memory_store();
        store.replace_all(&sample_batch(6)).await.unwrap();

        let listed = store.list(2).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].date <= listed[1].date);
    }
}
