//! Database model types for Diesel ORM.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::schema::processed_records;
use crate::domain::ProcessedRecord;
use crate::error::{Error, Result};

/// Database row for a processed record (insertable, without the
/// server-generated id).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = processed_records)]
pub struct NewProcessedRecordRow {
    pub product: String,
    pub category: String,
    pub region: String,
    pub date: NaiveDate,
    pub quantity: f64,
    pub unit_price: f64,
    pub year: i32,
    pub month: i32,
    pub weekday: String,
    pub day_of_month: i32,
    pub iso_week: i32,
    pub weekend: bool,
    pub days_since_start: i32,
    pub local_trend: f64,
}

/// Database row for a processed record (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = processed_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProcessedRecordRow {
    pub id: Option<i32>,
    pub product: String,
    pub category: String,
    pub region: String,
    pub date: NaiveDate,
    pub quantity: f64,
    pub unit_price: f64,
    pub year: i32,
    pub month: i32,
    pub weekday: String,
    pub day_of_month: i32,
    pub iso_week: i32,
    pub weekend: bool,
    pub days_since_start: i32,
    pub local_trend: f64,
}

impl NewProcessedRecordRow {
    /// Build an insertable row from a domain record.
    ///
    /// # Errors
    /// Returns a parse error when a derived field does not fit its column
    /// type; the caller aborts the whole batch in that case.
    pub fn from_record(record: &ProcessedRecord) -> Result<Self> {
        let narrow = |value: i64, field: &str| -> Result<i32> {
            i32::try_from(value).map_err(|_| Error::Parse(format!("{field} out of range: {value}")))
        };

        Ok(Self {
            product: record.product.clone(),
            category: record.category.clone(),
            region: record.region.clone(),
            date: record.date,
            quantity: record.quantity,
            unit_price: record.unit_price,
            year: record.year,
            month: narrow(i64::from(record.month), "month")?,
            weekday: record.weekday.clone(),
            day_of_month: narrow(i64::from(record.day_of_month), "day_of_month")?,
            iso_week: narrow(i64::from(record.iso_week), "iso_week")?,
            weekend: record.weekend,
            days_since_start: narrow(record.days_since_start, "days_since_start")?,
            local_trend: record.local_trend,
        })
    }
}

impl From<ProcessedRecordRow> for ProcessedRecord {
    fn from(row: ProcessedRecordRow) -> Self {
        Self {
            product: row.product,
            category: row.category,
            region: row.region,
            date: row.date,
            quantity: row.quantity,
            unit_price: row.unit_price,
            year: row.year,
            month: row.month as u32,
            weekday: row.weekday,
            day_of_month: row.day_of_month as u32,
            iso_week: row.iso_week as u32,
            weekend: row.weekend,
            days_since_start: i64::from(row.days_since_start),
            local_trend: row.local_trend,
        }
    }
}
