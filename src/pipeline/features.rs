//! Temporal feature synthesis over a validated batch.

use chrono::Datelike;

use crate::domain::{day_of_month, is_weekend, iso_week, weekday_name, ProcessedRecord};
use crate::pipeline::CleanRow;

/// Derive calendar attributes and the running trend signal.
///
/// The batch is sorted by date ascending first; day offsets are relative to
/// the batch minimum date and the trend is the first difference of quantity
/// along that order, with the first row defaulted to zero. Both signals are
/// batch-relative and recomputed from scratch on every ingestion, consistent
/// with the replace-on-ingest persistence policy.
#[must_use]
pub fn derive_features(mut rows: Vec<CleanRow>) -> Vec<ProcessedRecord> {
    rows.sort_by_key(|row| row.date);

    let Some(start_date) = rows.first().map(|row| row.date) else {
        return Vec::new();
    };

    let mut previous_quantity: Option<f64> = None;
    rows.into_iter()
        .map(|row| {
            let local_trend = previous_quantity
                .map(|prev| row.quantity - prev)
                .unwrap_or(0.0);
            previous_quantity = Some(row.quantity);

            ProcessedRecord {
                year: row.date.year(),
                month: row.date.month(),
                weekday: weekday_name(row.date).to_string(),
                day_of_month: day_of_month(row.date),
                iso_week: iso_week(row.date),
                weekend: is_weekend(row.date),
                days_since_start: (row.date - start_date).num_days(),
                local_trend,
                product: row.product,
                category: row.category,
                region: row.region,
                date: row.date,
                quantity: row.quantity,
                unit_price: row.unit_price,
            }
        })
        .collect()
}
