//! The tabular preprocessing pipeline: normalization, validation, and
//! temporal feature synthesis.
//!
//! Both the HTTP upload route and the CLI run ingested tables through
//! [`process`]; there are no per-endpoint variants of this logic.

mod features;
mod normalize;

pub use features::derive_features;
pub use normalize::{normalize, CleanRow, CANONICAL_COLUMNS};

/// Columns of the processed table, canonical core fields first, derived
/// fields after, matching [`crate::domain::ProcessedRecord`].
pub const PROCESSED_COLUMNS: [&str; 14] = [
    "date",
    "product",
    "category",
    "region",
    "quantity",
    "unit_price",
    "year",
    "month",
    "weekday",
    "day_of_month",
    "iso_week",
    "weekend",
    "days_since_start",
    "local_trend",
];

use crate::domain::ProcessedRecord;
use crate::error::Result;
use crate::ingest::RawTable;

/// Run the full pipeline: normalize and validate the raw table, then derive
/// temporal features over the date-sorted batch.
///
/// An empty input yields an empty batch, not an error.
///
/// # Errors
/// Returns an error when a required column is missing from a non-empty
/// table. Rows failing value coercion are dropped, not reported.
pub fn process(raw: &RawTable) -> Result<Vec<ProcessedRecord>> {
    let clean = normalize(raw)?;
    Ok(derive_features(clean))
}
