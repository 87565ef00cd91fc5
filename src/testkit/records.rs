//! Builders for processed records and prediction requests.

use chrono::{Days, NaiveDate};

use crate::domain::{PredictionRequest, ProcessedRecord};
use crate::pipeline::{derive_features, CleanRow};

const PRODUCTS: [&str; 2] = ["milk", "coffee"];
const REGIONS: [&str; 2] = ["south", "north"];

/// A deterministic batch of `n` processed records on consecutive dates
/// starting 2024-01-01, with derived features computed by the real
/// pipeline so invariants (sort order, offsets, trend) always hold.
#[must_use]
pub fn sample_batch(n: usize) -> Vec<ProcessedRecord> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let rows = (0..n)
        .map(|i| CleanRow {
            product: PRODUCTS[i % PRODUCTS.len()].to_string(),
            category: "beverages".to_string(),
            region: REGIONS[i % REGIONS.len()].to_string(),
            date: start.checked_add_days(Days::new(i as u64)).unwrap(),
            quantity: 10.0 + (i % 5) as f64 * 3.0,
            unit_price: 5.0 + (i % 3) as f64,
        })
        .collect();

    derive_features(rows)
}

/// A prediction request matching the categories of [`sample_batch`].
#[must_use]
pub fn sample_request() -> PredictionRequest {
    PredictionRequest {
        product: "milk".into(),
        category: "beverages".into(),
        date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        region: "south".into(),
        unit_price: 5.5,
        previous_quantity: 12.0,
    }
}
