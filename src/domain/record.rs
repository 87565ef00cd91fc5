//! Processed demand records and inference requests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One cleaned, feature-augmented transaction row, ready for storage and
/// training.
///
/// The five core fields (product, category, region, quantity, unit price)
/// plus the date are guaranteed non-null: rows failing coercion never become
/// records. The derived fields are only meaningful for the batch the record
/// was processed in, since day offsets and trends are batch-relative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub product: String,
    pub category: String,
    pub region: String,
    pub date: NaiveDate,
    pub quantity: f64,
    pub unit_price: f64,
    pub year: i32,
    pub month: u32,
    pub weekday: String,
    pub day_of_month: u32,
    pub iso_week: u32,
    pub weekend: bool,
    /// Day offset from the earliest date in the batch; the earliest row is 0.
    pub days_since_start: i64,
    /// First difference of quantity in date order; the first row is 0.
    pub local_trend: f64,
}

/// A prospective transaction submitted for demand prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub product: String,
    pub category: String,
    pub date: NaiveDate,
    pub region: String,
    pub unit_price: f64,
    /// Quantity of the previous period. Carried for API compatibility with
    /// the upload schema; the quantity column never enters the feature
    /// matrix.
    pub previous_quantity: f64,
}
