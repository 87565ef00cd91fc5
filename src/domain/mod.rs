//! Storage-agnostic domain types for the forecasting pipeline.

mod calendar;
mod record;

pub use calendar::{day_of_month, is_weekend, iso_week, weekday_name};
pub use record::{PredictionRequest, ProcessedRecord};
