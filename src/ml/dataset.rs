//! Feature matrix construction: one-hot encoding and schema reconciliation.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::domain::{day_of_month, is_weekend, iso_week, weekday_name, PredictionRequest, ProcessedRecord};

/// Numeric feature columns, in matrix order. Date and the target quantity
/// are excluded by construction.
const NUMERIC_COLUMNS: [&str; 8] = [
    "unit_price",
    "year",
    "month",
    "day_of_month",
    "iso_week",
    "weekend",
    "days_since_start",
    "local_trend",
];

/// The ordered feature columns a model was trained against, plus the batch
/// epoch used to anchor day offsets at inference time.
///
/// Persisted next to the model artifact; inference feature vectors are
/// reconciled against it column by column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub columns: Vec<String>,
    pub epoch_start: NaiveDate,
}

/// Sparse named features for one row before schema alignment.
pub type FeaturePairs = Vec<(String, f64)>;

impl FeatureSchema {
    /// Build the schema from a training batch: the fixed numeric columns
    /// followed by one one-hot column per observed categorical value,
    /// sorted for determinism.
    ///
    /// A field with a single distinct value still gets its column; the
    /// encoding never collapses to zero columns for an observed field.
    #[must_use]
    pub fn from_records(records: &[ProcessedRecord]) -> Self {
        let mut columns: Vec<String> = NUMERIC_COLUMNS.iter().map(|s| s.to_string()).collect();

        let mut one_hot = BTreeSet::new();
        for record in records {
            one_hot.insert(format!("product_{}", record.product));
            one_hot.insert(format!("category_{}", record.category));
            one_hot.insert(format!("region_{}", record.region));
            one_hot.insert(format!("weekday_{}", record.weekday));
        }
        columns.extend(one_hot);

        let epoch_start = records
            .iter()
            .map(|r| r.date)
            .min()
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());

        Self {
            columns,
            epoch_start,
        }
    }

    /// Number of feature columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Align named features to the schema's column order.
    ///
    /// Missing columns are zero-filled. Returns the dense vector together
    /// with the input names that matched no training column (unseen
    /// categorical values); the caller decides whether to surface those.
    #[must_use]
    pub fn reconcile(&self, pairs: &FeaturePairs) -> (Vec<f64>, Vec<String>) {
        let mut dense = vec![0.0; self.columns.len()];
        let mut unmatched = Vec::new();

        for (name, value) in pairs {
            match self.columns.iter().position(|c| c == name) {
                Some(index) => dense[index] = *value,
                None => unmatched.push(name.clone()),
            }
        }

        (dense, unmatched)
    }
}

/// Named features of one processed record.
#[must_use]
pub fn record_features(record: &ProcessedRecord) -> FeaturePairs {
    let mut pairs: FeaturePairs = vec![
        ("unit_price".into(), record.unit_price),
        ("year".into(), f64::from(record.year)),
        ("month".into(), f64::from(record.month)),
        ("day_of_month".into(), f64::from(record.day_of_month)),
        ("iso_week".into(), f64::from(record.iso_week)),
        ("weekend".into(), f64::from(u8::from(record.weekend))),
        ("days_since_start".into(), record.days_since_start as f64),
        ("local_trend".into(), record.local_trend),
    ];
    pairs.push((format!("product_{}", record.product), 1.0));
    pairs.push((format!("category_{}", record.category), 1.0));
    pairs.push((format!("region_{}", record.region), 1.0));
    pairs.push((format!("weekday_{}", record.weekday), 1.0));
    pairs
}

/// Named features of a prediction request, with the same derivation rules
/// as the training pipeline: calendar attributes from the request date, day
/// offset anchored to the training epoch, and the trend defaulted to zero.
#[must_use]
pub fn request_features(request: &PredictionRequest, epoch_start: NaiveDate) -> FeaturePairs {
    let date = request.date;
    let product = request.product.trim().to_lowercase();
    let category = request.category.trim().to_lowercase();
    let region = request.region.trim().to_lowercase();

    let mut pairs: FeaturePairs = vec![
        ("unit_price".into(), request.unit_price),
        ("year".into(), f64::from(chrono::Datelike::year(&date))),
        ("month".into(), f64::from(chrono::Datelike::month(&date))),
        ("day_of_month".into(), f64::from(day_of_month(date))),
        ("iso_week".into(), f64::from(iso_week(date))),
        ("weekend".into(), f64::from(u8::from(is_weekend(date)))),
        (
            "days_since_start".into(),
            (date - epoch_start).num_days() as f64,
        ),
        ("local_trend".into(), 0.0),
    ];
    pairs.push((format!("product_{product}"), 1.0));
    pairs.push((format!("category_{category}"), 1.0));
    pairs.push((format!("region_{region}"), 1.0));
    pairs.push((format!("weekday_{}", weekday_name(date)), 1.0));
    pairs
}

/// Dense feature matrix and target vector for a batch, aligned to a schema.
#[must_use]
pub fn build_matrix(records: &[ProcessedRecord], schema: &FeatureSchema) -> (Array2<f64>, Array1<f64>) {
    let mut data = Vec::with_capacity(records.len() * schema.len());
    let mut targets = Vec::with_capacity(records.len());

    for record in records {
        let (dense, _) = schema.reconcile(&record_features(record));
        data.extend(dense);
        targets.push(record.quantity);
    }

    let x = Array2::from_shape_vec((records.len(), schema.len()), data)
        .expect("row-major feature buffer matches (rows, columns)");
    (x, Array1::from(targets))
}

/// Deterministic shuffled train/test index split.
///
/// The held-out partition gets `ceil(n * test_fraction)` rows, at least one
/// when there are at least two rows.
#[must_use]
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut test_len = ((n as f64) * test_fraction).ceil() as usize;
    if n >= 2 {
        test_len = test_len.clamp(1, n - 1);
    } else {
        test_len = 0;
    }

    let test = indices.split_off(n - test_len);
    (indices, test)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::records::sample_batch;

    #[test]
    fn schema_has_numeric_then_one_hot_columns() {
        let batch = sample_batch(3);
        let schema = FeatureSchema::from_records(&batch);

        assert_eq!(&schema.columns[..8], &NUMERIC_COLUMNS.map(String::from));
        assert!(schema.columns.iter().any(|c| c.starts_with("product_")));
        assert!(schema.columns.iter().any(|c| c.starts_with("weekday_")));
    }

    #[test]
    fn single_distinct_value_still_yields_a_column() {
        // Every record shares one product/category/region/weekday.
        let batch = sample_batch(1);
        let schema = FeatureSchema::from_records(&batch);

        let one_hot: Vec<_> = schema
            .columns
            .iter()
            .filter(|c| c.contains('_') && !NUMERIC_COLUMNS.contains(&c.as_str()))
            .collect();
        assert_eq!(one_hot.len(), 4);
    }

    #[test]
    fn reconcile_zero_fills_and_reports_unmatched() {
        let schema = FeatureSchema {
            columns: vec!["unit_price".into(), "product_milk".into()],
            epoch_start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };

        let pairs = vec![("unit_price".to_string(), 3.5), ("product_tea".to_string(), 1.0)];
        let (dense, unmatched) = schema.reconcile(&pairs);

        assert_eq!(dense, vec![3.5, 0.0]);
        assert_eq!(unmatched, vec!["product_tea".to_string()]);
    }

    #[test]
    fn matrix_shape_matches_batch_and_schema() {
        let batch = sample_batch(5);
        let schema = FeatureSchema::from_records(&batch);
        let (x, y) = build_matrix(&batch, &schema);

        assert_eq!(x.nrows(), 5);
        assert_eq!(x.ncols(), schema.len());
        assert_eq!(y.len(), 5);
    }

    #[test]
    fn split_is_deterministic_and_disjoint() {
        let (train_a, test_a) = train_test_split(10, 0.2, 42);
        let (train_b, test_b) = train_test_split(10, 0.2, 42);

        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(train_a.len(), 8);
        assert_eq!(test_a.len(), 2);
        assert!(train_a.iter().all(|i| !test_a.contains(i)));
    }

    #[test]
    fn split_holds_out_at_least_one_row() {
        let (train, test) = train_test_split(2, 0.2, 42);
        assert_eq!(train.len(), 1);
        assert_eq!(test.len(), 1);
    }
}
