//! Model training and inference adapters.
//!
//! Regression backends are opaque `fit`/`predict` capabilities: the
//! gradient-boosted backend comes from the `gbdt` crate, the linear backend
//! from `linfa-linear`. This module owns the tabular-to-matrix conversion,
//! the train/test split, the evaluation metrics, and the artifact layout on
//! disk (model file plus a schema sidecar).

pub mod dataset;
pub mod metrics;
pub mod predict;
pub mod train;

pub use dataset::FeatureSchema;
pub use predict::Predictor;
pub use train::{train, ModelKind, TrainReport};
