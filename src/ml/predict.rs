//! Inference against a persisted model artifact.

use std::fs;
use std::path::Path;

use gbdt::gradient_boost::GBDT;
use linfa::prelude::*;
use linfa_linear::FittedLinearRegression;
use ndarray::Array2;
use tracing::warn;

use crate::domain::PredictionRequest;
use crate::error::{Error, Result};
use crate::ml::dataset::{request_features, FeatureSchema};
use crate::ml::train::{predict_gbdt, ModelKind, SchemaSidecar, SCHEMA_FILE};

enum Backend {
    Gbdt(Box<GBDT>),
    Linear(Box<FittedLinearRegression<f64>>),
}

/// A loaded model artifact plus its training schema, ready to score single
/// prospective records.
pub struct Predictor {
    kind: ModelKind,
    schema: FeatureSchema,
    backend: Backend,
}

impl Predictor {
    /// Load the artifact written by the last training run.
    ///
    /// # Errors
    /// Returns [`Error::NoModel`] when no artifact exists in the directory.
    pub fn load(artifact_dir: &Path) -> Result<Self> {
        let sidecar_path = artifact_dir.join(SCHEMA_FILE);
        if !sidecar_path.exists() {
            return Err(Error::NoModel);
        }

        let sidecar: SchemaSidecar = serde_json::from_str(&fs::read_to_string(sidecar_path)?)?;
        let model_path = artifact_dir.join(sidecar.kind.artifact_file());
        if !model_path.exists() {
            return Err(Error::NoModel);
        }

        let backend = match sidecar.kind {
            ModelKind::Gbdt => {
                let model = GBDT::load_model(&model_path.to_string_lossy())
                    .map_err(|e| Error::Model(format!("failed to load model: {e}")))?;
                Backend::Gbdt(Box::new(model))
            }
            ModelKind::Linear => {
                let model: FittedLinearRegression<f64> =
                    serde_json::from_str(&fs::read_to_string(model_path)?)?;
                Backend::Linear(Box::new(model))
            }
        };

        Ok(Self {
            kind: sidecar.kind,
            schema: sidecar.schema,
            backend,
        })
    }

    /// Backend the artifact was trained with.
    #[must_use]
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Predict the demand quantity for one prospective record.
    ///
    /// The feature vector is reconciled against the training schema:
    /// missing one-hot columns are zero-filled and reordered to match.
    /// Request values that matched no training column (unseen categories)
    /// are logged, not raised.
    pub fn predict(&self, request: &PredictionRequest) -> f64 {
        let pairs = request_features(request, self.schema.epoch_start);
        let (dense, unmatched) = self.schema.reconcile(&pairs);

        if !unmatched.is_empty() {
            warn!(
                columns = ?unmatched,
                "inference features not present in training schema, zero-filled"
            );
        }

        let width = dense.len();
        let x = Array2::from_shape_vec((1, width), dense)
            .expect("single dense row matches schema width");

        match &self.backend {
            Backend::Gbdt(model) => predict_gbdt(model, &x)[0],
            Backend::Linear(model) => model.predict(&x)[0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingConfig;
    use crate::ml::train::train;
    use crate::testkit::records::{sample_batch, sample_request};
    use tempfile::tempdir;

    #[test]
    fn missing_artifact_is_no_model() {
        let dir = tempdir().unwrap();
        assert!(matches!(Predictor::load(dir.path()), Err(Error::NoModel)));
    }

    #[test]
    fn trained_gbdt_artifact_round_trips_and_scores() {
        let dir = tempdir().unwrap();
        let batch = sample_batch(20);
        train(&batch, ModelKind::Gbdt, &TrainingConfig::default(), dir.path()).unwrap();

        let predictor = Predictor::load(dir.path()).unwrap();
        assert_eq!(predictor.kind(), ModelKind::Gbdt);

        let prediction = predictor.predict(&sample_request());
        assert!(prediction.is_finite());
    }

    #[test]
    fn unseen_category_zero_fills_instead_of_failing() {
        let dir = tempdir().unwrap();
        train(
            &sample_batch(20),
            ModelKind::Gbdt,
            &TrainingConfig::default(),
            dir.path(),
        )
        .unwrap();

        let predictor = Predictor::load(dir.path()).unwrap();
        let mut request = sample_request();
        request.product = "never seen before".into();

        let prediction = predictor.predict(&request);
        assert!(prediction.is_finite());
    }
}
