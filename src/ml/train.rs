//! Training runs: fit a regression backend, evaluate on the held-out
//! partition, and persist the artifact with its schema sidecar.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use gbdt::config::Config as GbdtConfig;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use linfa::prelude::*;
use linfa::Dataset;
use linfa_linear::LinearRegression;
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::TrainingConfig;
use crate::domain::ProcessedRecord;
use crate::error::{Error, Result};
use crate::ml::dataset::{build_matrix, train_test_split, FeatureSchema};
use crate::ml::metrics::{mean_squared_error, r2_score};

/// Name of the schema sidecar file next to the model artifact.
pub const SCHEMA_FILE: &str = "schema.json";

/// Selectable regression backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Gradient-boosted trees (`gbdt` crate).
    Gbdt,
    /// Ordinary least squares (`linfa-linear`).
    Linear,
}

impl ModelKind {
    /// File name of the serialized model inside the artifact directory.
    #[must_use]
    pub fn artifact_file(&self) -> &'static str {
        match self {
            ModelKind::Gbdt => "model.gbdt",
            ModelKind::Linear => "model.linear.json",
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::Gbdt => write!(f, "gbdt"),
            ModelKind::Linear => write!(f, "linear"),
        }
    }
}

/// Schema sidecar persisted as JSON next to the model file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSidecar {
    pub kind: ModelKind,
    #[serde(flatten)]
    pub schema: FeatureSchema,
}

/// Outcome of a training run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub kind: ModelKind,
    pub records: usize,
    pub features: usize,
    pub mse: f64,
    pub r2: f64,
    /// Permutation importance per feature column, most important first.
    pub importances: Vec<(String, f64)>,
    pub artifact: PathBuf,
}

/// Train a regression model on a batch of processed records.
///
/// One-hot encoding and the feature schema are built over the full batch,
/// then rows are split 80/20 (per config) with a fixed seed. The fitted
/// model and the schema sidecar land in `artifact_dir`.
///
/// # Errors
/// Returns an error when the batch is too small, the fit fails, or the
/// artifact cannot be written.
pub fn train(
    records: &[ProcessedRecord],
    kind: ModelKind,
    config: &TrainingConfig,
    artifact_dir: &Path,
) -> Result<TrainReport> {
    if records.is_empty() {
        return Err(Error::NoData);
    }
    if records.len() < 5 {
        return Err(Error::Model(format!(
            "need at least 5 records to train, got {}",
            records.len()
        )));
    }

    let schema = FeatureSchema::from_records(records);
    let (x, y) = build_matrix(records, &schema);
    let (train_idx, test_idx) = train_test_split(records.len(), config.test_fraction, config.seed);

    let x_train = x.select(Axis(0), &train_idx);
    let x_test = x.select(Axis(0), &test_idx);
    let y_train = y.select(Axis(0), &train_idx);
    let y_test = y.select(Axis(0), &test_idx);

    fs::create_dir_all(artifact_dir)?;
    let artifact = artifact_dir.join(kind.artifact_file());

    let actual = y_test.to_vec();

    let (predicted, importances) = match kind {
        ModelKind::Gbdt => {
            let labels = y_train.to_vec();
            let model = fit_gbdt(&x_train, &labels, config)?;
            let preds = predict_gbdt(&model, &x_test);
            let importances = permutation_importances(
                |x| predict_gbdt(&model, x),
                &x_test,
                &actual,
                &schema.columns,
                config.seed,
            );
            save_gbdt(&model, &artifact)?;
            (preds, importances)
        }
        ModelKind::Linear => {
            let dataset = Dataset::new(x_train, y_train);
            let model = LinearRegression::default()
                .fit(&dataset)
                .map_err(|e| Error::Model(e.to_string()))?;
            let preds = model.predict(&x_test).to_vec();
            let importances = permutation_importances(
                |x| model.predict(x).to_vec(),
                &x_test,
                &actual,
                &schema.columns,
                config.seed,
            );
            let file = fs::File::create(&artifact)?;
            serde_json::to_writer(file, &model)?;
            (preds, importances)
        }
    };

    let mse = mean_squared_error(&actual, &predicted);
    let r2 = r2_score(&actual, &predicted);

    let sidecar = SchemaSidecar {
        kind,
        schema: schema.clone(),
    };
    let sidecar_file = fs::File::create(artifact_dir.join(SCHEMA_FILE))?;
    serde_json::to_writer_pretty(sidecar_file, &sidecar)?;

    info!(
        model = %kind,
        records = records.len(),
        features = schema.len(),
        mse,
        r2,
        top_feature = importances.first().map_or("", |(name, _)| name.as_str()),
        artifact = %artifact.display(),
        "training run complete"
    );

    Ok(TrainReport {
        kind,
        records: records.len(),
        features: schema.len(),
        mse,
        r2,
        importances,
        artifact,
    })
}

/// Permutation importance on the held-out partition: the MSE increase when
/// one feature column is shuffled. Backend-agnostic, needs only predictions.
fn permutation_importances<F>(
    predict: F,
    x_test: &Array2<f64>,
    actual: &[f64],
    columns: &[String],
    seed: u64,
) -> Vec<(String, f64)>
where
    F: Fn(&Array2<f64>) -> Vec<f64>,
{
    let baseline = mean_squared_error(actual, &predict(x_test));
    let mut rng = StdRng::seed_from_u64(seed);

    let mut importances: Vec<(String, f64)> = columns
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let mut column: Vec<f64> = x_test.column(index).to_vec();
            column.shuffle(&mut rng);

            let mut permuted = x_test.clone();
            for (row, value) in column.into_iter().enumerate() {
                permuted[[row, index]] = value;
            }

            let mse = mean_squared_error(actual, &predict(&permuted));
            (name.clone(), mse - baseline)
        })
        .collect();

    importances.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    importances
}

fn fit_gbdt(x_train: &Array2<f64>, y_train: &[f64], config: &TrainingConfig) -> Result<GBDT> {
    let mut gbdt_config = GbdtConfig::new();
    gbdt_config.set_feature_size(x_train.ncols());
    gbdt_config.set_max_depth(config.max_depth);
    gbdt_config.set_iterations(config.iterations);
    gbdt_config.set_shrinkage(config.shrinkage as f32);
    gbdt_config.set_loss("SquaredError");
    gbdt_config.set_data_sample_ratio(1.0);
    gbdt_config.set_feature_sample_ratio(1.0);
    gbdt_config.set_debug(false);
    gbdt_config.set_training_optimization_level(2);

    let mut data: DataVec = x_train
        .rows()
        .into_iter()
        .zip(y_train)
        .map(|(row, label)| {
            Data::new_training_data(
                row.iter().map(|v| *v as f32).collect(),
                1.0,
                *label as f32,
                None,
            )
        })
        .collect();

    let mut model = GBDT::new(&gbdt_config);
    model.fit(&mut data);
    Ok(model)
}

pub(crate) fn predict_gbdt(model: &GBDT, x: &Array2<f64>) -> Vec<f64> {
    let data: DataVec = x
        .rows()
        .into_iter()
        .map(|row| Data::new_test_data(row.iter().map(|v| *v as f32).collect(), None))
        .collect();
    model.predict(&data).into_iter().map(f64::from).collect()
}

fn save_gbdt(model: &GBDT, path: &Path) -> Result<()> {
    model
        .save_model(&path.to_string_lossy())
        .map_err(|e| Error::Model(format!("failed to save model: {e}")))
}
