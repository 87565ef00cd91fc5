//! Application wiring: database, HTTP server, and the training and
//! inference entry points shared by the CLI.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::adapter::http::{self, State};
use crate::adapter::sqlite::{create_pool, run_migrations, SqliteRecordStore};
use crate::config::Config;
use crate::domain::PredictionRequest;
use crate::error::Result;
use crate::ml::{self, ModelKind, Predictor, TrainReport};
use crate::port::RecordStore;

pub struct App;

impl App {
    /// Run the HTTP API server until a shutdown signal arrives.
    ///
    /// # Errors
    /// Returns an error if the database or listener cannot be set up.
    pub async fn serve(config: Config) -> Result<()> {
        let store = Self::open_store(&config)?;
        let state = Arc::new(State::new(&config, store));

        let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
        info!(addr = %config.server.bind, "listening");

        axum::serve(listener, http::router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }

    /// Train a model on all stored processed records and persist the
    /// artifact.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::NoData`] when the store is empty.
    pub async fn train(config: &Config, kind: ModelKind) -> Result<TrainReport> {
        let store = Self::open_store(config)?;
        let records = store.load_all().await?;

        ml::train(
            &records,
            kind,
            &config.training,
            Path::new(&config.model.artifact_dir),
        )
    }

    /// Score a single prospective record against the persisted artifact.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::NoModel`] when no artifact exists.
    pub fn predict_once(config: &Config, request: &PredictionRequest) -> Result<f64> {
        let predictor = Predictor::load(Path::new(&config.model.artifact_dir))?;
        Ok(predictor.predict(request))
    }

    fn open_store(config: &Config) -> Result<SqliteRecordStore> {
        if let Some(parent) = Path::new(&config.database.url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let pool = create_pool(&config.database.url)?;
        run_migrations(&pool)?;
        Ok(SqliteRecordStore::new(pool))
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
