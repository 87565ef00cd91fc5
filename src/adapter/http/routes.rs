//! HTTP handlers for upload, listing, and prediction.

use axum::extract::{Multipart, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::adapter::http::error::ApiError;
use crate::adapter::http::state::AppState;
use crate::domain::{PredictionRequest, ProcessedRecord};
use crate::error::{Error, IngestError};
use crate::ingest;
use crate::ml::Predictor;
use crate::pipeline;
use crate::port::RecordStore;

/// Default number of records returned by the listing endpoint.
const DEFAULT_LIST_LIMIT: i64 = 10;

#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Response of a successful upload: how many records were persisted and
/// the columns of the processed table.
#[derive(Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub rows: usize,
    pub columns: Vec<&'static str>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub predicted_quantity: f64,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "demand forecasting API online",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `POST /upload` — ingest a spreadsheet, run the pipeline, and replace the
/// processed store with the resulting batch.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from(Error::Ingest(IngestError::Workbook(e.to_string()))))?
    {
        if field.file_name().is_none() {
            continue;
        }
        let filename = field
            .file_name()
            .map(ToString::to_string)
            .ok_or_else(|| Error::Ingest(IngestError::MissingFilename))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::from(Error::Ingest(IngestError::Workbook(e.to_string()))))?;
        upload = Some((filename, bytes.to_vec()));
        break;
    }

    let (filename, bytes) = upload.ok_or(Error::Ingest(IngestError::MissingFile))?;
    ingest::validate_extension(&filename).map_err(Error::Ingest)?;

    let table = ingest::parse_workbook(&bytes).map_err(Error::Ingest)?;
    let records = pipeline::process(&table)?;
    let inserted = state.store.replace_all(&records).await?;

    info!(
        filename = %filename,
        uploaded_rows = table.rows.len(),
        inserted,
        "upload processed"
    );

    Ok(Json(UploadResponse {
        message: "file ingested successfully",
        rows: inserted,
        columns: pipeline::PROCESSED_COLUMNS.to_vec(),
    }))
}

/// `GET /records` — the first N processed records ordered by date.
pub async fn records(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ProcessedRecord>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT).max(0);
    let records = state.store.list(limit).await?;

    // A truncated result says nothing about the store; only an actually
    // empty table is a no-data condition.
    if records.is_empty() && state.store.count().await? == 0 {
        return Err(Error::NoData.into());
    }
    Ok(Json(records))
}

/// `POST /predict` — score one prospective record against the persisted
/// model artifact.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let predictor = Predictor::load(&state.artifact_dir)?;
    let predicted_quantity = predictor.predict(&request);

    Ok(Json(PredictResponse { predicted_quantity }))
}
