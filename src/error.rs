use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised while turning an uploaded file into a raw table.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("unsupported file extension '{extension}': expected .xlsx or .xls")]
    UnsupportedExtension { extension: String },

    #[error("uploaded file has no filename")]
    MissingFilename,

    #[error("upload contained no file field")]
    MissingFile,

    #[error("failed to read workbook: {0}")]
    Workbook(String),

    #[error("workbook has no sheets")]
    EmptySheet,

    #[error("missing required column: {column}")]
    MissingColumn { column: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no data loaded")]
    NoData,

    #[error("no trained model available")]
    NoModel,

    #[error("model error: {0}")]
    Model(String),
}

pub type Result<T> = std::result::Result<T, Error>;
