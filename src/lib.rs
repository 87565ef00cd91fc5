//! Demandcast - demand forecasting from spreadsheet uploads.
//!
//! An HTTP API ingests spreadsheet uploads, persists cleaned rows to
//! SQLite, derives calendar and trend features, and trains regression
//! models to predict future demand.
//!
//! # Architecture
//!
//! Uploaded bytes move through a single pipeline regardless of entry
//! point:
//!
//! - [`ingest`] - spreadsheet parsing into a raw in-memory table
//! - [`pipeline`] - normalization, validation, and temporal feature
//!   synthesis over the date-sorted batch
//! - [`port`] / [`adapter`] - the persistence port and its SQLite
//!   implementation, plus the axum HTTP adapter
//! - [`ml`] - feature matrix construction, training runs (gradient-boosted
//!   trees or linear regression), and artifact-backed inference
//! - [`app`] - wiring for the server, training, and one-shot prediction
//! - [`config`] - TOML configuration with env overrides
//! - [`error`] - error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use demandcast::config::Config;
//! use demandcast::ml::ModelKind;
//!
//! let config = Config::default();
//! assert_eq!(config.training.seed, 42);
//! let _backend = ModelKind::Gbdt;
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod ml;
pub mod pipeline;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
