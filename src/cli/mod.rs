//! Command-line interface definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::PredictionRequest;
use crate::ml::ModelKind;

/// Demandcast - demand forecasting service and training runner.
#[derive(Parser, Debug)]
#[command(name = "demandcast")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API server (foreground)
    Serve,

    /// Train a regression model on the stored processed records
    Train(TrainArgs),

    /// Score a single prospective record against the trained model
    Predict(PredictArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Regression backend to fit.
    #[arg(long, value_enum, default_value_t = ModelKind::Gbdt)]
    pub model: ModelKind,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    #[arg(long)]
    pub product: String,

    #[arg(long)]
    pub category: String,

    /// Date of the prospective transaction (YYYY-MM-DD).
    #[arg(long)]
    pub date: NaiveDate,

    #[arg(long)]
    pub region: String,

    #[arg(long)]
    pub unit_price: f64,

    /// Quantity of the previous period.
    #[arg(long, default_value_t = 0.0)]
    pub previous_quantity: f64,
}

impl From<PredictArgs> for PredictionRequest {
    fn from(args: PredictArgs) -> Self {
        Self {
            product: args.product,
            category: args.category,
            date: args.date,
            region: args.region,
            unit_price: args.unit_price,
            previous_quantity: args.previous_quantity,
        }
    }
}
