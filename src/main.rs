use clap::Parser;
use tracing::error;

use demandcast::app::App;
use demandcast::cli::{Cli, Commands};
use demandcast::config::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();

    let result = match cli.command {
        Commands::Serve => App::serve(config).await,
        Commands::Train(args) => App::train(&config, args.model).await.map(|report| {
            println!("Model: {}", report.kind);
            println!("Records: {} ({} features)", report.records, report.features);
            println!("MSE: {:.4}", report.mse);
            println!("R2: {:.4}", report.r2);
            println!("Top features:");
            for (name, delta) in report.importances.iter().take(5) {
                println!("  {name}: {delta:+.4}");
            }
            println!("Saved model to {}", report.artifact.display());
        }),
        Commands::Predict(args) => App::predict_once(&config, &args.into()).map(|quantity| {
            println!("Predicted demand: {quantity:.2} units");
        }),
    };

    if let Err(e) = result {
        error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}
