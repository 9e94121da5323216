use clap::Args;
use credit_risk::config::AppConfig;
use credit_risk::error::AppError;
use credit_risk::scoring::training::{train_and_save, TrainingOptions};
use credit_risk::scoring::ArtifactStore;
use credit_risk::telemetry;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct TrainArgs {
    /// Historical applications CSV (defaults to CREDIT_TRAINING_DATA)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Output directory for the artifacts (defaults to CREDIT_MODEL_DIR)
    #[arg(long)]
    pub(crate) model_dir: Option<PathBuf>,
    /// Share of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub(crate) test_size: f64,
    /// Seed for the train/test shuffle
    #[arg(long, default_value_t = 42)]
    pub(crate) seed: u64,
}

pub(crate) fn run_train(args: TrainArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    let TrainArgs {
        data,
        model_dir,
        test_size,
        seed,
    } = args;

    let data = data.unwrap_or(config.artifacts.training_data);
    let store = ArtifactStore::new(model_dir.unwrap_or(config.artifacts.model_dir));
    let options = TrainingOptions {
        test_fraction: test_size,
        seed,
        ..TrainingOptions::default()
    };

    let report = train_and_save(&data, &store, &options)?;

    println!("Credit risk model trained");
    println!(
        "- {} rows ({} training / {} holdout)",
        report.rows, report.training_rows, report.holdout_rows
    );
    match report.holdout_accuracy {
        Some(accuracy) => println!("- Holdout accuracy: {:.1}%", accuracy * 100.0),
        None => println!("- Holdout accuracy: n/a (no holdout rows)"),
    }
    println!(
        "- Solver: {} iterations{}",
        report.iterations,
        if report.converged { " (converged)" } else { "" }
    );
    println!("- Artifacts written to {}", store.dir().display());

    Ok(())
}
