use crate::infra::reference_application;
use clap::Args;
use credit_risk::config::AppConfig;
use credit_risk::error::AppError;
use credit_risk::scoring::{ArtifactStore, ScoringService};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Directory holding the model and encoder artifacts (defaults to CREDIT_MODEL_DIR)
    #[arg(long)]
    pub(crate) model_dir: Option<PathBuf>,
    /// JSON file with one loan application. Defaults to a built-in reference applicant.
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let model_dir = args.model_dir.unwrap_or(config.artifacts.model_dir);

    let rendered = score_to_json(&ArtifactStore::new(model_dir), args.input.as_deref())?;
    println!("{rendered}");
    Ok(())
}

fn score_to_json(
    store: &ArtifactStore,
    input: Option<&Path>,
) -> Result<String, AppError> {
    let service = ScoringService::new(Arc::new(store.load()?));

    let result = match input {
        Some(path) => service.score_json(&std::fs::read(path)?)?,
        None => service.score(&reference_application())?,
    };

    let rendered = serde_json::to_string_pretty(&result).map_err(std::io::Error::from)?;
    Ok(rendered)
}
