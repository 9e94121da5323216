//! Offline training run producing the model and encoder artifacts used for scoring.

mod dataset;
mod regression;

pub use dataset::{read_dataset, read_dataset_from_path, LabeledApplication, TARGET_COLUMN};
pub use regression::{fit, FitOptions, FitReport};

use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use super::artifacts::{ArtifactError, ArtifactStore, ScoringArtifacts};
use super::domain::{FEATURE_COUNT, FEATURE_NAMES};
use super::encoder::{EncoderError, LabelEncoder};
use super::features::FeatureBuilder;
use super::model::{TrainedModel, TrainedVocabularies, TrainingMetadata};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingOptions {
    /// Share of rows held out for evaluation, in `[0, 1)`.
    pub test_fraction: f64,
    pub seed: u64,
    pub fit: FitOptions,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            fit: FitOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub rows: usize,
    pub training_rows: usize,
    pub holdout_rows: usize,
    pub holdout_accuracy: Option<f64>,
    pub iterations: usize,
    pub converged: bool,
}

/// Fit both encoders and the classifier on historical applications.
pub fn train(
    rows: &[LabeledApplication],
    options: &TrainingOptions,
) -> Result<(ScoringArtifacts<TrainedModel>, TrainingReport), TrainingError> {
    let fraction = options.test_fraction;
    if !fraction.is_finite() || !(0.0..1.0).contains(&fraction) {
        return Err(TrainingError::InvalidTestFraction(fraction));
    }
    if rows.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }

    let business_encoder = LabelEncoder::fit(
        "business_type",
        rows.iter().map(|row| row.application.business_type.as_str()),
    )?;
    let repayment_encoder = LabelEncoder::fit(
        "repayment_history",
        rows.iter().map(|row| row.application.repayment_history.as_str()),
    )?;

    let builder = FeatureBuilder::new(&business_encoder, &repayment_encoder);
    let mut features = Vec::with_capacity(rows.len());
    for row in rows {
        let vector = builder.encode(&row.application)?;
        let mut values = [0.0; FEATURE_COUNT];
        values.copy_from_slice(vector.as_slice());
        features.push(values);
    }
    let targets: Vec<f64> = rows
        .iter()
        .map(|row| if row.defaulted { 1.0 } else { 0.0 })
        .collect();

    let (training, holdout) = split_indices(rows.len(), fraction, options.seed)?;

    let training_features: Vec<_> = training.iter().map(|&index| features[index]).collect();
    let training_targets: Vec<f64> = training.iter().map(|&index| targets[index]).collect();

    let (classifier, fit_report) = fit(&training_features, &training_targets, &options.fit);

    let holdout_accuracy = if holdout.is_empty() {
        None
    } else {
        let correct = holdout
            .iter()
            .filter(|&&index| {
                let predicted = classifier.predict_proba(&features[index]) >= 0.5;
                predicted == rows[index].defaulted
            })
            .count();
        Some(correct as f64 / holdout.len() as f64)
    };

    let report = TrainingReport {
        rows: rows.len(),
        training_rows: training.len(),
        holdout_rows: holdout.len(),
        holdout_accuracy,
        iterations: fit_report.iterations,
        converged: fit_report.converged,
    };

    info!(
        rows = report.rows,
        training_rows = report.training_rows,
        holdout_rows = report.holdout_rows,
        holdout_accuracy = ?report.holdout_accuracy,
        iterations = report.iterations,
        converged = report.converged,
        "fitted credit risk model"
    );

    let model = TrainedModel {
        feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
        classifier,
        vocabularies: TrainedVocabularies {
            business_type: business_encoder.classes().to_vec(),
            repayment_history: repayment_encoder.classes().to_vec(),
        },
        metadata: TrainingMetadata {
            trained_at: Utc::now(),
            training_rows: report.training_rows,
            holdout_rows: report.holdout_rows,
            holdout_accuracy: report.holdout_accuracy,
            iterations: report.iterations,
        },
    };

    let artifacts = ScoringArtifacts::trained(model, business_encoder, repayment_encoder)?;
    Ok((artifacts, report))
}

/// Read the dataset, train, and persist the artifacts into `store`.
pub fn train_and_save<P: AsRef<Path>>(
    data_path: P,
    store: &ArtifactStore,
    options: &TrainingOptions,
) -> Result<TrainingReport, TrainingError> {
    let data_path = data_path.as_ref();
    info!(path = %data_path.display(), "reading training data");

    let rows = read_dataset_from_path(data_path)?;
    let (artifacts, report) = train(&rows, options)?;
    store.save(&artifacts)?;
    Ok(report)
}

/// Shuffled split; the holdout gets `ceil(fraction * len)` rows.
fn split_indices(
    len: usize,
    fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), TrainingError> {
    let holdout_len = (fraction * len as f64).ceil() as usize;
    if holdout_len >= len {
        return Err(TrainingError::InsufficientData { rows: len });
    }

    let mut indices: Vec<usize> = (0..len).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let training = indices.split_off(holdout_len);
    Ok((training, indices))
}

#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error("failed to read training data at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid training CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row} has default_flag {value}, expected 0 or 1")]
    InvalidTarget { row: usize, value: u8 },
    #[error("training data contains no rows")]
    EmptyDataset,
    #[error("{rows} row(s) leave nothing to train on after the holdout split")]
    InsufficientData { rows: usize },
    #[error("test fraction {0} must be at least 0 and below 1")]
    InvalidTestFraction(f64),
    #[error(transparent)]
    Encoder(#[from] EncoderError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}
