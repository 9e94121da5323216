use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

/// Probability-emitting binary classifier over the fixed feature vector.
pub trait RiskModel: Send + Sync {
    /// Probability that the application belongs to the default class, in `[0, 1]`.
    fn probability_of_default(&self, features: &FeatureVector) -> f64;
}

/// Logistic regression over standardized inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub feature_means: Vec<f64>,
    pub feature_scales: Vec<f64>,
}

impl LogisticRegression {
    pub fn decision_function(&self, inputs: &[f64]) -> f64 {
        inputs
            .iter()
            .zip(&self.feature_means)
            .zip(&self.feature_scales)
            .zip(&self.coefficients)
            .fold(self.intercept, |z, (((x, mean), scale), weight)| {
                z + weight * (x - mean) / scale
            })
    }

    pub fn predict_proba(&self, inputs: &[f64]) -> f64 {
        sigmoid(self.decision_function(inputs))
    }

    pub(crate) fn check_shape(&self) -> Result<(), String> {
        for (name, len) in [
            ("coefficients", self.coefficients.len()),
            ("feature_means", self.feature_means.len()),
            ("feature_scales", self.feature_scales.len()),
        ] {
            if len != FEATURE_COUNT {
                return Err(format!("{name} has {len} entries, expected {FEATURE_COUNT}"));
            }
        }

        if let Some(scale) = self
            .feature_scales
            .iter()
            .find(|scale| !scale.is_finite() || **scale <= 0.0)
        {
            return Err(format!("feature scale {scale} is not a positive finite number"));
        }

        let mut parameters = self
            .coefficients
            .iter()
            .chain(&self.feature_means)
            .chain(std::iter::once(&self.intercept));
        if parameters.any(|value| !value.is_finite()) {
            return Err("model parameters must be finite".to_string());
        }

        Ok(())
    }
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Category vocabularies the classifier was fit against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainedVocabularies {
    pub business_type: Vec<String>,
    pub repayment_history: Vec<String>,
}

/// Summary of the run that produced a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub trained_at: DateTime<Utc>,
    pub training_rows: usize,
    pub holdout_rows: usize,
    pub holdout_accuracy: Option<f64>,
    pub iterations: usize,
}

/// Persisted risk model: classifier, column contract, and provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub feature_names: Vec<String>,
    pub classifier: LogisticRegression,
    pub vocabularies: TrainedVocabularies,
    pub metadata: TrainingMetadata,
}

impl TrainedModel {
    pub fn feature_names_match(&self) -> bool {
        self.feature_names.len() == FEATURE_COUNT
            && self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES)
                .all(|(actual, expected)| actual == expected)
    }
}

impl RiskModel for TrainedModel {
    fn probability_of_default(&self, features: &FeatureVector) -> f64 {
        self.classifier.predict_proba(features.as_slice())
    }
}
