use std::sync::Arc;

use tracing::debug;

use super::artifacts::ScoringArtifacts;
use super::decision::DecisionEngine;
use super::domain::{LoanApplication, ScoreResult};
use super::encoder::EncoderError;
use super::features::{ApplicationPayload, FeatureBuilder, ValidationError};
use super::model::RiskModel;

/// Service composing the loaded artifacts with the decision engine.
///
/// Artifacts are shared read-only across requests; every call builds its own feature vector
/// and result.
pub struct ScoringService<M> {
    artifacts: Arc<ScoringArtifacts<M>>,
    engine: DecisionEngine,
}

impl<M> ScoringService<M>
where
    M: RiskModel + 'static,
{
    pub fn new(artifacts: Arc<ScoringArtifacts<M>>) -> Self {
        Self {
            artifacts,
            engine: DecisionEngine::new(),
        }
    }

    /// Validate, encode, infer and decide for one application.
    pub fn score(&self, application: &LoanApplication) -> Result<ScoreResult, ScoringError> {
        let artifacts = &self.artifacts;
        let features =
            FeatureBuilder::new(&artifacts.business_encoder, &artifacts.repayment_encoder)
                .build(application)?;

        let probability = artifacts.model.probability_of_default(&features);
        if !(0.0..=1.0).contains(&probability) {
            return Err(ScoringError::InvalidProbability(probability));
        }
        let result = self.engine.decide(probability, application);

        debug!(
            probability,
            risk_score = result.risk_score,
            decision = result.decision.label(),
            confidence = result.confidence.label(),
            "scored loan application"
        );

        Ok(result)
    }

    /// Range-check, coerce and score a request body that has not been typed yet.
    pub fn score_payload(&self, payload: ApplicationPayload) -> Result<ScoreResult, ScoringError> {
        let application = payload.into_application()?;
        self.score(&application)
    }

    /// Score a JSON payload, treating malformed or non-numeric fields as invalid input.
    pub fn score_json(&self, payload: &[u8]) -> Result<ScoreResult, ScoringError> {
        let payload: ApplicationPayload = serde_json::from_slice(payload)
            .map_err(|err| ScoringError::InvalidInput(err.to_string()))?;
        self.score_payload(payload)
    }
}

/// Per-request failure. None of these mutate shared state.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    UnknownCategory(#[from] EncoderError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("model produced an unusable probability of default ({0})")]
    InvalidProbability(f64),
}

impl ScoringError {
    /// Whether the applicant's input caused the failure, as opposed to the loaded model.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ScoringError::InvalidProbability(_))
    }
}
