//! Loan application scoring: input validation, feature encoding, default-probability
//! inference and threshold-based decisioning, plus the training run that produces the
//! model and encoders.

pub mod artifacts;
pub mod decision;
pub mod domain;
pub mod encoder;
pub mod features;
pub mod model;
pub mod router;
pub mod service;
pub mod training;

#[cfg(test)]
mod tests;

pub use artifacts::{ArtifactError, ArtifactStore, ScoringArtifacts};
pub use decision::DecisionEngine;
pub use domain::{
    ConfidenceLevel, FeatureVector, LoanApplication, LoanDecision, RiskCategory, RiskReason,
    ScoreResult, FEATURE_COUNT, FEATURE_NAMES,
};
pub use encoder::{EncoderError, LabelEncoder};
pub use features::{ApplicationPayload, FeatureBuilder, ValidationError};
pub use model::{LogisticRegression, RiskModel, TrainedModel};
pub use router::scoring_router;
pub use service::{ScoringError, ScoringService};
pub use training::{TrainingError, TrainingOptions, TrainingReport};
