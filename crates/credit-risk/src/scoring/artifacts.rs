use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use super::encoder::{EncoderError, LabelEncoder};
use super::model::TrainedModel;

pub const MODEL_FILE: &str = "credit_risk_model.json";
pub const BUSINESS_ENCODER_FILE: &str = "business_encoder.json";
pub const REPAYMENT_ENCODER_FILE: &str = "repayment_encoder.json";

const BUSINESS_FEATURE: &str = "business_type";
const REPAYMENT_FEATURE: &str = "repayment_history";

/// Immutable bundle consulted by every scoring call: the model and both category encoders.
#[derive(Debug, Clone)]
pub struct ScoringArtifacts<M> {
    pub model: M,
    pub business_encoder: LabelEncoder,
    pub repayment_encoder: LabelEncoder,
}

impl<M> ScoringArtifacts<M> {
    pub fn new(
        model: M,
        business_encoder: LabelEncoder,
        repayment_encoder: LabelEncoder,
    ) -> Result<Self, ArtifactError> {
        check_encoder(&business_encoder, BUSINESS_FEATURE)?;
        check_encoder(&repayment_encoder, REPAYMENT_FEATURE)?;

        Ok(Self {
            model,
            business_encoder,
            repayment_encoder,
        })
    }
}

impl ScoringArtifacts<TrainedModel> {
    /// Like [`ScoringArtifacts::new`], additionally requiring the model's column contract and
    /// trained vocabularies to match the encoders.
    pub fn trained(
        model: TrainedModel,
        business_encoder: LabelEncoder,
        repayment_encoder: LabelEncoder,
    ) -> Result<Self, ArtifactError> {
        let artifacts = Self::new(model, business_encoder, repayment_encoder)?;
        let model = &artifacts.model;

        if !model.feature_names_match() {
            return Err(ArtifactError::FeatureMismatch {
                found: model.feature_names.clone(),
            });
        }
        model
            .classifier
            .check_shape()
            .map_err(ArtifactError::MalformedModel)?;

        if model.vocabularies.business_type != artifacts.business_encoder.classes() {
            return Err(ArtifactError::VocabularyMismatch {
                feature: BUSINESS_FEATURE,
            });
        }
        if model.vocabularies.repayment_history != artifacts.repayment_encoder.classes() {
            return Err(ArtifactError::VocabularyMismatch {
                feature: REPAYMENT_FEATURE,
            });
        }

        Ok(artifacts)
    }
}

fn check_encoder(encoder: &LabelEncoder, feature: &'static str) -> Result<(), ArtifactError> {
    if encoder.feature() != feature {
        return Err(ArtifactError::EncoderFeature {
            expected: feature,
            found: encoder.feature().to_string(),
        });
    }
    encoder.validate()?;
    Ok(())
}

/// Directory holding the three JSON artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    pub fn business_encoder_path(&self) -> PathBuf {
        self.dir.join(BUSINESS_ENCODER_FILE)
    }

    pub fn repayment_encoder_path(&self) -> PathBuf {
        self.dir.join(REPAYMENT_ENCODER_FILE)
    }

    /// Load and cross-check all three artifacts. Any failure here must stop the service.
    pub fn load(&self) -> Result<ScoringArtifacts<TrainedModel>, ArtifactError> {
        let model: TrainedModel = read_json(&self.model_path())?;
        let business_encoder: LabelEncoder = read_json(&self.business_encoder_path())?;
        let repayment_encoder: LabelEncoder = read_json(&self.repayment_encoder_path())?;

        let artifacts = ScoringArtifacts::trained(model, business_encoder, repayment_encoder)?;

        info!(
            dir = %self.dir.display(),
            business_types = artifacts.business_encoder.len(),
            repayment_histories = artifacts.repayment_encoder.len(),
            trained_at = %artifacts.model.metadata.trained_at,
            "loaded scoring artifacts"
        );

        Ok(artifacts)
    }

    pub fn save(&self, artifacts: &ScoringArtifacts<TrainedModel>) -> Result<(), ArtifactError> {
        fs::create_dir_all(&self.dir).map_err(|source| ArtifactError::Io {
            path: self.dir.clone(),
            source,
        })?;

        write_json(&self.model_path(), &artifacts.model)?;
        write_json(&self.business_encoder_path(), &artifacts.business_encoder)?;
        write_json(&self.repayment_encoder_path(), &artifacts.repayment_encoder)?;

        info!(dir = %self.dir.display(), "saved scoring artifacts");
        Ok(())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ArtifactError::Missing {
            path: path.to_path_buf(),
        },
        _ => ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_slice(&raw).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let encoded = serde_json::to_vec_pretty(value).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    fs::write(path, encoded).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact not found at {}", .path.display())]
    Missing { path: PathBuf },
    #[error("failed to access {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid artifact JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Encoder(#[from] EncoderError),
    #[error("encoder was fit for '{found}', expected '{expected}'")]
    EncoderFeature {
        expected: &'static str,
        found: String,
    },
    #[error("model feature columns {found:?} do not match the scoring feature order")]
    FeatureMismatch { found: Vec<String> },
    #[error("model parameters are malformed: {0}")]
    MalformedModel(String),
    #[error("{feature} encoder vocabulary differs from the one the model was trained with")]
    VocabularyMismatch { feature: &'static str },
}
