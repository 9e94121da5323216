use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// Maps a closed vocabulary of category labels to integer codes.
///
/// Codes are positions in the sorted vocabulary, so fitting the same labels always yields the
/// same assignment. The vocabulary is fixed once fit; lookups outside it fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    feature: String,
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<I, S>(feature: &str, labels: I) -> Result<Self, EncoderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();

        Self::from_classes(feature, classes.into_iter().collect())
    }

    /// Rebuild an encoder from a persisted vocabulary, keeping its code assignment.
    pub fn from_classes(feature: &str, classes: Vec<String>) -> Result<Self, EncoderError> {
        let encoder = Self {
            feature: feature.to_string(),
            classes,
        };
        encoder.validate()?;
        Ok(encoder)
    }

    pub fn validate(&self) -> Result<(), EncoderError> {
        if self.classes.is_empty() {
            return Err(EncoderError::EmptyVocabulary {
                feature: self.feature.clone(),
            });
        }

        let mut seen = HashSet::with_capacity(self.classes.len());
        for label in &self.classes {
            if !seen.insert(label.as_str()) {
                return Err(EncoderError::DuplicateCategory {
                    feature: self.feature.clone(),
                    label: label.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn transform(&self, label: &str) -> Result<u32, EncoderError> {
        self.classes
            .iter()
            .position(|class| class == label)
            .map(|index| index as u32)
            .ok_or_else(|| EncoderError::UnknownCategory {
                feature: self.feature.clone(),
                label: label.to_string(),
            })
    }

    pub fn inverse_transform(&self, code: u32) -> Result<&str, EncoderError> {
        self.classes
            .get(code as usize)
            .map(String::as_str)
            .ok_or_else(|| EncoderError::UnknownCode {
                feature: self.feature.clone(),
                code,
            })
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error("Unknown {feature} '{label}'")]
    UnknownCategory { feature: String, label: String },
    #[error("no {feature} category is assigned code {code}")]
    UnknownCode { feature: String, code: u32 },
    #[error("{feature} encoder has an empty vocabulary")]
    EmptyVocabulary { feature: String },
    #[error("{feature} encoder lists '{label}' more than once")]
    DuplicateCategory { feature: String, label: String },
}
