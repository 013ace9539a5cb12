use std::fmt;

use crate::artifact::ArtifactError;

/// Represents the different types of errors that can occur in the toxicity classifier.
#[derive(Debug)]
pub enum ClassifierError {
    /// The artifact could not be read, verified or parsed
    ArtifactError(ArtifactError),
    /// Error occurred during the build phase
    BuildError(String),
    /// Error occurred while making predictions
    PredictionError(String),
    /// The artifact parsed but its contents are inconsistent
    ValidationError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArtifactError(err) => write!(f, "Artifact error: {}", err),
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::PredictionError(msg) => write!(f, "Prediction error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ArtifactError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ArtifactError> for ClassifierError {
    fn from(err: ArtifactError) -> Self {
        ClassifierError::ArtifactError(err)
    }
}

impl From<regex::Error> for ClassifierError {
    fn from(err: regex::Error) -> Self {
        ClassifierError::ValidationError(format!("Invalid token pattern: {}", err))
    }
}
