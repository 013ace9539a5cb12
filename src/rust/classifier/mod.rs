use std::path::PathBuf;

mod error;
mod pipeline;
mod model;
pub mod builder;
mod classifier;
mod vectorizer;
mod utils;

pub use error::ClassifierError;
pub use classifier::{Classifier, Prediction, ToxicityLabel};
pub use builder::ClassifierBuilder;
pub use pipeline::{BagOfWordsPipeline, Pipeline};
pub use model::{LogisticRegression, BINARY_CLASSES};
pub use vectorizer::{BagOfWords, SparseFeatures, DEFAULT_TOKEN_PATTERN};

use crate::artifact::VectorizerKind;

/// Information about a loaded classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Path of the artifact the pipeline was loaded from, if any
    pub artifact_path: Option<PathBuf>,
    /// Hex SHA-256 of the artifact bytes
    pub artifact_sha256: Option<String>,
    /// Kind of bag-of-words weighting
    pub vectorizer_kind: Option<VectorizerKind>,
    /// Size of the vocabulary
    pub num_features: Option<usize>,
}
