use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info};

use super::classifier::Classifier;
use super::error::ClassifierError;
use super::pipeline::{BagOfWordsPipeline, Pipeline};
use crate::artifact::{self, ArtifactError, ModelArtifact};
use crate::config::ClassifierConfig;

/// Where the builder gets its pipeline from.
#[derive(Debug)]
enum PipelineSource {
    Artifact(PathBuf),
    Pipeline(Arc<dyn Pipeline>),
}

/// A builder for constructing a Classifier with a fluent interface.
///
/// Nothing is read from disk until [`build`](ClassifierBuilder::build) is
/// called; that call performs the one and only load.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    source: Option<PipelineSource>,
    expected_sha256: Option<String>,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance
    ///
    /// # Example
    /// ```
    /// use toxguard::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            source: None,
            expected_sha256: None,
        }
    }

    /// Applies a configuration: artifact path and optional digest.
    ///
    /// Replaces any source or digest set earlier.
    pub fn with_config(mut self, config: ClassifierConfig) -> Self {
        self.source = Some(PipelineSource::Artifact(config.artifact_path));
        self.expected_sha256 = config.expected_sha256;
        self
    }

    /// Sets the artifact file to load
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The path is empty
    ///   - A source (artifact or pipeline) is already set
    ///
    /// # Example
    /// ```
    /// use toxguard::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .with_artifact("models/lr_cv_tuned.json");
    /// assert!(builder.is_ok());
    /// ```
    pub fn with_artifact<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ClassifierError::BuildError("Artifact path cannot be empty".to_string()));
        }
        if self.source.is_some() {
            return Err(ClassifierError::BuildError("Pipeline source already set".to_string()));
        }
        self.source = Some(PipelineSource::Artifact(path.to_path_buf()));
        Ok(self)
    }

    /// Requires the artifact to match a hex SHA-256 digest before it is parsed
    pub fn with_expected_sha256(mut self, hash: impl Into<String>) -> Self {
        self.expected_sha256 = Some(hash.into());
        self
    }

    /// Uses an already constructed pipeline instead of loading an artifact.
    ///
    /// Handy for tests and for pipelines backed by something other than the
    /// JSON artifact format.
    pub fn with_pipeline<P: Pipeline + 'static>(mut self, pipeline: P) -> Result<Self, ClassifierError> {
        if self.source.is_some() {
            return Err(ClassifierError::BuildError("Pipeline source already set".to_string()));
        }
        self.source = Some(PipelineSource::Pipeline(Arc::new(pipeline)));
        Ok(self)
    }

    /// Builds and returns the final Classifier instance
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The constructed Classifier if successful, or an error if:
    ///   - No source has been set
    ///   - The artifact is missing or unreadable
    ///   - The artifact does not match the expected digest
    ///   - The artifact is malformed or internally inconsistent
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        match self.source {
            Some(PipelineSource::Artifact(path)) => {
                Self::load_artifact(path, self.expected_sha256.as_deref()).map_err(|e| {
                    error!("Failed to load classifier: {}", e);
                    e
                })
            }
            Some(PipelineSource::Pipeline(pipeline)) => {
                if self.expected_sha256.is_some() {
                    return Err(ClassifierError::BuildError(
                        "A digest can only be checked against an artifact file".to_string(),
                    ));
                }
                Ok(Classifier {
                    artifact_path: None,
                    artifact_sha256: None,
                    pipeline,
                })
            }
            None => Err(ClassifierError::BuildError("An artifact or pipeline must be set".to_string())),
        }
    }

    fn load_artifact(path: PathBuf, expected_sha256: Option<&str>) -> Result<Classifier, ClassifierError> {
        info!("Loading artifact from {:?}", path);
        let bytes = artifact::read_artifact_bytes(&path)?;
        let digest = artifact::sha256_hex(&bytes);
        info!("Artifact sha256: {}", digest);

        if let Some(expected) = expected_sha256 {
            if !digest.eq_ignore_ascii_case(expected.trim()) {
                return Err(ArtifactError::HashMismatch {
                    expected: expected.to_string(),
                    actual: digest,
                }
                .into());
            }
        }

        let model_artifact = ModelArtifact::from_slice(&bytes)?;
        let kind = model_artifact.vectorizer.kind;
        let n_features = model_artifact.n_features();
        let pipeline = BagOfWordsPipeline::from_artifact(model_artifact)?;
        info!("Loaded {:?} vectorizer with {} features", kind, n_features);

        Ok(Classifier {
            artifact_path: Some(path),
            artifact_sha256: Some(digest),
            pipeline: Arc::new(pipeline),
        })
    }
}
