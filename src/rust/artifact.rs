//! Reading and checking serialized pipeline artifacts.
//!
//! An artifact is a JSON document holding a fitted bag-of-words vectorizer and
//! a binary logistic regression. It is produced by an external exporter from
//! the training environment; this crate only reads it.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The only artifact layout this crate understands.
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },
    #[error("Unsupported artifact format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Top level of the artifact file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub vectorizer: VectorizerArtifact,
    pub classifier: LogisticArtifact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorizerKind {
    /// Raw term counts
    Count,
    /// Term counts reweighted by inverse document frequency
    Tfidf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Norm {
    #[serde(rename = "l1")]
    L1,
    #[serde(rename = "l2")]
    L2,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    crate::classifier::DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> [usize; 2] {
    [1, 1]
}

/// Fitted state of the text vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VectorizerArtifact {
    pub kind: VectorizerKind,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: [usize; 2],
    #[serde(default)]
    pub stop_words: Option<Vec<String>>,
    #[serde(default)]
    pub binary: bool,
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default)]
    pub norm: Option<Norm>,
    #[serde(default)]
    pub sublinear_tf: bool,
}

/// Fitted state of the binary logistic regression.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogisticArtifact {
    pub classes: Vec<i64>,
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl ModelArtifact {
    /// Reads and parses an artifact, checking its version.
    ///
    /// Structural consistency between the vectorizer and the classifier is
    /// checked later, when the pipeline is assembled.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let bytes = read_artifact_bytes(path.as_ref())?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)?;
        if artifact.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: artifact.format_version,
                supported: SUPPORTED_FORMAT_VERSION,
            });
        }
        Ok(artifact)
    }

    /// Number of input features, i.e. the vocabulary size
    pub fn n_features(&self) -> usize {
        self.vectorizer.vocabulary.len()
    }
}

pub(crate) fn read_artifact_bytes(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.to_path_buf()));
    }
    Ok(fs::read(path)?)
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Computes the hex-encoded SHA-256 digest of a file.
pub fn sha256_file<P: AsRef<Path>>(path: P) -> Result<String, ArtifactError> {
    let bytes = read_artifact_bytes(path.as_ref())?;
    Ok(sha256_hex(&bytes))
}

/// Checks a file against an expected SHA-256 digest.
///
/// Returns `Ok(false)` when the file is missing or the digest differs; IO
/// failures on an existing file are returned as errors.
pub fn verify_artifact<P: AsRef<Path>>(path: P, expected_hash: &str) -> Result<bool, ArtifactError> {
    let path = path.as_ref();
    log::debug!("Verifying artifact: {:?}", path);
    if !path.exists() {
        log::debug!("Artifact does not exist");
        return Ok(false);
    }
    let hash = sha256_file(path)?;
    log::debug!("Calculated hash: {}", hash);
    log::debug!("Expected hash:   {}", expected_hash);
    Ok(hash.eq_ignore_ascii_case(expected_hash.trim()))
}
