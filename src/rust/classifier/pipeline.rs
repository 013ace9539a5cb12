use std::fmt;

use ndarray::Array2;

use super::error::ClassifierError;
use super::model::LogisticRegression;
use super::vectorizer::BagOfWords;
use crate::artifact::{ModelArtifact, VectorizerKind};

/// A fitted text classification pipeline: vectorizer followed by a binary
/// classifier.
///
/// Both operations take a batch of documents and return one result per
/// document, in order:
/// - `predict` returns the class code (0 or 1)
/// - `predict_proba` returns a `[batch_size, 2]` matrix whose rows are the
///   probabilities of class 0 and class 1
///
/// Implementations must be safe to call concurrently through a shared
/// reference; the classifier never mutates its pipeline.
pub trait Pipeline: Send + Sync + fmt::Debug {
    fn predict(&self, batch: &[&str]) -> Result<Vec<i64>, ClassifierError>;

    fn predict_proba(&self, batch: &[&str]) -> Result<Array2<f64>, ClassifierError>;

    /// Number of input features, when the pipeline knows it
    fn n_features(&self) -> Option<usize> {
        None
    }

    fn vectorizer_kind(&self) -> Option<VectorizerKind> {
        None
    }
}

/// Bag-of-words vectorizer feeding a logistic regression, loaded from a
/// [`ModelArtifact`].
#[derive(Debug, Clone)]
pub struct BagOfWordsPipeline {
    vectorizer: BagOfWords,
    model: LogisticRegression,
}

impl BagOfWordsPipeline {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ClassifierError> {
        let vectorizer = BagOfWords::from_artifact(artifact.vectorizer)?;
        let model = LogisticRegression::from_artifact(artifact.classifier, vectorizer.n_features())?;
        Ok(Self { vectorizer, model })
    }

    pub fn vectorizer(&self) -> &BagOfWords {
        &self.vectorizer
    }

    pub fn model(&self) -> &LogisticRegression {
        &self.model
    }
}

impl Pipeline for BagOfWordsPipeline {
    fn predict(&self, batch: &[&str]) -> Result<Vec<i64>, ClassifierError> {
        Ok(batch
            .iter()
            .map(|doc| self.model.predict(&self.vectorizer.transform(doc)))
            .collect())
    }

    fn predict_proba(&self, batch: &[&str]) -> Result<Array2<f64>, ClassifierError> {
        let values: Vec<f64> = batch
            .iter()
            .flat_map(|doc| self.model.predict_proba(&self.vectorizer.transform(doc)))
            .collect();
        Array2::from_shape_vec((batch.len(), 2), values)
            .map_err(|e| ClassifierError::PredictionError(format!("Failed to create probability array: {}", e)))
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.vectorizer.n_features())
    }

    fn vectorizer_kind(&self) -> Option<VectorizerKind> {
        Some(self.vectorizer.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pipeline() -> BagOfWordsPipeline {
        let artifact = ModelArtifact::from_slice(
            br#"{
                "format_version": 1,
                "vectorizer": { "kind": "count", "vocabulary": { "idiot": 0, "thanks": 1 } },
                "classifier": { "classes": [0, 1], "coef": [4.0, -2.0], "intercept": -1.0 }
            }"#,
        )
        .unwrap();
        BagOfWordsPipeline::from_artifact(artifact).unwrap()
    }

    #[test]
    fn test_batch_shapes() {
        let pipeline = pipeline();
        let batch = ["you idiot", "thanks a lot", ""];
        assert_eq!(pipeline.predict(&batch).unwrap(), vec![1, 0, 0]);

        let proba = pipeline.predict_proba(&batch).unwrap();
        assert_eq!(proba.shape(), &[3, 2]);
        for row in proba.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_mismatched_coefficients_rejected() {
        let artifact = ModelArtifact::from_slice(
            br#"{
                "format_version": 1,
                "vectorizer": { "kind": "count", "vocabulary": { "idiot": 0 } },
                "classifier": { "classes": [0, 1], "coef": [4.0, -2.0], "intercept": -1.0 }
            }"#,
        )
        .unwrap();
        assert!(matches!(
            BagOfWordsPipeline::from_artifact(artifact),
            Err(ClassifierError::ValidationError(_))
        ));
    }

    #[test]
    fn test_reports_shape() {
        let pipeline = pipeline();
        assert_eq!(pipeline.n_features(), Some(2));
        assert_eq!(pipeline.vectorizer_kind(), Some(VectorizerKind::Count));
    }
}
