use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use super::error::ClassifierError;
use super::pipeline::Pipeline;
use crate::config::ClassifierConfig;

/// Label attached to a classified comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ToxicityLabel {
    #[serde(rename = "toxic")]
    Toxic,
    #[serde(rename = "non-toxic")]
    NonToxic,
}

impl ToxicityLabel {
    /// Maps a pipeline class code to a label. Only 0 and 1 are valid.
    pub fn from_class_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Toxic),
            0 => Some(Self::NonToxic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Toxic => "toxic",
            Self::NonToxic => "non-toxic",
        }
    }

    pub fn is_toxic(&self) -> bool {
        matches!(self, Self::Toxic)
    }
}

impl fmt::Display for ToxicityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one comment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: ToxicityLabel,
    /// Largest class probability, in `[0, 1]`
    pub confidence: f64,
}

impl Prediction {
    pub fn into_parts(self) -> (String, f64) {
        (self.label.as_str().to_string(), self.confidence)
    }
}

/// A loaded toxicity classifier.
///
/// The pipeline is loaded once, when the classifier is built, and never
/// changes afterwards. Prediction only reads it, so one classifier can be
/// shared across threads with `Arc`:
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use toxguard::Classifier;
/// use std::sync::Arc;
/// use std::thread;
///
/// let classifier = Arc::new(Classifier::from_default_artifact()?);
///
/// let classifier_clone = Arc::clone(&classifier);
/// thread::spawn(move || {
///     classifier_clone.predict("have a nice day").unwrap();
/// });
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    pub(crate) artifact_path: Option<PathBuf>,
    pub(crate) artifact_sha256: Option<String>,
    pub(crate) pipeline: Arc<dyn Pipeline>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Loads the artifact at `path`.
    pub fn from_artifact<P: AsRef<Path>>(path: P) -> Result<Self, ClassifierError> {
        Self::builder().with_artifact(path)?.build()
    }

    /// Loads the artifact at the default location, `models/lr_cv_tuned.json`.
    pub fn from_default_artifact() -> Result<Self, ClassifierError> {
        Self::builder().with_config(ClassifierConfig::default()).build()
    }

    /// Returns information about the loaded pipeline
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            artifact_path: self.artifact_path.clone(),
            artifact_sha256: self.artifact_sha256.clone(),
            vectorizer_kind: self.pipeline.vectorizer_kind(),
            num_features: self.pipeline.n_features(),
        }
    }

    /// The underlying pipeline, for callers that need raw class codes or
    /// probabilities.
    pub fn pipeline(&self) -> &dyn Pipeline {
        self.pipeline.as_ref()
    }

    /// Classifies one comment.
    ///
    /// The comment is not validated: empty or unusual text goes through the
    /// vectorizer like anything else. The label comes from the pipeline's
    /// discrete prediction, and the confidence is the larger of the two class
    /// probabilities.
    ///
    /// # Example
    /// ```no_run
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use toxguard::Classifier;
    ///
    /// let classifier = Classifier::from_artifact("models/lr_cv_tuned.json")?;
    /// let prediction = classifier.predict("you idiot")?;
    /// println!("{} ({:.2})", prediction.label, prediction.confidence);
    /// # Ok(())
    /// # }
    /// ```
    pub fn predict(&self, comment: &str) -> Result<Prediction, ClassifierError> {
        let batch = [comment];

        let classes = self.pipeline.predict(&batch)?;
        let class_code = match classes.as_slice() {
            [code] => *code,
            other => {
                return Err(ClassifierError::PredictionError(format!(
                    "Expected 1 class code, pipeline returned {}",
                    other.len()
                )))
            }
        };

        let proba = self.pipeline.predict_proba(&batch)?;
        if proba.dim() != (1, 2) {
            return Err(ClassifierError::PredictionError(format!(
                "Expected probabilities of shape (1, 2), pipeline returned {:?}",
                proba.dim()
            )));
        }

        let label = ToxicityLabel::from_class_code(class_code).ok_or_else(|| {
            ClassifierError::PredictionError(format!("Unexpected class code {}", class_code))
        })?;
        let confidence = proba.row(0).iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ClassifierError::PredictionError(format!(
                "Pipeline returned an invalid probability {}",
                confidence
            )));
        }

        Ok(Prediction { label, confidence })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[derive(Debug)]
    struct FixedPipeline {
        class_code: i64,
        proba: [f64; 2],
    }

    impl Pipeline for FixedPipeline {
        fn predict(&self, batch: &[&str]) -> Result<Vec<i64>, ClassifierError> {
            Ok(vec![self.class_code; batch.len()])
        }

        fn predict_proba(&self, batch: &[&str]) -> Result<Array2<f64>, ClassifierError> {
            let values = batch.iter().flat_map(|_| self.proba).collect();
            Ok(Array2::from_shape_vec((batch.len(), 2), values).unwrap())
        }
    }

    fn classifier(class_code: i64, proba: [f64; 2]) -> Classifier {
        Classifier::builder()
            .with_pipeline(FixedPipeline { class_code, proba })
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(ToxicityLabel::from_class_code(1), Some(ToxicityLabel::Toxic));
        assert_eq!(ToxicityLabel::from_class_code(0), Some(ToxicityLabel::NonToxic));
        assert_eq!(ToxicityLabel::from_class_code(2), None);
        assert_eq!(ToxicityLabel::Toxic.to_string(), "toxic");
        assert_eq!(ToxicityLabel::NonToxic.to_string(), "non-toxic");
    }

    #[test]
    fn test_confidence_is_max_probability() {
        let prediction = classifier(1, [0.08, 0.92]).predict("you idiot").unwrap();
        assert_eq!(prediction.into_parts(), ("toxic".to_string(), 0.92));

        let prediction = classifier(0, [0.81, 0.19]).predict("nice weather").unwrap();
        assert_eq!(prediction.into_parts(), ("non-toxic".to_string(), 0.81));
    }

    #[test]
    fn test_label_follows_class_code_not_probabilities() {
        let prediction = classifier(1, [0.7, 0.3]).predict("anything").unwrap();
        assert_eq!(prediction.label, ToxicityLabel::Toxic);
        assert_eq!(prediction.confidence, 0.7);
    }

    #[test]
    fn test_unexpected_class_code() {
        let result = classifier(3, [0.5, 0.5]).predict("text");
        assert!(matches!(result, Err(ClassifierError::PredictionError(_))));
    }

    #[test]
    fn test_invalid_probability() {
        let result = classifier(1, [0.2, 1.5]).predict("text");
        assert!(matches!(result, Err(ClassifierError::PredictionError(_))));
    }

    #[test]
    fn test_prediction_serializes_labels() {
        let prediction = Prediction { label: ToxicityLabel::NonToxic, confidence: 0.5 };
        let json = serde_json::to_string(&prediction).unwrap();
        assert_eq!(json, r#"{"label":"non-toxic","confidence":0.5}"#);
    }
}
