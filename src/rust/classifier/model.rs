use ndarray::Array1;

use super::error::ClassifierError;
use super::utils::sigmoid;
use crate::artifact::LogisticArtifact;

/// Class codes a binary toxicity model must be fitted on, in order.
pub const BINARY_CLASSES: [i64; 2] = [0, 1];

/// Fitted binary logistic regression over sparse features.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    classes: [i64; 2],
    coef: Array1<f64>,
    intercept: f64,
}

impl LogisticRegression {
    /// Builds the model from its fitted state.
    ///
    /// `n_features` is the vocabulary size of the vectorizer feeding this model;
    /// the weight vector must match it exactly.
    pub fn from_artifact(artifact: LogisticArtifact, n_features: usize) -> Result<Self, ClassifierError> {
        if artifact.classes[..] != BINARY_CLASSES[..] {
            return Err(ClassifierError::ValidationError(format!(
                "Expected binary classes {:?}, found {:?}",
                BINARY_CLASSES, artifact.classes
            )));
        }
        if artifact.coef.len() != n_features {
            return Err(ClassifierError::ValidationError(format!(
                "Classifier has {} coefficients but the vectorizer produces {} features",
                artifact.coef.len(), n_features
            )));
        }
        if !artifact.intercept.is_finite() || artifact.coef.iter().any(|w| !w.is_finite()) {
            return Err(ClassifierError::ValidationError("Classifier weights must be finite".into()));
        }

        Ok(Self {
            classes: BINARY_CLASSES,
            coef: Array1::from(artifact.coef),
            intercept: artifact.intercept,
        })
    }

    pub fn classes(&self) -> [i64; 2] {
        self.classes
    }

    /// Signed distance to the separating hyperplane.
    pub fn decision_function(&self, features: &[(usize, f64)]) -> f64 {
        features
            .iter()
            .map(|&(idx, value)| self.coef[idx] * value)
            .sum::<f64>()
            + self.intercept
    }

    pub fn predict(&self, features: &[(usize, f64)]) -> i64 {
        if self.decision_function(features) > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        }
    }

    /// Probability of each class, in the order of `classes()`.
    pub fn predict_proba(&self, features: &[(usize, f64)]) -> [f64; 2] {
        let positive = sigmoid(self.decision_function(features));
        [1.0 - positive, positive]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(coef: Vec<f64>, intercept: f64) -> LogisticRegression {
        let n = coef.len();
        LogisticRegression::from_artifact(
            LogisticArtifact { classes: vec![0, 1], coef, intercept },
            n,
        )
        .unwrap()
    }

    #[test]
    fn test_decision_and_probabilities() {
        let lr = model(vec![2.0, -1.0], -0.5);
        let features = vec![(0, 1.0), (1, 1.0)];
        assert!((lr.decision_function(&features) - 0.5).abs() < 1e-12);
        assert_eq!(lr.predict(&features), 1);

        let proba = lr.predict_proba(&features);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-12);
        assert!(proba[1] > proba[0]);
    }

    #[test]
    fn test_empty_features_use_intercept() {
        let lr = model(vec![5.0], -2.0);
        assert_eq!(lr.predict(&[]), 0);
        let proba = lr.predict_proba(&[]);
        assert!((proba[1] - sigmoid(-2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_decision_is_negative_class() {
        let lr = model(vec![1.0], 0.0);
        assert_eq!(lr.predict(&[]), 0);
        assert_eq!(lr.predict_proba(&[]), [0.5, 0.5]);
    }

    #[test]
    fn test_invalid_state_rejected() {
        let wrong_classes = LogisticArtifact { classes: vec![1, 0], coef: vec![1.0], intercept: 0.0 };
        assert!(LogisticRegression::from_artifact(wrong_classes, 1).is_err());

        let multiclass = LogisticArtifact { classes: vec![0, 1, 2], coef: vec![1.0], intercept: 0.0 };
        assert!(LogisticRegression::from_artifact(multiclass, 1).is_err());

        let short = LogisticArtifact { classes: vec![0, 1], coef: vec![1.0], intercept: 0.0 };
        assert!(LogisticRegression::from_artifact(short, 2).is_err());

        let nan = LogisticArtifact { classes: vec![0, 1], coef: vec![f64::NAN], intercept: 0.0 };
        assert!(LogisticRegression::from_artifact(nan, 1).is_err());
    }
}
