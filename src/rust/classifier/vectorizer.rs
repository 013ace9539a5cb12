use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use ndarray::Array1;
use regex::Regex;

use super::error::ClassifierError;
use super::utils::normalize_sparse;
use crate::artifact::{Norm, VectorizerArtifact, VectorizerKind};

/// Token pattern used when the artifact does not carry one: words of two or
/// more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

lazy_static! {
    static ref DEFAULT_TOKEN_REGEX: Regex =
        Regex::new(DEFAULT_TOKEN_PATTERN).expect("default token pattern is a valid regex");
}

/// Feature vector as `(feature index, weight)` pairs sorted by index.
/// Features with zero weight are absent.
pub type SparseFeatures = Vec<(usize, f64)>;

/// A fitted bag-of-words transform.
///
/// Turns a document into token n-gram counts over a fixed vocabulary,
/// optionally reweighted by inverse document frequency and normalized.
/// Token order is discarded and anything outside the vocabulary is ignored,
/// so an empty document maps to an empty feature vector.
#[derive(Debug, Clone)]
pub struct BagOfWords {
    kind: VectorizerKind,
    lowercase: bool,
    token_regex: Regex,
    min_n: usize,
    max_n: usize,
    stop_words: HashSet<String>,
    binary: bool,
    vocabulary: HashMap<String, usize>,
    idf: Option<Array1<f64>>,
    norm: Option<Norm>,
    sublinear_tf: bool,
}

impl BagOfWords {
    /// Builds the transform from its fitted state, checking that the state is
    /// self-consistent.
    pub fn from_artifact(artifact: VectorizerArtifact) -> Result<Self, ClassifierError> {
        let [min_n, max_n] = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::ValidationError(format!(
                "Invalid ngram_range [{}, {}]", min_n, max_n
            )));
        }

        Self::validate_vocabulary(&artifact.vocabulary)?;
        let n_features = artifact.vocabulary.len();

        let idf = match (artifact.kind, artifact.idf) {
            (VectorizerKind::Tfidf, Some(idf)) => {
                if idf.len() != n_features {
                    return Err(ClassifierError::ValidationError(format!(
                        "idf has {} weights but the vocabulary has {} terms",
                        idf.len(), n_features
                    )));
                }
                if idf.iter().any(|w| !w.is_finite()) {
                    return Err(ClassifierError::ValidationError("idf weights must be finite".into()));
                }
                Some(Array1::from(idf))
            }
            (VectorizerKind::Tfidf, None) => {
                return Err(ClassifierError::ValidationError("tfidf vectorizer requires idf weights".into()));
            }
            (VectorizerKind::Count, Some(_)) => {
                return Err(ClassifierError::ValidationError("count vectorizer cannot carry idf weights".into()));
            }
            (VectorizerKind::Count, None) => None,
        };

        if artifact.kind == VectorizerKind::Count && (artifact.norm.is_some() || artifact.sublinear_tf) {
            return Err(ClassifierError::ValidationError(
                "norm and sublinear_tf only apply to tfidf vectorizers".into(),
            ));
        }

        let token_regex = if artifact.token_pattern == DEFAULT_TOKEN_PATTERN {
            DEFAULT_TOKEN_REGEX.clone()
        } else {
            Regex::new(&artifact.token_pattern)?
        };
        if token_regex.captures_len() > 2 {
            return Err(ClassifierError::ValidationError(
                "token_pattern may contain at most one capturing group".into(),
            ));
        }

        Ok(Self {
            kind: artifact.kind,
            lowercase: artifact.lowercase,
            token_regex,
            min_n,
            max_n,
            stop_words: artifact.stop_words.unwrap_or_default().into_iter().collect(),
            binary: artifact.binary,
            vocabulary: artifact.vocabulary,
            idf,
            norm: artifact.norm,
            sublinear_tf: artifact.sublinear_tf,
        })
    }

    fn validate_vocabulary(vocabulary: &HashMap<String, usize>) -> Result<(), ClassifierError> {
        let n_features = vocabulary.len();
        let mut seen = vec![false; n_features];
        for (term, &idx) in vocabulary {
            if idx >= n_features {
                return Err(ClassifierError::ValidationError(format!(
                    "Vocabulary index {} for '{}' is out of range (vocabulary has {} terms)",
                    idx, term, n_features
                )));
            }
            if seen[idx] {
                return Err(ClassifierError::ValidationError(format!(
                    "Vocabulary index {} is assigned to more than one term", idx
                )));
            }
            seen[idx] = true;
        }
        Ok(())
    }

    pub fn kind(&self) -> VectorizerKind {
        self.kind
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    fn tokenize<'a>(&self, doc: &'a str) -> Vec<&'a str> {
        if self.token_regex.captures_len() == 2 {
            self.token_regex
                .captures_iter(doc)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str())
                .collect()
        } else {
            self.token_regex.find_iter(doc).map(|m| m.as_str()).collect()
        }
    }

    /// Splits a document into the n-grams the vocabulary is keyed on.
    pub fn analyze(&self, doc: &str) -> Vec<String> {
        let doc = if self.lowercase { doc.to_lowercase() } else { doc.to_string() };
        let tokens: Vec<&str> = self
            .tokenize(&doc)
            .into_iter()
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let mut grams: Vec<String> = Vec::new();
        if self.min_n == 1 {
            grams.extend(tokens.iter().map(|t| t.to_string()));
        }
        let upper = self.max_n.min(tokens.len());
        for n in self.min_n.max(2)..=upper {
            grams.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        grams
    }

    /// Maps a document to its feature vector.
    pub fn transform(&self, doc: &str) -> SparseFeatures {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for gram in self.analyze(doc) {
            if let Some(&idx) = self.vocabulary.get(&gram) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut features: SparseFeatures = counts.into_iter().collect();
        features.sort_unstable_by_key(|&(idx, _)| idx);

        if self.binary {
            for (_, tf) in features.iter_mut() {
                *tf = 1.0;
            }
        }

        if let Some(idf) = &self.idf {
            for (idx, tf) in features.iter_mut() {
                if self.sublinear_tf {
                    *tf = 1.0 + tf.ln();
                }
                *tf *= idf[*idx];
            }
            if let Some(norm) = self.norm {
                normalize_sparse(&mut features, norm);
            }
        }

        features
    }
}
