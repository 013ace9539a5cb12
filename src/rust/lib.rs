//! A bag-of-words toxicity classifier.
//!
//! Loads a fitted vectorizer + logistic regression pipeline from a JSON
//! artifact and labels comments as `toxic` or `non-toxic` together with the
//! model's confidence.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use toxguard::Classifier;
//!
//! let classifier = Classifier::from_artifact("models/lr_cv_tuned.json")?;
//!
//! let prediction = classifier.predict("you idiot")?;
//! println!("{}: {:.2}", prediction.label, prediction.confidence);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! A loaded classifier is immutable and can be shared across threads using `Arc`:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use toxguard::Classifier;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let classifier = Arc::new(Classifier::from_default_artifact()?);
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let classifier = Arc::clone(&classifier);
//!     handles.push(thread::spawn(move || {
//!         classifier.predict("test text").unwrap();
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod classifier;
mod config;

pub use artifact::{ArtifactError, ModelArtifact, Norm, VectorizerKind, sha256_file, verify_artifact};
pub use classifier::{
    BagOfWordsPipeline, Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, Pipeline,
    Prediction, ToxicityLabel,
};
pub use config::{ClassifierConfig, DEFAULT_MODEL_PATH};

pub fn init_logger() {
    env_logger::init();
}
