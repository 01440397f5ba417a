/// This crate turns raw text into normalized TF-IDF vectors over a closed
/// vocabulary, and composes them with an external predictor into a text classifier.
pub mod classifier;
pub mod config;
pub mod error;
pub mod utils;
pub mod vectorizer;

/// Corpus for TF-IDF vectorization
/// The frozen model built once from a labeled training set. It holds:
/// - class names and their 1-based indices
/// - feature names and their 1-based indices
/// - one smoothed IDF weight per feature
/// - the closed-vocabulary tokenizer over the feature names
///
/// `Corpus::vector` converts a text into a unit-length sparse vector.
///
/// # Thread Safety
/// Nothing is mutated after construction; share it as `Arc<Corpus>`.
///
/// # Serialization
/// Supported (the tokenizer is rebuilt on deserialization).
/// `CorpusData` is the plain data form.
pub use vectorizer::corpus::Corpus;

/// Plain serializable form of `Corpus`
pub use vectorizer::serde::CorpusData;

/// TF IDF Calculation Engine Trait
/// By implementing this trait, another weighting can be plugged into `Corpus<E>`.
/// `DefaultTFIDFEngine` uses `ln((N + 0.01) / (df + 0.01))` for IDF and
/// `count / matched_terms` for TF.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Training record and its line-format loader
pub use vectorizer::record::{load_training, TrainingRecord};

/// Closed-vocabulary tokenizer
pub use vectorizer::token::{VocabToken, VocabTokenizer};

/// Per-text feature counts
pub use vectorizer::term::TermFrequency;

/// Sparse feature vector (1-based index -> weight)
pub use utils::math::vector::SparseVector;

/// Text classifier and the predictor capability it is composed with
pub use classifier::{Classifier, ModelLoader, Predictor};

pub use config::{ClassifierConfig, LoaderConfig, MalformedPair, TokenizerConfig};
pub use error::{ClassifierError, Result};
