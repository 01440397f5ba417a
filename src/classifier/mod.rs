pub mod bundle;

use std::{io::BufRead, sync::Arc};

use rayon::prelude::*;
use tracing::trace;

use crate::{
    error::Result,
    utils::math::vector::SparseVector,
    vectorizer::{
        corpus::Corpus,
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
    },
};

/// External prediction capability.
///
/// Maps a normalized feature vector to a class score; the integer part of the
/// score is taken as the 1-based class index. How the model is trained or
/// evaluated is up to the implementation.
pub trait Predictor {
    fn predict(&self, vector: &SparseVector) -> f64;
}

impl<F> Predictor for F
where
    F: Fn(&SparseVector) -> f64,
{
    #[inline]
    fn predict(&self, vector: &SparseVector) -> f64 {
        self(vector)
    }
}

/// Builds a predictor from its serialized model.
/// The model format is opaque here; the bytes are only passed through.
pub trait ModelLoader {
    type Model: Predictor;

    fn load_model(&self, reader: &mut dyn BufRead) -> Result<Self::Model>;
}

impl<F, P> ModelLoader for F
where
    F: Fn(&mut dyn BufRead) -> Result<P>,
    P: Predictor,
{
    type Model = P;

    fn load_model(&self, reader: &mut dyn BufRead) -> Result<P> {
        self(reader)
    }
}

/// Text classifier: corpus vectorization followed by an external predictor.
///
/// `classify` never fails. An empty label means the predictor returned an index
/// that no class is assigned to, i.e. the text is unclassified.
#[derive(Debug, Clone)]
pub struct Classifier<P, E = DefaultTFIDFEngine> {
    corpus: Arc<Corpus<E>>,
    predictor: P,
}

impl<P, E> Classifier<P, E>
where
    P: Predictor,
    E: TFIDFEngine,
{
    pub fn new(corpus: Arc<Corpus<E>>, predictor: P) -> Self {
        Self { corpus, predictor }
    }

    pub fn corpus(&self) -> &Arc<Corpus<E>> {
        &self.corpus
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Label of `text`, `""` when unclassified
    pub fn classify(&self, text: &str) -> &str {
        let vector = self.corpus.vector(text);
        let score = self.predictor.predict(&vector);
        let label = self.corpus.label(label_index(score));
        trace!(nnz = vector.len(), score, label, "classified");
        label
    }

    /// Same as `classify`, invalid UTF-8 is replaced before matching
    pub fn classify_bytes(&self, data: &[u8]) -> &str {
        self.classify(&String::from_utf8_lossy(data))
    }

    /// Classify many texts in parallel; the output keeps the input order
    pub fn classify_batch<T>(&self, texts: &[T]) -> Vec<&str>
    where
        T: AsRef<str> + Sync,
        P: Sync,
        E: Send + Sync,
    {
        texts
            .par_iter()
            .map(|text| self.classify(text.as_ref()))
            .collect()
    }

    /// Turn into a plain `text -> label` function
    pub fn into_fn(self) -> impl Fn(&str) -> String {
        move |text: &str| self.classify(text).to_string()
    }
}

/// Truncate the predictor score toward zero.
/// Non-finite or sub-1 scores map to 0, which no class is assigned to.
#[inline]
fn label_index(score: f64) -> usize {
    if !score.is_finite() || score < 1.0 {
        return 0;
    }
    score.trunc() as usize
}
