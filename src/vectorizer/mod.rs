pub mod corpus;
pub mod record;
pub mod serde;
pub mod term;
pub mod tfidf;
pub mod token;

use std::borrow::Cow;

use tracing::trace;

use crate::{
    utils::math::vector::SparseVector,
    vectorizer::{corpus::Corpus, term::TermFrequency, tfidf::TFIDFEngine},
};

impl<E> Corpus<E>
where
    E: TFIDFEngine,
{
    /// Count the vocabulary matches of `text`
    pub fn term_frequency(&self, text: &str) -> TermFrequency {
        let mut freq = TermFrequency::new();
        freq.add_tokens(&self.tokenizer.tokenize(text));
        freq
    }

    /// TF-IDF vector of `text`, L2-normalized
    ///
    /// TF is `count / total` where `total` is the number of vocabulary matches.
    /// No match at all, or a zero norm, gives the empty vector.
    pub fn vector(&self, text: &str) -> SparseVector {
        let freq = self.term_frequency(text);
        let total = freq.term_sum();
        if total == 0 {
            return SparseVector::new();
        }

        // index 昇順で積算 -> 結果が毎回同じビットになる
        let tfidf: Vec<(usize, f64)> = freq
            .sorted_counts()
            .into_iter()
            .map(|(feature, count)| {
                let idf = self.idf(feature).unwrap_or(0.0);
                (feature, E::tf(count, total) * idf)
            })
            .collect();
        let sum: f64 = tfidf.iter().map(|(_, w)| w * w).sum();
        let scalar = sum.sqrt();
        if scalar == 0.0 || !scalar.is_finite() {
            trace!("zero norm for {} matched terms", total);
            return SparseVector::new();
        }

        let mut vector = SparseVector::with_capacity(tfidf.len());
        for (feature, weight) in tfidf {
            vector.push(feature, weight / scalar);
        }
        vector
    }

    /// Same as `vector`, invalid UTF-8 is replaced before matching
    pub fn vector_bytes(&self, data: &[u8]) -> SparseVector {
        let text: Cow<'_, str> = String::from_utf8_lossy(data);
        self.vector(&text)
    }
}

/// TF-IDF vector of `text` against a frozen corpus
pub fn vectorize<E: TFIDFEngine>(corpus: &Corpus<E>, text: &str) -> SparseVector {
    corpus.vector(text)
}
