use std::collections::HashMap;

use crate::vectorizer::token::VocabToken;

/// TermFrequency struct
/// Counts how often each vocabulary feature occurs in one text.
///
/// `total_term_count` is the number of vocabulary matches, not the number of
/// words in the text; it is the TF denominator.
///
/// # Examples
/// ```
/// use svm_tfidf_corpus::vectorizer::term::TermFrequency;
/// let mut term_freq = TermFrequency::new();
/// term_freq.add_term(1);
/// term_freq.add_term(2);
/// term_freq.add_term(1);
///
/// assert_eq!(term_freq.term_count(1), 2);
/// assert_eq!(term_freq.term_sum(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFrequency {
    term_count: HashMap<usize, u64>,
    total_term_count: u64,
}

impl TermFrequency {
    /// Create a new TermFrequency
    pub fn new() -> Self {
        TermFrequency {
            term_count: HashMap::new(),
            total_term_count: 0,
        }
    }

    /// Add one occurrence of a feature
    ///
    /// # Arguments
    /// * `feature` - 1-based feature index
    #[inline]
    pub fn add_term(&mut self, feature: usize) -> &mut Self {
        *self.term_count.entry(feature).or_insert(0) += 1;
        self.total_term_count += 1;
        self
    }

    /// Add every token produced by the vocabulary tokenizer
    #[inline]
    pub fn add_tokens(&mut self, tokens: &[VocabToken<'_>]) -> &mut Self {
        for token in tokens {
            self.add_term(token.feature);
        }
        self
    }

    /// Occurrences of `feature`, 0 if absent
    #[inline]
    pub fn term_count(&self, feature: usize) -> u64 {
        self.term_count.get(&feature).copied().unwrap_or(0)
    }

    /// Number of vocabulary matches counted so far
    #[inline]
    pub fn term_sum(&self) -> u64 {
        self.total_term_count
    }

    /// number of distinct features
    #[inline]
    pub fn term_num(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_term_count == 0
    }

    /// `(feature, count)` pairs in ascending feature order
    pub fn sorted_counts(&self) -> Vec<(usize, u64)> {
        let mut counts: Vec<(usize, u64)> = self
            .term_count
            .iter()
            .map(|(feature, count)| (*feature, *count))
            .collect();
        counts.sort_unstable_by_key(|(feature, _)| *feature);
        counts
    }
}
