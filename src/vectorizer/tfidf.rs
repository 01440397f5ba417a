use std::collections::HashMap;

use crate::vectorizer::record::TrainingRecord;

/// Additive smoothing applied to both sides of the IDF ratio.
/// Keeps `df = 0` and `df = N` finite.
pub const IDF_SMOOTHING: f64 = 0.01;

/// TF-IDF calculation engine
///
/// By implementing this trait, a different weighting can be plugged into
/// `Corpus<E>`. `DefaultTFIDFEngine` is the smoothed-IDF / match-count-TF scheme.
pub trait TFIDFEngine {
    /// IDF of a feature
    ///
    /// # Arguments
    /// * `doc_freq` - number of training records containing the feature
    /// * `doc_num` - number of training records
    fn idf(doc_freq: u64, doc_num: u64) -> f64;

    /// TF of a feature in one text
    ///
    /// # Arguments
    /// * `count` - occurrences of the feature
    /// * `total` - occurrences of all vocabulary features in the text
    fn tf(count: u64, total: u64) -> f64;
}

/// Default engine
/// - `idf = ln((N + 0.01) / (df + 0.01))`
/// - `tf = count / total`, where `total` counts vocabulary matches only
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    #[inline]
    fn idf(doc_freq: u64, doc_num: u64) -> f64 {
        ((doc_num as f64 + IDF_SMOOTHING) / (doc_freq as f64 + IDF_SMOOTHING)).ln()
    }

    #[inline]
    fn tf(count: u64, total: u64) -> f64 {
        if total == 0 {
            return 0.0;
        }
        count as f64 / total as f64
    }
}

/// Number of records containing each feature index (presence, not weight)
pub fn document_frequencies(records: &[TrainingRecord]) -> HashMap<usize, u64> {
    let mut doc_freq = HashMap::new();
    for record in records {
        for index in record.features().keys() {
            *doc_freq.entry(*index).or_insert(0) += 1;
        }
    }
    doc_freq
}

/// IDF of a single feature over `records` with the default engine
pub fn idf(feature: usize, records: &[TrainingRecord]) -> f64 {
    let doc_freq = records
        .iter()
        .filter(|record| record.contains_feature(feature))
        .count() as u64;
    DefaultTFIDFEngine::idf(doc_freq, records.len() as u64)
}

/// IDF table for features `1..=feature_num`, `table[i]` is feature `i + 1`
pub fn idf_table<E: TFIDFEngine>(feature_num: usize, records: &[TrainingRecord]) -> Vec<f64> {
    let doc_freq = document_frequencies(records);
    let doc_num = records.len() as u64;
    (1..=feature_num)
        .map(|index| E::idf(doc_freq.get(&index).copied().unwrap_or(0), doc_num))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: i32, pairs: &[(usize, f64)]) -> TrainingRecord {
        TrainingRecord::new(label, pairs.iter().copied().collect())
    }

    #[test]
    fn idf_matches_reference_values() {
        let records = vec![
            record(1, &[(1, 0.5), (2, 0.5)]),
            record(2, &[(2, 1.0)]),
        ];
        assert!((idf(1, &records) - (2.01f64 / 1.01).ln()).abs() < 1e-15);
        assert!((idf(1, &records) - 0.6881).abs() < 1e-4);
        assert_eq!(idf(2, &records), 0.0);
        // never seen
        assert!((idf(3, &records) - (2.01f64 / 0.01).ln()).abs() < 1e-12);
    }

    #[test]
    fn idf_is_finite_and_strictly_decreasing() {
        for doc_num in [0u64, 1, 2, 10, 1000] {
            let mut prev = f64::INFINITY;
            for doc_freq in 0..=doc_num {
                let value = DefaultTFIDFEngine::idf(doc_freq, doc_num);
                assert!(value.is_finite(), "N={doc_num} df={doc_freq}");
                assert!(value < prev, "N={doc_num} df={doc_freq}");
                prev = value;
            }
        }
    }

    #[test]
    fn weight_magnitude_does_not_matter() {
        let a = vec![record(1, &[(1, 0.0001)]), record(1, &[(2, 1.0)])];
        let b = vec![record(1, &[(1, 900.0)]), record(1, &[(2, 1.0)])];
        assert_eq!(idf(1, &a).to_bits(), idf(1, &b).to_bits());
    }

    #[test]
    fn table_agrees_with_single_feature_form() {
        let records = vec![
            record(1, &[(1, 0.5), (3, 0.5)]),
            record(2, &[(3, 1.0), (9, 1.0)]),
            record(2, &[]),
        ];
        let table = idf_table::<DefaultTFIDFEngine>(4, &records);
        assert_eq!(table.len(), 4);
        for (pos, value) in table.iter().enumerate() {
            assert_eq!(value.to_bits(), idf(pos + 1, &records).to_bits());
        }
    }

    #[test]
    fn tf_guards_zero_total() {
        assert_eq!(DefaultTFIDFEngine::tf(0, 0), 0.0);
        assert!((DefaultTFIDFEngine::tf(2, 3) - 2.0 / 3.0).abs() < 1e-15);
    }
}
