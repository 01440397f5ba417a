use std::marker::PhantomData;

use indexmap::IndexSet;
use tracing::info;

use crate::{
    config::TokenizerConfig,
    error::{ClassifierError, Result},
    vectorizer::{
        record::TrainingRecord,
        tfidf::{idf_table, DefaultTFIDFEngine, TFIDFEngine},
        token::VocabTokenizer,
    },
};

/// Frozen classification model.
///
/// Binds class names and feature names to dense 1-based indices (input order),
/// holds one IDF weight per feature and the vocabulary tokenizer built from the
/// same feature names. Nothing is mutated after construction, so a `Corpus`
/// can be shared across threads (`Arc<Corpus>`) without locking.
#[derive(Debug, Clone)]
pub struct Corpus<E = DefaultTFIDFEngine> {
    /// position + 1 = class index
    pub(crate) classes: IndexSet<Box<str>>,
    /// position + 1 = feature index
    pub(crate) features: IndexSet<Box<str>>,
    /// `idf[i]` belongs to feature `i + 1`
    pub(crate) idf: Vec<f64>,
    /// number of training records the IDF was computed from
    pub(crate) doc_num: u64,
    pub(crate) tokenizer: VocabTokenizer,
    _marker: PhantomData<E>,
}

impl Corpus<DefaultTFIDFEngine> {
    /// Build a corpus with the default engine and tokenizer settings
    ///
    /// # Arguments
    /// * `classes` - class names, class `i` gets index `i + 1`
    /// * `features` - feature names, feature `i` gets index `i + 1`
    /// * `records` - parsed training records the IDF is computed from
    pub fn new<C, F>(classes: &[C], features: &[F], records: &[TrainingRecord]) -> Result<Self>
    where
        C: AsRef<str>,
        F: AsRef<str>,
    {
        Self::with_config(classes, features, records, &TokenizerConfig::default())
    }
}

impl<E> Corpus<E>
where
    E: TFIDFEngine,
{
    pub fn with_config<C, F>(
        classes: &[C],
        features: &[F],
        records: &[TrainingRecord],
        config: &TokenizerConfig,
    ) -> Result<Self>
    where
        C: AsRef<str>,
        F: AsRef<str>,
    {
        let idf = idf_table::<E>(features.len(), records);
        let corpus = Self::from_parts(
            name_set("class", classes)?,
            name_set("feature", features)?,
            idf,
            records.len() as u64,
            config,
        )?;
        info!(
            "corpus built: {} classes, {} features, {} training records",
            corpus.class_num(),
            corpus.feature_num(),
            corpus.doc_num
        );
        Ok(corpus)
    }

    /// Assemble a corpus from already computed parts and check its invariants
    pub(crate) fn from_parts(
        classes: IndexSet<Box<str>>,
        features: IndexSet<Box<str>>,
        idf: Vec<f64>,
        doc_num: u64,
        config: &TokenizerConfig,
    ) -> Result<Self> {
        if idf.len() != features.len() {
            return Err(ClassifierError::InvalidCorpus(format!(
                "{} idf weights for {} features",
                idf.len(),
                features.len()
            )));
        }
        let terms: Vec<&str> = features.iter().map(|name| &**name).collect();
        let tokenizer = VocabTokenizer::new(&terms, config)?;
        Ok(Self {
            classes,
            features,
            idf,
            doc_num,
            tokenizer,
            _marker: PhantomData,
        })
    }
}

impl<E> Corpus<E> {
    /// 1-based index of a class name
    #[inline]
    pub fn class_index(&self, name: &str) -> Option<usize> {
        self.classes.get_index_of(name).map(|pos| pos + 1)
    }

    /// 1-based index of a feature name
    #[inline]
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.features.get_index_of(name).map(|pos| pos + 1)
    }

    /// Class name for `index`, or `""` when nothing is assigned to it (0 included)
    #[inline]
    pub fn label(&self, index: usize) -> &str {
        lookup(&self.classes, index)
    }

    /// Feature name for `index`, or `""` when nothing is assigned to it (0 included)
    #[inline]
    pub fn feature(&self, index: usize) -> &str {
        lookup(&self.features, index)
    }

    /// IDF weight of a feature index
    #[inline]
    pub fn idf(&self, index: usize) -> Option<f64> {
        index.checked_sub(1).and_then(|pos| self.idf.get(pos)).copied()
    }

    /// whole IDF table, `idf_vec()[i]` belongs to feature `i + 1`
    #[inline]
    pub fn idf_vec(&self) -> &[f64] {
        &self.idf
    }

    #[inline]
    pub fn class_num(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn feature_num(&self) -> usize {
        self.features.len()
    }

    /// number of training records behind the IDF table
    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(|name| &**name)
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|name| &**name)
    }

    #[inline]
    pub fn tokenizer(&self) -> &VocabTokenizer {
        &self.tokenizer
    }
}

#[inline]
fn lookup(names: &IndexSet<Box<str>>, index: usize) -> &str {
    index
        .checked_sub(1)
        .and_then(|pos| names.get_index(pos))
        .map_or("", |name| &**name)
}

/// Ordered name set; empty or repeated names are rejected
/// so that position + 1 stays the index of every name.
pub(crate) fn name_set<T: AsRef<str>>(kind: &'static str, names: &[T]) -> Result<IndexSet<Box<str>>> {
    let mut set = IndexSet::with_capacity(names.len());
    for (pos, name) in names.iter().enumerate() {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(ClassifierError::EmptyName {
                kind,
                position: pos + 1,
            });
        }
        if !set.insert(Box::<str>::from(name)) {
            return Err(ClassifierError::DuplicateName {
                kind,
                name: name.to_string(),
                position: pos + 1,
            });
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: i32, pairs: &[(usize, f64)]) -> TrainingRecord {
        TrainingRecord::new(label, pairs.iter().copied().collect())
    }

    fn spam_corpus() -> Corpus {
        let records = vec![
            record(1, &[(1, 0.5), (2, 0.5)]),
            record(2, &[(2, 1.0)]),
        ];
        Corpus::new(&["spam", "ham"], &["buy", "now"], &records).unwrap()
    }

    #[test]
    fn indices_follow_input_order() {
        let corpus = spam_corpus();
        assert_eq!(corpus.class_index("spam"), Some(1));
        assert_eq!(corpus.class_index("ham"), Some(2));
        assert_eq!(corpus.feature_index("buy"), Some(1));
        assert_eq!(corpus.feature_index("now"), Some(2));
        assert_eq!(corpus.feature_index("later"), None);
        assert_eq!(corpus.class_num(), 2);
        assert_eq!(corpus.feature_num(), 2);
        assert_eq!(corpus.doc_num(), 2);
    }

    #[test]
    fn reverse_lookup_round_trips() {
        let corpus = spam_corpus();
        for name in ["spam", "ham"] {
            assert_eq!(corpus.label(corpus.class_index(name).unwrap()), name);
        }
        for name in ["buy", "now"] {
            assert_eq!(corpus.feature(corpus.feature_index(name).unwrap()), name);
        }
    }

    #[test]
    fn reverse_lookup_out_of_range_is_empty() {
        let corpus = spam_corpus();
        assert_eq!(corpus.label(0), "");
        assert_eq!(corpus.feature(0), "");
        assert_eq!(corpus.label(3), "");
        assert_eq!(corpus.feature(usize::MAX), "");
        assert_eq!(corpus.idf(0), None);
        assert_eq!(corpus.idf(3), None);
    }

    #[test]
    fn one_idf_per_feature() {
        let corpus = spam_corpus();
        assert_eq!(corpus.idf_vec().len(), corpus.feature_num());
        assert!((corpus.idf(1).unwrap() - (2.01f64 / 1.01).ln()).abs() < 1e-15);
        assert_eq!(corpus.idf(2), Some(0.0));
    }

    #[test]
    fn tokenizer_vocabulary_is_the_feature_set() {
        let corpus = spam_corpus();
        assert_eq!(corpus.tokenizer().vocab_size(), corpus.feature_num());
        let tokens = corpus.tokenizer().tokenize("buy now or never");
        for token in tokens {
            assert_eq!(corpus.feature(token.feature), token.text);
        }
    }

    #[test]
    fn duplicate_and_empty_names_fail() {
        let err = Corpus::new(&["a", "b", "a"], &["x"], &[]).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::DuplicateName { kind: "class", position: 3, .. }
        ));
        let err = Corpus::new(&["a"], &["x", ""], &[]).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::EmptyName { kind: "feature", position: 2 }
        ));
    }

    #[test]
    fn empty_training_set_is_finite() {
        let corpus = Corpus::new(&["a"], &["x", "y"], &[]).unwrap();
        assert_eq!(corpus.doc_num(), 0);
        assert!(corpus.idf_vec().iter().all(|idf| idf.is_finite()));
    }

    #[test]
    fn corpus_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Corpus>();
    }
}
