use std::io::{Read, Write};

use ::serde::{ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    config::TokenizerConfig,
    error::Result,
    vectorizer::{
        corpus::{name_set, Corpus},
        tfidf::TFIDFEngine,
    },
};

/// Deserialization form of `Corpus`
/// It carries everything except the tokenizer, which is rebuilt from the
/// feature names by `into_corpus`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusData {
    pub classes: Vec<String>,
    pub features: Vec<String>,
    pub idf: Vec<f64>,
    pub doc_num: u64,
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
}

impl CorpusData {
    /// Convert into a `Corpus`, checking the same invariants as construction
    pub fn into_corpus<E: TFIDFEngine>(self) -> Result<Corpus<E>> {
        Corpus::from_parts(
            name_set("class", &self.classes)?,
            name_set("feature", &self.features)?,
            self.idf,
            self.doc_num,
            &self.tokenizer,
        )
    }
}

impl<E> Serialize for Corpus<E> {
    /// The tokenizer is not written out, only its config.
    /// Read it back with `CorpusData` or `Corpus::deserialize`.
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let classes: Vec<&str> = self.class_names().collect();
        let features: Vec<&str> = self.feature_names().collect();
        let mut state = serializer.serialize_struct("Corpus", 5)?;
        state.serialize_field("classes", &classes)?;
        state.serialize_field("features", &features)?;
        state.serialize_field("idf", &self.idf)?;
        state.serialize_field("doc_num", &self.doc_num)?;
        state.serialize_field("tokenizer", self.tokenizer.config())?;
        state.end()
    }
}

impl<'de, E> Deserialize<'de> for Corpus<E>
where
    E: TFIDFEngine,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        CorpusData::deserialize(deserializer)?
            .into_corpus()
            .map_err(::serde::de::Error::custom)
    }
}

impl<E> Corpus<E>
where
    E: TFIDFEngine,
{
    /// Write a CBOR snapshot
    pub fn save_cbor<W: Write>(&self, writer: W) -> Result<()> {
        serde_cbor::to_writer(writer, self)?;
        Ok(())
    }

    /// Restore a CBOR snapshot; the training records are not needed
    pub fn load_cbor<R: Read>(reader: R) -> Result<Self> {
        let data: CorpusData = serde_cbor::from_reader(reader)?;
        data.into_corpus()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ClassifierError, vectorizer::record::TrainingRecord};

    fn corpus() -> Corpus {
        let records = vec![
            TrainingRecord::new(1, [(1, 0.5), (2, 0.5)].into_iter().collect()),
            TrainingRecord::new(2, [(2, 1.0), (3, 1.0)].into_iter().collect()),
            TrainingRecord::new(2, [(3, 1.0)].into_iter().collect()),
        ];
        Corpus::new(&["spam", "ham"], &["buy", "now", "机器"], &records).unwrap()
    }

    #[test]
    fn snapshot_restores_lookups_and_vectors() {
        let original = corpus();
        let mut bytes = Vec::new();
        original.save_cbor(&mut bytes).unwrap();
        let restored: Corpus = Corpus::load_cbor(bytes.as_slice()).unwrap();

        assert_eq!(restored.label(2), "ham");
        assert_eq!(restored.feature(3), "机器");
        assert_eq!(restored.doc_num(), 3);
        assert_eq!(restored.idf_vec(), original.idf_vec());
        let text = "buy 机器 now buy";
        assert_eq!(restored.vector(text), original.vector(text));
    }

    #[test]
    fn deserialize_rejects_inconsistent_snapshot() {
        let data = CorpusData {
            classes: vec!["a".into()],
            features: vec!["x".into(), "y".into()],
            idf: vec![0.5],
            doc_num: 1,
            tokenizer: TokenizerConfig::default(),
        };
        let bytes = serde_cbor::to_vec(&data).unwrap();
        let err = Corpus::<crate::DefaultTFIDFEngine>::load_cbor(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidCorpus(_)));
        assert!(serde_cbor::from_slice::<Corpus>(&bytes).is_err());
    }
}
