use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::Arc,
};

use tracing::info;

use crate::{
    classifier::{Classifier, ModelLoader, Predictor},
    config::ClassifierConfig,
    error::Result,
    utils::{
        lines::{travel_lines, LineReader},
        memzip::MemZip,
    },
    vectorizer::{corpus::Corpus, record::load_training, tfidf::TFIDFEngine},
};

/// class map member of a corpus archive (`name:rest` per line)
pub const CLASS_MAP_FILE: &str = "name.map";
/// feature list member of a corpus archive (one name per line)
pub const FEATURE_FILE: &str = "feature_mmt.txt";
/// training records member of a corpus archive
pub const TRAIN_FILE: &str = "train.date";
/// serialized predictor member of a corpus archive
pub const MODEL_FILE: &str = "train.date.model";

/// Class names from a `name:rest` map.
/// Only lines with exactly two colon separated fields count; `#` lines are comments.
pub fn read_class_names<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut classes = Vec::new();
    travel_lines(reader, ':', |_, items| {
        if items.len() == 2 {
            classes.push(items[0].trim().to_string());
        }
    })?;
    Ok(classes)
}

/// Feature names, one per line; blank lines are skipped
pub fn read_feature_names<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut features = Vec::new();
    let mut lines = LineReader::new(reader);
    while let Some((_, raw)) = lines.next_line()? {
        let feature = String::from_utf8_lossy(raw);
        let feature = feature.trim();
        if !feature.is_empty() {
            features.push(feature.to_string());
        }
    }
    Ok(features)
}

/// Feature names as stored in a corpus archive.
/// Same as `read_feature_names`, except `#` lines are comments.
pub fn read_archive_feature_names<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut features = Vec::new();
    travel_lines(reader, ' ', |line, _| {
        let feature = line.trim();
        if !feature.is_empty() {
            features.push(feature.to_string());
        }
    })?;
    Ok(features)
}

/// Build the corpus from the class map, feature list and training members of an archive
pub fn corpus_from_zip<E: TFIDFEngine>(mz: &MemZip, config: &ClassifierConfig) -> Result<Corpus<E>> {
    let class_map = mz.get(CLASS_MAP_FILE)?;
    let feature_list = mz.get(FEATURE_FILE)?;
    let train = mz.get(TRAIN_FILE)?;

    let classes = read_class_names(class_map)?;
    let features = read_archive_feature_names(feature_list)?;
    let records = load_training(train, &config.loader)?;
    Corpus::with_config(&classes, &features, &records, &config.tokenizer)
}

fn open<P: AsRef<Path>>(path: P) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

impl<P, E> Classifier<P, E>
where
    P: Predictor,
    E: TFIDFEngine,
{
    /// Build a classifier from files on disk
    ///
    /// # Arguments
    /// * `label_file` - class map (`name:rest` per line)
    /// * `feature_file` - feature list (one name per line)
    /// * `train_file` - training records
    /// * `model_file` - serialized predictor, handed to `loader`
    pub fn from_files<L>(
        label_file: impl AsRef<Path>,
        feature_file: impl AsRef<Path>,
        train_file: impl AsRef<Path>,
        model_file: impl AsRef<Path>,
        loader: &L,
        config: &ClassifierConfig,
    ) -> Result<Self>
    where
        L: ModelLoader<Model = P>,
    {
        let train = open(train_file)?;
        let classes = read_class_names(open(label_file)?)?;
        let features = read_feature_names(open(feature_file)?)?;
        let records = load_training(train, &config.loader)?;
        let corpus = Corpus::with_config(&classes, &features, &records, &config.tokenizer)?;
        let predictor = loader.load_model(&mut open(model_file)?)?;
        Ok(Self::new(Arc::new(corpus), predictor))
    }

    /// Build a classifier from a corpus archive
    /// (`name.map`, `feature_mmt.txt`, `train.date`, `train.date.model`).
    pub fn from_zip<L>(path: impl AsRef<Path>, loader: &L, config: &ClassifierConfig) -> Result<Self>
    where
        L: ModelLoader<Model = P>,
    {
        let mz = MemZip::open(path)?;
        let mut model = mz.get(MODEL_FILE)?;
        let corpus = corpus_from_zip(&mz, config)?;
        let predictor = loader.load_model(&mut model)?;
        info!("classifier loaded from {}", mz.path().display());
        Ok(Self::new(Arc::new(corpus), predictor))
    }
}
