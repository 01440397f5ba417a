use std::{borrow::Cow, collections::HashMap, fmt, io::BufRead};

use tracing::{debug, warn};

use crate::{
    config::{LoaderConfig, MalformedPair},
    error::Result,
    utils::lines::LineReader,
};

/// One labeled training document in sparse form.
/// Produced per line of the training stream, immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRecord {
    class_label: i32,
    features: HashMap<usize, f64>,
}

impl TrainingRecord {
    pub fn new(class_label: i32, features: HashMap<usize, f64>) -> Self {
        Self {
            class_label,
            features,
        }
    }

    #[inline]
    pub fn class_label(&self) -> i32 {
        self.class_label
    }

    #[inline]
    pub fn features(&self) -> &HashMap<usize, f64> {
        &self.features
    }

    /// presence only, weight is ignored
    #[inline]
    pub fn contains_feature(&self, index: usize) -> bool {
        self.features.contains_key(&index)
    }
}

/// Why a training line was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    TooFewFields,
    InvalidLabel(String),
    InvalidPair(String),
    InvalidEncoding,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::TooFewFields => f.write_str("invalid line data"),
            LineError::InvalidLabel(label) => write!(f, "invalid class label `{}`", label),
            LineError::InvalidPair(pair) => write!(f, "invalid feature pair `{}`", pair),
            LineError::InvalidEncoding => f.write_str("line is not valid UTF-8"),
        }
    }
}

impl std::error::Error for LineError {}

/// Parse `<label> <idx>:<weight> <idx>:<weight> ...`
///
/// Fields are separated by single spaces; empty segments are ignored.
/// No check is made against a vocabulary, indices are taken as given.
pub fn parse_training_line(
    line: &str,
    config: &LoaderConfig,
) -> std::result::Result<TrainingRecord, LineError> {
    let items: Vec<&str> = line.split(' ').collect();
    if items.len() < 2 {
        return Err(LineError::TooFewFields);
    }

    let label = items[0].trim();
    let class_label = label
        .parse::<i32>()
        .map_err(|_| LineError::InvalidLabel(label.to_string()))?;

    let mut features = HashMap::with_capacity(items.len() - 1);
    for item in &items[1..] {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        match parse_pair(item) {
            Some((index, weight)) => {
                features.insert(index, weight);
            }
            None => match config.malformed_pair {
                MalformedPair::SkipLine => return Err(LineError::InvalidPair(item.to_string())),
                MalformedPair::SkipPair => {
                    warn!("invalid feature pair `{}` dropped", item);
                }
            },
        }
    }
    Ok(TrainingRecord::new(class_label, features))
}

fn parse_pair(item: &str) -> Option<(usize, f64)> {
    let mut parts = item.split(':');
    let (index, weight) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    Some((index.parse().ok()?, weight.parse().ok()?))
}

/// Load every training record from `reader`.
///
/// A malformed line is logged and skipped, it never aborts the load.
/// End of stream ends the load normally; any other read failure is returned.
/// Invalid UTF-8 makes the whole line malformed, except under `MalformedPair::SkipPair`
/// where the line is decoded lossily and only the affected pair is dropped.
pub fn load_training<R: BufRead>(reader: R, config: &LoaderConfig) -> Result<Vec<TrainingRecord>> {
    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut lines = LineReader::new(reader);
    while let Some((line_no, raw)) = lines.next_line()? {
        let parsed = decode_line(raw, config.malformed_pair)
            .and_then(|line| parse_training_line(&line, config));
        match parsed {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped += 1;
                warn!(line = line_no, "{}: {:?}", err, String::from_utf8_lossy(raw));
            }
        }
    }
    debug!("loaded {} training records, skipped {}", records.len(), skipped);
    Ok(records)
}

fn decode_line(raw: &[u8], mode: MalformedPair) -> std::result::Result<Cow<'_, str>, LineError> {
    match mode {
        MalformedPair::SkipLine => std::str::from_utf8(raw)
            .map(Cow::Borrowed)
            .map_err(|_| LineError::InvalidEncoding),
        MalformedPair::SkipPair => Ok(String::from_utf8_lossy(raw)),
    }
}
