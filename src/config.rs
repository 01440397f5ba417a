use serde::{Deserialize, Serialize};

/// What to drop when an `index:weight` pair in a training line does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPair {
    /// drop the whole line
    #[default]
    SkipLine,
    /// drop only the pair, keep the rest of the line
    SkipPair,
}

/// Training stream options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub malformed_pair: MalformedPair,
}

/// Vocabulary matcher options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Reject matches that start or end inside a run of ASCII letters/digits.
    pub word_boundaries: bool,
    pub ascii_case_insensitive: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            word_boundaries: true,
            ascii_case_insensitive: false,
        }
    }
}

/// Top-level options for building a classifier from files or an archive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub loader: LoaderConfig,
    pub tokenizer: TokenizerConfig,
}
