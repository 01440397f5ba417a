use aho_corasick::{AhoCorasick, Anchored, Input, MatchKind, StartKind};

use crate::{
    config::TokenizerConfig,
    error::{ClassifierError, Result},
};

/// A vocabulary term found in a text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabToken<'a> {
    /// 1-based feature index (position in the vocabulary + 1)
    pub feature: usize,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Closed-vocabulary tokenizer
///
/// Only the terms it was built from are ever produced; everything else in the
/// text is stepped over. At each position the longest vocabulary term starting
/// there wins, and scanning resumes after it.
///
/// With `word_boundaries` the text is read as units: a run of ASCII letters/digits
/// is one unit, any other char is a unit of its own. Matches must start and end
/// on unit boundaries, so `buy` is not found inside `buyer` while CJK terms
/// match anywhere.
#[derive(Debug, Clone)]
pub struct VocabTokenizer {
    matcher: AhoCorasick,
    config: TokenizerConfig,
}

impl VocabTokenizer {
    /// Build from the vocabulary, term `i` gets feature index `i + 1`
    pub fn new<T>(terms: &[T], config: &TokenizerConfig) -> Result<Self>
    where
        T: AsRef<str>,
    {
        if let Some(position) = terms.iter().position(|term| term.as_ref().is_empty()) {
            return Err(ClassifierError::EmptyName {
                kind: "feature",
                position: position + 1,
            });
        }
        let matcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .start_kind(StartKind::Anchored)
            .ascii_case_insensitive(config.ascii_case_insensitive)
            .build(terms.iter().map(AsRef::<str>::as_ref))
            .map_err(|err| ClassifierError::Tokenizer(err.to_string()))?;
        Ok(Self {
            matcher,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// number of terms in the vocabulary
    pub fn vocab_size(&self) -> usize {
        self.matcher.patterns_len()
    }

    /// All vocabulary terms in `text`, left to right, non-overlapping
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<VocabToken<'a>> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            match self.longest_at(text, pos) {
                Some((feature, end)) => {
                    tokens.push(VocabToken {
                        feature,
                        text: &text[pos..end],
                        start: pos,
                        end,
                    });
                    pos = end;
                }
                None => pos = self.next_unit(text, pos),
            }
        }
        tokens
    }

    /// Longest term starting exactly at `pos` that also ends on a unit boundary
    fn longest_at(&self, text: &str, pos: usize) -> Option<(usize, usize)> {
        let mut limit = text.len();
        loop {
            let input = Input::new(text).range(pos..limit).anchored(Anchored::Yes);
            let found = self.matcher.find(input)?;
            if !self.config.word_boundaries || is_boundary(text.as_bytes(), found.end()) {
                return Some((found.pattern().as_usize() + 1, found.end()));
            }
            // 境界の内側で終わっている -> より短い候補を探す
            limit = found.end() - 1;
            if limit <= pos {
                return None;
            }
        }
    }

    fn next_unit(&self, text: &str, pos: usize) -> usize {
        let bytes = text.as_bytes();
        if self.config.word_boundaries && bytes[pos].is_ascii_alphanumeric() {
            let run = bytes[pos..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric())
                .count();
            return pos + run;
        }
        pos + text[pos..].chars().next().map_or(1, char::len_utf8)
    }
}

/// ASCII letters/digits are single bytes, and no byte of a multi-byte char is ASCII,
/// so looking at the neighbouring bytes is enough.
#[inline]
fn is_boundary(bytes: &[u8], pos: usize) -> bool {
    if pos == 0 || pos >= bytes.len() {
        return true;
    }
    !(bytes[pos - 1].is_ascii_alphanumeric() && bytes[pos].is_ascii_alphanumeric())
}
